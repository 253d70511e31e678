//! Access-token management routes.

use std::sync::Arc;

use noderpc_core::messages::{
    AccessToken, AccessTokenIdRequest, CheckAccessTokenRequest, CreateAccessTokenRequest,
};
use noderpc_core::{AccessTokenStore, ServiceError};

use crate::service::operation::OperationContext;

/// Creates a token. The response is the only time its secret is revealed.
pub async fn create_access_token(
    tokens: Arc<dyn AccessTokenStore>,
    ctx: OperationContext,
    req: CreateAccessTokenRequest,
) -> Result<AccessToken, ServiceError> {
    let token = tokens.create(&req.id, req.token_type).await?;
    tracing::info!(
        id = %token.id,
        token_type = token.token_type.as_str(),
        by = ctx.principal.as_ref().map_or("-", |p| p.id.as_str()),
        "created access token"
    );
    Ok(token)
}

pub async fn list_access_tokens(
    tokens: Arc<dyn AccessTokenStore>,
    _ctx: OperationContext,
) -> Result<Vec<AccessToken>, ServiceError> {
    tokens.list().await
}

pub async fn delete_access_token(
    tokens: Arc<dyn AccessTokenStore>,
    ctx: OperationContext,
    req: AccessTokenIdRequest,
) -> Result<(), ServiceError> {
    tokens.delete(&req.id).await?;
    tracing::info!(
        id = %req.id,
        by = ctx.principal.as_ref().map_or("-", |p| p.id.as_str()),
        "revoked access token"
    );
    Ok(())
}

/// Empty success when the secret matches, an operation failure otherwise.
pub async fn check_access_token(
    tokens: Arc<dyn AccessTokenStore>,
    _ctx: OperationContext,
    req: CheckAccessTokenRequest,
) -> Result<(), ServiceError> {
    tokens.check(&req.id, &req.secret).await
}
