//! Key lifecycle routes (wallet-gated).

use std::sync::Arc;

use noderpc_core::messages::{
    CreateKeyRequest, DeleteKeyRequest, PasswordReset, ResetKeyPasswordRequest, XPub,
};
use noderpc_core::{KeyStore, ServiceError};

use crate::service::operation::OperationContext;

pub async fn create_key(
    keys: Arc<dyn KeyStore>,
    _ctx: OperationContext,
    req: CreateKeyRequest,
) -> Result<XPub, ServiceError> {
    let xpub = keys.create(&req.alias, &req.password).await?;
    tracing::info!(alias = %xpub.alias, "created key");
    Ok(xpub)
}

pub async fn list_keys(
    keys: Arc<dyn KeyStore>,
    _ctx: OperationContext,
) -> Result<Vec<XPub>, ServiceError> {
    keys.list().await
}

pub async fn delete_key(
    keys: Arc<dyn KeyStore>,
    _ctx: OperationContext,
    req: DeleteKeyRequest,
) -> Result<(), ServiceError> {
    keys.delete(&req.xpub, &req.password).await
}

pub async fn reset_key_password(
    keys: Arc<dyn KeyStore>,
    _ctx: OperationContext,
    req: ResetKeyPasswordRequest,
) -> Result<PasswordReset, ServiceError> {
    let changed = keys
        .reset_password(&req.xpub, &req.old_password, &req.new_password)
        .await?;
    Ok(PasswordReset { changed })
}
