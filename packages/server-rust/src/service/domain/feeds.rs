//! Transaction feed routes.

use std::sync::Arc;

use noderpc_core::messages::{CreateTxFeedRequest, TxFeed, TxFeedAliasRequest, UpdateTxFeedRequest};
use noderpc_core::{ServiceError, TxFeedStore};

use crate::service::operation::OperationContext;

pub async fn create_transaction_feed(
    feeds: Arc<dyn TxFeedStore>,
    _ctx: OperationContext,
    req: CreateTxFeedRequest,
) -> Result<(), ServiceError> {
    if req.alias.trim().is_empty() {
        return Err(ServiceError::InvalidArgument("feed alias must not be empty".into()));
    }
    feeds.create(&req.alias, &req.filter).await?;
    tracing::info!(alias = %req.alias, "created transaction feed");
    Ok(())
}

pub async fn get_transaction_feed(
    feeds: Arc<dyn TxFeedStore>,
    _ctx: OperationContext,
    req: TxFeedAliasRequest,
) -> Result<TxFeed, ServiceError> {
    feeds.get(&req.alias).await
}

pub async fn update_transaction_feed(
    feeds: Arc<dyn TxFeedStore>,
    _ctx: OperationContext,
    req: UpdateTxFeedRequest,
) -> Result<(), ServiceError> {
    feeds.update(&req.alias, &req.filter).await
}

pub async fn delete_transaction_feed(
    feeds: Arc<dyn TxFeedStore>,
    _ctx: OperationContext,
    req: TxFeedAliasRequest,
) -> Result<(), ServiceError> {
    feeds.delete(&req.alias).await
}

pub async fn list_transaction_feeds(
    feeds: Arc<dyn TxFeedStore>,
    _ctx: OperationContext,
) -> Result<Vec<TxFeed>, ServiceError> {
    feeds.list().await
}
