//! Asset lifecycle routes (wallet-gated).

use noderpc_core::messages::{
    Asset, CreateAssetRequest, ListAssetsRequest, UpdateAssetAliasRequest, UpdateAssetTagsRequest,
};
use noderpc_core::ServiceError;

use crate::service::capability::WalletHandles;
use crate::service::operation::OperationContext;

pub async fn create_asset(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: CreateAssetRequest,
) -> Result<Asset, ServiceError> {
    let asset = wallet.assets.create(req).await?;
    tracing::info!(id = %asset.id, alias = %asset.alias, "created asset");
    Ok(asset)
}

pub async fn update_asset_alias(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: UpdateAssetAliasRequest,
) -> Result<(), ServiceError> {
    if req.alias.trim().is_empty() {
        return Err(ServiceError::InvalidArgument("asset alias must not be empty".into()));
    }
    wallet.assets.update_alias(&req.id, &req.alias).await
}

pub async fn update_asset_tags(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: UpdateAssetTagsRequest,
) -> Result<(), ServiceError> {
    wallet.assets.update_tags(&req.asset_info, req.tags).await
}

pub async fn list_assets(
    wallet: WalletHandles,
    _ctx: OperationContext,
    req: ListAssetsRequest,
) -> Result<Vec<Asset>, ServiceError> {
    wallet.assets.list(&req.id).await
}
