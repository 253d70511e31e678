//! Chain introspection routes.

use std::sync::Arc;

use noderpc_core::messages::{
    Block, BlockCount, BlockHash, BlockHashRequest, BlockHeaderInfo, BlockHeightRequest,
    GetBlockRequest, ListUnspentOutputsRequest, TxCount, UnspentOutput,
};
use noderpc_core::{ChainView, ServiceError};

use crate::service::operation::OperationContext;

pub async fn block_hash(chain: Arc<dyn ChainView>, _ctx: OperationContext) -> Result<BlockHash, ServiceError> {
    Ok(BlockHash {
        block_hash: chain.best_block_hash().await?,
    })
}

pub async fn get_block_header_by_hash(
    chain: Arc<dyn ChainView>,
    _ctx: OperationContext,
    req: BlockHashRequest,
) -> Result<BlockHeaderInfo, ServiceError> {
    chain.block_header_by_hash(&req.block_hash).await
}

pub async fn get_block_header_by_height(
    chain: Arc<dyn ChainView>,
    _ctx: OperationContext,
    req: BlockHeightRequest,
) -> Result<BlockHeaderInfo, ServiceError> {
    chain.block_header_by_height(req.block_height).await
}

/// Selects by `block_hash` when given, else by `block_height`.
pub async fn get_block(
    chain: Arc<dyn ChainView>,
    _ctx: OperationContext,
    req: GetBlockRequest,
) -> Result<Block, ServiceError> {
    if req.block_hash.is_empty() {
        chain.block_by_height(req.block_height).await
    } else {
        chain.block_by_hash(&req.block_hash).await
    }
}

/// Number of blocks including genesis: best height + 1.
pub async fn get_block_count(
    chain: Arc<dyn ChainView>,
    _ctx: OperationContext,
) -> Result<BlockCount, ServiceError> {
    let height = chain.best_height().await?;
    Ok(BlockCount {
        block_count: height.saturating_add(1),
    })
}

pub async fn get_block_transactions_count_by_hash(
    chain: Arc<dyn ChainView>,
    _ctx: OperationContext,
    req: BlockHashRequest,
) -> Result<TxCount, ServiceError> {
    let block = chain.block_by_hash(&req.block_hash).await?;
    Ok(TxCount {
        count: block.transactions.len(),
    })
}

pub async fn get_block_transactions_count_by_height(
    chain: Arc<dyn ChainView>,
    _ctx: OperationContext,
    req: BlockHeightRequest,
) -> Result<TxCount, ServiceError> {
    let block = chain.block_by_height(req.block_height).await?;
    Ok(TxCount {
        count: block.transactions.len(),
    })
}

pub async fn list_unspent_outputs(
    chain: Arc<dyn ChainView>,
    _ctx: OperationContext,
    req: ListUnspentOutputsRequest,
) -> Result<Vec<UnspentOutput>, ServiceError> {
    chain.unspent_outputs(&req.id).await
}
