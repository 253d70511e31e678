//! Node status and mining routes.

use std::sync::Arc;

use noderpc_core::messages::{GasRate, MiningStatus, NetInfo, NodeInfo, SubmitWorkRequest, Work};
use noderpc_core::{Miner, NodeView, ServiceError};

use crate::service::operation::OperationContext;

pub async fn info(node: Arc<dyn NodeView>, _ctx: OperationContext) -> Result<NodeInfo, ServiceError> {
    node.node_info().await
}

pub async fn net_info(node: Arc<dyn NodeView>, _ctx: OperationContext) -> Result<NetInfo, ServiceError> {
    node.net_info().await
}

pub async fn is_mining(miner: Arc<dyn Miner>, _ctx: OperationContext) -> Result<MiningStatus, ServiceError> {
    Ok(MiningStatus {
        is_mining: miner.is_mining().await?,
    })
}

pub async fn gas_rate(miner: Arc<dyn Miner>, _ctx: OperationContext) -> Result<GasRate, ServiceError> {
    Ok(GasRate {
        gas_rate: miner.gas_rate().await?,
    })
}

pub async fn get_work(miner: Arc<dyn Miner>, _ctx: OperationContext) -> Result<Work, ServiceError> {
    miner.get_work().await
}

/// Answers `true` when the header solved the current job.
pub async fn submit_work(
    miner: Arc<dyn Miner>,
    _ctx: OperationContext,
    req: SubmitWorkRequest,
) -> Result<bool, ServiceError> {
    let accepted = miner.submit_work(&req.block_header).await?;
    tracing::debug!(accepted, "work submitted");
    Ok(accepted)
}
