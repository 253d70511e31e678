//! Transaction pipeline routes: build, sign, submit.

use std::sync::Arc;
use std::time::Duration;

use noderpc_core::messages::{
    BuildRequest, SignRequest, SignResponse, SubmitRequest, SubmitResponse, Template,
};
use noderpc_core::{ServiceError, TxPipeline};

use crate::service::operation::OperationContext;

/// Template time-to-live applied when the request does not set one.
pub const DEFAULT_BUILD_TTL: Duration = Duration::from_secs(5 * 60);

/// Builds a transaction template.
///
/// Construction is bounded by the template's time-to-live (`ttl`, in
/// milliseconds) and abandoned early if the caller goes away.
pub async fn build_transaction(
    pipeline: Arc<dyn TxPipeline>,
    ctx: OperationContext,
    mut req: BuildRequest,
) -> Result<Template, ServiceError> {
    let ttl = match req.ttl.take() {
        Some(ms) if ms > 0 => Duration::from_millis(ms),
        _ => DEFAULT_BUILD_TTL,
    };

    tokio::select! {
        biased;
        () = ctx.cancel.cancelled() => {
            Err(ServiceError::Unavailable("request cancelled".into()))
        }
        built = tokio::time::timeout(ttl, pipeline.build(req, ttl)) => {
            built.unwrap_or_else(|_| {
                Err(ServiceError::Unavailable(format!(
                    "transaction build exceeded ttl of {ttl:?}"
                )))
            })
        }
    }
}

pub async fn sign_transaction(
    pipeline: Arc<dyn TxPipeline>,
    _ctx: OperationContext,
    req: SignRequest,
) -> Result<SignResponse, ServiceError> {
    pipeline.sign(req.transaction, &req.password).await
}

pub async fn submit_transaction(
    pipeline: Arc<dyn TxPipeline>,
    _ctx: OperationContext,
    req: SubmitRequest,
) -> Result<SubmitResponse, ServiceError> {
    let submitted = pipeline.submit(&req.raw_transaction).await?;
    tracing::info!(tx_id = %submitted.tx_id, "submitted transaction");
    Ok(submitted)
}

/// Signs and, once every signature is in place, submits.
pub async fn sign_submit_transaction(
    pipeline: Arc<dyn TxPipeline>,
    _ctx: OperationContext,
    req: SignRequest,
) -> Result<SubmitResponse, ServiceError> {
    let signed = pipeline.sign(req.transaction, &req.password).await?;
    if !signed.sign_complete {
        return Err(ServiceError::InvalidArgument(
            "transaction is not fully signed".into(),
        ));
    }
    let submitted = pipeline.submit(&signed.transaction.raw_transaction).await?;
    tracing::info!(tx_id = %submitted.tx_id, "signed and submitted transaction");
    Ok(submitted)
}
