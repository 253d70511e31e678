//! Private key export and import routes.

use std::sync::Arc;

use noderpc_core::messages::{ExportKeyRequest, ExportedKey, ImportKeyRequest, ImportProgress, XPub};
use noderpc_core::{KeyBackup, ServiceError};

use crate::service::operation::OperationContext;

pub async fn export_private_key(
    backup: Arc<dyn KeyBackup>,
    ctx: OperationContext,
    req: ExportKeyRequest,
) -> Result<ExportedKey, ServiceError> {
    let exported = backup.export_private_key(&req.xpub, &req.password).await?;
    tracing::warn!(
        request_id = %ctx.request_id,
        by = ctx.principal.as_ref().map_or("-", |p| p.id.as_str()),
        "exported private key"
    );
    Ok(exported)
}

/// Imports a key and starts the wallet rescan; poll `import-key-progress`.
pub async fn import_private_key(
    backup: Arc<dyn KeyBackup>,
    _ctx: OperationContext,
    req: ImportKeyRequest,
) -> Result<XPub, ServiceError> {
    if req.alias.trim().is_empty() {
        return Err(ServiceError::InvalidArgument("key alias must not be empty".into()));
    }
    let xpub = backup.import_private_key(req).await?;
    tracing::info!(alias = %xpub.alias, "imported private key");
    Ok(xpub)
}

pub async fn import_key_progress(
    backup: Arc<dyn KeyBackup>,
    _ctx: OperationContext,
) -> Result<ImportProgress, ServiceError> {
    backup.import_progress().await
}
