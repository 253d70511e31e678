//! Dashboard asset fallback.
//!
//! Paths under the configured prefix are served from the asset directory.
//! Files missing there resolve to the default document so client-side
//! routing inside the dashboard keeps working. Every other path goes to the
//! API chain untouched.

use std::convert::Infallible;

use axum::body::Body;
use axum::http::Request;
use axum::response::IntoResponse;
use axum::Router;
use tower::Service;
use tower_http::services::{ServeDir, ServeFile};

use crate::service::config::StaticAssetsConfig;
use crate::service::error::BuildError;

/// Mounts the asset tree in front of `api`.
///
/// # Errors
///
/// Returns [`BuildError::InvalidStaticPrefix`] if the prefix is not an
/// absolute, non-root path without route wildcards.
pub fn with_static_assets<S>(api: S, config: &StaticAssetsConfig) -> Result<Router, BuildError>
where
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + Sync + 'static,
    S::Response: IntoResponse,
    S::Future: Send + 'static,
{
    let prefix = normalize_prefix(&config.prefix)?;
    let assets = ServeDir::new(&config.root)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(config.root.join(&config.index)));

    Ok(Router::new()
        .nest_service(&prefix, assets)
        .fallback_service(api))
}

/// Returns the prefix without a trailing slash.
fn normalize_prefix(prefix: &str) -> Result<String, BuildError> {
    let trimmed = prefix.trim_end_matches('/');
    let valid = trimmed.starts_with('/')
        && trimmed.len() > 1
        && !trimmed.contains(['{', '}', '*', ':']);
    if valid {
        Ok(trimmed.to_string())
    } else {
        Err(BuildError::InvalidStaticPrefix(prefix.to_string()))
    }
}
