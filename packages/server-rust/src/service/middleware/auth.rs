//! Access-token authentication.
//!
//! Wraps the whole assembled chain. A request is forwarded only when its
//! `Authorization` header resolves to a [`Principal`] through the
//! [`CredentialStore`]; the principal is then inserted into the request
//! extensions. Any failure answers the generic not-authenticated error while
//! the specific cause goes to the log.
//!
//! Accepted header forms:
//!
//! - `Authorization: Basic base64(id:secret)`
//! - `Authorization: Bearer id:secret`

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Request};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use noderpc_core::{CredentialError, CredentialStore, Principal};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tower::{Layer, Service};

use crate::service::config::AuthConfig;
use crate::service::error::ApiError;

/// Principal id given to trusted loopback peers.
pub const LOCALHOST_PRINCIPAL: &str = "localhost";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Why a request was refused. Logged, never sent to the caller.
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("no authorization header")]
    MissingCredential,
    #[error("malformed authorization header: {0}")]
    MalformedCredential(&'static str),
    #[error("credential rejected")]
    Rejected(#[from] CredentialError),
}

/// Access-token id and secret taken from the request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: String,
    pub secret: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Credential {
    /// Parses the `Authorization` header.
    ///
    /// # Errors
    ///
    /// [`AuthFailure::MissingCredential`] without a header,
    /// [`AuthFailure::MalformedCredential`] for anything undecodable.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AuthFailure> {
        let value = headers
            .get(AUTHORIZATION)
            .ok_or(AuthFailure::MissingCredential)?
            .to_str()
            .map_err(|_| AuthFailure::MalformedCredential("header is not ASCII"))?;

        let pair = if let Some(encoded) = value.strip_prefix("Basic ") {
            let decoded = STANDARD
                .decode(encoded.trim())
                .map_err(|_| AuthFailure::MalformedCredential("invalid base64"))?;
            String::from_utf8(decoded)
                .map_err(|_| AuthFailure::MalformedCredential("credential is not UTF-8"))?
        } else if let Some(token) = value.strip_prefix("Bearer ") {
            token.trim().to_string()
        } else {
            return Err(AuthFailure::MalformedCredential("unsupported scheme"));
        };

        let (id, secret) = pair
            .split_once(':')
            .ok_or(AuthFailure::MalformedCredential("expected id:secret"))?;
        if id.is_empty() || secret.is_empty() {
            return Err(AuthFailure::MalformedCredential("empty id or secret"));
        }
        Ok(Self {
            id: id.to_string(),
            secret: secret.to_string(),
        })
    }

    fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.id.as_bytes());
        hasher.update([0]);
        hasher.update(self.secret.as_bytes());
        hasher.finalize().into()
    }
}

// ---------------------------------------------------------------------------
// Authenticator
// ---------------------------------------------------------------------------

/// Positive-result cache keyed by a digest of the credential.
struct CredentialCache {
    ttl: Duration,
    entries: quick_cache::sync::Cache<[u8; 32], (Principal, Instant)>,
}

impl CredentialCache {
    fn get(&self, key: &[u8; 32]) -> Option<Principal> {
        let (principal, stored_at) = self.entries.get(key)?;
        if stored_at.elapsed() < self.ttl {
            Some(principal)
        } else {
            self.entries.remove(key);
            None
        }
    }

    fn insert(&self, key: [u8; 32], principal: Principal) {
        self.entries.insert(key, (principal, Instant::now()));
    }
}

/// Decides whether a request may reach the chain.
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    public_prefixes: Vec<String>,
    trust_loopback: bool,
    cache: Option<CredentialCache>,
}

impl Authenticator {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, config: &AuthConfig) -> Self {
        let cache = config.cache_ttl.map(|ttl| CredentialCache {
            ttl,
            entries: quick_cache::sync::Cache::new(config.cache_capacity.max(1)),
        });
        Self {
            store,
            public_prefixes: config
                .public_prefixes
                .iter()
                .map(|p| p.trim_end_matches('/').to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            trust_loopback: config.trust_loopback,
            cache,
        }
    }

    fn is_public(&self, path: &str) -> bool {
        self.public_prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    /// Resolves the caller. `Ok(None)` admits a public path without identity.
    ///
    /// `peer` is the remote address when the server runs with connect info.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthFailure`] that made the request inadmissible.
    pub async fn authenticate(
        &self,
        path: &str,
        headers: &HeaderMap,
        peer: Option<SocketAddr>,
    ) -> Result<Option<Principal>, AuthFailure> {
        if self.is_public(path) {
            return Ok(None);
        }

        match self.resolve(headers).await {
            Ok(principal) => Ok(Some(principal)),
            Err(_) if self.trust_loopback && peer.is_some_and(|addr| addr.ip().is_loopback()) => {
                Ok(Some(Principal::new(LOCALHOST_PRINCIPAL, "client")))
            }
            Err(err) => Err(err),
        }
    }

    async fn resolve(&self, headers: &HeaderMap) -> Result<Principal, AuthFailure> {
        let credential = Credential::from_headers(headers)?;

        let key = self.cache.as_ref().map(|_| credential.digest());
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(principal) = cache.get(key) {
                return Ok(principal);
            }
        }

        let principal = self
            .store
            .resolve(&credential.id, &credential.secret)
            .await?;

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.insert(key, principal.clone());
        }
        Ok(principal)
    }
}

fn peer_addr<B>(req: &Request<B>) -> Option<SocketAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

// ---------------------------------------------------------------------------
// AuthLayer
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AuthLayer {
    auth: Arc<Authenticator>,
}

impl AuthLayer {
    #[must_use]
    pub fn new(auth: Arc<Authenticator>) -> Self {
        Self { auth }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            auth: Arc::clone(&self.auth),
        }
    }
}

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    auth: Arc<Authenticator>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let auth = Arc::clone(&self.auth);
        // Take the service that was driven to readiness, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let path = req.uri().path().to_string();
            let peer = peer_addr(&req);
            let outcome = auth.authenticate(&path, req.headers(), peer).await;
            match outcome {
                Ok(Some(principal)) => {
                    tracing::trace!(principal = %principal.id, "request authenticated");
                    req.extensions_mut().insert(principal);
                }
                Ok(None) => {}
                Err(failure) => {
                    let cause = format!(
                        "{:#}",
                        anyhow::Error::new(failure).context("authentication failed")
                    );
                    tracing::error!(path = %path, error = %cause, "rejecting request");
                    return Ok(ApiError::not_authenticated(cause).into_response());
                }
            }
            inner.call(req).await
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
