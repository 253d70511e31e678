//! In-memory access-token store.
//!
//! Secrets are generated here and returned to the caller exactly once. The
//! store keeps only a SHA-256 digest of each secret.

use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use noderpc_core::messages::{AccessToken, TokenType};
use noderpc_core::{AccessTokenStore, CredentialError, CredentialStore, Principal, ServiceError};
use regex::Regex;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

static TOKEN_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{1,64}$").expect("token id pattern is valid"));

/// Random bytes per secret, before hex encoding.
const SECRET_BYTES: usize = 32;

#[derive(Debug, Clone)]
struct StoredToken {
    token_type: TokenType,
    digest: [u8; 32],
    created_at: u64,
}

impl StoredToken {
    fn matches(&self, secret: &str) -> bool {
        self.digest[..].ct_eq(&digest(secret)[..]).into()
    }
}

/// Access tokens held in process memory; lost on restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<String, StoredToken>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn digest(secret: &str) -> [u8; 32] {
    Sha256::digest(secret.as_bytes()).into()
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

#[async_trait]
impl AccessTokenStore for MemoryTokenStore {
    async fn create(&self, id: &str, token_type: TokenType) -> Result<AccessToken, ServiceError> {
        if !TOKEN_ID.is_match(id) {
            return Err(ServiceError::InvalidArgument(format!(
                "invalid access token id {id:?}"
            )));
        }

        let secret = hex::encode(rand::random::<[u8; SECRET_BYTES]>());
        let created_at = unix_now();
        match self.tokens.entry(id.to_string()) {
            Entry::Occupied(_) => {
                return Err(ServiceError::AlreadyExists(format!("access token {id}")));
            }
            Entry::Vacant(slot) => {
                slot.insert(StoredToken {
                    token_type,
                    digest: digest(&secret),
                    created_at,
                });
            }
        }

        Ok(AccessToken {
            id: id.to_string(),
            token: Some(format!("{id}:{secret}")),
            token_type,
            created_at,
        })
    }

    async fn list(&self) -> Result<Vec<AccessToken>, ServiceError> {
        let mut tokens: Vec<_> = self
            .tokens
            .iter()
            .map(|entry| AccessToken {
                id: entry.key().clone(),
                token: None,
                token_type: entry.token_type,
                created_at: entry.created_at,
            })
            .collect();
        tokens.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tokens)
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.tokens
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("access token", id))
    }

    async fn check(&self, id: &str, secret: &str) -> Result<(), ServiceError> {
        let stored = self
            .tokens
            .get(id)
            .ok_or_else(|| ServiceError::not_found("access token", id))?;
        if stored.matches(secret) {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(format!(
                "secret does not match access token {id}"
            )))
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryTokenStore {
    async fn resolve(&self, id: &str, secret: &str) -> Result<Principal, CredentialError> {
        let stored = self
            .tokens
            .get(id)
            .ok_or_else(|| CredentialError::UnknownToken(id.to_string()))?;
        if !stored.matches(secret) {
            return Err(CredentialError::SecretMismatch(id.to_string()));
        }
        Ok(Principal::new(id, stored.token_type.as_str()))
    }
}
