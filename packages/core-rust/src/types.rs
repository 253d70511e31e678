use serde::{Deserialize, Serialize};

/// Free-form key/value annotations attached to accounts and assets.
pub type Tags = serde_json::Map<String, serde_json::Value>;

/// Authenticated caller identity, resolved from an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Identifier of the access token (or `localhost` for trusted loopback peers).
    pub id: String,
    /// Roles granted to this principal, derived from the token type.
    pub roles: Vec<String>,
}

impl Principal {
    /// Creates a principal with a single role.
    #[must_use]
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: vec![role.into()],
        }
    }

    /// Returns `true` if the principal carries the given role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
