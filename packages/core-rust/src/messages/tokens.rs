//! Access token payloads.

use serde::{Deserialize, Serialize};

/// Audience of an access token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    #[default]
    Client,
    Network,
}

impl TokenType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Network => "network",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccessTokenRequest {
    pub id: String,
    #[serde(rename = "type", default)]
    pub token_type: TokenType,
}

/// Access token metadata. `token` (`id:secret`) is only present in the
/// response to `create-access-token`; listings never carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Unix seconds.
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenIdRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckAccessTokenRequest {
    pub id: String,
    pub secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_type_defaults_to_client() {
        let req: CreateAccessTokenRequest = serde_json::from_str(r#"{"id":"ops"}"#).unwrap();
        assert_eq!(req.token_type, TokenType::Client);
    }

    #[test]
    fn listed_token_omits_secret() {
        let token = AccessToken {
            id: "ops".to_string(),
            token: None,
            token_type: TokenType::Network,
            created_at: 1,
        };
        let json = serde_json::to_value(&token).unwrap();
        assert!(json.get("token").is_none());
        assert_eq!(json["type"], "network");
    }
}
