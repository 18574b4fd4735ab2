pub mod extractors;
pub mod password;
pub mod policy;
pub mod resolver;
pub mod token;

use serde::{Deserialize, Serialize};

pub use extractors::{bearer_token, CurrentUser};
pub use password::{hash_password, verify_password};
pub use policy::assert_owner;
pub use token::{Claims, Clock, TokenKind, TokenService};

/// Login payload, form-encoded in the OAuth2 password-flow shape:
/// the `username` field carries the account email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Token payload returned by the auth endpoints. Login returns a full
/// access/refresh pair; refresh returns just the new access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
}

impl TokenResponse {
    pub fn pair(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token: Some(refresh_token),
            token_type: "Bearer".to_string(),
        }
    }

    pub fn access_only(access_token: String) -> Self {
        Self {
            access_token,
            refresh_token: None,
            token_type: "Bearer".to_string(),
        }
    }
}
