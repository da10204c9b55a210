//! Bearer-token session state.
//!
//! The game server hands out a token pair from `/token`; every
//! authenticated call presents it in an Authorization header. The token
//! travels through the code as an explicit [`AuthState`] value passed to
//! whoever needs it - there is no ambient session global.

use serde::{Deserialize, Serialize};

/// Stored value meaning "no session". Kept for compatibility with the
/// web client, which writes the literal string "null" on logout.
pub const NULL_SENTINEL: &str = "null";

/// Credential pair returned by the `/token` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken {
    /// Token type (e.g. "bearer")
    pub token_type: String,
    /// Opaque access token
    pub access_token: String,
}

impl BearerToken {
    /// Render the Authorization header value.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Whether the client currently holds a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated(BearerToken),
}

impl AuthState {
    /// Parse a stored session value. Absent content, the "null" sentinel,
    /// and unparsable content all mean unauthenticated.
    pub fn from_stored(stored: Option<&str>) -> Self {
        let Some(raw) = stored else {
            return AuthState::Anonymous;
        };
        let raw = raw.trim();
        if raw.is_empty() || raw == NULL_SENTINEL {
            return AuthState::Anonymous;
        }
        match serde_json::from_str::<BearerToken>(raw) {
            Ok(token) => AuthState::Authenticated(token),
            Err(_) => AuthState::Anonymous,
        }
    }

    /// Serialize for storage. Anonymous sessions store the "null"
    /// sentinel.
    pub fn to_stored(&self) -> String {
        match self {
            AuthState::Anonymous => NULL_SENTINEL.to_string(),
            AuthState::Authenticated(token) => serde_json::to_string(token)
                .unwrap_or_else(|_| NULL_SENTINEL.to_string()),
        }
    }

    pub fn token(&self) -> Option<&BearerToken> {
        match self {
            AuthState::Anonymous => None,
            AuthState::Authenticated(token) => Some(token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stored_token() {
        let json = r#"{"token_type": "bearer", "access_token": "abc123"}"#;
        let state = AuthState::from_stored(Some(json));
        let token = state.token().expect("token");
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.access_token, "abc123");
        assert!(state.is_authenticated());
    }

    #[test]
    fn test_null_sentinel_means_anonymous() {
        assert_eq!(AuthState::from_stored(Some("null")), AuthState::Anonymous);
        assert_eq!(
            AuthState::from_stored(Some("  null\n")),
            AuthState::Anonymous
        );
    }

    #[test]
    fn test_absent_or_garbage_means_anonymous() {
        assert_eq!(AuthState::from_stored(None), AuthState::Anonymous);
        assert_eq!(AuthState::from_stored(Some("")), AuthState::Anonymous);
        assert_eq!(
            AuthState::from_stored(Some("{not json")),
            AuthState::Anonymous
        );
        // Valid JSON but missing the token fields
        assert_eq!(
            AuthState::from_stored(Some(r#"{"foo": 1}"#)),
            AuthState::Anonymous
        );
    }

    #[test]
    fn test_stored_roundtrip() {
        let state = AuthState::Authenticated(BearerToken {
            token_type: "bearer".to_string(),
            access_token: "xyz".to_string(),
        });
        let stored = state.to_stored();
        assert_eq!(AuthState::from_stored(Some(&stored)), state);

        assert_eq!(AuthState::Anonymous.to_stored(), "null");
        assert_eq!(
            AuthState::from_stored(Some(&AuthState::Anonymous.to_stored())),
            AuthState::Anonymous
        );
    }

    #[test]
    fn test_authorization_header() {
        let token = BearerToken {
            token_type: "bearer".to_string(),
            access_token: "abc123".to_string(),
        };
        assert_eq!(token.authorization(), "bearer abc123");
    }
}
