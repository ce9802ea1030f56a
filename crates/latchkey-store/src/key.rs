//! Keys and values held by a [`CredentialStore`](crate::CredentialStore).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CredentialKey
// ---------------------------------------------------------------------------

/// The keys the login controller reads and writes.
///
/// The set is closed: the controller is the only writer, and it only
/// ever touches these two entries. Using an enum instead of free-form
/// strings means a typo is a compile error rather than a silently
/// missing lockout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CredentialKey {
    /// Opaque token returned by the auth service, kept for auto-login.
    RememberedToken,

    /// Lockout expiry as milliseconds since the Unix epoch.
    LockoutExpiresAt,
}

impl CredentialKey {
    /// Every key, in a stable order.
    pub const ALL: [Self; 2] = [Self::RememberedToken, Self::LockoutExpiresAt];

    /// The name used on disk and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RememberedToken => "remembered_token",
            Self::LockoutExpiresAt => "lockout_expires_at",
        }
    }
}

impl std::fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StoredValue
// ---------------------------------------------------------------------------

/// A persisted value: either a string or an integer.
///
/// `#[serde(untagged)]` keeps the on-disk JSON flat: a token is just
/// `"abc…"` and a timestamp is just `1700000000000`, with no wrapper
/// object. Serde tries the variants in order, so integers are matched
/// before strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Integer(i64),
    Text(String),
}

impl StoredValue {
    /// Returns the string payload, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Integer(_) => None,
        }
    }

    /// Returns the integer payload, if this is an `Integer` value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for StoredValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_key_as_str_is_stable() {
        assert_eq!(CredentialKey::RememberedToken.as_str(), "remembered_token");
        assert_eq!(
            CredentialKey::LockoutExpiresAt.to_string(),
            "lockout_expires_at"
        );
    }

    #[test]
    fn test_stored_value_accessors_match_variant() {
        let text = StoredValue::from("jwt_token_123");
        assert_eq!(text.as_text(), Some("jwt_token_123"));
        assert_eq!(text.as_integer(), None);

        let number = StoredValue::from(42_i64);
        assert_eq!(number.as_integer(), Some(42));
        assert_eq!(number.as_text(), None);
    }

    #[test]
    fn test_stored_value_json_is_untagged() {
        let json = serde_json::to_string(&StoredValue::from(1_700_000_000_000_i64))
            .expect("encode");
        assert_eq!(json, "1700000000000");

        let decoded: StoredValue = serde_json::from_str("\"tok\"").expect("decode");
        assert_eq!(decoded, StoredValue::Text("tok".into()));
    }
}
