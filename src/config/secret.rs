//! Secret configuration values
//!
//! The renderer license key is held in a [`SecretString`]: zeroized on drop,
//! redacted in `Debug`, and written as `[REDACTED]` when a configuration is
//! serialized back out. Reading the value requires `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use geodoc::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let license_key = secret_string("lic-123".to_string());
//! assert_eq!(license_key.expose_secret().as_ref(), "lic-123");
//! assert!(!format!("{license_key:?}").contains("lic-123"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Placeholder written instead of a secret on serialization
pub const REDACTED: &str = "[REDACTED]";

/// Secret string payload; see [`SecretString`]
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Empty or whitespace-only
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Zeroizing, redacted string secret
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wrap an optional plain string
///
/// ```rust
/// use geodoc::config::secret_string_opt;
///
/// assert!(secret_string_opt(Some("lic-123".to_string())).is_some());
/// assert!(secret_string_opt(None).is_none());
/// ```
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}
