//! API credential handling.

use std::fmt;

use crate::error::MissingCredential;

/// A secret API key.
///
/// `Debug` never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key. Blank keys are treated as missing.
    pub fn new(key: impl Into<String>, source: &str) -> Result<Self, MissingCredential> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(MissingCredential {
                var: source.to_string(),
            });
        }
        Ok(Self(key.trim().to_string()))
    }

    /// Read the key from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, MissingCredential> {
        let key = std::env::var(var).map_err(|_| MissingCredential {
            var: var.to_string(),
        })?;
        Self::new(key, var)
    }

    pub(crate) fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
