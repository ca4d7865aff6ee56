//! Tracker identity.

use std::fmt;

use crate::error::CoreError;

/// The credentials a tracker uses for every Steam Web API call.
///
/// Both fields are trimmed on construction and must be non-blank. The
/// API key never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    account_id: String,
    api_key: String,
}

impl Identity {
    /// Creates an identity from a 64-bit Steam id and a Web API key.
    pub fn new(account_id: impl AsRef<str>, api_key: impl AsRef<str>) -> Result<Self, CoreError> {
        let account_id = account_id.as_ref().trim();
        let api_key = api_key.as_ref().trim();

        if account_id.is_empty() {
            return Err(CoreError::InvalidConfig("account id is required".to_string()));
        }
        if api_key.is_empty() {
            return Err(CoreError::InvalidConfig("api key is required".to_string()));
        }

        Ok(Self {
            account_id: account_id.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// The 64-bit Steam id, as a decimal string.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// The Web API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("account_id", &self.account_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
