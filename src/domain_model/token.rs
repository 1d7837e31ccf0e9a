use serde::{Deserialize, Serialize};

/// Opaque bearer credential. The client never decodes it; expiry is
/// enforced by the backend and observed as a 401.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken(pub String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
