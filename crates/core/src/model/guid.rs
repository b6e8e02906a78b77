use std::fmt;

use serde::Deserialize;

/// Composite node identifier: `{sessionID, localID}`. Unique for the
/// lifetime of one decode; stringified as `"sessionID:localID"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct Guid {
    #[serde(default, rename = "sessionID")]
    pub session_id: u64,
    #[serde(default, rename = "localID")]
    pub local_id: u64,
}

impl Guid {
    pub fn new(session_id: u64, local_id: u64) -> Self {
        Self {
            session_id,
            local_id,
        }
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.session_id, self.local_id)
    }
}
