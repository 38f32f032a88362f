use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body returned by successful deletes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OkBody {
    pub ok: bool,
}

impl Default for OkBody {
    fn default() -> Self { Self { ok: true } }
}

/// Uniform failure body: `{"error": "..."}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(msg: impl Into<String>) -> Self { Self { error: msg.into() } }
}
