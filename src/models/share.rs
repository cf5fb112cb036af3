//! Share request and response bodies.

use serde::{Deserialize, Serialize};

/// Recipient list as sent by clients: either an array or a single
/// comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    Many(Vec<String>),
    One(String),
}

impl Recipients {
    /// Flatten into trimmed, non-blank addresses.
    pub fn addresses(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Recipients::Many(list) => list.iter().map(String::as_str).collect(),
            Recipients::One(joined) => joined.split(',').collect(),
        };

        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Request body for POST /api/share.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    #[serde(default, alias = "birthdayId")]
    pub page_id: Option<String>,
    #[serde(default)]
    pub emails: Option<Recipients>,
}

/// Response body for a dispatched share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareReceipt {
    pub message: String,
}
