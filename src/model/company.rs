use serde::{Deserialize, Serialize};

use super::record_id::RecordId;

/// The single company record; only its check-in allow-list matters here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: RecordId,
    pub name: String,
    pub ip_addresses: Vec<String>,
}
