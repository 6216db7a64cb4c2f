use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::record_id::RecordId;

/// Identity record owned by the user-management subsystem. This crate only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = "507f1f77bcf86cd799439011", value_type = String)]
    pub id: RecordId,
    #[schema(example = "Budi Santoso")]
    pub name: String,
    #[schema(example = "budi@company.co.id")]
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    #[schema(example = 3)]
    pub role_id: u8,
}
