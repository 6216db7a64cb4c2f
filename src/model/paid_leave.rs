use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::record_id::RecordId;
use super::user::User;

/// Status code of a freshly created request. Other codes are owned by the approving side.
pub const STATUS_PENDING: i32 = 0;

/// A paid-leave request.
///
/// A request is *active* while `accepted` is false; each user has at most one active request.
/// `user` is only filled in by listings that join the owner record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaidLeave {
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f7", value_type = String)]
    pub id: RecordId,
    #[schema(example = "507f1f77bcf86cd799439011", value_type = String)]
    pub user_id: RecordId,
    #[schema(example = 0)]
    pub status: i32,
    #[schema(value_type = Option<String>)]
    pub approver_id: Option<RecordId>,
    #[schema(example = "Acara keluarga")]
    pub reason: String,
    #[schema(example = "20-10-2026")]
    pub start_date: String,
    #[schema(example = 2)]
    pub days: i32,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user: Option<User>,
}

impl PaidLeave {
    pub fn new(
        user_id: RecordId,
        reason: impl Into<String>,
        start_date: impl Into<String>,
        days: i32,
    ) -> Self {
        Self {
            id: RecordId::new(),
            user_id,
            status: STATUS_PENDING,
            approver_id: None,
            reason: reason.into(),
            start_date: start_date.into(),
            days,
            accepted: false,
            user: None,
        }
    }
}
