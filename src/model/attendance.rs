use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::record_id::RecordId;

/// One user's attendance for a single office day.
///
/// `date` is `DD-MM-YYYY` and the times are `HH:MM:SS`, all in the fixed UTC+7 office zone.
/// `check_out` stays empty until the user checks out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6", value_type = String)]
    pub id: RecordId,
    #[schema(example = "507f1f77bcf86cd799439011", value_type = String)]
    pub user_id: RecordId,
    #[schema(example = "10.0.0.5")]
    pub ip_address: String,
    #[schema(example = "16-10-2026")]
    pub date: String,
    #[schema(example = "present")]
    pub status: String,
    #[schema(example = "08:01:44")]
    pub check_in: String,
    #[schema(example = "")]
    pub check_out: String,
}

impl Attendance {
    pub fn new(
        user_id: RecordId,
        ip_address: impl Into<String>,
        date: impl Into<String>,
        status: impl Into<String>,
        check_in: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            user_id,
            ip_address: ip_address.into(),
            date: date.into(),
            status: status.into(),
            check_in: check_in.into(),
            check_out: String::new(),
        }
    }

    pub fn is_checked_out(&self) -> bool {
        !self.check_out.is_empty()
    }
}
