pub mod attendance;
pub mod paid_leave;

use crate::error::AppError;
use crate::model::record_id::RecordId;

/// Parses a path segment as a record id, reporting `message` when it is malformed.
pub(crate) fn parse_id(raw: &str, message: &'static str) -> Result<RecordId, AppError> {
    RecordId::parse(raw).map_err(|_| AppError::validation(message))
}
