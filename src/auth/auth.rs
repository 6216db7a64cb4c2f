use crate::error::{AppError, messages};
use crate::model::{record_id::RecordId, role::Role};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// Caller identity, placed in request extensions by [`super::middleware::auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: RecordId,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized("Missing token")),
        )
    }
}

impl AuthUser {
    pub fn require_hr_or_admin(&self) -> Result<(), AppError> {
        if self.role.is_approver() {
            Ok(())
        } else {
            Err(AppError::forbidden(messages::APPROVER_ONLY))
        }
    }

    /// Callers act on their own records; HR and Admin may act on anyone's.
    pub fn require_self_or_approver(&self, user_id: RecordId) -> Result<(), AppError> {
        if self.user_id == user_id || self.role.is_approver() {
            Ok(())
        } else {
            Err(AppError::forbidden(messages::USER_ACCESS_DENIED))
        }
    }
}
