//! Record store seam.
//!
//! The rules only talk to these traits. `mysql` backs them with sqlx in production, `memory`
//! backs them with in-process maps for tests. Both enforce the same uniqueness constraints so a
//! racing duplicate write surfaces as [`RepoError::Duplicate`] instead of a second row.

use async_trait::async_trait;
use derive_more::Display;

use crate::model::{
    attendance::Attendance, company::Company, paid_leave::PaidLeave, record_id::RecordId,
    user::User,
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

#[derive(Debug, Display)]
pub enum RepoError {
    /// The addressed record does not exist.
    #[display(fmt = "record not found")]
    NotFound,
    /// A uniqueness constraint rejected the write.
    #[display(fmt = "duplicate record")]
    Duplicate,
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
    /// A stored row could not be turned back into a record.
    #[display(fmt = "corrupt record: {}", _0)]
    Corrupt(String),
}

impl std::error::Error for RepoError {}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            // 23000: integrity constraint violation (duplicate unique key)
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23000") => {
                RepoError::Duplicate
            }
            _ => RepoError::Database(e),
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Inserts a new record. At most one record may exist per `(user_id, date)`.
    async fn insert(&self, attendance: &Attendance) -> RepoResult<()>;

    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Attendance>>;

    async fn find_by_user_and_date(
        &self,
        user_id: RecordId,
        date: &str,
    ) -> RepoResult<Option<Attendance>>;

    /// Sets `check_out` only if it is still empty. Returns whether the row changed.
    async fn set_check_out(&self, id: RecordId, check_out: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait PaidLeaveRepository: Send + Sync {
    /// Inserts a new request. At most one request with `accepted == false` may exist per user.
    async fn insert(&self, paid_leave: &PaidLeave) -> RepoResult<()>;

    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<PaidLeave>>;

    async fn find_active_by_user(&self, user_id: RecordId) -> RepoResult<Option<PaidLeave>>;

    /// All requests, oldest first.
    async fn find_all(&self) -> RepoResult<Vec<PaidLeave>>;

    /// One user's requests, oldest first.
    async fn find_by_user(&self, user_id: RecordId) -> RepoResult<Vec<PaidLeave>>;

    /// Overwrites `status` only. Fails with `NotFound` for an unknown id.
    async fn update_status(&self, id: RecordId, status: i32) -> RepoResult<()>;

    /// Records a terminal decision if the request is still active. Returns whether the row
    /// changed.
    async fn record_decision(
        &self,
        id: RecordId,
        approver_id: RecordId,
        status: i32,
    ) -> RepoResult<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// The single company record, if one has been provisioned.
    async fn find_first(&self) -> RepoResult<Option<Company>>;
}
