use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::error::{AppError, messages};
use crate::model::{paid_leave::PaidLeave, record_id::RecordId, user::User};
use crate::repository::{PaidLeaveRepository, RepoError, UserRepository};
use crate::utils::clock::parse_date;

/// Paid-leave request lifecycle.
pub struct PaidLeaveRules {
    leaves: Arc<dyn PaidLeaveRepository>,
    users: Arc<dyn UserRepository>,
}

impl PaidLeaveRules {
    pub fn new(leaves: Arc<dyn PaidLeaveRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { leaves, users }
    }

    /// The user's undecided request, if any. Absence is not an error.
    pub async fn get_active_request(&self, user_id: RecordId) -> Result<Option<PaidLeave>, AppError> {
        self.leaves.find_active_by_user(user_id).await.map_err(|e| {
            error!(error = %e, user_id = %user_id, "Failed to fetch active paid leave");
            AppError::fetch_failed(messages::LEAVE_FETCH_FAILED)
        })
    }

    /// Files a new pending request.
    ///
    /// A user may only have one undecided request. That is checked up front for a clear
    /// message and enforced again by the store's unique key on active requests.
    #[instrument(name = "paid_leave_create", skip_all, fields(user_id = %user_id, days = days))]
    pub async fn create_paid_leave(
        &self,
        user_id: RecordId,
        reason: &str,
        start_date: &str,
        days: i32,
    ) -> Result<PaidLeave, AppError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::validation(messages::REASON_REQUIRED));
        }
        if days < 1 {
            return Err(AppError::validation(messages::DAYS_INVALID));
        }
        if parse_date(start_date).is_none() {
            return Err(AppError::validation(messages::START_DATE_INVALID));
        }

        if self.get_active_request(user_id).await?.is_some() {
            return Err(AppError::already_exists(messages::ACTIVE_LEAVE_EXISTS));
        }

        let paid_leave = PaidLeave::new(user_id, reason, start_date, days);

        match self.leaves.insert(&paid_leave).await {
            Ok(()) => {
                info!(paid_leave_id = %paid_leave.id, "Paid leave requested");
                Ok(paid_leave)
            }
            Err(RepoError::Duplicate) => Err(AppError::already_exists(messages::ACTIVE_LEAVE_EXISTS)),
            Err(e) => {
                error!(error = %e, "Failed to create paid leave");
                Err(AppError::create_failed(messages::LEAVE_CREATE_FAILED))
            }
        }
    }

    /// Every request with its owner attached, oldest first. Requests whose owner no longer
    /// exists are returned without a user.
    pub async fn get_paid_leaves(&self) -> Result<Vec<PaidLeave>, AppError> {
        let mut paid_leaves = self.leaves.find_all().await.map_err(|e| {
            error!(error = %e, "Failed to fetch paid leaves");
            AppError::fetch_failed(messages::LEAVE_FETCH_FAILED)
        })?;

        if paid_leaves.is_empty() {
            return Ok(paid_leaves);
        }

        let users = self.users.find_all().await.map_err(|e| {
            error!(error = %e, "Failed to fetch users for paid leave listing");
            AppError::fetch_failed(messages::USER_FETCH_FAILED)
        })?;

        let by_id: HashMap<RecordId, User> = users.into_iter().map(|u| (u.id, u)).collect();
        for paid_leave in &mut paid_leaves {
            paid_leave.user = by_id.get(&paid_leave.user_id).cloned();
        }

        Ok(paid_leaves)
    }

    /// One user's own requests, oldest first.
    pub async fn get_paid_leaves_for_user(
        &self,
        user_id: RecordId,
    ) -> Result<Vec<PaidLeave>, AppError> {
        self.leaves.find_by_user(user_id).await.map_err(|e| {
            error!(error = %e, user_id = %user_id, "Failed to fetch user's paid leaves");
            AppError::fetch_failed(messages::LEAVE_FETCH_FAILED)
        })
    }

    /// Overwrites the status code. `accepted` and `approver_id` are left as they are.
    #[instrument(name = "paid_leave_update_status", skip_all, fields(paid_leave_id = %paid_leave_id, status = status))]
    pub async fn update_paid_leave_status(
        &self,
        paid_leave_id: RecordId,
        status: i32,
    ) -> Result<PaidLeave, AppError> {
        match self.leaves.update_status(paid_leave_id, status).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => {
                return Err(AppError::not_found(messages::LEAVE_FETCH_FAILED));
            }
            Err(e) => {
                error!(error = %e, "Failed to update paid leave status");
                return Err(AppError::update_failed(messages::LEAVE_UPDATE_FAILED));
            }
        }

        info!("Paid leave status updated");
        self.reload(paid_leave_id).await
    }

    /// Records the approver's terminal decision: sets `status`, `approver_id` and marks the
    /// request accepted. A request can only be decided once.
    #[instrument(name = "paid_leave_decide", skip_all, fields(paid_leave_id = %paid_leave_id, approver_id = %approver_id, status = status))]
    pub async fn decide_paid_leave(
        &self,
        paid_leave_id: RecordId,
        approver_id: RecordId,
        status: i32,
    ) -> Result<PaidLeave, AppError> {
        let current = self.reload(paid_leave_id).await?;
        if current.accepted {
            return Err(AppError::already_exists(messages::LEAVE_ALREADY_DECIDED));
        }

        let changed = self
            .leaves
            .record_decision(paid_leave_id, approver_id, status)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to record paid leave decision");
                AppError::update_failed(messages::LEAVE_UPDATE_FAILED)
            })?;

        if !changed {
            return Err(AppError::already_exists(messages::LEAVE_ALREADY_DECIDED));
        }

        info!("Paid leave decided");
        Ok(PaidLeave {
            status,
            approver_id: Some(approver_id),
            accepted: true,
            ..current
        })
    }

    async fn reload(&self, paid_leave_id: RecordId) -> Result<PaidLeave, AppError> {
        self.leaves
            .find_by_id(paid_leave_id)
            .await
            .map_err(|e| {
                error!(error = %e, paid_leave_id = %paid_leave_id, "Failed to fetch paid leave");
                AppError::fetch_failed(messages::LEAVE_FETCH_FAILED)
            })?
            .ok_or_else(|| AppError::not_found(messages::LEAVE_FETCH_FAILED))
    }
}
