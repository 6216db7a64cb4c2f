use std::sync::Arc;

use tracing::{error, info, instrument};

use super::company::CompanyDirectory;
use crate::error::{AppError, messages};
use crate::model::{attendance::Attendance, record_id::RecordId};
use crate::repository::{AttendanceRepository, RepoError};
use crate::utils::clock::{Clock, DATE_FORMAT, TIME_FORMAT};

/// Check-in and check-out rules.
pub struct AttendanceRules {
    repo: Arc<dyn AttendanceRepository>,
    company: Arc<CompanyDirectory>,
    clock: Arc<dyn Clock>,
}

impl AttendanceRules {
    pub fn new(
        repo: Arc<dyn AttendanceRepository>,
        company: Arc<CompanyDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            company,
            clock,
        }
    }

    /// Opens today's attendance for `user_id`.
    ///
    /// `ip_address` must be on the company allow-list and the user must not have a record for
    /// today's UTC+7 date yet. The insert itself is unique on (user, date), so two racing
    /// check-ins cannot both land.
    #[instrument(name = "attendance_check_in", skip_all, fields(user_id = %user_id, ip = %ip_address))]
    pub async fn check_in(
        &self,
        user_id: RecordId,
        ip_address: &str,
        status: &str,
    ) -> Result<Attendance, AppError> {
        if !self.company.is_allowed(ip_address) {
            info!("Check-in refused: address not allow-listed");
            return Err(AppError::forbidden(messages::IP_NOT_ALLOWED));
        }

        let now = self.clock.now_office();
        let date = now.format(DATE_FORMAT).to_string();
        let time = now.format(TIME_FORMAT).to_string();

        let existing = self
            .repo
            .find_by_user_and_date(user_id, &date)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to look up today's attendance");
                AppError::fetch_failed(messages::CHECK_IN_FAILED)
            })?;

        if existing.is_some() {
            return Err(AppError::already_exists(messages::ALREADY_CHECKED_IN));
        }

        let attendance = Attendance::new(user_id, ip_address, date, status, time);

        match self.repo.insert(&attendance).await {
            Ok(()) => {
                info!(attendance_id = %attendance.id, date = %attendance.date, "Checked in");
                Ok(attendance)
            }
            Err(RepoError::Duplicate) => Err(AppError::already_exists(messages::ALREADY_CHECKED_IN)),
            Err(e) => {
                error!(error = %e, "Check-in insert failed");
                Err(AppError::create_failed(messages::CHECK_IN_FAILED))
            }
        }
    }

    /// Closes `user_id`'s attendance record. Allowed on any day, but only once per record.
    /// A record owned by anyone else is reported as not found.
    #[instrument(name = "attendance_check_out", skip_all, fields(user_id = %user_id, attendance_id = %attendance_id))]
    pub async fn check_out(
        &self,
        user_id: RecordId,
        attendance_id: RecordId,
    ) -> Result<Attendance, AppError> {
        let mut attendance = self
            .repo
            .find_by_id(attendance_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch attendance");
                AppError::fetch_failed(messages::CHECK_OUT_FAILED)
            })?
            .filter(|a| a.user_id == user_id)
            .ok_or_else(|| AppError::not_found(messages::ATTENDANCE_NOT_FOUND))?;

        if attendance.is_checked_out() {
            return Err(AppError::already_exists(messages::ALREADY_CHECKED_OUT));
        }

        let time = self.clock.time_of_day();

        let updated = self
            .repo
            .set_check_out(attendance_id, &time)
            .await
            .map_err(|e| {
                error!(error = %e, "Check-out update failed");
                AppError::update_failed(messages::CHECK_OUT_FAILED)
            })?;

        // someone else checked this record out between the read and the write
        if !updated {
            return Err(AppError::already_exists(messages::ALREADY_CHECKED_OUT));
        }

        attendance.check_out = time;
        info!(check_out = %attendance.check_out, "Checked out");
        Ok(attendance)
    }
}
