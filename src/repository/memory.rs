use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    AttendanceRepository, CompanyRepository, PaidLeaveRepository, RepoError, RepoResult,
    UserRepository,
};
use crate::model::{
    attendance::Attendance, company::Company, paid_leave::PaidLeave, record_id::RecordId,
    user::User,
};

/// In-process record store with the same uniqueness rules as the mysql schema.
#[derive(Default)]
pub struct MemoryRepository {
    attendances: Mutex<Vec<Attendance>>,
    paid_leaves: Mutex<Vec<PaidLeave>>,
    users: Mutex<Vec<User>>,
    company: Mutex<Option<Company>>,
    fail_reads: Mutex<bool>,
    fail_user_reads: Mutex<bool>,
    frozen: Mutex<Option<Snapshot>>,
}

/// What reads return after [`MemoryRepository::frozen_reads`].
#[derive(Default, Clone)]
struct Snapshot {
    attendances: Vec<Attendance>,
    paid_leaves: Vec<PaidLeave>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        self.users.lock().unwrap().push(user);
        self
    }

    pub fn with_company(self, company: Company) -> Self {
        *self.company.lock().unwrap() = Some(company);
        self
    }

    pub fn with_paid_leave(self, paid_leave: PaidLeave) -> Self {
        self.paid_leaves.lock().unwrap().push(paid_leave);
        self
    }

    pub fn with_attendance(self, attendance: Attendance) -> Self {
        self.attendances.lock().unwrap().push(attendance);
        self
    }

    /// Makes every read fail with a database error.
    pub fn failing_reads(self) -> Self {
        *self.fail_reads.lock().unwrap() = true;
        self
    }

    /// Makes only user reads fail.
    pub fn failing_user_reads(self) -> Self {
        *self.fail_user_reads.lock().unwrap() = true;
        self
    }

    /// Pins record lookups to the current contents while writes keep going to the live store.
    /// Lets a test stage a write that lands between a rule's read and its own write.
    pub fn frozen_reads(self) -> Self {
        let snapshot = Snapshot {
            attendances: self.attendances(),
            paid_leaves: self.paid_leaves(),
        };
        *self.frozen.lock().unwrap() = Some(snapshot);
        self
    }

    pub fn paid_leaves(&self) -> Vec<PaidLeave> {
        self.paid_leaves.lock().unwrap().clone()
    }

    pub fn attendances(&self) -> Vec<Attendance> {
        self.attendances.lock().unwrap().clone()
    }

    fn check_reads(&self) -> RepoResult<()> {
        if *self.fail_reads.lock().unwrap() {
            return Err(RepoError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn read_attendances(&self) -> RepoResult<Vec<Attendance>> {
        self.check_reads()?;
        Ok(match &*self.frozen.lock().unwrap() {
            Some(snapshot) => snapshot.attendances.clone(),
            None => self.attendances(),
        })
    }

    fn read_paid_leaves(&self) -> RepoResult<Vec<PaidLeave>> {
        self.check_reads()?;
        Ok(match &*self.frozen.lock().unwrap() {
            Some(snapshot) => snapshot.paid_leaves.clone(),
            None => self.paid_leaves(),
        })
    }
}

#[async_trait]
impl AttendanceRepository for MemoryRepository {
    async fn insert(&self, attendance: &Attendance) -> RepoResult<()> {
        let mut rows = self.attendances.lock().unwrap();
        if rows
            .iter()
            .any(|a| a.user_id == attendance.user_id && a.date == attendance.date)
        {
            return Err(RepoError::Duplicate);
        }
        rows.push(attendance.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Attendance>> {
        let rows = self.read_attendances()?;
        Ok(rows.into_iter().find(|a| a.id == id))
    }

    async fn find_by_user_and_date(
        &self,
        user_id: RecordId,
        date: &str,
    ) -> RepoResult<Option<Attendance>> {
        let rows = self.read_attendances()?;
        Ok(rows
            .into_iter()
            .find(|a| a.user_id == user_id && a.date == date))
    }

    async fn set_check_out(&self, id: RecordId, check_out: &str) -> RepoResult<bool> {
        let mut rows = self.attendances.lock().unwrap();
        match rows.iter_mut().find(|a| a.id == id && a.check_out.is_empty()) {
            Some(row) => {
                row.check_out = check_out.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PaidLeaveRepository for MemoryRepository {
    async fn insert(&self, paid_leave: &PaidLeave) -> RepoResult<()> {
        let mut rows = self.paid_leaves.lock().unwrap();
        if !paid_leave.accepted
            && rows
                .iter()
                .any(|p| p.user_id == paid_leave.user_id && !p.accepted)
        {
            return Err(RepoError::Duplicate);
        }
        let mut stored = paid_leave.clone();
        stored.user = None;
        rows.push(stored);
        Ok(())
    }

    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<PaidLeave>> {
        let rows = self.read_paid_leaves()?;
        Ok(rows.into_iter().find(|p| p.id == id))
    }

    async fn find_active_by_user(&self, user_id: RecordId) -> RepoResult<Option<PaidLeave>> {
        let rows = self.read_paid_leaves()?;
        Ok(rows
            .into_iter()
            .find(|p| p.user_id == user_id && !p.accepted))
    }

    async fn find_all(&self) -> RepoResult<Vec<PaidLeave>> {
        let mut rows = self.read_paid_leaves()?;
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }

    async fn find_by_user(&self, user_id: RecordId) -> RepoResult<Vec<PaidLeave>> {
        let mut rows: Vec<PaidLeave> = self
            .read_paid_leaves()?
            .into_iter()
            .filter(|p| p.user_id == user_id)
            .collect();
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }

    async fn update_status(&self, id: RecordId, status: i32) -> RepoResult<()> {
        let mut rows = self.paid_leaves.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        row.status = status;
        Ok(())
    }

    async fn record_decision(
        &self,
        id: RecordId,
        approver_id: RecordId,
        status: i32,
    ) -> RepoResult<bool> {
        let mut rows = self.paid_leaves.lock().unwrap();
        match rows.iter_mut().find(|p| p.id == id && !p.accepted) {
            Some(row) => {
                row.status = status;
                row.approver_id = Some(approver_id);
                row.accepted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        self.check_reads()?;
        if *self.fail_user_reads.lock().unwrap() {
            return Err(RepoError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.users.lock().unwrap().clone())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.check_reads()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl CompanyRepository for MemoryRepository {
    async fn find_first(&self) -> RepoResult<Option<Company>> {
        self.check_reads()?;
        Ok(self.company.lock().unwrap().clone())
    }
}
