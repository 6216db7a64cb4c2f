use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};

use super::{
    AttendanceRepository, CompanyRepository, PaidLeaveRepository, RepoError, RepoResult,
    UserRepository,
};
use crate::model::{
    attendance::Attendance, company::Company, paid_leave::PaidLeave, record_id::RecordId,
    user::User,
};

/// sqlx-backed record store. Cheap to clone, the pool is shared.
#[derive(Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn parse_id(raw: String) -> RepoResult<RecordId> {
    RecordId::try_from(raw).map_err(|e| RepoError::Corrupt(e.to_string()))
}

#[derive(FromRow)]
struct AttendanceRow {
    id: String,
    user_id: String,
    ip_address: String,
    date: String,
    status: String,
    check_in: String,
    check_out: String,
}

impl TryFrom<AttendanceRow> for Attendance {
    type Error = RepoError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Ok(Attendance {
            id: parse_id(row.id)?,
            user_id: parse_id(row.user_id)?,
            ip_address: row.ip_address,
            date: row.date,
            status: row.status,
            check_in: row.check_in,
            check_out: row.check_out,
        })
    }
}

#[derive(FromRow)]
struct PaidLeaveRow {
    id: String,
    user_id: String,
    status: i32,
    approver_id: Option<String>,
    reason: String,
    start_date: String,
    days: i32,
    accepted: bool,
}

impl TryFrom<PaidLeaveRow> for PaidLeave {
    type Error = RepoError;

    fn try_from(row: PaidLeaveRow) -> Result<Self, Self::Error> {
        Ok(PaidLeave {
            id: parse_id(row.id)?,
            user_id: parse_id(row.user_id)?,
            status: row.status,
            approver_id: row.approver_id.map(parse_id).transpose()?,
            reason: row.reason,
            start_date: row.start_date,
            days: row.days,
            accepted: row.accepted,
            user: None,
        })
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    password: String,
    role_id: u8,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: parse_id(row.id)?,
            name: row.name,
            email: row.email,
            password: row.password,
            role_id: row.role_id,
        })
    }
}

#[derive(FromRow)]
struct CompanyRow {
    id: String,
    name: String,
}

const ATTENDANCE_COLUMNS: &str = "id, user_id, ip_address, date, status, check_in, check_out";
const PAID_LEAVE_COLUMNS: &str =
    "id, user_id, status, approver_id, reason, start_date, days, accepted";

#[async_trait]
impl AttendanceRepository for MySqlRepository {
    async fn insert(&self, attendance: &Attendance) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO attendances
                (id, user_id, ip_address, date, status, check_in, check_out)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(attendance.id.to_string())
        .bind(attendance.user_id.to_string())
        .bind(&attendance.ip_address)
        .bind(&attendance.date)
        .bind(&attendance.status)
        .bind(&attendance.check_in)
        .bind(&attendance.check_out)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Attendance>> {
        let sql = format!("SELECT {} FROM attendances WHERE id = ?", ATTENDANCE_COLUMNS);
        sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(Attendance::try_from)
            .transpose()
    }

    async fn find_by_user_and_date(
        &self,
        user_id: RecordId,
        date: &str,
    ) -> RepoResult<Option<Attendance>> {
        let sql = format!(
            "SELECT {} FROM attendances WHERE user_id = ? AND date = ?",
            ATTENDANCE_COLUMNS
        );
        sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(user_id.to_string())
            .bind(date)
            .fetch_optional(&self.pool)
            .await?
            .map(Attendance::try_from)
            .transpose()
    }

    async fn set_check_out(&self, id: RecordId, check_out: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE attendances
            SET check_out = ?
            WHERE id = ?
            AND check_out = ''
            "#,
        )
        .bind(check_out)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl PaidLeaveRepository for MySqlRepository {
    async fn insert(&self, paid_leave: &PaidLeave) -> RepoResult<()> {
        // active_user_id is generated from (accepted, user_id) and carries the unique key
        sqlx::query(
            r#"
            INSERT INTO paid_leaves
                (id, user_id, status, approver_id, reason, start_date, days, accepted)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(paid_leave.id.to_string())
        .bind(paid_leave.user_id.to_string())
        .bind(paid_leave.status)
        .bind(paid_leave.approver_id.map(|id| id.to_string()))
        .bind(&paid_leave.reason)
        .bind(&paid_leave.start_date)
        .bind(paid_leave.days)
        .bind(paid_leave.accepted)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<PaidLeave>> {
        let sql = format!("SELECT {} FROM paid_leaves WHERE id = ?", PAID_LEAVE_COLUMNS);
        sqlx::query_as::<_, PaidLeaveRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(PaidLeave::try_from)
            .transpose()
    }

    async fn find_active_by_user(&self, user_id: RecordId) -> RepoResult<Option<PaidLeave>> {
        let sql = format!(
            "SELECT {} FROM paid_leaves WHERE user_id = ? AND accepted = FALSE LIMIT 1",
            PAID_LEAVE_COLUMNS
        );
        sqlx::query_as::<_, PaidLeaveRow>(&sql)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(PaidLeave::try_from)
            .transpose()
    }

    async fn find_all(&self) -> RepoResult<Vec<PaidLeave>> {
        let sql = format!("SELECT {} FROM paid_leaves ORDER BY id", PAID_LEAVE_COLUMNS);
        sqlx::query_as::<_, PaidLeaveRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(PaidLeave::try_from)
            .collect()
    }

    async fn find_by_user(&self, user_id: RecordId) -> RepoResult<Vec<PaidLeave>> {
        let sql = format!(
            "SELECT {} FROM paid_leaves WHERE user_id = ? ORDER BY id",
            PAID_LEAVE_COLUMNS
        );
        sqlx::query_as::<_, PaidLeaveRow>(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(PaidLeave::try_from)
            .collect()
    }

    async fn update_status(&self, id: RecordId, status: i32) -> RepoResult<()> {
        let result = sqlx::query("UPDATE paid_leaves SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // mysql reports 0 affected rows when the value is unchanged, tell that apart from a miss
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM paid_leaves WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await?;

        if count == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn record_decision(
        &self,
        id: RecordId,
        approver_id: RecordId,
        status: i32,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE paid_leaves
            SET status = ?, approver_id = ?, accepted = TRUE
            WHERE id = ?
            AND accepted = FALSE
            "#,
        )
        .bind(status)
        .bind(approver_id.to_string())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl UserRepository for MySqlRepository {
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, email, password, role_id FROM users")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password, role_id FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }
}

#[async_trait]
impl CompanyRepository for MySqlRepository {
    async fn find_first(&self) -> RepoResult<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyRow>(
            "SELECT id, name FROM companies ORDER BY id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let ip_addresses = sqlx::query_scalar::<_, String>(
            "SELECT ip_address FROM company_ip_addresses WHERE company_id = ? ORDER BY id",
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Company {
            id: parse_id(row.id)?,
            name: row.name,
            ip_addresses,
        }))
    }
}
