use std::borrow::Cow;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use strum::{AsRefStr, Display as StrumDisplay};
use tracing::debug;

use crate::response::ApiResponse;

/// What went wrong, independent of the user-facing message.
#[derive(Debug, Copy, Clone, Eq, PartialEq, AsRefStr, StrumDisplay)]
pub enum ErrorKind {
    Forbidden,
    AlreadyExists,
    NotFound,
    CreateFailed,
    UpdateFailed,
    FetchFailed,
    ValidationFailed,
    Unauthorized,
}

/// Fixed user-facing messages. Clients match on these strings, keep them stable.
pub mod messages {
    pub const IP_NOT_ALLOWED: &str = "Anda tidak diizinkan untuk melakukan absensi dari alamat IP ini.";
    pub const ALREADY_CHECKED_IN: &str = "Anda sudah melakukan absensi untuk hari ini.";
    pub const ATTENDANCE_NOT_FOUND: &str = "Absensi tidak ditemukan";
    pub const ALREADY_CHECKED_OUT: &str = "Anda telah melakukan absen keluar untuk hari ini";
    pub const CHECK_IN_FAILED: &str = "Absensi gagal.";
    pub const CHECK_OUT_FAILED: &str = "Absen keluar gagal.";
    pub const INVALID_ATTENDANCE_ID: &str = "Error converting attendance ID";
    pub const CLIENT_IP_UNKNOWN: &str = "Gagal mendapatkan alamat IP.";

    pub const ACTIVE_LEAVE_EXISTS: &str = "Anda masih memiliki permintaan cuti yang belum diproses.";
    pub const LEAVE_ALREADY_DECIDED: &str = "Permintaan cuti sudah diproses.";
    pub const LEAVE_FETCH_FAILED: &str = "Gagal mendapatkan data cuti";
    pub const USER_FETCH_FAILED: &str = "Gagal mendapatkan data user";
    pub const LEAVE_CREATE_FAILED: &str = "Gagal membuat permintaan cuti";
    pub const LEAVE_UPDATE_FAILED: &str = "Gagal mengupdate data cuti";
    pub const INVALID_PAID_LEAVE_ID: &str = "Error converting paid leave ID";
    pub const INVALID_USER_ID: &str = "Error converting user ID";
    pub const REASON_REQUIRED: &str = "Alasan cuti wajib diisi.";
    pub const DAYS_INVALID: &str = "Jumlah hari cuti minimal 1.";
    pub const START_DATE_INVALID: &str = "Format tanggal mulai harus DD-MM-YYYY.";

    pub const USER_ACCESS_DENIED: &str = "Anda tidak memiliki akses untuk pengguna ini.";
    pub const APPROVER_ONLY: &str = "Hanya HR atau Admin yang dapat melakukan aksi ini.";
    pub const INVALID_CREDENTIALS: &str = "Email atau kata sandi salah.";
}

/// Error returned by rule operations and handlers.
///
/// Every kind except `Unauthorized` is reported as HTTP 400; callers distinguish failures by
/// message, not by status code.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display(fmt = "{}", message)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: Cow<'static, str>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn already_exists(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::AlreadyExists, message)
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn create_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::CreateFailed, message)
    }

    pub fn update_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::UpdateFailed, message)
    }

    pub fn fetch_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::FetchFailed, message)
    }

    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ValidationFailed, message)
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        debug!(kind = self.kind.as_ref(), message = %self.message, "Request rejected");
        ApiResponse::error(self.status_code(), self.message.clone()).into_response()
    }
}
