use crate::api::parse_id;
use crate::auth::auth::AuthUser;
use crate::error::{AppError, messages};
use crate::response::ApiResponse;
use crate::service::paid_leave::PaidLeaveRules;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaidLeave {
    #[schema(example = "Acara keluarga")]
    pub reason: String,
    /// First day of leave, `DD-MM-YYYY`
    #[schema(example = "20-10-2026")]
    pub start_date: String,
    #[schema(example = 2)]
    pub days: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct PaidLeaveStatus {
    /// Status code. 0 is pending, other codes are defined by the approving side.
    #[schema(example = 1)]
    pub status: i32,
}

/// File a paid-leave request
#[utoipa::path(
    post,
    path = "/api/users/{user_id}/paid-leaves",
    params(
        ("user_id" = String, Path, description = "ID of the requesting user")
    ),
    request_body = CreatePaidLeave,
    responses(
        (status = 200, description = "Request created in pending state", body = ApiResponse),
        (status = 400, description = "Invalid input or an undecided request already exists", body = ApiResponse, example = json!({
            "statusCode": 400,
            "success": false,
            "message": "Anda masih memiliki permintaan cuti yang belum diproses."
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Paid Leave"
)]
pub async fn create_paid_leave(
    auth: AuthUser,
    path: web::Path<String>,
    body: web::Json<CreatePaidLeave>,
    rules: web::Data<PaidLeaveRules>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_id(&path, messages::INVALID_USER_ID)?;
    auth.require_self_or_approver(user_id)?;

    let paid_leave = rules
        .create_paid_leave(user_id, &body.reason, &body.start_date, body.days)
        .await?;

    Ok(ApiResponse::ok(json!({ "paidLeave": paid_leave })).into_response())
}

/// A user's own paid-leave requests
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/paid-leaves",
    params(
        ("user_id" = String, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Requests, oldest first", body = ApiResponse),
        (status = 400, description = "Fetch failed", body = ApiResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Paid Leave"
)]
pub async fn list_user_paid_leaves(
    auth: AuthUser,
    path: web::Path<String>,
    rules: web::Data<PaidLeaveRules>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_id(&path, messages::INVALID_USER_ID)?;
    auth.require_self_or_approver(user_id)?;

    let paid_leaves = rules.get_paid_leaves_for_user(user_id).await?;

    Ok(ApiResponse::ok(json!({ "paidLeaves": paid_leaves })).into_response())
}

/// The user's undecided request, `null` when there is none
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/paid-leaves/active",
    params(
        ("user_id" = String, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Active request or null", body = ApiResponse, example = json!({
            "statusCode": 200,
            "success": true,
            "data": { "paidLeave": null }
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Paid Leave"
)]
pub async fn get_active_paid_leave(
    auth: AuthUser,
    path: web::Path<String>,
    rules: web::Data<PaidLeaveRules>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_id(&path, messages::INVALID_USER_ID)?;
    auth.require_self_or_approver(user_id)?;

    let active = rules.get_active_request(user_id).await?;

    Ok(ApiResponse::ok(json!({ "paidLeave": active })).into_response())
}

/// Every paid-leave request with its user (HR/Admin)
#[utoipa::path(
    get,
    path = "/api/paid-leaves",
    responses(
        (status = 200, description = "Requests with the owning user attached", body = ApiResponse),
        (status = 400, description = "Fetch failed or caller is not HR/Admin", body = ApiResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Paid Leave"
)]
pub async fn list_paid_leaves(
    auth: AuthUser,
    rules: web::Data<PaidLeaveRules>,
) -> Result<HttpResponse, AppError> {
    auth.require_hr_or_admin()?;

    let paid_leaves = rules.get_paid_leaves().await?;

    Ok(ApiResponse::ok(json!({ "paidLeaves": paid_leaves })).into_response())
}

/// Overwrite a request's status code (HR/Admin)
#[utoipa::path(
    patch,
    path = "/api/paid-leaves/{paid_leave_id}",
    params(
        ("paid_leave_id" = String, Path, description = "ID of the request")
    ),
    request_body = PaidLeaveStatus,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse),
        (status = 400, description = "Request not found or update failed", body = ApiResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Paid Leave"
)]
pub async fn update_paid_leave_status(
    auth: AuthUser,
    path: web::Path<String>,
    body: web::Json<PaidLeaveStatus>,
    rules: web::Data<PaidLeaveRules>,
) -> Result<HttpResponse, AppError> {
    auth.require_hr_or_admin()?;
    let paid_leave_id = parse_id(&path, messages::INVALID_PAID_LEAVE_ID)?;

    let paid_leave = rules
        .update_paid_leave_status(paid_leave_id, body.status)
        .await?;

    Ok(ApiResponse::ok(json!({ "paidLeave": paid_leave })).into_response())
}

/// Record the final decision on a request; the caller becomes its approver (HR/Admin)
#[utoipa::path(
    patch,
    path = "/api/paid-leaves/{paid_leave_id}/decision",
    params(
        ("paid_leave_id" = String, Path, description = "ID of the request")
    ),
    request_body = PaidLeaveStatus,
    responses(
        (status = 200, description = "Decision recorded", body = ApiResponse),
        (status = 400, description = "Request not found or already decided", body = ApiResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Paid Leave"
)]
pub async fn decide_paid_leave(
    auth: AuthUser,
    path: web::Path<String>,
    body: web::Json<PaidLeaveStatus>,
    rules: web::Data<PaidLeaveRules>,
) -> Result<HttpResponse, AppError> {
    auth.require_hr_or_admin()?;
    let paid_leave_id = parse_id(&path, messages::INVALID_PAID_LEAVE_ID)?;

    let paid_leave = rules
        .decide_paid_leave(paid_leave_id, auth.user_id, body.status)
        .await?;

    Ok(ApiResponse::ok(json!({ "paidLeave": paid_leave })).into_response())
}
