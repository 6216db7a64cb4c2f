use crate::api::parse_id;
use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::{AppError, messages};
use crate::response::ApiResponse;
use crate::service::attendance::AttendanceRules;
use crate::utils::client_ip::client_ip;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

/// Optional body; a missing or unreadable one is treated as empty.
#[derive(Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    /// Reported by the client, informational only. The server resolves the real address.
    #[schema(example = "10.0.0.5")]
    #[serde(default)]
    pub ip_address: String,
    #[schema(example = "present")]
    #[serde(default)]
    pub status: String,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/users/{user_id}/attendances",
    params(
        ("user_id" = String, Path, description = "ID of the user checking in")
    ),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = ApiResponse, example = json!({
            "statusCode": 200,
            "success": true,
            "data": { "attendance": {
                "id": "65a1f0c2e4b0a1b2c3d4e5f6",
                "userId": "507f1f77bcf86cd799439011",
                "ipAddress": "10.0.0.5",
                "date": "16-10-2026",
                "status": "present",
                "checkIn": "08:01:44",
                "checkOut": ""
            } }
        })),
        (status = 400, description = "Address not allowed or already checked in today", body = ApiResponse, example = json!({
            "statusCode": 400,
            "success": false,
            "message": "Anda sudah melakukan absensi untuk hari ini."
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    req: HttpRequest,
    path: web::Path<String>,
    body: Option<web::Json<CheckInRequest>>,
    rules: web::Data<AttendanceRules>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    let user_id = parse_id(&path, messages::INVALID_USER_ID)?;
    if user_id != auth.user_id {
        return Err(AppError::forbidden(messages::USER_ACCESS_DENIED));
    }

    let ip_address = client_ip(&req, config.trust_proxy_headers)
        .ok_or_else(|| AppError::validation(messages::CLIENT_IP_UNKNOWN))?;

    if !body.ip_address.is_empty() && body.ip_address != ip_address {
        debug!(reported = %body.ip_address, resolved = %ip_address, "Client reported a different address");
    }

    let attendance = rules.check_in(user_id, &ip_address, &body.status).await?;

    Ok(ApiResponse::ok(json!({ "attendance": attendance })).into_response())
}

/// Check-out endpoint
#[utoipa::path(
    patch,
    path = "/api/users/{user_id}/attendances/{attendance_id}",
    params(
        ("user_id" = String, Path, description = "Owner of the attendance"),
        ("attendance_id" = String, Path, description = "ID of the attendance to close")
    ),
    responses(
        (status = 200, description = "Checked out successfully", body = ApiResponse),
        (status = 400, description = "Attendance not found or already checked out", body = ApiResponse, example = json!({
            "statusCode": 400,
            "success": false,
            "message": "Anda telah melakukan absen keluar untuk hari ini"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    path: web::Path<(String, String)>,
    rules: web::Data<AttendanceRules>,
) -> Result<HttpResponse, AppError> {
    let (user_id, attendance_id) = path.into_inner();
    let user_id = parse_id(&user_id, messages::INVALID_USER_ID)?;
    let attendance_id = parse_id(&attendance_id, messages::INVALID_ATTENDANCE_ID)?;
    auth.require_self_or_approver(user_id)?;

    let attendance = rules.check_out(user_id, attendance_id).await?;

    Ok(ApiResponse::ok(json!({ "attendance": attendance })).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test};
    use serde_json::{Value, json};

    use crate::api::test_support::{app, bearer};
    use crate::error::messages;
    use crate::model::{attendance::Attendance, record_id::RecordId, role::Role};
    use crate::repository::memory::MemoryRepository;

    fn check_in_request(user_id: RecordId, ip: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri(&format!("/users/{}/attendances", user_id))
            .insert_header(bearer(user_id, Role::Employee))
            .insert_header(("X-Real-Ip", ip.to_string()))
            .set_json(json!({ "ipAddress": "1.2.3.4", "status": "present" }))
    }

    #[actix_web::test]
    async fn check_in_from_office_and_not_elsewhere() {
        let repo = Arc::new(MemoryRepository::new());
        let app = test::init_service(app(repo.clone())).await;
        let user_id = RecordId::new();

        let resp = test::call_service(&app, check_in_request(user_id, "10.0.0.9").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "Anda tidak diizinkan untuk melakukan absensi dari alamat IP ini."
        );

        let resp = test::call_service(&app, check_in_request(user_id, "10.0.0.5").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["statusCode"], 200);
        let attendance = &body["data"]["attendance"];
        assert_eq!(attendance["date"], "16-10-2026");
        assert_eq!(attendance["status"], "present");
        // the resolved address is stored, not the one in the body
        assert_eq!(attendance["ipAddress"], "10.0.0.5");
        assert_eq!(attendance["checkOut"], "");
    }

    #[actix_web::test]
    async fn check_in_without_a_body() {
        let repo = Arc::new(MemoryRepository::new());
        let app = test::init_service(app(repo.clone())).await;
        let user_id = RecordId::new();

        let req = test::TestRequest::post()
            .uri(&format!("/users/{}/attendances", user_id))
            .insert_header(bearer(user_id, Role::Employee))
            .insert_header(("X-Real-Ip", "10.0.0.5"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["attendance"]["status"], "");
        assert_eq!(body["data"]["attendance"]["ipAddress"], "10.0.0.5");
        assert_eq!(repo.attendances().len(), 1);
    }

    #[actix_web::test]
    async fn second_check_in_is_a_bad_request() {
        let repo = Arc::new(MemoryRepository::new());
        let app = test::init_service(app(repo)).await;
        let user_id = RecordId::new();

        test::call_service(&app, check_in_request(user_id, "10.0.0.5").to_request()).await;
        let resp = test::call_service(&app, check_in_request(user_id, "10.0.0.5").to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], messages::ALREADY_CHECKED_IN);
    }

    #[actix_web::test]
    async fn cannot_check_in_for_someone_else() {
        let repo = Arc::new(MemoryRepository::new());
        let app = test::init_service(app(repo.clone())).await;

        let req = test::TestRequest::post()
            .uri(&format!("/users/{}/attendances", RecordId::new()))
            .insert_header(bearer(RecordId::new(), Role::Hr))
            .insert_header(("X-Real-Ip", "10.0.0.5"))
            .set_json(json!({ "status": "present" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(repo.attendances().is_empty());
    }

    #[actix_web::test]
    async fn missing_token_is_unauthorized() {
        let repo = Arc::new(MemoryRepository::new());
        let app = test::init_service(app(repo)).await;

        let req = test::TestRequest::post()
            .uri(&format!("/users/{}/attendances", RecordId::new()))
            .set_json(json!({ "status": "present" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn check_out_twice() {
        let user_id = RecordId::new();
        let open = Attendance::new(user_id, "10.0.0.5", "16-10-2026", "present", "08:00:00");
        let uri = format!("/users/{}/attendances/{}", user_id, open.id);
        let repo = Arc::new(MemoryRepository::new().with_attendance(open));
        let app = test::init_service(app(repo)).await;

        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header(bearer(user_id, Role::Employee))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["attendance"]["checkOut"], "08:15:30");

        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header(bearer(user_id, Role::Employee))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], messages::ALREADY_CHECKED_OUT);
    }

    #[actix_web::test]
    async fn check_out_with_malformed_id() {
        let user_id = RecordId::new();
        let repo = Arc::new(MemoryRepository::new());
        let app = test::init_service(app(repo)).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/users/{}/attendances/not-an-id", user_id))
            .insert_header(bearer(user_id, Role::Employee))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], messages::INVALID_ATTENDANCE_ID);
    }

    #[actix_web::test]
    async fn cannot_close_another_users_attendance() {
        let owner = RecordId::new();
        let intruder = RecordId::new();
        let open = Attendance::new(owner, "10.0.0.5", "16-10-2026", "present", "08:00:00");
        let uri = format!("/users/{}/attendances/{}", intruder, open.id);
        let repo = Arc::new(MemoryRepository::new().with_attendance(open));
        let app = test::init_service(app(repo.clone())).await;

        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header(bearer(intruder, Role::Employee))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], messages::ATTENDANCE_NOT_FOUND);
        assert_eq!(repo.attendances()[0].check_out, "");
    }
}
