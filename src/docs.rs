use crate::api::attendance::CheckInRequest;
use crate::api::paid_leave::{CreatePaidLeave, PaidLeaveStatus};
use crate::model::{attendance::Attendance, paid_leave::PaidLeave, user::User};
use crate::models::{LoginReqDto, TokenPair};
use crate::response::ApiResponse;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendit API",
        version = "1.0.0",
        description = r#"
## Employee Attendance & Paid Leave

### 🔹 Key Features
- **Attendance**
  - Daily check-in from an allow-listed office address, check-out once per record
  - Dates and times are recorded in the office zone (UTC+7)
- **Paid Leave**
  - Employees file requests, one undecided request at a time
  - HR and Admin review, update and decide requests

### 🔐 Security
Every endpoint under `/api` requires a **JWT Bearer** access token.
Listing and deciding requests is restricted to **HR** and **Admin**.

### 📦 Response Format
Every JSON body uses the same envelope: `statusCode`, `success`, and either `data` or `message`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,

        crate::api::paid_leave::create_paid_leave,
        crate::api::paid_leave::list_user_paid_leaves,
        crate::api::paid_leave::get_active_paid_leave,
        crate::api::paid_leave::list_paid_leaves,
        crate::api::paid_leave::update_paid_leave_status,
        crate::api::paid_leave::decide_paid_leave
    ),
    components(
        schemas(
            ApiResponse,
            LoginReqDto,
            TokenPair,
            CheckInRequest,
            Attendance,
            CreatePaidLeave,
            PaidLeaveStatus,
            PaidLeave,
            User
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and token refresh"),
        (name = "Attendance", description = "Check-in and check-out"),
        (name = "Paid Leave", description = "Paid-leave requests and decisions"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
