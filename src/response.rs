use actix_web::{HttpResponse, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Envelope wrapped around every JSON response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "statusCode": 200,
    "success": true,
    "data": { "attendance": { "id": "65a1f0c2e4b0a1b2c3d4e5f6" } }
}))]
pub struct ApiResponse {
    pub status_code: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<Value>,
}

impl ApiResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn into_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST);
        HttpResponse::build(status).json(self)
    }
}
