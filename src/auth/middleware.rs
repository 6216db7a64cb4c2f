use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::model::{record_id::RecordId, role::Role};
use crate::models::TokenType;
use crate::response::ApiResponse;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web::Data,
};
use tracing::debug;

fn reject(req: ServiceRequest, message: &str) -> ServiceResponse<BoxBody> {
    let resp = ApiResponse::error(StatusCode::UNAUTHORIZED, message).into_response();
    req.into_response(resp.map_into_boxed_body())
}

/// Verifies the bearer access token and stores the caller as [`AuthUser`].
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let secret = req
        .app_data::<Data<Config>>()
        .map(|config| config.jwt_secret.clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let header_value = match req.headers().get("Authorization") {
        Some(h) => match h.to_str() {
            Ok(v) => v.to_string(),
            Err(_) => return Ok(reject(req, "Invalid Authorization header encoding")),
        },
        None => return Ok(reject(req, "Missing Authorization header")),
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return Ok(reject(req, "Authorization header must start with Bearer")),
    };

    let claims = match verify_token(token, &secret) {
        Ok(c) => c,
        Err(e) => {
            debug!(error = %e, "Rejected token");
            return Ok(reject(req, "Invalid or expired token"));
        }
    };

    if claims.token_type != TokenType::Access {
        return Ok(reject(req, "Access token required"));
    }

    let (Some(role), Ok(user_id)) = (Role::from_id(claims.role), RecordId::parse(&claims.sub))
    else {
        return Ok(reject(req, "Invalid token claims"));
    };

    let auth_user = AuthUser { user_id, role };

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}
