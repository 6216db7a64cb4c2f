use crate::{
    auth::{
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::verify_password,
    },
    config::Config,
    error::{AppError, messages},
    models::{LoginReqDto, TokenPair, TokenType},
    repository::UserRepository,
    response::ApiResponse,
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use tracing::{debug, error, info, instrument};

fn token_pair(
    user_id: &str,
    email: &str,
    role: u8,
    config: &Config,
) -> Result<TokenPair, AppError> {
    let access_token =
        generate_access_token(user_id, email, role, &config.jwt_secret, config.access_token_ttl);
    let refresh_token =
        generate_refresh_token(user_id, email, role, &config.jwt_secret, config.refresh_token_ttl);

    match (access_token, refresh_token) {
        (Ok(access_token), Ok((refresh_token, _))) => Ok(TokenPair {
            access_token,
            refresh_token,
        }),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Failed to sign token");
            Err(AppError::unauthorized("Failed to issue token"))
        }
    }
}

/// Exchanges email and password for an access/refresh token pair.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse),
        (status = 400, description = "Missing email or password", body = ApiResponse),
        (status = 401, description = "Invalid credentials", body = ApiResponse)
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(users, config, body), fields(email = %body.email))]
pub async fn login(
    body: web::Json<LoginReqDto>,
    users: web::Data<dyn UserRepository>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    if body.email.trim().is_empty() || body.password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(AppError::validation("Email dan kata sandi wajib diisi."));
    }

    let user = match users.find_by_email(body.email.trim()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return Err(AppError::unauthorized(messages::INVALID_CREDENTIALS));
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return Err(AppError::fetch_failed(messages::USER_FETCH_FAILED));
        }
    };

    debug!(user_id = %user.id, "Verifying password");
    if let Err(e) = verify_password(&body.password, &user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(AppError::unauthorized(messages::INVALID_CREDENTIALS));
    }

    let tokens = token_pair(&user.id.to_string(), &user.email, user.role_id, &config)?;

    info!(user_id = %user.id, "Login successful");
    Ok(ApiResponse::ok(json!(tokens)).into_response())
}

/// Trades a refresh token (sent as the bearer token) for a fresh pair.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New token pair", body = ApiResponse),
        (status = 401, description = "Missing, invalid or non-refresh token", body = ApiResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn refresh_token(
    req: HttpRequest,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::unauthorized("Missing token"))?;

    let claims = verify_token(token, &config.jwt_secret)
        .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

    if claims.token_type != TokenType::Refresh {
        return Err(AppError::unauthorized("Refresh token required"));
    }

    let tokens = token_pair(&claims.sub, &claims.email, claims.role, &config)?;
    Ok(ApiResponse::ok(json!(tokens)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::model::{record_id::RecordId, user::User};
    use crate::repository::memory::MemoryRepository;
    use actix_web::{App, http::StatusCode, test};
    use std::sync::Arc;

    fn config() -> Config {
        Config::for_tests()
    }

    fn users() -> (User, web::Data<dyn UserRepository>) {
        let user = User {
            id: RecordId::new(),
            name: "Budi".into(),
            email: "budi@company.co.id".into(),
            password: hash_password("rahasia123"),
            role_id: 3,
        };
        let repo: Arc<dyn UserRepository> = Arc::new(MemoryRepository::new().with_user(user.clone()));
        (user, web::Data::from(repo))
    }

    #[actix_web::test]
    async fn login_issues_usable_tokens() {
        let (user, repo) = users();
        let app = test::init_service(
            App::new()
                .app_data(repo)
                .app_data(web::Data::new(config()))
                .route("/auth/login", web::post().to(login))
                .route("/auth/refresh", web::post().to(refresh_token)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "budi@company.co.id", "password": "rahasia123" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        let access = body["data"]["accessToken"].as_str().unwrap();
        let refresh = body["data"]["refreshToken"].as_str().unwrap().to_string();
        let claims = verify_token(access, &config().jwt_secret).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.token_type, TokenType::Access);

        // an access token cannot be used to refresh
        let req = test::TestRequest::post()
            .uri("/auth/refresh")
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/auth/refresh")
            .insert_header(("Authorization", format!("Bearer {}", refresh)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorized() {
        let (_, repo) = users();
        let app = test::init_service(
            App::new()
                .app_data(repo)
                .app_data(web::Data::new(config()))
                .route("/auth/login", web::post().to(login)),
        )
        .await;

        for (email, password) in [
            ("budi@company.co.id", "salah"),
            ("siapa@company.co.id", "rahasia123"),
        ] {
            let req = test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({ "email": email, "password": password }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], messages::INVALID_CREDENTIALS);
        }
    }
}
