use crate::{
    api::{attendance, paid_leave},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::{Result, anyhow};
use std::sync::Arc;

type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-peer rate limiters. Built once so every worker shares the same buckets.
#[derive(Clone)]
pub struct RateLimits {
    login: Limiter,
    protected: Limiter,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            login: build_limiter(config.rate_login_per_min)?,
            protected: build_limiter(config.rate_protected_per_min)?,
        })
    }
}

fn build_limiter(requests_per_min: u32) -> Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("Invalid rate limit: {} requests per minute", requests_per_min))?;
    Ok(Arc::new(Governor::new(&cfg)))
}

/// Malformed JSON bodies are answered with the usual envelope instead of actix's plain text.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::validation(err.to_string()).into())
}

/// Attendance and paid-leave routes. Expects [`auth_middleware`] to be wrapped around them.
pub fn protected(cfg: &mut web::ServiceConfig) {
    cfg
        // /users/{user_id}/attendances
        .service(
            web::resource("/users/{user_id}/attendances")
                .route(web::post().to(attendance::check_in)),
        )
        // /users/{user_id}/attendances/{attendance_id}
        .service(
            web::resource("/users/{user_id}/attendances/{attendance_id}")
                .route(web::patch().to(attendance::check_out)),
        )
        // /users/{user_id}/paid-leaves
        .service(
            web::resource("/users/{user_id}/paid-leaves")
                .route(web::post().to(paid_leave::create_paid_leave))
                .route(web::get().to(paid_leave::list_user_paid_leaves)),
        )
        // /users/{user_id}/paid-leaves/active
        .service(
            web::resource("/users/{user_id}/paid-leaves/active")
                .route(web::get().to(paid_leave::get_active_paid_leave)),
        )
        // /paid-leaves
        .service(web::resource("/paid-leaves").route(web::get().to(paid_leave::list_paid_leaves)))
        // /paid-leaves/{paid_leave_id}
        .service(
            web::resource("/paid-leaves/{paid_leave_id}")
                .route(web::patch().to(paid_leave::update_paid_leave_status)),
        )
        // /paid-leaves/{paid_leave_id}/decision
        .service(
            web::resource("/paid-leaves/{paid_leave_id}/decision")
                .route(web::patch().to(paid_leave::decide_paid_leave)),
        );
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limits: &RateLimits) {
    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(limits.login.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(limits.login.clone())
                    .route(web::post().to(handlers::refresh_token)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(limits.protected.clone()) // rate limiting
            .configure(protected),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh with refresh_token
//       └─ returns a new token pair
