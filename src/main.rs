use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod repository;
mod response;
mod routes;
mod service;
mod utils;

use config::Config;
use db::{init_db, run_migrations};

use crate::docs::ApiDoc;
use crate::repository::{UserRepository, mysql::MySqlRepository};
use crate::routes::RateLimits;
use crate::service::{
    attendance::AttendanceRules, company::CompanyDirectory, paid_leave::PaidLeaveRules,
};
use crate::utils::clock::SystemClock;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    let repo = Arc::new(MySqlRepository::new(pool));

    // the allow-list is read once; restart to pick up changes
    let company = Arc::new(
        CompanyDirectory::load(&*repo)
            .await
            .context("Failed to load company directory")?,
    );

    let attendance_rules = Data::new(AttendanceRules::new(
        repo.clone(),
        company,
        Arc::new(SystemClock),
    ));
    let paid_leave_rules = Data::new(PaidLeaveRules::new(repo.clone(), repo.clone()));
    let users: Data<dyn UserRepository> = Data::from(repo as Arc<dyn UserRepository>);

    let limits = RateLimits::from_config(&config)?;
    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config);

    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(config_data.clone())
            .app_data(attendance_rules.clone())
            .app_data(paid_leave_rules.clone())
            .app_data(users.clone())
            .app_data(routes::json_config())
            // auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, &config_data, &limits))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
