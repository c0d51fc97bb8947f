//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, migrations, service wiring, and the Axum
//! server lifecycle.

use crate::application::services::{
    AdminCredentials, AdminService, AuthService, BillingService, LinkService, PlanService,
};
use crate::config::Config;
use crate::infrastructure::payment::{PaymentGateway, StripeGateway, StripeSettings};
use crate::infrastructure::persistence::{
    PgLinkRepository, PgPlanRepository, PgSessionRepository, PgUserRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Migrations
/// - Plan catalogue seed (no-op when already populated)
/// - Payment gateway
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied");

    let pool = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
    let plan_repository = Arc::new(PgPlanRepository::new(pool.clone()));
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
    let session_repository = Arc::new(PgSessionRepository::new(pool.clone()));

    let gateway: Arc<dyn PaymentGateway> = Arc::new(StripeGateway::new(StripeSettings {
        secret_key: config.stripe_secret_key.clone(),
        webhook_secret: config.stripe_webhook_secret.clone(),
        base_url: config.base_url.clone(),
        development_mode: config.payment_development_mode,
    }));

    let link_service = Arc::new(LinkService::new(
        link_repository.clone(),
        plan_repository.clone(),
        user_repository.clone(),
    ));
    let plan_service = Arc::new(PlanService::new(
        plan_repository.clone(),
        user_repository.clone(),
    ));
    let auth_service = Arc::new(AuthService::new(
        session_repository,
        config.token_signing_secret.clone(),
    ));
    let admin_service = Arc::new(AdminService::new(
        link_repository.clone(),
        user_repository.clone(),
        AdminCredentials {
            email: config.admin_email.clone(),
            password: config.admin_password.clone(),
        },
        config.token_signing_secret.clone(),
        config.admin_token_ttl_hours,
    ));
    let billing_service = Arc::new(BillingService::new(
        gateway,
        plan_repository,
        user_repository,
        link_repository,
    ));

    plan_service.seed_defaults().await?;

    let state = AppState::new(
        link_service,
        plan_service,
        auth_service,
        admin_service,
        billing_service,
        config.base_url.clone(),
    );

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
