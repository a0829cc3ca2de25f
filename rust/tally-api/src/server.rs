//! HTTP server setup and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::config::AppConfig;
use crate::database::Database;
use crate::gateway;
use crate::logging::OpTimer;
use crate::{AppState, log_banner, log_init_step, log_init_warning, log_success};

/// Tally API version (from Cargo.toml).
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create the application with all routes and middleware.
///
/// Pass an existing [`Database`] to share a connection (tests use the
/// in-memory backend this way); otherwise the configured SQLite store is
/// opened.
pub async fn create_app(config: AppConfig, existing_db: Option<Database>) -> anyhow::Result<Router> {
    let overall_timer = OpTimer::new("server", "create_app");

    log_banner!(
        format!("Tally API v{VERSION}"),
        format!("Database: {}", config.database.path)
    );

    if config.auth.jwt_secret.is_none() {
        log_init_warning!(
            "No JWT secret configured. Authenticated endpoints will reject all requests."
        );
    }

    // [1/3] Open the database
    let step_timer = OpTimer::new("server", "database");
    let database = match existing_db {
        Some(db) => {
            log_init_step!(1, 3, "Database", format!("shared {} backend", db.backend_name()));
            db
        }
        None => {
            let db = Database::from_config(&config.database).await?;
            log_init_step!(1, 3, "Database", format!("SQLite at {}", config.database.path));
            db
        }
    };
    step_timer.finish();

    // [2/3] Create app state
    let step_timer = OpTimer::new("server", "state");
    let state = AppState {
        config: Arc::new(config.clone()),
        database,
    };
    log_init_step!(2, 3, "State", "shared application state ready");
    step_timer.finish();

    // [3/3] Build router with middleware
    let step_timer = OpTimer::new("server", "router");
    let api_router = Router::new()
        .merge(api::create_router())
        .merge(gateway::create_router());

    let app = api_router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            gateway::auth::auth_middleware,
        ))
        .with_state(state);

    log_init_step!(3, 3, "Router", "routes + middleware configured");
    step_timer.finish();

    overall_timer.finish();
    log_success!("Tally API server created");

    Ok(app)
}
