//! Gateway functionality - authentication, accounts, and task endpoints.
//!
//! This module provides the HTTP layer around the recurrence engine:
//! - JWT authentication middleware
//! - Account registration and login
//! - Task CRUD and completion endpoints

pub mod auth;
pub mod password;
pub mod routes;
pub mod tasks;
pub mod users;

use axum::Router;

use crate::AppState;

/// Create the gateway router with all gateway-specific routes.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(routes::router())
        .merge(users::router())
        .merge(tasks::router())
}
