//! API route definitions for the gateway.

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::AppState;

/// Gateway-specific routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/info", get(get_api_info))
}

/// API info response.
#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

/// Get API information.
pub async fn get_api_info() -> impl IntoResponse {
    let info = ApiInfo {
        name: "Tally API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Personal task tracker with recurring task scheduling".to_string(),
        endpoints: vec![
            EndpointInfo {
                path: "/api/v1/auth/register".to_string(),
                method: "POST".to_string(),
                description: "Register a new account".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/auth/login".to_string(),
                method: "POST".to_string(),
                description: "Log in and receive a JWT".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/tasks".to_string(),
                method: "POST".to_string(),
                description: "Create a task".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/tasks".to_string(),
                method: "GET".to_string(),
                description: "List your tasks with due-ness".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/tasks/{id}/complete".to_string(),
                method: "POST".to_string(),
                description: "Mark a task complete for the current period".to_string(),
            },
        ],
    };

    (StatusCode::OK, Json(info))
}
