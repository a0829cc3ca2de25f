//! Tally API - Personal Task Tracker
//!
//! A small HTTP service for tracking one-off and recurring tasks. Users
//! register, log in, and manage their own tasks; the interesting part is the
//! recurrence engine that decides when a task is due and how its schedule
//! advances on completion.
//!
//! # Architecture
//!
//! The service is organized into several key modules:
//!
//! - [`config`]: Configuration management and environment loading
//! - [`domain`]: Core domain models and the recurrence engine
//! - [`database`]: Repository traits with SQLite and in-memory backends
//! - [`gateway`]: Authentication, account, and task endpoints
//! - [`api`]: Health endpoints
//!
//! # Example
//!
//! ```rust,ignore
//! use tally_api::{config::AppConfig, server::create_app};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let app = create_app(config, None).await?;
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod config;
pub mod database;
pub mod domain;
pub mod gateway;
pub mod logging;
pub mod server;

use std::sync::Arc;

use config::AppConfig;
use database::Database;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Task and user persistence.
    pub database: Database,
}
