//! User account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: String,
    /// Login name, unique across the system.
    pub username: String,
    /// Argon2 PHC-format hash; never exposed through the API.
    pub password_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
