//! Core domain models and the recurrence engine.

pub mod recurrence;
pub mod task;
pub mod user;
