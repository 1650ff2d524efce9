//! CheckPoint Core - Core data structures and error definitions
//!
//! This module defines the domain types, error taxonomy, configuration, and
//! logging setup shared by the CheckPoint backend.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use chrono;
pub use tracing;
