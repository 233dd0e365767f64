//! System orchestration, configuration, startup, and shutdown logic.

pub mod catalog_system;
pub mod config;
pub mod error;
pub mod telemetry;

pub use catalog_system::*;
pub use config::*;
pub use telemetry::*;
