//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! GracefulConfig::default()
//!     → loader.rs (optional TOML file)
//!     → loader.rs (environment overrides)
//!     → Graceful::new(config) takes an immutable snapshot
//! ```
//!
//! # Design Decisions
//! - Config is immutable once a coordinator is built
//! - All fields have defaults to allow minimal configs
//! - Environment parsing goes through a lookup function so it can be tested
//!   without touching the process environment

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::GracefulConfig;
