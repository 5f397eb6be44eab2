//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → RouteRegistry::from_config + Router::spawn
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route set never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Hooks are code, so config only describes the route tree

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{LogFormat, ObservabilityConfig, QueueConfig, RouteConfig, RouterConfig};
pub use validation::{validate_config, ValidationError};
