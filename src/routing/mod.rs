//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registry construction (once):
//!     RouteDef tree / RouteConfig[]
//!     → flatten (children inherit parent by nesting)
//!     → resolve parent names into ids, reject duplicates and cycles
//!     → compile one PathPattern per route with a path
//!     → freeze as immutable RouteRegistry
//!
//! Lookup:
//!     path → registry.rs (ordered scan) → pattern.rs (match) → MatchResult or no match
//!     name + params → pattern.rs (build) → path
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex: literal scanning only
//! - Deterministic: first registered match wins

pub mod pattern;
pub mod registry;
pub mod types;

pub use pattern::PathPattern;
pub use registry::{RouteDef, RouteNode, RouteRegistry};
pub use types::{MatchResult, RouteChain, RouteId, RouteParams, RoutingError, RoutingResult};
