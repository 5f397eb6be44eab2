//! Hierarchical client-side route transition engine.
//!
//! Resolves a path to a nested route chain, diffs it against the active chain,
//! fires lifecycle hooks in a fixed order and composes parent/child renders.
//! Transitions are serialized through a single worker.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod router;
pub mod routing;
pub mod transition;

pub use config::RouterConfig;
pub use lifecycle::Shutdown;
pub use router::Router;
pub use routing::{PathPattern, RouteDef, RouteParams, RouteRegistry, RoutingError};
pub use transition::{
    ActiveRoute, HookKind, TransitionEngine, TransitionError, TransitionOptions, TransitionState,
};
