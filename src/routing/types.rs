//! Routing types and error definitions.

use std::collections::BTreeMap;
use thiserror::Error;

/// Parameter name → raw value extracted from a path.
pub type RouteParams = BTreeMap<String, String>;

/// Index of a route node inside its registry.
///
/// Two chain positions hold the "same" route exactly when their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub(crate) usize);

/// A route resolved from a path, with its extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// The matched leaf route.
    pub route: RouteId,
    /// Values bound to the parameters declared in the route's template.
    pub params: RouteParams,
}

/// Root-first sequence of routes, ending at a leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteChain {
    ids: Vec<RouteId>,
}

impl RouteChain {
    /// The chain of "no active route".
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_root_first(ids: Vec<RouteId>) -> Self {
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Route at depth `depth` (root is depth 0).
    pub fn get(&self, depth: usize) -> Option<RouteId> {
        self.ids.get(depth).copied()
    }

    pub fn leaf(&self) -> Option<RouteId> {
        self.ids.last().copied()
    }

    pub fn root(&self) -> Option<RouteId> {
        self.ids.first().copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = RouteId> + '_ {
        self.ids.iter().copied()
    }
}

/// Errors raised while building a registry or a path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// No route with this name is registered.
    #[error("route {0} not found")]
    RouteNotFound(String),

    /// The route exists but declares no path template.
    #[error("route {route} has no path template")]
    NoPathTemplate { route: String },

    /// A parameter declared by the template was not supplied.
    #[error("missing param {param} for path {template}")]
    MissingParameter { template: String, param: String },

    /// Two definitions share a name.
    #[error("duplicate route name {0}")]
    DuplicateRoute(String),

    /// A `parent` reference does not name a registered route.
    #[error("route {route} references unknown parent {parent}")]
    UnknownParent { route: String, parent: String },

    /// Walking the parent links from this route never reaches a root.
    #[error("route {0} has a cyclic parent chain")]
    CyclicRoute(String),
}

/// Result type for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;
