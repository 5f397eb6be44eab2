//! Transition options, outcomes and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routing::types::{RouteParams, RoutingError};
use crate::transition::hooks::HookKind;

/// Per-call transition options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransitionOptions {
    /// Treat every chain position as divergent: full teardown and setup,
    /// even when the target route is unchanged.
    pub reload: bool,
}

impl TransitionOptions {
    pub fn reload() -> Self {
        Self { reload: true }
    }
}

/// The committed route, as observed from outside the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveRoute {
    /// Route names, root first. Empty when no route is active.
    pub stack: Vec<String>,
    pub params: RouteParams,
    /// Path the chain was resolved from.
    pub path: Option<String>,
}

impl ActiveRoute {
    /// Name of the leaf route, if any.
    pub fn leaf(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }
}

/// How a transition ended, for logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Committed,
    Rejected,
    Failed,
}

impl TransitionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionOutcome::Committed => "committed",
            TransitionOutcome::Rejected => "rejected",
            TransitionOutcome::Failed => "failed",
        }
    }
}

/// Errors surfaced to the caller of a transition.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The registry could not resolve the target chain.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// A route hook or render function failed.
    #[error("{hook} hook of route {route} failed: {source}")]
    HookFailed {
        route: String,
        hook: HookKind,
        #[source]
        source: anyhow::Error,
    },

    /// A one-shot transition hook failed.
    #[error("transition hook failed: {source}")]
    TransitionHookFailed {
        #[source]
        source: anyhow::Error,
    },

    /// The worker stopped before answering.
    #[error("transition queue closed")]
    QueueClosed,
}

/// Result type for transitions: `Ok(None)` is "nothing rendered".
pub type TransitionResult<T> = Result<T, TransitionError>;
