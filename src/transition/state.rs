//! The value handed to every hook and render function.

use serde::Serialize;

use crate::routing::types::RouteParams;

/// Snapshot of a transition as seen by hooks.
///
/// `child` is only populated for `render`, carrying the result of the
/// next-deeper route that rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionState<C, R> {
    /// Route names of the previously committed chain, root first.
    pub prev_stack: Vec<String>,
    /// Parameters of the previously committed route.
    pub prev_params: RouteParams,
    /// Route names of the chain being entered, root first.
    pub next_stack: Vec<String>,
    /// Parameters extracted from the target path.
    pub next_params: RouteParams,
    /// Caller-supplied context, opaque to the engine.
    pub context: Option<C>,
    /// Result of the deeper route's render.
    pub child: Option<R>,
}

impl<C: Clone, R> TransitionState<C, R> {
    /// Copy of this state for a render call, carrying the deeper result.
    pub(crate) fn with_child(&self, child: Option<R>) -> Self {
        Self {
            prev_stack: self.prev_stack.clone(),
            prev_params: self.prev_params.clone(),
            next_stack: self.next_stack.clone(),
            next_params: self.next_params.clone(),
            context: self.context.clone(),
            child,
        }
    }
}
