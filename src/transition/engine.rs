//! The transition engine.
//!
//! # Responsibilities
//! - Resolve a target path into a route chain
//! - Run validators root-first, voiding the transition on the first `false`
//! - Diff the committed chain against the next one and fire lifecycle hooks
//! - Compose render results leaf-to-root
//! - Commit the new chain and params only after everything succeeded
//!
//! # Design Decisions
//! - `&mut self` on `transition`: one transition at a time is a type-level fact
//! - Hooks are awaited one by one, so firing order is deterministic
//! - No rollback: hooks fired before a failure stay fired, the commit does not happen
//! - An unmatched or absent path is a transition to the empty chain

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::Instrument;
use uuid::Uuid;

use crate::observability::metrics;
use crate::routing::registry::RouteRegistry;
use crate::routing::types::{RouteChain, RouteId, RouteParams};
use crate::transition::hooks::{HookKind, TransitionHook};
use crate::transition::state::TransitionState;
use crate::transition::types::{
    ActiveRoute, TransitionError, TransitionOptions, TransitionOutcome, TransitionResult,
};

/// One-shot hooks waiting for the next transition. Shared with router handles.
pub type PendingHooks<C, R> = Arc<Mutex<Vec<TransitionHook<C, R>>>>;

/// What the engine currently has committed.
#[derive(Debug, Clone, Default)]
struct Committed {
    chain: RouteChain,
    params: RouteParams,
    path: Option<String>,
}

/// Drives transitions over a [`RouteRegistry`].
pub struct TransitionEngine<C, R> {
    registry: Arc<RouteRegistry<C, R>>,
    committed: Committed,
    pending: PendingHooks<C, R>,
}

impl<C, R> TransitionEngine<C, R>
where
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Engine with no active route.
    pub fn new(registry: Arc<RouteRegistry<C, R>>) -> Self {
        Self {
            registry,
            committed: Committed::default(),
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn registry(&self) -> &Arc<RouteRegistry<C, R>> {
        &self.registry
    }

    /// Handle onto the one-shot hook buffer.
    pub fn pending_hooks(&self) -> PendingHooks<C, R> {
        self.pending.clone()
    }

    /// Queue a hook to run once, before the next transition's lifecycle pass.
    pub fn register_transition_hook(&self, hook: TransitionHook<C, R>) {
        self.pending
            .lock()
            .expect("pending hook mutex poisoned")
            .push(hook);
    }

    /// Snapshot of the committed route.
    pub fn active(&self) -> ActiveRoute {
        ActiveRoute {
            stack: self.registry.names(&self.committed.chain),
            params: self.committed.params.clone(),
            path: self.committed.path.clone(),
        }
    }

    /// Path of the committed leaf, if any route is active.
    pub fn current_path(&self) -> Option<&str> {
        self.committed.path.as_deref()
    }

    /// Transition to `path` (`None` tears everything down).
    ///
    /// Returns the root-most render result, or `None` when nothing rendered
    /// or a validator rejected the target.
    pub async fn transition(
        &mut self,
        path: Option<&str>,
        context: Option<C>,
        options: TransitionOptions,
    ) -> TransitionResult<Option<R>> {
        let span = tracing::debug_span!(
            "transition",
            transition_id = %Uuid::new_v4(),
            path = path.unwrap_or("<none>"),
            reload = options.reload,
        );
        let started = Instant::now();

        match self.execute(path, context, options).instrument(span).await {
            Ok((outcome, rendered)) => {
                metrics::record_transition(outcome, started);
                Ok(rendered)
            }
            Err(err) => {
                metrics::record_transition(TransitionOutcome::Failed, started);
                Err(err)
            }
        }
    }

    /// Re-run the full teardown and setup of the committed chain.
    pub async fn reload(&mut self, context: Option<C>) -> TransitionResult<Option<R>> {
        let path = self.committed.path.clone();
        self.transition(path.as_deref(), context, TransitionOptions::reload())
            .await
    }

    async fn execute(
        &mut self,
        path: Option<&str>,
        context: Option<C>,
        options: TransitionOptions,
    ) -> TransitionResult<(TransitionOutcome, Option<R>)> {
        let registry = self.registry.clone();

        let resolved = path.and_then(|path| registry.resolve_by_path(path));
        let (next_chain, next_params) = match resolved {
            Some(matched) => (registry.chain_for(matched.route)?, matched.params),
            None => {
                if path.is_some() {
                    tracing::debug!("No route matched, transitioning to empty chain");
                }
                (RouteChain::empty(), RouteParams::new())
            }
        };
        let prev_chain = self.committed.chain.clone();

        let state = TransitionState {
            prev_stack: registry.names(&prev_chain),
            prev_params: self.committed.params.clone(),
            next_stack: registry.names(&next_chain),
            next_params: next_params.clone(),
            context,
            child: None,
        };

        for id in next_chain.iter() {
            let node = registry.node(id);
            if let Some(validate) = &node.hooks.validate {
                tracing::trace!(route = %node.name, hook = %HookKind::Validate, "Firing hook");
                metrics::record_hook(HookKind::Validate);
                let valid = validate(state.clone())
                    .await
                    .map_err(|source| hook_failed(&node.name, HookKind::Validate, source))?;
                if !valid {
                    tracing::debug!(route = %node.name, "Transition rejected by validation");
                    return Ok((TransitionOutcome::Rejected, None));
                }
            }
        }

        let transition_hooks =
            std::mem::take(&mut *self.pending.lock().expect("pending hook mutex poisoned"));
        for hook in transition_hooks {
            hook(state.clone())
                .await
                .map_err(|source| TransitionError::TransitionHookFailed { source })?;
        }

        let depth = prev_chain.len().max(next_chain.len());
        let reload = options.reload;

        for index in 0..depth {
            match (prev_chain.get(index), next_chain.get(index)) {
                (Some(prev), Some(next)) if prev == next && !reload => {
                    self.fire(prev, HookKind::RouteIsChanging, &state).await?;
                }
                (prev, next) => {
                    if let Some(prev) = prev {
                        self.fire(prev, HookKind::IsLeavingRoute, &state).await?;
                    }
                    if let Some(next) = next {
                        self.fire(next, HookKind::IsEnteringRoute, &state).await?;
                    }
                }
            }
        }

        let mut result = None;
        for id in next_chain.iter().rev() {
            let node = registry.node(id);
            if let Some(render) = &node.hooks.render {
                tracing::trace!(route = %node.name, hook = %HookKind::Render, "Firing hook");
                metrics::record_hook(HookKind::Render);
                let rendered = render(state.with_child(result.take()))
                    .await
                    .map_err(|source| hook_failed(&node.name, HookKind::Render, source))?;
                result = Some(rendered);
            }
        }

        for index in (0..depth).rev() {
            match (prev_chain.get(index), next_chain.get(index)) {
                (Some(prev), Some(next)) if prev == next && !reload => {
                    self.fire(prev, HookKind::RouteHasChanged, &state).await?;
                }
                (prev, next) => {
                    if let Some(next) = next {
                        self.fire(next, HookKind::HasEnteredRoute, &state).await?;
                    }
                    if let Some(prev) = prev {
                        self.fire(prev, HookKind::HasLeftRoute, &state).await?;
                    }
                }
            }
        }

        tracing::info!(
            from = ?state.prev_stack,
            to = ?state.next_stack,
            "Transition committed"
        );
        self.committed = Committed {
            path: next_chain.leaf().and(path.map(str::to_string)),
            chain: next_chain,
            params: next_params,
        };
        Ok((TransitionOutcome::Committed, result))
    }

    async fn fire(
        &self,
        id: RouteId,
        kind: HookKind,
        state: &TransitionState<C, R>,
    ) -> TransitionResult<()> {
        let node = self.registry.node(id);
        let Some(hook) = node.hooks.lifecycle(kind) else {
            return Ok(());
        };
        tracing::trace!(route = %node.name, hook = %kind, "Firing hook");
        metrics::record_hook(kind);
        hook(state.clone())
            .await
            .map_err(|source| hook_failed(&node.name, kind, source))
    }
}

fn hook_failed(route: &str, hook: HookKind, source: anyhow::Error) -> TransitionError {
    tracing::warn!(route = %route, hook = %hook, error = %source, "Hook failed");
    TransitionError::HookFailed {
        route: route.to_string(),
        hook,
        source,
    }
}
