//! Host-facing router handle.
//!
//! # Responsibilities
//! - Own the route registry shared with the worker
//! - Submit transitions and reloads through the FIFO queue
//! - Build paths by route name
//! - Register one-shot transition hooks
//! - Expose the committed route
//!
//! # Design Decisions
//! - Cheap to clone; every clone feeds the same worker
//! - Path building never touches the queue (the registry is immutable)

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::config::QueueConfig;
use crate::lifecycle::Shutdown;
use crate::routing::registry::RouteRegistry;
use crate::routing::types::{RouteParams, RoutingResult};
use crate::transition::engine::{PendingHooks, TransitionEngine};
use crate::transition::hooks::hook_fn;
use crate::transition::queue::{Target, TransitionQueue, TransitionWorker};
use crate::transition::state::TransitionState;
use crate::transition::types::{ActiveRoute, TransitionOptions, TransitionResult};

/// Handle to a running transition worker.
pub struct Router<C, R> {
    registry: Arc<RouteRegistry<C, R>>,
    queue: TransitionQueue<C, R>,
    pending: PendingHooks<C, R>,
    active: watch::Receiver<ActiveRoute>,
}

impl<C, R> Clone for Router<C, R> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            queue: self.queue.clone(),
            pending: self.pending.clone(),
            active: self.active.clone(),
        }
    }
}

impl<C, R> Router<C, R>
where
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Create a router and the worker that serves it. The caller drives the worker.
    pub fn new(registry: RouteRegistry<C, R>, config: &QueueConfig) -> (Self, TransitionWorker<C, R>) {
        let registry = Arc::new(registry);
        let engine = TransitionEngine::new(registry.clone());
        let pending = engine.pending_hooks();
        let (queue, worker, active) = TransitionQueue::new(engine, config.capacity);

        let router = Self {
            registry,
            queue,
            pending,
            active,
        };
        (router, worker)
    }

    /// Create a router and spawn its worker on the current Tokio runtime.
    pub fn spawn(registry: RouteRegistry<C, R>, config: &QueueConfig, shutdown: &Shutdown) -> Self {
        let (router, worker) = Self::new(registry, config);
        tokio::spawn(worker.run(shutdown.subscribe()));
        router
    }

    /// Transition to `path`; `None` tears down the active chain.
    ///
    /// Waits behind any transition already queued. Resolves to the root-most
    /// render result, or `None` when nothing rendered or validation rejected.
    pub async fn transition(
        &self,
        path: Option<&str>,
        context: Option<C>,
        options: TransitionOptions,
    ) -> TransitionResult<Option<R>> {
        self.queue
            .submit(Target::Path(path.map(str::to_string)), context, options)
            .await
    }

    /// Re-enter the committed route with a full teardown and setup.
    pub async fn reload(&self, context: Option<C>) -> TransitionResult<Option<R>> {
        self.queue
            .submit(Target::Reload, context, TransitionOptions::reload())
            .await
    }

    /// Path for a named route.
    pub fn path(&self, name: &str, params: &RouteParams) -> RoutingResult<String> {
        self.registry.resolve_by_name(name, params)
    }

    /// Run `hook` once, before the lifecycle hooks of the next transition
    /// that passes validation.
    pub fn register_transition_hook<F, Fut>(&self, hook: F)
    where
        F: Fn(TransitionState<C, R>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.pending
            .lock()
            .expect("pending hook mutex poisoned")
            .push(hook_fn(hook));
    }

    /// The committed route as of the last finished transition.
    pub fn active(&self) -> ActiveRoute {
        self.active.borrow().clone()
    }

    /// Receiver notified after every finished transition.
    pub fn subscribe(&self) -> watch::Receiver<ActiveRoute> {
        self.active.clone()
    }

    pub fn registry(&self) -> &Arc<RouteRegistry<C, R>> {
        &self.registry
    }

    /// Transitions waiting behind the one in flight.
    pub fn queued(&self) -> usize {
        self.queue.depth()
    }
}
