//! Serialized transition execution.
//!
//! # Responsibilities
//! - Accept transition requests from any number of handles
//! - Run them one at a time, in the order received
//! - Hand each caller its own result
//! - Publish the committed route after every request
//!
//! # Design Decisions
//! - Bounded mpsc channel: a full queue makes callers wait (backpressure)
//! - The worker owns the engine exclusively; no lock guards the route chain
//! - No cancellation: a started transition always runs to completion
//! - Shutdown is observed between requests only and wins over queued requests
//! - Queue depth is read off the channel's free permits

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::observability::metrics;
use crate::transition::engine::TransitionEngine;
use crate::transition::types::{
    ActiveRoute, TransitionError, TransitionOptions, TransitionResult,
};

/// Where a queued request should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A path, or `None` for "no route".
    Path(Option<String>),
    /// Whatever path is committed when the request starts executing.
    Reload,
}

struct TransitionRequest<C, R> {
    target: Target,
    context: Option<C>,
    options: TransitionOptions,
    reply: oneshot::Sender<TransitionResult<Option<R>>>,
}

/// Cloneable handle that submits transitions to the worker.
pub struct TransitionQueue<C, R> {
    tx: mpsc::Sender<TransitionRequest<C, R>>,
}

impl<C, R> Clone for TransitionQueue<C, R> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

/// Drains the queue, one transition at a time.
pub struct TransitionWorker<C, R> {
    engine: TransitionEngine<C, R>,
    rx: mpsc::Receiver<TransitionRequest<C, R>>,
    active: watch::Sender<ActiveRoute>,
}

impl<C, R> TransitionQueue<C, R>
where
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Create a queue around `engine`.
    ///
    /// Returns the handle, the worker that must be driven (usually spawned),
    /// and a receiver tracking the committed route.
    pub fn new(
        engine: TransitionEngine<C, R>,
        capacity: usize,
    ) -> (Self, TransitionWorker<C, R>, watch::Receiver<ActiveRoute>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (active, active_rx) = watch::channel(engine.active());

        let queue = Self { tx };
        let worker = TransitionWorker { engine, rx, active };
        (queue, worker, active_rx)
    }

    /// Enqueue a transition and wait for its result.
    pub async fn submit(
        &self,
        target: Target,
        context: Option<C>,
        options: TransitionOptions,
    ) -> TransitionResult<Option<R>> {
        let (reply, response) = oneshot::channel();
        let request = TransitionRequest {
            target,
            context,
            options,
            reply,
        };

        self.tx
            .send(request)
            .await
            .map_err(|_| TransitionError::QueueClosed)?;
        metrics::record_queue_depth(self.depth());

        response.await.map_err(|_| TransitionError::QueueClosed)?
    }

    /// Requests waiting behind the one in flight.
    pub fn depth(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }
}

impl<C, R> TransitionWorker<C, R>
where
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Run until every queue handle is dropped or shutdown is signalled.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(routes = self.engine.registry().len(), "Transition worker starting");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.recv() => {
                    tracing::info!(
                        abandoned = self.rx.len(),
                        "Transition worker received shutdown signal, exiting loop"
                    );
                    break;
                }
                request = self.rx.recv() => match request {
                    Some(request) => self.execute(request).await,
                    None => {
                        tracing::info!("All router handles dropped, worker exiting");
                        break;
                    }
                },
            }
        }
    }

    async fn execute(&mut self, request: TransitionRequest<C, R>) {
        metrics::record_queue_depth(self.rx.len());

        let TransitionRequest {
            target,
            context,
            options,
            reply,
        } = request;

        let result = match target {
            Target::Path(path) => {
                self.engine
                    .transition(path.as_deref(), context, options)
                    .await
            }
            Target::Reload => self.engine.reload(context).await,
        };

        if let Err(err) = &result {
            tracing::warn!(error = %err, "Transition failed");
        }
        self.active.send_replace(self.engine.active());

        if reply.send(result).is_err() {
            tracing::debug!("Transition caller went away before the result was ready");
        }
    }
}
