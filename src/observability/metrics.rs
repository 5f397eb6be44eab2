//! Metrics collection.
//!
//! # Responsibilities
//! - Count transitions by outcome and time them
//! - Count fired hooks by kind
//! - Track how many requests wait in the transition queue
//!
//! # Metrics
//! - `router_transitions_total` (counter): transitions by outcome
//! - `router_transition_duration_seconds` (histogram): resolve-to-commit latency
//! - `router_hooks_fired_total` (counter): hook invocations by kind
//! - `router_queue_depth` (gauge): requests queued behind the in-flight one
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; a no-op until a recorder is installed
//! - Route names are not used as labels to keep cardinality bounded

use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::transition::hooks::HookKind;
use crate::transition::types::TransitionOutcome;

/// Install a process-wide Prometheus recorder and return its render handle.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Metrics recorder installed");
    Ok(handle)
}

/// Record a finished transition.
pub fn record_transition(outcome: TransitionOutcome, started: Instant) {
    metrics::counter!("router_transitions_total", "outcome" => outcome.as_str()).increment(1);
    metrics::histogram!("router_transition_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

/// Record a single hook invocation.
pub fn record_hook(kind: HookKind) {
    metrics::counter!("router_hooks_fired_total", "hook" => kind.as_str()).increment(1);
}

/// Record the number of queued transition requests.
pub fn record_queue_depth(depth: usize) {
    metrics::gauge!("router_queue_depth").set(depth as f64);
}
