//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};

use goodrouter::config::QueueConfig;
use goodrouter::{HookKind, RouteDef, RouteRegistry, Router, Shutdown};

/// Labels recorded by hooks, in firing order.
#[derive(Clone, Default)]
pub struct HookLog(Arc<Mutex<Vec<String>>>);

#[allow(dead_code)]
impl HookLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, label: impl Into<String>) {
        self.0.lock().unwrap().push(label.into());
    }

    /// Everything recorded so far, clearing the log.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Attach a recording hook to every lifecycle slot, labelled `<route>-<hook>`.
pub fn traced(def: RouteDef<Value, Value>, log: &HookLog) -> RouteDef<Value, Value> {
    let name = def.name().to_string();
    let mut def = def;
    for kind in HookKind::LIFECYCLE {
        let log = log.clone();
        let label = format!("{name}-{kind}");
        def = def.on(kind, move |_| {
            let log = log.clone();
            let label = label.clone();
            async move {
                log.push(label);
                Ok(())
            }
        });
    }
    def
}

/// Like [`traced`], plus a render returning `{route, child}`.
#[allow(dead_code)]
pub fn rendered(def: RouteDef<Value, Value>, log: &HookLog) -> RouteDef<Value, Value> {
    let name = def.name().to_string();
    traced(def, log).render(move |state| {
        let name = name.clone();
        async move { Ok(json!({ "route": name, "child": state.child })) }
    })
}

/// Layout-only root with `child1` at `/child1` and `child2` at `/child2`.
#[allow(dead_code)]
pub fn nested_registry(log: &HookLog) -> RouteRegistry<Value, Value> {
    RouteRegistry::new(vec![traced(RouteDef::new("root"), log)
        .child(traced(RouteDef::new("child1").path("/child1"), log))
        .child(traced(RouteDef::new("child2").path("/child2"), log))])
    .unwrap()
}

/// Spawn a router over `registry` with the default queue.
#[allow(dead_code)]
pub fn spawn_router(registry: RouteRegistry<Value, Value>) -> (Router<Value, Value>, Shutdown) {
    let shutdown = Shutdown::new();
    let router = Router::spawn(registry, &QueueConfig::default(), &shutdown);
    (router, shutdown)
}

/// Run `f` with a timeout, panicking if it does not complete in time.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(duration: Duration, f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(duration, f)
        .await
        .expect("operation timed out")
}
