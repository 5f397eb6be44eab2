//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Route table, in registration order.
    pub routes: Vec<RouteConfig>,

    /// Transition queue settings.
    pub queue: QueueConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A route definition. Hooks are attached in code, not in config.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Unique route name.
    pub name: String,

    /// Path template (e.g., "/users/:id"). Absent for layout-only routes.
    #[serde(default)]
    pub path: Option<String>,

    /// Parent route name. Overrides nesting.
    #[serde(default)]
    pub parent: Option<String>,

    /// Routes nested under this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteConfig>,
}

impl RouteConfig {
    /// A route with a path and no parent or children.
    pub fn new(name: impl Into<String>, path: Option<&str>) -> Self {
        Self {
            name: name.into(),
            path: path.map(str::to_string),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Transition queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum queued transitions before callers wait.
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (trace, debug, info, warn, error, or `target=level` lists).
    pub log_level: String,

    /// Output format for log lines.
    pub log_format: LogFormat,

    /// Install a Prometheus recorder.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
        }
    }
}
