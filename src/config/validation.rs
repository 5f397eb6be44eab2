//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (parents name existing routes)
//! - Detect duplicate names and cyclic parent chains
//! - Validate value ranges (queue capacity > 0, log level parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::{RouteConfig, RouterConfig};

/// A single semantic problem in a config.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("route at position {0} has an empty name")]
    EmptyName(usize),

    #[error("route name {0} is used more than once")]
    DuplicateName(String),

    #[error("route {route} references unknown parent {parent}")]
    UnknownParent { route: String, parent: String },

    #[error("route {0} is part of a parent cycle")]
    CyclicParent(String),

    #[error("queue capacity must be greater than zero")]
    ZeroQueueCapacity,

    #[error("invalid log level {0:?}")]
    InvalidLogLevel(String),
}

/// Flattened (name, effective parent) pairs, in registration order.
fn flatten<'a>(
    routes: &'a [RouteConfig],
    nesting_parent: Option<&'a str>,
    out: &mut Vec<(&'a str, Option<&'a str>)>,
) {
    for route in routes {
        let parent = route.parent.as_deref().or(nesting_parent);
        out.push((route.name.as_str(), parent));
        flatten(&route.children, Some(route.name.as_str()), out);
    }
}

/// Check a config, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut flat = Vec::new();
    flatten(&config.routes, None, &mut flat);

    let mut seen = HashSet::new();
    let mut parents: HashMap<&str, Option<&str>> = HashMap::new();
    for (position, (name, parent)) in flat.iter().enumerate() {
        if name.is_empty() {
            errors.push(ValidationError::EmptyName(position));
            continue;
        }
        if !seen.insert(*name) {
            errors.push(ValidationError::DuplicateName(name.to_string()));
            continue;
        }
        parents.insert(*name, *parent);
    }

    for (name, parent) in &flat {
        if let Some(parent) = parent {
            if !parents.contains_key(parent) {
                errors.push(ValidationError::UnknownParent {
                    route: name.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
    }

    let mut reported = HashSet::new();
    for (name, _) in &flat {
        if name.is_empty() || reported.contains(name) {
            continue;
        }
        let mut steps = 0;
        let mut current = parents.get(name).copied().flatten();
        while let Some(parent) = current {
            steps += 1;
            if steps > parents.len() {
                reported.insert(*name);
                errors.push(ValidationError::CyclicParent(name.to_string()));
                break;
            }
            current = parents.get(parent).copied().flatten();
        }
    }

    if config.queue.capacity == 0 {
        errors.push(ValidationError::ZeroQueueCapacity);
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &str, parent: Option<&str>) -> RouteConfig {
        let mut route = RouteConfig::new(name, None);
        route.parent = parent.map(str::to_string);
        route
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&RouterConfig::default()), Ok(()));
    }

    #[test]
    fn test_nested_routes_are_valid() {
        let mut root = RouteConfig::new("root", Some("/"));
        root.children.push(RouteConfig::new("about", Some("/about")));
        let config = RouterConfig {
            routes: vec![root],
            ..Default::default()
        };
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig {
            routes: vec![
                route("a", None),
                route("a", None),
                route("", None),
                route("orphan", Some("ghost")),
            ],
            ..Default::default()
        };
        config.queue.capacity = 0;
        config.observability.log_level = "router=loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateName("a".into()),
                ValidationError::EmptyName(2),
                ValidationError::UnknownParent {
                    route: "orphan".into(),
                    parent: "ghost".into()
                },
                ValidationError::ZeroQueueCapacity,
                ValidationError::InvalidLogLevel("router=loud".into()),
            ]
        );
    }

    #[test]
    fn test_detects_cycles() {
        let config = RouterConfig {
            routes: vec![route("a", Some("b")), route("b", Some("a")), route("c", Some("a"))],
            ..Default::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::CyclicParent("a".into())));
        assert!(errors.contains(&ValidationError::CyclicParent("b".into())));
        // `c` hangs off the cycle without being part of it, but its walk never ends either.
        assert!(errors.contains(&ValidationError::CyclicParent("c".into())));
    }
}
