//! Route registry: flattening, lookup and chain walking.
//!
//! # Responsibilities
//! - Flatten a nested route definition tree into one arena of nodes
//! - Resolve `parent` names into validated ids at construction
//! - Resolve a path to the first matching route (registration order)
//! - Build a path for a named route
//! - Walk parent links into a root-first chain
//!
//! # Design Decisions
//! - Immutable after construction; shared via `Arc` by the engine and the router handle
//! - Explicit `parent` wins over structural nesting
//! - Unknown parents, duplicate names and cycles are rejected up front
//! - First registered route wins on overlapping patterns

use std::collections::HashMap;
use std::future::Future;

use crate::config::schema::RouteConfig;
use crate::routing::pattern::PathPattern;
use crate::routing::types::{
    MatchResult, RouteChain, RouteId, RouteParams, RoutingError, RoutingResult,
};
use crate::transition::hooks::{hook_fn, HookKind, RouteHooks};
use crate::transition::state::TransitionState;

/// A route definition as supplied by the host, possibly with inline children.
pub struct RouteDef<C, R> {
    name: String,
    path: Option<String>,
    parent: Option<String>,
    children: Vec<RouteDef<C, R>>,
    hooks: RouteHooks<C, R>,
}

impl<C, R> RouteDef<C, R> {
    /// Start a definition with a unique name and no path.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            parent: None,
            children: Vec::new(),
            hooks: RouteHooks::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path template, e.g. `/users/:id`.
    pub fn path(mut self, template: impl Into<String>) -> Self {
        self.path = Some(template.into());
        self
    }

    /// Explicit parent by name; takes precedence over nesting.
    pub fn parent(mut self, name: impl Into<String>) -> Self {
        self.parent = Some(name.into());
        self
    }

    /// Nest a child definition; its parent defaults to this route.
    pub fn child(mut self, child: RouteDef<C, R>) -> Self {
        self.children.push(child);
        self
    }

    /// Fill one lifecycle slot.
    pub fn on<F, Fut>(mut self, kind: HookKind, f: F) -> Self
    where
        F: Fn(TransitionState<C, R>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hooks.set_lifecycle(kind, hook_fn(f));
        self
    }

    /// Guard evaluated root-first before any other hook; `false` voids the transition.
    pub fn validate<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(TransitionState<C, R>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
    {
        self.hooks.validate = Some(hook_fn(f));
        self
    }

    /// Render function; `state.child` holds the deeper route's result.
    pub fn render<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(TransitionState<C, R>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    {
        self.hooks.render = Some(hook_fn(f));
        self
    }

    /// Definition from config, with `decorate` applied to it and to every nested child.
    pub fn from_config<F>(config: &RouteConfig, decorate: &mut F) -> Self
    where
        F: FnMut(RouteDef<C, R>) -> RouteDef<C, R>,
    {
        let mut def = RouteDef::new(config.name.clone());
        def.path = config.path.clone();
        def.parent = config.parent.clone();
        let mut def = decorate(def);
        for child in &config.children {
            def.children.push(RouteDef::from_config(child, decorate));
        }
        def
    }
}

/// A flattened, validated route.
#[derive(Debug)]
pub struct RouteNode<C, R> {
    pub id: RouteId,
    pub name: String,
    pub pattern: Option<PathPattern>,
    pub parent: Option<RouteId>,
    pub hooks: RouteHooks<C, R>,
}

/// Immutable set of routes keyed by name.
#[derive(Debug)]
pub struct RouteRegistry<C, R> {
    nodes: Vec<RouteNode<C, R>>,
    index: HashMap<String, RouteId>,
}

struct FlatRoute<C, R> {
    name: String,
    path: Option<String>,
    parent: Option<String>,
    hooks: RouteHooks<C, R>,
}

fn flatten<C, R>(def: RouteDef<C, R>, nesting_parent: Option<&str>, out: &mut Vec<FlatRoute<C, R>>) {
    let RouteDef {
        name,
        path,
        parent,
        children,
        hooks,
    } = def;
    let parent = parent.or_else(|| nesting_parent.map(str::to_string));
    out.push(FlatRoute {
        name: name.clone(),
        path,
        parent,
        hooks,
    });
    for child in children {
        flatten(child, Some(&name), out);
    }
}

impl<C, R> RouteRegistry<C, R> {
    /// Flatten and validate route definitions.
    pub fn new(defs: Vec<RouteDef<C, R>>) -> RoutingResult<Self> {
        let mut flat = Vec::new();
        for def in defs {
            flatten(def, None, &mut flat);
        }

        let mut index = HashMap::with_capacity(flat.len());
        for (position, route) in flat.iter().enumerate() {
            if index.insert(route.name.clone(), RouteId(position)).is_some() {
                return Err(RoutingError::DuplicateRoute(route.name.clone()));
            }
        }

        let mut nodes = Vec::with_capacity(flat.len());
        for (position, route) in flat.into_iter().enumerate() {
            let parent = match route.parent {
                Some(parent) => Some(*index.get(&parent).ok_or_else(|| {
                    RoutingError::UnknownParent {
                        route: route.name.clone(),
                        parent: parent.clone(),
                    }
                })?),
                None => None,
            };
            nodes.push(RouteNode {
                id: RouteId(position),
                name: route.name,
                pattern: route.path.map(PathPattern::new),
                parent,
                hooks: route.hooks,
            });
        }

        let registry = Self { nodes, index };
        for node in &registry.nodes {
            registry.chain_for(node.id)?;
        }

        tracing::debug!(routes = registry.nodes.len(), "Route registry built");
        Ok(registry)
    }

    /// Build from config, letting `decorate` attach hooks to each definition.
    pub fn from_config<F>(routes: &[RouteConfig], mut decorate: F) -> RoutingResult<Self>
    where
        F: FnMut(RouteDef<C, R>) -> RouteDef<C, R>,
    {
        let defs = routes
            .iter()
            .map(|route| RouteDef::from_config(route, &mut decorate))
            .collect();
        Self::new(defs)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id. Ids are only minted by this registry.
    pub fn node(&self, id: RouteId) -> &RouteNode<C, R> {
        &self.nodes[id.0]
    }

    pub fn get(&self, name: &str) -> Option<&RouteNode<C, R>> {
        self.index.get(name).map(|id| self.node(*id))
    }

    /// Nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &RouteNode<C, R>> {
        self.nodes.iter()
    }

    /// First route, in registration order, whose template matches `path`.
    pub fn resolve_by_path(&self, path: &str) -> Option<MatchResult> {
        self.nodes.iter().find_map(|node| {
            let params = node.pattern.as_ref()?.matches(path)?;
            Some(MatchResult {
                route: node.id,
                params,
            })
        })
    }

    /// Concrete path for a named route.
    pub fn resolve_by_name(&self, name: &str, params: &RouteParams) -> RoutingResult<String> {
        let node = self
            .get(name)
            .ok_or_else(|| RoutingError::RouteNotFound(name.to_string()))?;
        let pattern = node
            .pattern
            .as_ref()
            .ok_or_else(|| RoutingError::NoPathTemplate {
                route: name.to_string(),
            })?;
        pattern.build(params)
    }

    /// Root-first chain ending at `leaf`.
    pub fn chain_for(&self, leaf: RouteId) -> RoutingResult<RouteChain> {
        let mut ids = Vec::new();
        let mut current = Some(leaf);
        while let Some(id) = current {
            if ids.len() == self.nodes.len() {
                return Err(RoutingError::CyclicRoute(self.node(leaf).name.clone()));
            }
            ids.push(id);
            current = self.node(id).parent;
        }
        ids.reverse();
        Ok(RouteChain::from_root_first(ids))
    }

    /// Route names of a chain, root first.
    pub fn names(&self, chain: &RouteChain) -> Vec<String> {
        chain.iter().map(|id| self.node(id).name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Def = RouteDef<(), ()>;

    fn params(pairs: &[(&str, &str)]) -> RouteParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_nested_children_get_implicit_parent() {
        let registry = RouteRegistry::new(vec![Def::new("root")
            .path("/")
            .child(Def::new("users").path("/users").child(Def::new("user").path("/users/:id")))])
        .unwrap();

        let user = registry.get("user").unwrap();
        let chain = registry.chain_for(user.id).unwrap();
        assert_eq!(registry.names(&chain), ["root", "users", "user"]);
    }

    #[test]
    fn test_explicit_parent_wins_over_nesting() {
        let registry = RouteRegistry::new(vec![
            Def::new("app"),
            Def::new("root").child(Def::new("page").path("/page").parent("app")),
        ])
        .unwrap();

        let page = registry.get("page").unwrap();
        assert_eq!(registry.node(page.parent.unwrap()).name, "app");
    }

    #[test]
    fn test_construction_errors() {
        let err = RouteRegistry::new(vec![Def::new("a"), Def::new("a")]).unwrap_err();
        assert_eq!(err, RoutingError::DuplicateRoute("a".into()));

        let err = RouteRegistry::new(vec![Def::new("a").parent("ghost")]).unwrap_err();
        assert_eq!(
            err,
            RoutingError::UnknownParent {
                route: "a".into(),
                parent: "ghost".into()
            }
        );

        let err = RouteRegistry::new(vec![Def::new("a").parent("b"), Def::new("b").parent("a")])
            .unwrap_err();
        assert_eq!(err, RoutingError::CyclicRoute("a".into()));

        let err = RouteRegistry::new(vec![Def::new("self").parent("self")]).unwrap_err();
        assert_eq!(err, RoutingError::CyclicRoute("self".into()));
    }

    #[test]
    fn test_first_registered_wins() {
        let registry = RouteRegistry::new(vec![
            Def::new("generic").path("/items/:id"),
            Def::new("specific").path("/items/new"),
        ])
        .unwrap();

        let matched = registry.resolve_by_path("/items/new").unwrap();
        assert_eq!(registry.node(matched.route).name, "generic");
        assert_eq!(matched.params, params(&[("id", "new")]));
    }

    #[test]
    fn test_structural_routes_never_match() {
        let registry = RouteRegistry::new(vec![Def::new("layout").child(Def::new("home").path("/"))])
            .unwrap();

        let matched = registry.resolve_by_path("/").unwrap();
        assert_eq!(registry.node(matched.route).name, "home");
        assert!(registry.resolve_by_path("/missing").is_none());
    }

    #[test]
    fn test_resolve_by_name() {
        let registry = RouteRegistry::new(vec![
            Def::new("layout"),
            Def::new("user").path("/users/:id"),
        ])
        .unwrap();

        assert_eq!(
            registry.resolve_by_name("user", &params(&[("id", "42")])).unwrap(),
            "/users/42"
        );
        assert_eq!(
            registry.resolve_by_name("nope", &RouteParams::new()).unwrap_err(),
            RoutingError::RouteNotFound("nope".into())
        );
        assert_eq!(
            registry.resolve_by_name("layout", &RouteParams::new()).unwrap_err(),
            RoutingError::NoPathTemplate {
                route: "layout".into()
            }
        );
        assert!(matches!(
            registry.resolve_by_name("user", &RouteParams::new()),
            Err(RoutingError::MissingParameter { .. })
        ));
    }

    #[test]
    fn test_from_config_decorates_every_route() {
        let config: Vec<RouteConfig> = toml::from_str::<crate::config::RouterConfig>(
            r#"
            [[routes]]
            name = "root"
            path = "/"

              [[routes.children]]
              name = "about"
              path = "/about"
            "#,
        )
        .unwrap()
        .routes;

        let mut seen = Vec::new();
        let registry = RouteRegistry::<(), ()>::from_config(&config, |def| {
            seen.push(def.name().to_string());
            def
        })
        .unwrap();

        assert_eq!(seen, ["root", "about"]);
        let about = registry.get("about").unwrap();
        assert_eq!(registry.node(about.parent.unwrap()).name, "root");
    }
}
