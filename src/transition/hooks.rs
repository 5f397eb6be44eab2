//! Route lifecycle hooks.
//!
//! # Responsibilities
//! - Hold one optional slot per hook kind for each route
//! - Adapt async closures into a uniform boxed call interface
//!
//! # Design Decisions
//! - An empty slot is a no-op, never an error
//! - Hooks receive an owned `TransitionState` so their futures are `'static`
//! - Hook failures are `anyhow::Error`; the engine wraps them with route and hook

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::Serialize;

use crate::transition::state::TransitionState;

/// A boxed async hook producing `T`.
pub type HookFn<C, R, T> =
    Arc<dyn Fn(TransitionState<C, R>) -> BoxFuture<'static, anyhow::Result<T>> + Send + Sync>;

/// One-shot hook run before the next transition's lifecycle pass.
pub type TransitionHook<C, R> = HookFn<C, R, ()>;

/// Box an async closure into a [`HookFn`].
pub fn hook_fn<C, R, T, F, Fut>(f: F) -> HookFn<C, R, T>
where
    F: Fn(TransitionState<C, R>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    Arc::new(move |state| Box::pin(f(state)))
}

/// Every hook a route can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HookKind {
    Validate,
    IsEnteringRoute,
    HasEnteredRoute,
    RouteIsChanging,
    RouteHasChanged,
    IsLeavingRoute,
    HasLeftRoute,
    Render,
}

impl HookKind {
    /// The six hooks fired around render.
    pub const LIFECYCLE: [HookKind; 6] = [
        HookKind::IsEnteringRoute,
        HookKind::HasEnteredRoute,
        HookKind::RouteIsChanging,
        HookKind::RouteHasChanged,
        HookKind::IsLeavingRoute,
        HookKind::HasLeftRoute,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HookKind::Validate => "validate",
            HookKind::IsEnteringRoute => "isEnteringRoute",
            HookKind::HasEnteredRoute => "hasEnteredRoute",
            HookKind::RouteIsChanging => "routeIsChanging",
            HookKind::RouteHasChanged => "routeHasChanged",
            HookKind::IsLeavingRoute => "isLeavingRoute",
            HookKind::HasLeftRoute => "hasLeftRoute",
            HookKind::Render => "render",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional hook slots of a single route.
pub struct RouteHooks<C, R> {
    pub validate: Option<HookFn<C, R, bool>>,
    pub is_entering_route: Option<HookFn<C, R, ()>>,
    pub has_entered_route: Option<HookFn<C, R, ()>>,
    pub route_is_changing: Option<HookFn<C, R, ()>>,
    pub route_has_changed: Option<HookFn<C, R, ()>>,
    pub is_leaving_route: Option<HookFn<C, R, ()>>,
    pub has_left_route: Option<HookFn<C, R, ()>>,
    pub render: Option<HookFn<C, R, R>>,
}

impl<C, R> RouteHooks<C, R> {
    /// Lifecycle slot for `kind`. `Validate` and `Render` have their own
    /// result types and are never returned here.
    pub fn lifecycle(&self, kind: HookKind) -> Option<&HookFn<C, R, ()>> {
        match kind {
            HookKind::IsEnteringRoute => self.is_entering_route.as_ref(),
            HookKind::HasEnteredRoute => self.has_entered_route.as_ref(),
            HookKind::RouteIsChanging => self.route_is_changing.as_ref(),
            HookKind::RouteHasChanged => self.route_has_changed.as_ref(),
            HookKind::IsLeavingRoute => self.is_leaving_route.as_ref(),
            HookKind::HasLeftRoute => self.has_left_route.as_ref(),
            HookKind::Validate | HookKind::Render => None,
        }
    }

    /// Fill the lifecycle slot for `kind`. Ignored for `Validate` and `Render`.
    pub fn set_lifecycle(&mut self, kind: HookKind, hook: HookFn<C, R, ()>) {
        let slot = match kind {
            HookKind::IsEnteringRoute => &mut self.is_entering_route,
            HookKind::HasEnteredRoute => &mut self.has_entered_route,
            HookKind::RouteIsChanging => &mut self.route_is_changing,
            HookKind::RouteHasChanged => &mut self.route_has_changed,
            HookKind::IsLeavingRoute => &mut self.is_leaving_route,
            HookKind::HasLeftRoute => &mut self.has_left_route,
            HookKind::Validate | HookKind::Render => return,
        };
        *slot = Some(hook);
    }

    /// Kinds with a filled slot.
    pub fn declared(&self) -> Vec<HookKind> {
        let mut kinds = Vec::new();
        if self.validate.is_some() {
            kinds.push(HookKind::Validate);
        }
        kinds.extend(
            HookKind::LIFECYCLE
                .into_iter()
                .filter(|kind| self.lifecycle(*kind).is_some()),
        );
        if self.render.is_some() {
            kinds.push(HookKind::Render);
        }
        kinds
    }
}

impl<C, R> Default for RouteHooks<C, R> {
    fn default() -> Self {
        Self {
            validate: None,
            is_entering_route: None,
            has_entered_route: None,
            route_is_changing: None,
            route_has_changed: None,
            is_leaving_route: None,
            has_left_route: None,
            render: None,
        }
    }
}

impl<C, R> Clone for RouteHooks<C, R> {
    fn clone(&self) -> Self {
        Self {
            validate: self.validate.clone(),
            is_entering_route: self.is_entering_route.clone(),
            has_entered_route: self.has_entered_route.clone(),
            route_is_changing: self.route_is_changing.clone(),
            route_has_changed: self.route_has_changed.clone(),
            is_leaving_route: self.is_leaving_route.clone(),
            has_left_route: self.has_left_route.clone(),
            render: self.render.clone(),
        }
    }
}

impl<C, R> fmt::Debug for RouteHooks<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteHooks")
            .field("declared", &self.declared())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hooks() {
        let hooks: RouteHooks<(), ()> = RouteHooks::default();
        assert!(hooks.declared().is_empty());
        for kind in HookKind::LIFECYCLE {
            assert!(hooks.lifecycle(kind).is_none());
        }
    }

    #[test]
    fn test_set_lifecycle() {
        let mut hooks: RouteHooks<(), ()> = RouteHooks::default();
        hooks.set_lifecycle(HookKind::HasLeftRoute, hook_fn(|_| async { Ok(()) }));
        hooks.set_lifecycle(HookKind::Render, hook_fn(|_| async { Ok(()) }));

        assert!(hooks.lifecycle(HookKind::HasLeftRoute).is_some());
        assert_eq!(hooks.declared(), vec![HookKind::HasLeftRoute]);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(HookKind::RouteIsChanging.to_string(), "routeIsChanging");
        assert_eq!(
            serde_json::to_string(&HookKind::HasEnteredRoute).unwrap(),
            "\"hasEnteredRoute\""
        );
    }
}
