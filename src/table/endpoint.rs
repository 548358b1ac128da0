use crate::dispatch::{Action, Strategy};

use std::fmt;
use std::sync::Arc;

/// Per-route settings supplied at registration.
pub struct RouteOptions<R> {
    pub(crate) defaults: Vec<(Arc<str>, String)>,
    pub(crate) strategy: Option<Arc<dyn Strategy<R>>>,
}

impl<R> Default for RouteOptions<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> RouteOptions<R> {
    pub fn new() -> Self {
        Self {
            defaults: Vec::new(),
            strategy: None,
        }
    }

    /// Value used for `name` when the matched path does not capture it,
    /// typically a placeholder inside an optional block.
    pub fn default_param(mut self, name: &str, value: &str) -> Self {
        self.defaults.push((name.into(), value.to_owned()));
        self
    }

    /// Overrides the router's dispatch strategy for this route.
    pub fn strategy(mut self, strategy: impl Strategy<R> + 'static) -> Self {
        self.strategy = Some(Arc::new(strategy));
        self
    }
}

impl<R> fmt::Debug for RouteOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteOptions")
            .field("defaults", &self.defaults)
            .field("strategy", &self.strategy.is_some())
            .finish()
    }
}

/// A registered action together with the pattern it came from.
pub struct Endpoint<R> {
    pub(super) id: usize,
    pub(super) pattern: Arc<str>,
    pub(super) action: Action<R>,
    pub(super) options: Arc<RouteOptions<R>>,
}

impl<R> Endpoint<R> {
    /// Registration sequence number, shared by every expansion of a pattern.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The pattern as registered, before optional expansion.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn action(&self) -> &Action<R> {
        &self.action
    }

    pub fn options(&self) -> &RouteOptions<R> {
        &self.options
    }
}

impl<R> Clone for Endpoint<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            pattern: Arc::clone(&self.pattern),
            action: self.action.clone(),
            options: Arc::clone(&self.options),
        }
    }
}

impl<R> fmt::Debug for Endpoint<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("id", &self.id)
            .field("pattern", &self.pattern)
            .field("action", &self.action)
            .finish()
    }
}
