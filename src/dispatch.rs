//! Turning a matched action into a call.

mod controller;
mod strategy;

pub use self::controller::{Container, Controller, Controllers, Injector};
pub use self::strategy::{InjectorStrategy, StaticStrategy, UriStrategy};

use crate::error::BoxError;
use crate::params::Params;

use std::fmt;
use std::sync::Arc;

/// Separator of the `"Class#method"` action form.
pub const METHOD_SEPARATOR: char = '#';

/// Method name used when an action string has no separator.
pub const DEFAULT_METHOD: &str = "invoke";

pub trait Handler<R>: Send + Sync {
    fn call(&self, params: Params) -> Result<R, BoxError>;
}

impl<R, F, E> Handler<R> for F
where
    F: Fn(Params) -> Result<R, E> + Send + Sync,
    E: Into<BoxError>,
{
    fn call(&self, params: Params) -> Result<R, BoxError> {
        (self)(params).map_err(Into::into)
    }
}

/// What a route resolves to.
pub enum Action<R> {
    Callable(Arc<dyn Handler<R>>),
    Method { class: Arc<str>, method: Arc<str> },
}

impl<R> Action<R> {
    pub fn callable(h: impl Handler<R> + 'static) -> Self {
        Self::Callable(Arc::new(h))
    }

    pub fn method(class: &str, method: &str) -> Self {
        Self::Method {
            class: class.into(),
            method: method.into(),
        }
    }

    pub fn is_callable(&self) -> bool {
        match self {
            Self::Callable(_) => true,
            Self::Method { .. } => false,
        }
    }
}

impl<R> Clone for Action<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Callable(h) => Self::Callable(Arc::clone(h)),
            Self::Method { class, method } => Self::Method {
                class: Arc::clone(class),
                method: Arc::clone(method),
            },
        }
    }
}

impl<R> fmt::Debug for Action<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callable(_) => f.write_str("Callable"),
            Self::Method { class, method } => write!(f, "{}{}{}", class, METHOD_SEPARATOR, method),
        }
    }
}

impl<R> From<&str> for Action<R> {
    fn from(s: &str) -> Self {
        match s.split_once(METHOD_SEPARATOR) {
            Some((class, method)) => Self::method(class, method),
            None => Self::method(s, DEFAULT_METHOD),
        }
    }
}

impl<R> From<String> for Action<R> {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl<R> From<(&str, &str)> for Action<R> {
    fn from((class, method): (&str, &str)) -> Self {
        Self::method(class, method)
    }
}

/// Invocation policy for matched actions.
///
/// Errors returned by the action itself must be passed through unchanged.
pub trait Strategy<R>: Send + Sync {
    fn dispatch(&self, action: &Action<R>, params: Params) -> Result<R, BoxError>;
}

impl<R, S: Strategy<R> + ?Sized> Strategy<R> for Arc<S> {
    fn dispatch(&self, action: &Action<R>, params: Params) -> Result<R, BoxError> {
        Strategy::dispatch(&**self, action, params)
    }
}
