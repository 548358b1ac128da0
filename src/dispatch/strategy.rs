use super::controller::{Controllers, Injector};
use super::{Action, Strategy};

use crate::error::{BoxError, DispatchError};
use crate::params::Params;

use std::fmt;
use std::sync::Arc;

/// Calls closures and free functions only.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticStrategy;

impl<R> Strategy<R> for StaticStrategy {
    fn dispatch(&self, action: &Action<R>, params: Params) -> Result<R, BoxError> {
        match action {
            Action::Callable(h) => h.call(params),
            Action::Method { .. } => Err(DispatchError::NotCallable(format!("{:?}", action)).into()),
        }
    }
}

/// Builds a fresh controller per call from its zero-argument constructor.
pub struct UriStrategy<R> {
    controllers: Controllers<R>,
}

impl<R> UriStrategy<R> {
    pub fn new(controllers: Controllers<R>) -> Self {
        Self { controllers }
    }

    pub fn controllers(&self) -> &Controllers<R> {
        &self.controllers
    }
}

impl<R> fmt::Debug for UriStrategy<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UriStrategy")
            .field("controllers", &self.controllers)
            .finish()
    }
}

impl<R> Strategy<R> for UriStrategy<R> {
    fn dispatch(&self, action: &Action<R>, params: Params) -> Result<R, BoxError> {
        match action {
            Action::Callable(h) => h.call(params),
            Action::Method { class, method } => {
                let controller = self.controllers.build(class)?;
                controller.call(method, params)
            }
        }
    }
}

/// Hands construction and invocation to an [`Injector`].
pub struct InjectorStrategy<R> {
    injector: Arc<dyn Injector<R>>,
    shared: bool,
}

impl<R> InjectorStrategy<R> {
    pub fn new(injector: impl Injector<R> + 'static) -> Self {
        Self {
            injector: Arc::new(injector),
            shared: false,
        }
    }

    /// Reuse one instance per class across calls.
    pub fn shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }
}

impl<R> Strategy<R> for InjectorStrategy<R> {
    fn dispatch(&self, action: &Action<R>, params: Params) -> Result<R, BoxError> {
        match action {
            Action::Callable(h) => h.call(params),
            Action::Method { class, method } => {
                self.injector.invoke(class, method, params, self.shared)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Container, Controller};

    #[derive(Default)]
    struct Greeter;

    impl Controller<String> for Greeter {
        fn call(&self, method: &str, params: Params) -> Result<String, BoxError> {
            match method {
                "hello" => Ok(format!("hello {}", params.get("name").unwrap_or("nobody"))),
                _ => Err(DispatchError::UnknownMethod {
                    class: "Greeter".into(),
                    method: method.into(),
                }
                .into()),
            }
        }
    }

    fn params() -> Params {
        vec![("name", "ann")].into_iter().collect()
    }

    fn controllers() -> Controllers<String> {
        let mut c = Controllers::new();
        c.add::<Greeter>("Greeter");
        c
    }

    #[test]
    fn static_rejects_methods() {
        let err = StaticStrategy
            .dispatch(&Action::<String>::from("Greeter#hello"), params())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::NotCallable(_))
        ));
    }

    #[test]
    fn uri_builds_controllers() {
        let s = UriStrategy::new(controllers());
        let out = s.dispatch(&Action::from("Greeter#hello"), params()).unwrap();
        assert_eq!(out, "hello ann");

        let err = s.dispatch(&Action::from("Missing#hello"), params()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::UnknownClass(_))
        ));
    }

    #[test]
    fn injector_delegates() {
        let s = InjectorStrategy::new(Container::new(controllers())).shared(true);
        let out = s.dispatch(&Action::from(("Greeter", "hello")), params()).unwrap();
        assert_eq!(out, "hello ann");
    }
}
