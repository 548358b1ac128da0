use crate::error::{BoxError, DispatchError};
use crate::params::Params;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::debug;

/// An object whose methods are reachable by name.
///
/// Implementors map `method` to their own functions explicitly and should
/// answer unknown names with [`DispatchError::UnknownMethod`].
pub trait Controller<R>: Send + Sync {
    fn call(&self, method: &str, params: Params) -> Result<R, BoxError>;
}

type Factory<R> = Arc<dyn Fn() -> Box<dyn Controller<R>> + Send + Sync>;

/// Zero-argument constructors keyed by class identifier.
pub struct Controllers<R> {
    factories: HashMap<Box<str>, Factory<R>>,
}

impl<R> Default for Controllers<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Controllers<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

impl<R> Controllers<R> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers `C::default` as the constructor of `class`.
    pub fn add<C>(&mut self, class: &str) -> &mut Self
    where
        C: Controller<R> + Default + 'static,
    {
        self.add_with(class, C::default)
    }

    pub fn add_with<C, F>(&mut self, class: &str, f: F) -> &mut Self
    where
        C: Controller<R> + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let factory: Factory<R> = Arc::new(move || Box::new(f()) as Box<dyn Controller<R>>);
        self.factories.insert(class.into(), factory);
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.factories.contains_key(class)
    }

    /// Builds a fresh instance of `class`.
    pub fn build(&self, class: &str) -> Result<Box<dyn Controller<R>>, DispatchError> {
        match self.factories.get(class) {
            Some(f) => Ok(f()),
            None => Err(DispatchError::UnknownClass(class.to_owned())),
        }
    }
}

/// Builds controllers and invokes their methods on behalf of
/// [`InjectorStrategy`](super::InjectorStrategy).
pub trait Injector<R>: Send + Sync {
    fn invoke(&self, class: &str, method: &str, params: Params, shared: bool) -> Result<R, BoxError>;
}

/// Minimal injector: per-call instances, or one cached instance per class
/// when `shared` is requested.
pub struct Container<R> {
    controllers: Controllers<R>,
    singletons: Mutex<HashMap<Box<str>, Arc<dyn Controller<R>>>>,
}

impl<R> Container<R> {
    pub fn new(controllers: Controllers<R>) -> Self {
        Self {
            controllers,
            singletons: Mutex::new(HashMap::new()),
        }
    }

    fn singleton(&self, class: &str) -> Result<Arc<dyn Controller<R>>, DispatchError> {
        let mut map = self.singletons.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(c) = map.get(class) {
            return Ok(Arc::clone(c));
        }
        let c: Arc<dyn Controller<R>> = Arc::from(self.controllers.build(class)?);
        debug!(class, "shared controller instance created");
        map.insert(class.into(), Arc::clone(&c));
        Ok(c)
    }
}

impl<R> Injector<R> for Container<R> {
    fn invoke(&self, class: &str, method: &str, params: Params, shared: bool) -> Result<R, BoxError> {
        if shared {
            let c = self.singleton(class)?;
            c.call(method, params)
        } else {
            let c = self.controllers.build(class)?;
            c.call(method, params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static BUILT: AtomicUsize = AtomicUsize::new(0);

    struct Counter;

    impl Controller<usize> for Counter {
        fn call(&self, method: &str, _: Params) -> Result<usize, BoxError> {
            match method {
                "built" => Ok(BUILT.load(Ordering::SeqCst)),
                _ => Err(DispatchError::UnknownMethod {
                    class: "Counter".into(),
                    method: method.into(),
                }
                .into()),
            }
        }
    }

    #[test]
    fn shared_instances_are_cached() {
        let mut controllers: Controllers<usize> = Controllers::new();
        controllers.add_with("Counter", || {
            BUILT.fetch_add(1, Ordering::SeqCst);
            Counter
        });
        let container = Container::new(controllers);

        let first = container.invoke("Counter", "built", Params::new(), true).unwrap();
        let second = container.invoke("Counter", "built", Params::new(), true).unwrap();
        assert_eq!(first, second);

        let fresh = container.invoke("Counter", "built", Params::new(), false).unwrap();
        assert_eq!(fresh, first + 1);

        let err = container.invoke("Nope", "x", Params::new(), false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::UnknownClass(_))
        ));
    }
}
