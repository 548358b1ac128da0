use crate::config::RouterConfig;
use crate::dispatch::{Action, StaticStrategy, Strategy};
use crate::error::{BoxError, RouterError};
use crate::params::Params;
use crate::pattern::segment_offset;
use crate::table::{parse_method, Endpoint, RouteOptions, RouteTable, SUPPORTED_METHODS};

use std::fmt;
use std::sync::Arc;

use http::Method;
use tracing::trace;

/// Registrar and matcher over a [`RouteTable`].
///
/// Routes are added through `&mut self`; matching only needs `&self` and is
/// safe from many threads at once.
pub struct Router<R> {
    table: RouteTable<R>,
    config: RouterConfig,
    strategy: Arc<dyn Strategy<R>>,
    prefix: String,
}

/// A successful match.
pub struct Match<'r, R> {
    endpoint: &'r Endpoint<R>,
    strategy: &'r dyn Strategy<R>,
    params: Params,
}

/// Outcome of [`Router::resolve`].
pub enum Resolution<'r, R> {
    Found(Match<'r, R>),
    /// The path matches under other methods only.
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// Outcome of [`Router::dispatch`].
pub enum Outcome<R> {
    /// The action ran; its error, if any, is returned unchanged.
    Called(Result<R, BoxError>),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

impl<R> Default for Router<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Router<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<R> Router<R> {
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            table: RouteTable::new(config.chunk_size),
            config,
            strategy: Arc::new(StaticStrategy),
            prefix: String::new(),
        }
    }

    /// Sets the strategy used by routes without their own.
    pub fn set_strategy(&mut self, strategy: impl Strategy<R> + 'static) -> &mut Self {
        self.strategy = Arc::new(strategy);
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn table(&self) -> &RouteTable<R> {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn register(&mut self, method: &str, pattern: &str, action: impl Into<Action<R>>) -> &mut Self {
        if let Err(e) = self.try_register(method, pattern, action) {
            panic!("{}", e);
        }
        self
    }

    pub fn try_register(
        &mut self,
        method: &str,
        pattern: &str,
        action: impl Into<Action<R>>,
    ) -> Result<&mut Self, RouterError> {
        self.try_register_with(method, pattern, action, RouteOptions::new())
    }

    pub fn register_with(
        &mut self,
        method: &str,
        pattern: &str,
        action: impl Into<Action<R>>,
        options: RouteOptions<R>,
    ) -> &mut Self {
        if let Err(e) = self.try_register_with(method, pattern, action, options) {
            panic!("{}", e);
        }
        self
    }

    pub fn try_register_with(
        &mut self,
        method: &str,
        pattern: &str,
        action: impl Into<Action<R>>,
        options: RouteOptions<R>,
    ) -> Result<&mut Self, RouterError> {
        self.try_map_with(&[method], pattern, action, options)
    }

    /// Registers one action under several methods.
    pub fn map(&mut self, methods: &[&str], pattern: &str, action: impl Into<Action<R>>) -> &mut Self {
        if let Err(e) = self.try_map(methods, pattern, action) {
            panic!("{}", e);
        }
        self
    }

    pub fn try_map(
        &mut self,
        methods: &[&str],
        pattern: &str,
        action: impl Into<Action<R>>,
    ) -> Result<&mut Self, RouterError> {
        self.try_map_with(methods, pattern, action, RouteOptions::new())
    }

    /// Registers under every supported method.
    pub fn any(&mut self, pattern: &str, action: impl Into<Action<R>>) -> &mut Self {
        let methods: Vec<&str> = SUPPORTED_METHODS.iter().map(Method::as_str).collect();
        self.map(&methods, pattern, action)
    }

    /// Registers the routes added by `f` under `prefix`.
    pub fn group(&mut self, prefix: &str, f: impl FnOnce(&mut Router<R>)) -> &mut Self {
        let saved = self.prefix.len();
        self.prefix.push_str(prefix);
        f(self);
        self.prefix.truncate(saved);
        self
    }

    /// Compiles every pending regex bucket now instead of on first match.
    pub fn compile(&self) -> Result<(), RouterError> {
        self.table.compile_all()
    }

    fn try_map_with(
        &mut self,
        methods: &[&str],
        pattern: &str,
        action: impl Into<Action<R>>,
        options: RouteOptions<R>,
    ) -> Result<&mut Self, RouterError> {
        if let Some(m) = methods.iter().find(|m| parse_method(m).is_none()) {
            return Err(RouterError::UnsupportedHttpMethod((*m).to_owned()));
        }

        let full: String;
        let pattern = if self.prefix.is_empty() {
            pattern
        } else {
            full = format!("{}{}", self.prefix, pattern);
            &full
        };

        let action = action.into();
        let options = Arc::new(options);
        // method-independent checks fail on the first method, before any insert
        for m in methods {
            self.table.register(
                m,
                pattern,
                action.clone(),
                Arc::clone(&options),
                &self.config.wildcards,
            )?;
        }

        // cannot fail for routes accepted above
        if self.config.eager_compile {
            self.table.compile_all()?;
        }
        Ok(self)
    }
}

macro_rules! define_method {
    ($name:tt, $method:tt) => {
        pub fn $name(&mut self, pattern: &str, action: impl Into<Action<R>>) -> &mut Self {
            self.register($method, pattern, action)
        }
    };
}

impl<R> Router<R> {
    define_method!(get, "get");
    define_method!(post, "post");
    define_method!(put, "put");
    define_method!(patch, "patch");
    define_method!(delete, "delete");
}

impl<R> Router<R> {
    /// Matches `path` under `method`, which is compared case-insensitively.
    /// Unsupported methods never match.
    pub fn find(&self, method: &str, path: &str) -> Option<Match<'_, R>> {
        let method = parse_method(method)?;
        self.find_method(&method, path)
    }

    pub fn find_method(&self, method: &Method, path: &str) -> Option<Match<'_, R>> {
        if let Some(endpoint) = self.table.static_route(method, path) {
            trace!(%method, path, id = endpoint.id(), "static match");
            return Some(self.make_match(endpoint, Params::new()));
        }

        let offset = segment_offset(path);
        let chunks = self.table.chunks(method, offset)?;
        let routes = self.table.dynamic_routes(method, offset);

        for chunk in chunks {
            if let Some((idx, values)) = chunk.find(path) {
                let route = &routes[idx];
                let mut params = Params::new();
                for (name, value) in route.names().iter().zip(values) {
                    params.push(Arc::clone(name), value.to_owned());
                }
                trace!(%method, path, id = route.endpoint().id(), "dynamic match");
                return Some(self.make_match(route.endpoint(), params));
            }
        }

        trace!(%method, path, offset, "no match");
        None
    }

    /// Supported methods under which `path` matches.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        SUPPORTED_METHODS
            .iter()
            .filter(|m| self.find_method(m, path).is_some())
            .cloned()
            .collect()
    }

    pub fn resolve(&self, method: &str, path: &str) -> Resolution<'_, R> {
        if let Some(m) = self.find(method, path) {
            return Resolution::Found(m);
        }
        let allowed = self.allowed_methods(path);
        if allowed.is_empty() {
            Resolution::NotFound
        } else {
            Resolution::MethodNotAllowed(allowed)
        }
    }

    /// Resolves and invokes the matched action.
    pub fn dispatch(&self, method: &str, path: &str) -> Outcome<R> {
        match self.resolve(method, path) {
            Resolution::Found(m) => Outcome::Called(m.dispatch()),
            Resolution::MethodNotAllowed(allowed) => Outcome::MethodNotAllowed(allowed),
            Resolution::NotFound => Outcome::NotFound,
        }
    }

    fn make_match<'r>(&'r self, endpoint: &'r Endpoint<R>, mut params: Params) -> Match<'r, R> {
        let options = endpoint.options();
        for (name, value) in &options.defaults {
            params.push_default(name, value);
        }
        let strategy: &dyn Strategy<R> = match options.strategy {
            Some(ref s) => &**s,
            None => &*self.strategy,
        };
        Match {
            endpoint,
            strategy,
            params,
        }
    }
}

impl<'r, R> Match<'r, R> {
    pub fn endpoint(&self) -> &'r Endpoint<R> {
        self.endpoint
    }

    pub fn action(&self) -> &'r Action<R> {
        self.endpoint.action()
    }

    /// Registration id of the matched route.
    pub fn id(&self) -> usize {
        self.endpoint.id()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_params(self) -> Params {
        self.params
    }

    /// Invokes the action through the route's strategy, or the router's.
    pub fn dispatch(self) -> Result<R, BoxError> {
        self.strategy.dispatch(self.endpoint.action(), self.params)
    }
}

impl<R> fmt::Debug for Match<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("endpoint", self.endpoint)
            .field("params", &self.params)
            .finish()
    }
}

impl<R> fmt::Debug for Resolution<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(m) => f.debug_tuple("Found").field(m).finish(),
            Self::MethodNotAllowed(a) => f.debug_tuple("MethodNotAllowed").field(a).finish(),
            Self::NotFound => f.write_str("NotFound"),
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for Outcome<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Called(r) => f.debug_tuple("Called").field(r).finish(),
            Self::MethodNotAllowed(a) => f.debug_tuple("MethodNotAllowed").field(a).finish(),
            Self::NotFound => f.write_str("NotFound"),
        }
    }
}
