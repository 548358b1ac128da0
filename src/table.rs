mod chunk;
mod endpoint;

pub use self::chunk::Chunk;
pub use self::endpoint::{Endpoint, RouteOptions};

use crate::config::ChunkSize;
use crate::dispatch::Action;
use crate::error::RouterError;
use crate::pattern::{compile_placeholders, expand_optionals, is_static, pattern_offset, Compiled, Wildcards};

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use http::Method;
use tracing::{debug, warn};

/// Methods accepted at registration.
pub static SUPPORTED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

/// Case-insensitive lookup in [`SUPPORTED_METHODS`].
pub fn parse_method(method: &str) -> Option<Method> {
    SUPPORTED_METHODS
        .iter()
        .find(|m| m.as_str().eq_ignore_ascii_case(method))
        .cloned()
}

/// A route with at least one placeholder.
#[derive(Debug)]
pub struct DynamicRoute<R> {
    concrete: Box<str>,
    compiled: Compiled,
    names: Arc<[Arc<str>]>,
    endpoint: Endpoint<R>,
}

impl<R> DynamicRoute<R> {
    /// The expanded pattern this route was compiled from.
    pub fn concrete(&self) -> &str {
        &self.concrete
    }

    pub fn compiled(&self) -> &Compiled {
        &self.compiled
    }

    pub fn names(&self) -> &[Arc<str>] {
        &self.names
    }

    pub fn endpoint(&self) -> &Endpoint<R> {
        &self.endpoint
    }
}

#[derive(Debug)]
struct Bucket<R> {
    routes: Vec<DynamicRoute<R>>,
    chunks: OnceLock<Result<Vec<Chunk>, regex::Error>>,
}

impl<R> Bucket<R> {
    fn new() -> Self {
        Self {
            routes: Vec::new(),
            chunks: OnceLock::new(),
        }
    }

    fn chunks(&self, method: &Method, offset: usize, chunk_size: ChunkSize) -> &Result<Vec<Chunk>, regex::Error> {
        self.chunks.get_or_init(|| {
            let size = chunk_size.for_bucket(self.routes.len());
            let ret = chunk::compile_bucket(&self.routes, size);
            match ret {
                Ok(ref chunks) => debug!(
                    %method,
                    offset,
                    routes = self.routes.len(),
                    chunk_size = size,
                    chunks = chunks.len(),
                    "compiled route bucket"
                ),
                Err(ref e) => warn!(%method, offset, error = %e, "failed to compile route bucket"),
            }
            ret
        })
    }
}

enum Concrete {
    Static(String),
    Dynamic {
        concrete: String,
        offset: usize,
        compiled: Compiled,
    },
}

/// Static index plus dynamic buckets keyed by method and segment offset.
#[derive(Debug)]
pub struct RouteTable<R> {
    statics: HashMap<Method, HashMap<Box<str>, Endpoint<R>>>,
    dynamics: HashMap<Method, BTreeMap<usize, Bucket<R>>>,
    chunk_size: ChunkSize,
    next_id: usize,
}

impl<R> Default for RouteTable<R> {
    fn default() -> Self {
        Self::new(ChunkSize::Auto)
    }
}

impl<R> RouteTable<R> {
    pub fn new(chunk_size: ChunkSize) -> Self {
        Self {
            statics: HashMap::new(),
            dynamics: HashMap::new(),
            chunk_size,
            next_id: 0,
        }
    }

    /// Registers every expansion of `pattern`. Nothing is inserted unless all
    /// expansions are valid.
    pub fn register(
        &mut self,
        method: &str,
        pattern: &str,
        action: Action<R>,
        options: Arc<RouteOptions<R>>,
        wildcards: &Wildcards,
    ) -> Result<usize, RouterError> {
        let method = parse_method(method)
            .ok_or_else(|| RouterError::UnsupportedHttpMethod(method.to_owned()))?;

        let mut parsed: Vec<Concrete> = Vec::new();
        for concrete in expand_optionals(pattern)? {
            if is_static(&concrete) {
                parsed.push(Concrete::Static(concrete));
            } else {
                let compiled = compile_placeholders(&concrete, wildcards)?;
                chunk::check_route(&compiled)?;
                let offset = pattern_offset(&concrete)?;
                parsed.push(Concrete::Dynamic {
                    concrete,
                    offset,
                    compiled,
                });
            }
        }

        let id = self.next_id;
        self.next_id += 1;

        let endpoint = Endpoint {
            id,
            pattern: pattern.into(),
            action,
            options,
        };

        for c in parsed {
            match c {
                Concrete::Static(path) => {
                    debug!(%method, path = %path, "static route");
                    self.statics
                        .entry(method.clone())
                        .or_default()
                        .insert(path.into(), endpoint.clone());
                }
                Concrete::Dynamic {
                    concrete,
                    offset,
                    compiled,
                } => {
                    debug!(%method, pattern = %concrete, offset, "dynamic route");
                    let names: Arc<[Arc<str>]> = compiled.names().iter().map(|n| Arc::from(&**n)).collect();
                    let bucket = self
                        .dynamics
                        .entry(method.clone())
                        .or_default()
                        .entry(offset)
                        .or_insert_with(Bucket::new);
                    bucket.routes.push(DynamicRoute {
                        concrete: concrete.into(),
                        compiled,
                        names,
                        endpoint: endpoint.clone(),
                    });
                    bucket.chunks = OnceLock::new();
                }
            }
        }

        Ok(id)
    }

    pub fn static_route(&self, method: &Method, path: &str) -> Option<&Endpoint<R>> {
        self.statics.get(method)?.get(path)
    }

    pub fn dynamic_routes(&self, method: &Method, offset: usize) -> &[DynamicRoute<R>] {
        match self.dynamics.get(method).and_then(|m| m.get(&offset)) {
            Some(b) => &b.routes,
            None => &[],
        }
    }

    /// Compiled chunks of a bucket, built on first access.
    ///
    /// `None` when the bucket is empty or failed to compile. Every route was
    /// compiled on its own at registration and a rejected chunk is split into
    /// single-route chunks, so the latter does not happen for routes that
    /// registered successfully.
    pub fn chunks(&self, method: &Method, offset: usize) -> Option<&[Chunk]> {
        let bucket = self.dynamics.get(method)?.get(&offset)?;
        match bucket.chunks(method, offset, self.chunk_size) {
            Ok(chunks) => Some(chunks.as_slice()),
            Err(_) => None,
        }
    }

    /// Compiles every bucket that is not compiled yet.
    pub fn compile_all(&self) -> Result<(), RouterError> {
        for (method, buckets) in &self.dynamics {
            for (&offset, bucket) in buckets {
                if let Err(e) = bucket.chunks(method, offset, self.chunk_size) {
                    return Err(RouterError::Regex(e.clone()));
                }
            }
        }
        Ok(())
    }

    /// Number of concrete routes, static and dynamic.
    pub fn len(&self) -> usize {
        let statics: usize = self.statics.values().map(HashMap::len).sum();
        let dynamics: usize = self
            .dynamics
            .values()
            .flat_map(BTreeMap::values)
            .map(|b| b.routes.len())
            .sum();
        statics + dynamics
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }
}
