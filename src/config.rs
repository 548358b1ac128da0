//! Router configuration.
//!
//! Defaults suit most tables. [`RouterConfig::from_env`] reads:
//!
//! - `CHUNK_ROUTER_EAGER`: `1`, `true` or `yes` compiles every regex bucket
//!   as routes are registered instead of on first match.
//! - `CHUNK_ROUTER_CHUNK_SIZE`: a positive integer pins the number of routes
//!   per combined regex. Unset or invalid values keep the heuristic.

use crate::pattern::Wildcards;

use std::env;

pub const ENV_EAGER: &str = "CHUNK_ROUTER_EAGER";
pub const ENV_CHUNK_SIZE: &str = "CHUNK_ROUTER_CHUNK_SIZE";

/// How many dynamic routes share one combined regex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkSize {
    /// `round(1 + 2.33 * ln(n))` for a bucket of `n` routes.
    #[default]
    Auto,
    Fixed(usize),
}

impl ChunkSize {
    pub fn for_bucket(self, n: usize) -> usize {
        match self {
            Self::Auto => {
                if n == 0 {
                    return 1;
                }
                let size = (1.0 + 2.33 * (n as f64).ln()).round() as usize;
                size.max(1)
            }
            Self::Fixed(size) => size.max(1),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouterConfig {
    pub eager_compile: bool,
    pub chunk_size: ChunkSize,
    pub wildcards: Wildcards,
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let eager_compile = match env::var(ENV_EAGER) {
            Ok(val) => matches!(val.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => false,
        };
        let chunk_size = match env::var(ENV_CHUNK_SIZE) {
            Ok(val) => match val.trim().parse::<usize>() {
                Ok(n) if n > 0 => ChunkSize::Fixed(n),
                _ => ChunkSize::Auto,
            },
            Err(_) => ChunkSize::Auto,
        };
        Self {
            eager_compile,
            chunk_size,
            wildcards: Wildcards::new(),
        }
    }

    pub fn eager_compile(mut self, eager: bool) -> Self {
        self.eager_compile = eager;
        self
    }

    pub fn chunk_size(mut self, size: ChunkSize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_wildcard(mut self, name: &str, regex: &str) -> Self {
        self.wildcards.set(name, regex);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_sizes() {
        let auto = ChunkSize::Auto;
        assert_eq!(auto.for_bucket(0), 1);
        assert_eq!(auto.for_bucket(1), 1);
        assert_eq!(auto.for_bucket(2), 3);
        assert_eq!(auto.for_bucket(8), 6);
        assert_eq!(auto.for_bucket(100), 12);
        assert_eq!(ChunkSize::Fixed(0).for_bucket(10), 1);
        assert_eq!(ChunkSize::Fixed(4).for_bucket(10), 4);
    }

    #[test]
    fn builder() {
        let c = RouterConfig::new()
            .eager_compile(true)
            .chunk_size(ChunkSize::Fixed(2))
            .with_wildcard("slug", "[a-z-]+");
        assert!(c.eager_compile);
        assert_eq!(c.chunk_size, ChunkSize::Fixed(2));
        assert_eq!(c.wildcards.get("slug"), Some("[a-z-]+"));
    }
}
