//! A URL router that compiles placeholder patterns into chunked regex
//! alternations.
//!
//! Static paths are found by exact lookup. Patterns with placeholders are
//! bucketed by method and segment count, and each bucket is compiled into a
//! few combined regexes, so a lookup tries a handful of regexes instead of
//! one per route.
//!
//! ```
//! use chunk_router::{Action, BoxError, Params, Router};
//!
//! let mut router: Router<String> = Router::new();
//! router
//!     .get("/about", Action::callable(|_: Params| -> Result<String, BoxError> {
//!         Ok("about".into())
//!     }))
//!     .get(r"/users/{id:\d+}[/{tab}]", Action::callable(|p: Params| -> Result<String, BoxError> {
//!         Ok(format!("user {}", &p["id"]))
//!     }));
//!
//! let m = router.find("GET", "/users/42/posts").unwrap();
//! assert_eq!(m.params().get("tab"), Some("posts"));
//! assert_eq!(m.dispatch().unwrap(), "user 42");
//! assert!(router.find("GET", "/users/abc").is_none());
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod pattern;
pub mod table;

mod error;
mod params;
mod router;

#[cfg(feature = "shared")]
mod shared;

pub use self::config::{ChunkSize, RouterConfig};
pub use self::dispatch::{Action, Handler, Strategy};
pub use self::error::{BoxError, DispatchError, RouterError};
pub use self::params::Params;
pub use self::router::{Match, Outcome, Resolution, Router};
pub use self::table::{RouteOptions, SUPPORTED_METHODS};

#[cfg(feature = "shared")]
pub use self::shared::SharedRouter;

pub use http::Method;
