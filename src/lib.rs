//! # PAC Router Library
//!
//! This crate decides, per requested host, whether traffic should route
//! through a proxy or connect directly. Decisions come from a sorted
//! host index with O(log n) membership lookups, fronted by a
//! fixed-capacity LRU cache so repeated hosts skip the search entirely.
//!
//! ## Modules
//!
//! - [`cache`]: Fixed-capacity LRU cache for routing verdicts
//! - [`config`]: Configuration types, defaults, and validation
//! - [`error`]: Error types and handling
//! - [`index`]: Sorted host index with binary search lookup
//! - [`logging`]: Logging setup and configuration
//! - [`resolver`]: The routing decision engine
//!
//! ## Example
//!
//! ```
//! use pac_router::{HostResolver, RouterConfig, Verdict};
//!
//! let config = RouterConfig {
//!     hosts: vec!["blocked.example.com".to_string()],
//!     proxy: "PROXY proxy.corp:1080".to_string(),
//!     ..Default::default()
//! };
//!
//! let mut resolver = HostResolver::new(&config).unwrap();
//! assert_eq!(
//!     resolver.resolve("blocked.example.com").directive(),
//!     "PROXY proxy.corp:1080"
//! );
//! assert_eq!(resolver.resolve("other.example.com"), Verdict::Direct);
//! ```
//!
//! ## Decision Flow
//!
//! Each [`resolve`](resolver::HostResolver::resolve) call proceeds:
//!
//! 1. **Cache lookup**: a cached verdict (proxy or direct alike) is
//!    returned as-is
//! 2. **Index lookup**: on a miss, binary search over the sorted host
//!    list derives the verdict
//! 3. **Cache insert**: the fresh verdict is stored, evicting the least
//!    recently used entry when the cache is full

pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod resolver;

pub use cache::LruCache;
pub use config::{CacheConfig, LogFormat, LoggingConfig, RouterConfig};
pub use error::{Result, RouterError};
pub use index::HostIndex;
pub use resolver::{HostResolver, ResolverStats, Verdict, DIRECT};
