//! Routing decision logic.
//!
//! This module implements the decision priority:
//! 1. Cached verdict (if caching is enabled)
//! 2. Sorted host index membership test
//!
//! A host found in the index routes through the configured proxy
//! directive; everything else goes direct. Fresh verdicts are inserted
//! into the cache, evicting the least recently used entry when full.

use crate::cache::LruCache;
use crate::config::{CacheConfig, RouterConfig};
use crate::error::Result;
use crate::index::HostIndex;
use std::fmt;
use tracing::{debug, trace};

/// Directive returned for hosts that connect directly.
pub const DIRECT: &str = "DIRECT";

/// Result of a routing decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Route through the proxy with the given directive string.
    Proxy(String),

    /// Connect directly.
    Direct,
}

impl Verdict {
    /// The directive string handed back to the calling environment.
    pub fn directive(&self) -> &str {
        match self {
            Verdict::Proxy(directive) => directive,
            Verdict::Direct => DIRECT,
        }
    }

    /// Returns true for the direct-connection verdict.
    pub fn is_direct(&self) -> bool {
        matches!(self, Verdict::Direct)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive())
    }
}

/// Counters over the decision paths taken so far.
///
/// Hits and misses partition the calls to [`HostResolver::resolve`];
/// `index_lookups` counts binary searches actually run, so a cached
/// verdict served without re-searching is observable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Decisions served from the cache.
    pub cache_hits: u64,

    /// Decisions that had to consult the index.
    pub cache_misses: u64,

    /// Binary searches executed against the host index.
    pub index_lookups: u64,
}

/// Routing decision engine: host index plus optional verdict cache.
///
/// `resolve` takes `&mut self`; the resolver is built for one decision
/// at a time. Concurrent callers need external mutual exclusion around
/// the whole resolver, since the cache's map and recency list must
/// mutate together.
pub struct HostResolver {
    /// Sorted host index consulted on cache misses.
    index: HostIndex,

    /// Verdict cache; `None` when caching is disabled.
    cache: Option<LruCache<String, Verdict>>,

    /// Proxy directive for hosts found in the index.
    proxy: String,

    /// Decision path counters.
    stats: ResolverStats,
}

impl HostResolver {
    /// Creates a resolver from a validated configuration.
    ///
    /// The configured host list is sorted and de-duplicated here; the
    /// index never changes afterwards.
    pub fn new(config: &RouterConfig) -> Result<Self> {
        config.validate()?;
        Self::with_index(config.build_host_index(), config.proxy.clone(), &config.cache)
    }

    /// Creates a resolver around a prebuilt index, for integrators that
    /// maintain their own sorted host list.
    pub fn with_index(
        index: HostIndex,
        proxy: impl Into<String>,
        cache: &CacheConfig,
    ) -> Result<Self> {
        let cache = if cache.enabled {
            Some(LruCache::new(cache.capacity, cache.touch_on_get)?)
        } else {
            None
        };

        Ok(Self {
            index,
            cache,
            proxy: proxy.into(),
            stats: ResolverStats::default(),
        })
    }

    /// Decides the route for `host`.
    ///
    /// Hosts are compared byte-wise against the index; callers that want
    /// case-insensitive matching normalize before the index is built and
    /// before each call. Never fails: an unknown host is simply
    /// [`Verdict::Direct`].
    pub fn resolve(&mut self, host: &str) -> Verdict {
        if let Some(cache) = self.cache.as_mut() {
            let key = host.to_string();

            if let Some(verdict) = cache.get(&key) {
                self.stats.cache_hits += 1;
                trace!(host = %host, verdict = %verdict, "Serving cached verdict");
                return verdict.clone();
            }

            self.stats.cache_misses += 1;
            self.stats.index_lookups += 1;
            let verdict = decide(&self.index, &self.proxy, host);
            cache.put(key, verdict.clone());
            return verdict;
        }

        self.stats.cache_misses += 1;
        self.stats.index_lookups += 1;
        decide(&self.index, &self.proxy, host)
    }

    /// Decision path counters accumulated so far.
    pub fn stats(&self) -> ResolverStats {
        self.stats
    }

    /// Resets the decision path counters to zero.
    pub fn reset_stats(&mut self) {
        self.stats = ResolverStats::default();
    }

    /// The sorted host index backing this resolver.
    pub fn index(&self) -> &HostIndex {
        &self.index
    }

    /// Number of currently cached verdicts, if caching is enabled.
    pub fn cached_decisions(&self) -> Option<usize> {
        self.cache.as_ref().map(|c| c.len())
    }
}

/// Runs the index membership test and derives the verdict.
fn decide(index: &HostIndex, proxy: &str, host: &str) -> Verdict {
    if index.contains(host) {
        debug!(host = %host, "Host in index, routing through proxy");
        Verdict::Proxy(proxy.to_string())
    } else {
        debug!(host = %host, "Host not in index, connecting direct");
        Verdict::Direct
    }
}
