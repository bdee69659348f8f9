//! Bounded render cache.

use std::{num::NonZeroUsize, sync::Arc};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

use crate::{Renderer, Result};

/// Memoizes a [`Renderer`] by a digest of its input.
///
/// The cache is owned by the instance and holds at most `capacity` entries,
/// evicting the least recently used. Failed renders are not cached.
pub struct CachedRenderer<R> {
    inner: R,
    entries: Mutex<LruCache<blake3::Hash, Arc<str>>>,
}

impl<R: Renderer> CachedRenderer<R> {
    /// Wrap `inner` with a cache holding up to `capacity` results.
    ///
    /// Returns `None` for a zero capacity.
    pub fn new(inner: R, capacity: usize) -> Option<Self> {
        let capacity = NonZeroUsize::new(capacity)?;
        Some(Self {
            inner,
            entries: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<R: Renderer> Renderer for CachedRenderer<R> {
    fn render(&self, source: &str) -> Result<String> {
        let key = blake3::hash(source.as_bytes());

        if let Some(hit) = self.entries.lock().get(&key) {
            trace!(key = %key.to_hex(), "render cache hit");
            return Ok(hit.to_string());
        }

        // Rendered outside the lock; a concurrent miss on the same key only
        // repeats the work.
        let html = self.inner.render(source)?;
        self.entries.lock().put(key, Arc::from(html.as_str()));
        Ok(html)
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for CachedRenderer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedRenderer")
            .field("inner", &self.inner)
            .field("len", &self.entries.lock().len())
            .finish()
    }
}
