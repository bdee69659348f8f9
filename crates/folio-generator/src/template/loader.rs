//! Template lookup by name.

use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};

use folio_core::Config;
use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use super::{defaults, render::Template};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TemplateKey {
    File(PathBuf),
    Builtin(String),
}

/// Resolves template names to template text.
///
/// A project file `<dir>/<name>.html` wins over the built-in default of the
/// same name. A name with neither yields an empty template and a warning.
/// Loads are memoized by resolved location in a bounded cache owned by the
/// loader; entries are never invalidated for the loader's lifetime.
pub struct TemplateLoader {
    override_dir: Option<PathBuf>,
    cache: Option<Mutex<LruCache<TemplateKey, Arc<str>>>>,
}

impl TemplateLoader {
    /// Create a loader. A `cache_capacity` of `None` or zero disables
    /// memoization and every load reads from storage again.
    pub fn new(override_dir: Option<PathBuf>, cache_capacity: Option<usize>) -> Self {
        let cache = cache_capacity
            .and_then(NonZeroUsize::new)
            .map(|capacity| Mutex::new(LruCache::new(capacity)));
        Self {
            override_dir,
            cache,
        }
    }

    /// Loader for the configured template directory and cache settings.
    pub fn from_config(config: &Config) -> Self {
        let capacity = config
            .templates
            .cache
            .then_some(config.templates.cache_capacity);
        Self::new(Some(config.paths.templates.clone()), capacity)
    }

    /// Loader that only knows the built-in templates.
    pub fn builtin_only() -> Self {
        Self::new(None, None)
    }

    /// Load template text by name.
    pub fn load(&self, name: &str) -> Arc<str> {
        if let Some(path) = self.override_path(name) {
            if let Some(hit) = self.cached(&TemplateKey::File(path.clone())) {
                return hit;
            }
            if path.is_file() {
                match fs::read_to_string(&path) {
                    Ok(text) => {
                        debug!(template = name, path = %path.display(), "loaded template override");
                        return self.remember(TemplateKey::File(path), Arc::from(text));
                    }
                    Err(e) => warn!(
                        template = name,
                        path = %path.display(),
                        error = %e,
                        "failed to read template override, using built-in"
                    ),
                }
            }
        }

        let Some(text) = defaults::builtin(name) else {
            warn!(template = name, "template not found, rendering nothing");
            return Arc::from("");
        };

        let key = TemplateKey::Builtin(name.to_string());
        if let Some(hit) = self.cached(&key) {
            return hit;
        }
        self.remember(key, Arc::from(text))
    }

    /// Load and parse a template by name.
    pub fn compile(&self, name: &str) -> Template {
        Template::compile(&self.load(name))
    }

    /// Number of memoized templates.
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.lock().len())
    }

    fn override_path(&self, name: &str) -> Option<PathBuf> {
        let dir = self.override_dir.as_deref()?;
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(dir.join(format!("{name}.html")))
    }

    fn cached(&self, key: &TemplateKey) -> Option<Arc<str>> {
        let hit = self.cache.as_ref()?.lock().get(key).cloned();
        if hit.is_some() {
            trace!(key = ?key, "template cache hit");
        }
        hit
    }

    fn remember(&self, key: TemplateKey, text: Arc<str>) -> Arc<str> {
        if let Some(cache) = &self.cache {
            cache.lock().put(key, Arc::clone(&text));
        }
        text
    }

    /// Directory searched for overrides, if any.
    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }
}

impl std::fmt::Debug for TemplateLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateLoader")
            .field("override_dir", &self.override_dir)
            .field("cached", &self.cached_len())
            .finish()
    }
}
