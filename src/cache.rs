//! Shared cache of compiled patterns.

use std::sync::Arc;

use log::trace;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::{Error, Regex, Strategy};

/// Thread-safe map from `(pattern, strategy)` to a compiled `Regex`.
///
/// Compilation happens outside the lock, so two threads asking for the same
/// new pattern at once may both compile it; the first insert wins. Patterns
/// that fail to compile are not remembered.
#[derive(Debug, Default)]
pub struct RegexCache {
    entries: Mutex<FxHashMap<(String, Strategy), Arc<Regex>>>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached regex for `pattern`, compiling it on a miss.
    pub fn get(&self, pattern: &str, strategy: Strategy) -> Result<Arc<Regex>, Error> {
        let key = (pattern.to_string(), strategy);
        if let Some(hit) = self.entries.lock().get(&key) {
            trace!("regex cache hit for {pattern:?}");
            return Ok(Arc::clone(hit));
        }

        let compiled = Arc::new(Regex::with_strategy(pattern, strategy)?);
        let mut entries = self.entries.lock();
        Ok(Arc::clone(entries.entry(key).or_insert(compiled)))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
