//! Encode-time entry filter.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

type Predicate = dyn Fn(&Value, Option<&Value>) -> bool + Send + Sync;

/// Predicate deciding which collection entries are written.
///
/// Called as `(value, Some(key))` for map entries and `(value, None)` for
/// list and set members. Entries for which it returns `false` are left out of
/// the representation. Native arrays and objects are never filtered.
#[derive(Clone, Default)]
pub struct EntryFilter(Option<Arc<Predicate>>);

impl EntryFilter {
    /// Filter that keeps every entry.
    pub fn none() -> Self {
        Self(None)
    }

    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Value, Option<&Value>) -> bool + Send + Sync + 'static,
    {
        Self(Some(Arc::new(predicate)))
    }

    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }

    pub fn keep(&self, value: &Value, key: Option<&Value>) -> bool {
        self.0.as_ref().map_or(true, |pred| pred(value, key))
    }

    pub(crate) fn entries<'a>(
        &self,
        entries: impl Iterator<Item = (&'a Value, &'a Value)>,
    ) -> Vec<(&'a Value, &'a Value)> {
        entries.filter(|&(k, v)| self.keep(v, Some(k))).collect()
    }

    pub(crate) fn values<'a>(&self, values: impl Iterator<Item = &'a Value>) -> Vec<&'a Value> {
        values.filter(|v| self.keep(v, None)).collect()
    }
}

impl fmt::Debug for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntryFilter")
            .field(&if self.is_active() { "active" } else { "none" })
            .finish()
    }
}
