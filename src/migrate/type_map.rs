use std::collections::HashMap;
use tracing::debug;

/// Legacy activity types that were renamed in the target schema.
pub const BUILTIN_TYPE_RENAMES: &[(&str, &str)] = &[
    ("CronEvent", "Cron"),
    ("Signaled", "SignalReceived"),
];

/// Lookup table from legacy activity type names to target type names.
/// Types without an entry keep their name.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMap {
    entries: HashMap<String, String>,
}

impl Default for TypeMap {
    fn default() -> Self {
        let mut map = Self::empty();
        for (legacy, target) in BUILTIN_TYPE_RENAMES {
            map.insert(legacy, target);
        }
        map
    }
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, legacy: &str, target: &str) -> &mut Self {
        if let Some(previous) = self.entries.insert(legacy.to_string(), target.to_string()) {
            if previous != target {
                debug!(legacy, previous = %previous, target, "Overriding type rename");
            }
        }
        self
    }

    pub fn remap<'a>(&'a self, legacy: &'a str) -> &'a str {
        self.entries.get(legacy).map(String::as_str).unwrap_or(legacy)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> Extend<(K, V)> for TypeMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (legacy, target) in iter {
            self.insert(legacy.as_ref(), target.as_ref());
        }
    }
}
