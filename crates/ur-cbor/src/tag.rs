//! Semantic tags and the tag-name registry.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use parking_lot::RwLock;

/// A CBOR semantic tag with an optional human-readable name.
///
/// Equality and hashing consider only the numeric value.
#[derive(Clone, Debug)]
pub struct Tag {
    value: u64,
    name: Option<String>,
}

impl Tag {
    /// Create an unnamed tag.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self { value, name: None }
    }

    /// Create a named tag.
    #[must_use]
    pub fn with_name(value: u64, name: impl Into<String>) -> Self {
        Self {
            value,
            name: Some(name.into()),
        }
    }

    /// Numeric tag value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Registered name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl From<u64> for Tag {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{}", self.value),
        }
    }
}

/// Well-known tags registered by [`TagRegistry::default`].
pub const KNOWN_TAGS: &[(u64, &str)] = &[
    (0, "standard-date-time"),
    (1, "epoch-date-time"),
    (2, "positive-bignum"),
    (3, "negative-bignum"),
    (4, "decimal-fraction"),
    (5, "bigfloat"),
    (21, "to-base64-url"),
    (22, "to-base64"),
    (23, "to-hex"),
    (24, "embedded-cbor"),
    (32, "uri"),
    (33, "base64-url"),
    (34, "base-64"),
    (35, "regex"),
    (36, "mime-message"),
    (37, "uuid"),
    (55799, "self-described-cbor"),
];

#[derive(Default)]
struct Tables {
    by_id: HashMap<u64, String>,
    by_name: HashMap<String, u64>,
}

/// Thread-safe registry mapping tag values to names.
///
/// Registering an id that already has a name replaces it; the old name stops
/// resolving.
pub struct TagRegistry {
    tables: RwLock<Tables>,
}

impl TagRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Register `name` for `id`.
    pub fn register(&self, id: u64, name: impl Into<String>) {
        let name = name.into();
        let mut tables = self.tables.write();
        if let Some(previous) = tables.by_id.insert(id, name.clone()) {
            if tables.by_name.get(&previous) == Some(&id) {
                tables.by_name.remove(&previous);
            }
        }
        if let Some(stale_id) = tables.by_name.insert(name, id) {
            if stale_id != id {
                tables.by_id.remove(&stale_id);
            }
        }
    }

    /// Look up a tag by numeric value.
    #[must_use]
    pub fn lookup_by_id(&self, id: u64) -> Option<Tag> {
        self.tables
            .read()
            .by_id
            .get(&id)
            .map(|name| Tag::with_name(id, name.clone()))
    }

    /// Look up a tag by name.
    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> Option<Tag> {
        self.tables
            .read()
            .by_name
            .get(name)
            .map(|&id| Tag::with_name(id, name))
    }

    /// Resolve a tag's name, keeping any name it already carries.
    #[must_use]
    pub fn resolve(&self, tag: &Tag) -> Tag {
        if tag.name.is_some() {
            return tag.clone();
        }
        self.lookup_by_id(tag.value)
            .unwrap_or_else(|| Tag::new(tag.value))
    }

    /// Number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.read().by_id.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        let registry = Self::new();
        for &(id, name) in KNOWN_TAGS {
            registry.register(id, name);
        }
        registry
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("len", &self.len())
            .finish()
    }
}
