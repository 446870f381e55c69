//! Registry of externally defined argument types.
//!
//! A custom type is a named parser that turns one text token into a
//! normalized string, or rejects it with a reason.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Parser behind a custom argument type.
pub type CustomParser = Arc<dyn Fn(&str) -> Result<String, String> + Send + Sync>;

/// Named custom argument types.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    parsers: BTreeMap<String, CustomParser>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parser under `name`. Returns false if the name is taken.
    pub fn register<F>(&mut self, name: impl Into<String>, parser: F) -> bool
    where
        F: Fn(&str) -> Result<String, String> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.parsers.insert(name, Arc::new(parser));
        true
    }

    /// Removes the parser registered under `name`.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.parsers.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&CustomParser> {
        self.parsers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    /// Registered type names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
