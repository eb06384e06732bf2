use anyhow::Result;

#[cfg(any(test, feature = "mocks"))]
use std::collections::HashMap;

/// String-keyed, string-valued persistent storage scoped to a single player.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

#[cfg(any(test, feature = "mocks"))]
#[derive(Clone, Debug, Default)]
pub struct Memory {
    state: HashMap<String, String>,
}

#[cfg(any(test, feature = "mocks"))]
impl Memory {
    /// Seed an entry, as if written by an earlier session.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.state.insert(key.to_string(), value.into());
        self
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.state.get(key).map(String::as_str)
    }
}

#[cfg(any(test, feature = "mocks"))]
impl Store for Memory {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.state.insert(key.to_string(), value);
        Ok(())
    }
}
