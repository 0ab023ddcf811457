//! Case-insensitive metadata attached to every upload of a manager.
//!
//! Keys are lower-cased on the way in. The store is read-only while a batch runs: each batch
//! works on a snapshot taken when it starts, so later edits never reach uploads that are
//! already in flight.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, JsonValue>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value.
    pub fn add(&mut self, key: &str, value: impl Into<JsonValue>) {
        self.0.insert(key.to_lowercase(), value.into());
    }

    /// Remove a key; no-op when absent.
    pub fn remove(&mut self, key: &str) {
        self.0.remove(&key.to_lowercase());
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(&key.to_lowercase())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&key.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<JsonValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.add(key.as_ref(), value);
        }
        metadata
    }
}
