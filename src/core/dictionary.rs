//! Translation entries and the key→text dictionary they fold into.

use std::collections::{BTreeMap, btree_map};

use serde::{Deserialize, Serialize};

/// How an entry relates to the code it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Plain text that was rewritten into a lookup call.
    New,
    /// An existing lookup call whose key no longer matched its text.
    Updated,
    /// An existing lookup call that was already correct.
    Unchanged,
}

/// Where an entry was found, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: usize,
    /// 1-based display column.
    pub col: usize,
    pub source_line: String,
}

/// One piece of extracted text.
///
/// Only `key` and `value` take part in folding; status and position are
/// carried for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub key: String,
    pub value: String,
    pub status: EntryStatus,
    pub position: Option<SourcePosition>,
}

impl TranslationEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            status: EntryStatus::New,
            position: None,
        }
    }
}

/// Same key, different text. Either a digest collision or two canonical
/// forms that should not have met.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollision {
    pub key: String,
    pub previous: String,
    pub incoming: String,
}

/// Key→text mapping. Serializes as a flat JSON object with sorted keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary(BTreeMap<String, String>);

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with overwrite. Reports a collision when the key was already
    /// bound to different text.
    pub fn insert(&mut self, key: String, value: String) -> Option<KeyCollision> {
        let incoming = value.clone();
        match self.0.insert(key.clone(), value) {
            Some(previous) if previous != incoming => Some(KeyCollision {
                key,
                previous,
                incoming,
            }),
            _ => None,
        }
    }

    /// Fold entries in order; later entries overwrite earlier ones.
    pub fn fold(entries: &[TranslationEntry]) -> (Self, Vec<KeyCollision>) {
        let mut dictionary = Self::new();
        let collisions = entries
            .iter()
            .filter_map(|entry| dictionary.insert(entry.key.clone(), entry.value.clone()))
            .collect();
        (dictionary, collisions)
    }

    pub fn from_entries(entries: &[TranslationEntry]) -> Self {
        Self::fold(entries).0
    }

    /// Merge `other` into `self` with the same overwrite rule as [`Dictionary::fold`].
    pub fn merge(&mut self, other: &Dictionary) -> Vec<KeyCollision> {
        other
            .iter()
            .filter_map(|(key, value)| self.insert(key.to_string(), value.to_string()))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl IntoIterator for Dictionary {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, String)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Entries whose key is already bound to a different value earlier in the
/// list. Check this before folding if silent overwrites matter.
pub fn find_collisions(entries: &[TranslationEntry]) -> Vec<KeyCollision> {
    Dictionary::fold(entries).1
}
