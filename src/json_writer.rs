use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::core::dictionary::{Dictionary, KeyCollision};

/// The on-disk dictionary artifact: one flat JSON object of key → text.
pub struct DictionaryWriter {
    file_path: PathBuf,
    dictionary: Dictionary,
}

impl DictionaryWriter {
    /// Open an existing artifact or start an empty one.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        let dictionary = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            parse_dictionary(&content)
                .with_context(|| format!("Failed to load dictionary: {}", path.display()))?
        } else {
            Dictionary::new()
        };

        Ok(Self {
            file_path: path.to_path_buf(),
            dictionary,
        })
    }

    /// Start from nothing, ignoring whatever the artifact holds.
    pub fn create_empty(path: &Path) -> Self {
        Self {
            file_path: path.to_path_buf(),
            dictionary: Dictionary::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Merge entries in; incoming text wins.
    pub fn merge(&mut self, other: &Dictionary) -> Vec<KeyCollision> {
        self.dictionary.merge(other)
    }

    /// Save with 2-space indentation, sorted keys and a trailing newline.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(&self.dictionary).context("Failed to serialize JSON")?;

        fs::write(&self.file_path, format!("{}\n", content))
            .with_context(|| format!("Failed to write file: {}", self.file_path.display()))?;

        Ok(())
    }
}

fn parse_dictionary(content: &str) -> Result<Dictionary> {
    let value: Value = serde_json::from_str(content).context("Invalid JSON")?;
    let Value::Object(map) = value else {
        bail!("Root of the dictionary must be an object");
    };

    map.into_iter()
        .map(|(key, value)| -> Result<(String, String)> {
            match value {
                Value::String(text) => Ok((key, text)),
                other => bail!("Value of key \"{}\" must be a string, found {}", key, other),
            }
        })
        .collect()
}
