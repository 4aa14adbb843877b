use std::sync::LazyLock;

use regex::Regex;

use super::error::ExtractError;

/// CJK Unified Ideographs, the range the lookup runtime ships messages for.
pub const DEFAULT_SCRIPT_PATTERN: &str = r"[\u{4e00}-\u{9fa5}]";

static DEFAULT_SCRIPT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_SCRIPT_PATTERN).unwrap());

/// Decides whether a piece of text should be extracted.
#[derive(Debug, Clone)]
pub struct TextClassifier {
    pattern: Regex,
}

impl TextClassifier {
    pub fn new(pattern: &str) -> Result<Self, ExtractError> {
        let pattern = Regex::new(pattern).map_err(|source| ExtractError::InvalidScriptPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    /// True iff `text` contains at least one character of the target script.
    pub fn is_localizable(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for TextClassifier {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_SCRIPT_REGEX.clone(),
        }
    }
}
