use thiserror::Error;

/// Errors raised by the extraction engine.
///
/// Configuration variants are fatal and surface before any file is read.
/// `UnsupportedEnumKey` is scoped to the file that contains it.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("missing required option `{0}`")]
    MissingOption(&'static str),

    #[error("invalid call template `{template}`: {reason}")]
    InvalidCallTemplate { template: String, reason: String },

    #[error("invalid script pattern `{pattern}`")]
    InvalidScriptPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(
        "unsupported enum member {key:?} at {file}:{line}: quote-named members with localizable text cannot be rewritten"
    )]
    UnsupportedEnumKey {
        file: String,
        key: String,
        line: usize,
    },
}
