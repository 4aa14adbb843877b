//! Extraction engine.
//!
//! - `text`, `key`: deciding what to extract and how to name it
//! - `transform`: the per-file rewrite pass
//! - `dictionary`: folding entries into key→text mappings
//! - `context`: running the pass over a whole project

pub mod context;
pub mod dictionary;
pub mod error;
pub mod file_scanner;
pub mod key;
pub mod options;
pub mod parsers;
pub mod text;
pub mod transform;

pub use context::{ExtractContext, FailedFile, ProcessedFile, RunReport};
pub use dictionary::{Dictionary, EntryStatus, KeyCollision, SourcePosition, TranslationEntry};
pub use error::ExtractError;
pub use options::{ExtractionObserver, ImportKind, NoopObserver, Options};
pub use transform::{TransformOutcome, Transformer};
