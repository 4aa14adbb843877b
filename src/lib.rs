//! autointl - extract hardcoded CJK text from JS/TS sources
//!
//! Rewrites every string literal, template and markup text that contains
//! localizable characters into a call to a lookup function keyed by a
//! content hash, and collects the key → text pairs into a JSON dictionary.
//! Running it again on its own output changes nothing.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine
//! - `json_writer`: Dictionary artifact on disk
//! - `utils`: Shared string helpers

pub mod cli;
pub mod config;
pub mod core;
pub mod json_writer;
pub mod utils;
