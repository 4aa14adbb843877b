//! Parse and print collaborators.
//!
//! - `jsx`: swc-based parser and code generator for JS/TS/JSX/TSX sources

pub mod jsx;
