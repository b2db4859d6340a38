//! Content source implementations for compendium data.
//!
//! These provide concrete types that satisfy the `ContentSource` and
//! `ContentResolver` ports.

pub mod json_dir;

pub use json_dir::JsonDirContentSource;
