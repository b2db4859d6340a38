//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod app_settings;
pub mod clock;
pub mod content_sources;
pub mod memory;
pub mod notifier;
pub mod ports;
pub mod settings;
