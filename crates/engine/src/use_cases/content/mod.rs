//! Compendium content use cases.
//!
//! Loads feats, spells, classes and ancestries from the configured packs
//! once per process and serves filtered views of them.

mod content_cache;
mod error;
mod filter;

pub use content_cache::{
    ContentCache, ContentKind, ContentPacks, DEFAULT_ANCESTRY_PACK, DEFAULT_CLASS_PACK,
    DEFAULT_FEAT_PACK, DEFAULT_SPELL_PACK,
};
pub use error::ContentError;
pub use filter::{FeatFilter, SpellFilter};
