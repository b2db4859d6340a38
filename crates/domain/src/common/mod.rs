//! Small text helpers shared by the rules modules.
//!
//! Host documents are matched by display name in several places (owned
//! feats, known spells, spellcasting entries), always case-insensitively.

pub mod string;

pub use string::{contains_word, eq_ignore_case, none_if_empty, slugify};
