//! What an actor may pick: feat and spell candidate pools plus
//! prerequisite checks.

pub mod feats;
pub mod prerequisites;
pub mod spells;

pub use feats::{
    feats_for_level, filter_feats, search_keys, sort_candidates, FeatCandidate, OwnedFeatIndex,
};
pub use prerequisites::{check_line, check_prerequisites, LineOutcome, PrerequisiteCheck};
pub use spells::{spells_for_rank, SpellFilterOptions};
