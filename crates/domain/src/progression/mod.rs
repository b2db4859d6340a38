//! Level progression: slot tables, per-level requirements and the
//! tradition an actor casts from.

pub mod gates;
pub mod requirements;
pub mod spells;
pub mod tables;
pub mod tradition;

pub use gates::{kineticist_gates, KineticGate};
pub use requirements::{
    boost_bucket_for_level, detect_ability_boosts, feat_slots_for_level, gradual_completion_for,
    gradual_set_for, requirements_for_level, skill_increases_for_level, AbilityBoostRequirement,
    FeatSlots, LevelRequirements, BOOSTS_PER_SET, BOOST_MILESTONES, GRADUAL_COMPLETION_LEVELS,
};
pub use spells::{spells_to_learn_at_level, SpellObligation, PREPARED_SPELLS_PER_LEVEL};
pub use tables::{
    lost_slots_at_level, new_slots_at_level, secondary_slots_at_level, slots_at_level,
    LearningRule, SlotMap, SpellcastingProfile,
};
pub use tradition::{find_class_entry, spell_tradition, DEFAULT_TRADITION};
