//! Documents from the content source and the actor snapshot.

pub mod actor;
pub mod ancestry;
pub mod class;
pub mod feat;
pub mod spell;

pub use actor::{ActorSnapshot, OwnedFeat, OwnedSpell, SlotState, SpellcastingEntry};
pub use ancestry::{AncestryDocument, HeritageDocument};
pub use class::ClassDocument;
pub use feat::FeatDocument;
pub use spell::SpellDocument;
