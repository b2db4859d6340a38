//! Writing a planned level onto the actor.

mod apply_level;
mod error;

pub use apply_level::{ApplyLevel, ApplyReport};
pub use error::{ApplyError, ApplyStep};
