pub mod matches;
pub mod pairing;
pub mod sets;

pub use matches::{MatchGrouper, MatchStats};
pub use pairing::{Orientation, Pairing};
pub use sets::{SetGrouper, SetStats};

use strum_macros::Display;

/// Why a grouper closed the current group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SplitReason {
    #[strum(serialize = "gap exceeded")]
    Gap,
    #[strum(serialize = "character pairing changed")]
    CharacterChange,
    #[strum(serialize = "player pairing changed")]
    PlayerChange,
    #[strum(serialize = "both characters changed")]
    DoubleCharacterChange,
}
