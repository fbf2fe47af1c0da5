use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    FromRepr,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
pub enum GameMode {
    #[default]
    #[strum(serialize = "std")]
    Std = 0,
    #[strum(serialize = "taiko")]
    Taiko = 1,
}

impl GameMode {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    /// Value stored in the `play_mode` column
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn is_taiko(&self) -> bool {
        matches!(self, Self::Taiko)
    }
}

/// Scoring variant, each with its own score table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    FromRepr,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
pub enum Ruleset {
    #[strum(serialize = "vanilla")]
    Vanilla = 0,
    #[default]
    #[strum(serialize = "relax")]
    Relax = 1,
}

impl Ruleset {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn score_table(&self) -> &'static str {
        match self {
            Self::Vanilla => "scores",
            Self::Relax => "scores_relax",
        }
    }
}

/// Map statuses eligible for recalculation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
pub enum RankedStatus {
    #[strum(serialize = "ranked")]
    Ranked = 2,
    #[strum(serialize = "loved")]
    Loved = 5,
}

impl RankedStatus {
    pub const ELIGIBLE: [RankedStatus; 2] = [RankedStatus::Ranked, RankedStatus::Loved];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    /// Decode the `beatmaps.ranked` column. Unknown codes map to `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        u8::try_from(code).ok().and_then(Self::from_repr)
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}
