//! Score rows and the filter that selects them.

mod filter;

pub use filter::*;

use serde::Serialize;

use crate::game::{Mods, RankedStatus};

/// Hit statistics passed to the compute engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayStats {
    pub count_100: u32,
    pub count_50: u32,
    pub misses: u32,
    pub max_combo: u32,
}

/// Snapshot of one score row joined with its map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub id: i64,
    pub mods: Mods,
    pub max_combo: u32,
    pub count_100: u32,
    pub count_50: u32,
    pub misses: u32,
    /// `None` when the map is missing from the map table
    pub map_id: Option<u32>,
    pub ranked: Option<RankedStatus>,
}

impl ScoreRecord {
    pub fn stats(&self) -> PlayStats {
        PlayStats {
            count_100: self.count_100,
            count_50: self.count_50,
            misses: self.misses,
            max_combo: self.max_combo,
        }
    }

    pub fn is_loved(&self) -> bool {
        self.ranked == Some(RankedStatus::Loved)
    }
}

/// Clamp a database integer into a non-negative count.
pub(crate) fn count_from_db(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
