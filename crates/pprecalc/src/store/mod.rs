//! Score store access.
//!
//! - **Selection**: filtered query returning candidate score rows
//! - **Persistence**: status-dependent pp writes keyed by score id
//!
//! `MySqlScoreStore` talks to the production database; `MemoryScoreStore`
//! keeps rows in memory with the same selection and write rules.

mod memory;
mod mysql;
mod query;

pub use memory::{MemoryScore, MemoryScoreStore};
pub use mysql::{ConnectFailure, MySqlScoreStore, classify_error_number};
pub use query::{COMPLETED_STATUS, select_query, update_query};

use std::future::Future;

use serde::Serialize;

use crate::error::Result;
use crate::game::{RankedStatus, Ruleset};
use crate::score::{ScoreRecord, SelectionFilter};

/// Rating written for loved scores, which earn no ranking credit
pub const LOVED_PP: f64 = 0.001;

/// A single pp write for one score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PpWrite {
    /// Store the computed value in the raw-value column and pin the rating
    /// to `LOVED_PP`
    Loved { score_id: i64, value: f32 },
    /// Store the computed value in the rating column only
    Rating { score_id: i64, pp: f32 },
}

impl PpWrite {
    pub fn for_status(score_id: i64, status: Option<RankedStatus>, value: f32) -> Self {
        match status {
            Some(RankedStatus::Loved) => Self::Loved { score_id, value },
            _ => Self::Rating {
                score_id,
                pp: value,
            },
        }
    }

    pub fn score_id(&self) -> i64 {
        match *self {
            Self::Loved { score_id, .. } | Self::Rating { score_id, .. } => score_id,
        }
    }
}

/// Backing store for score rows.
pub trait ScoreStore: Send + Sync + 'static {
    /// Rows matching the filter, or an empty vector when nothing matches
    fn select(
        &self,
        filter: &SelectionFilter,
    ) -> impl Future<Output = Result<Vec<ScoreRecord>>> + Send;

    /// Apply a write as one statement against the ruleset's table
    fn apply(&self, ruleset: Ruleset, write: PpWrite) -> impl Future<Output = Result<()>> + Send;
}
