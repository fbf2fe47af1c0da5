use std::fmt;

use serde::Serialize;

use crate::engine::Rejection;

/// Why a row was left untouched
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The score's map is not in the map table
    MissingBeatmap,
    /// The map file could not be downloaded
    MapUnavailable { map_id: u32, message: String },
    /// The downloaded map file is not valid UTF-8
    MapInvalid { map_id: u32 },
    EngineFailed { map_id: u32, message: String },
    Rejected { rejection: Rejection },
    PersistFailed { message: String },
    /// The worker task processing the row panicked
    WorkerFailed { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBeatmap => write!(f, "Missing beatmap in DB for score"),
            Self::MapUnavailable { map_id, message } => {
                write!(f, "Failed to get mapfile for {}: {}", map_id, message)
            }
            Self::MapInvalid { map_id } => write!(f, "Mapfile for {} is not valid UTF-8", map_id),
            Self::EngineFailed { map_id, message } => {
                write!(f, "Compute engine failed on {}: {}", map_id, message)
            }
            Self::Rejected { rejection } => write!(f, "Ignoring value ({})", rejection),
            Self::PersistFailed { message } => write!(f, "Failed to save pp: {}", message),
            Self::WorkerFailed { message } => write!(f, "Worker failed: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Updated { pp: f32, loved: bool },
    Skipped { reason: SkipReason },
}

impl RowOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Skipped { reason } => Some(reason),
            Self::Updated { .. } => None,
        }
    }
}

/// Outcome of one row, as reported while the run progresses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowReport {
    pub score_id: i64,
    pub map_id: Option<u32>,
    pub outcome: RowOutcome,
}

/// Progress events emitted during a run
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// Number of candidate rows, sent once before any row report
    Matched(usize),
    Row(RowReport),
}

/// Skip counts per reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub missing_beatmap: usize,
    pub map_unavailable: usize,
    pub map_invalid: usize,
    pub engine_failed: usize,
    pub rejected: usize,
    pub persist_failed: usize,
    pub worker_failed: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.missing_beatmap
            + self.map_unavailable
            + self.map_invalid
            + self.engine_failed
            + self.rejected
            + self.persist_failed
            + self.worker_failed
    }

    fn record(&mut self, reason: &SkipReason) {
        let counter = match reason {
            SkipReason::MissingBeatmap => &mut self.missing_beatmap,
            SkipReason::MapUnavailable { .. } => &mut self.map_unavailable,
            SkipReason::MapInvalid { .. } => &mut self.map_invalid,
            SkipReason::EngineFailed { .. } => &mut self.engine_failed,
            SkipReason::Rejected { .. } => &mut self.rejected,
            SkipReason::PersistFailed { .. } => &mut self.persist_failed,
            SkipReason::WorkerFailed { .. } => &mut self.worker_failed,
        };
        *counter += 1;
    }
}

/// Totals for a finished run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecalcSummary {
    pub matched: usize,
    pub updated: usize,
    pub skipped: SkipCounts,
    /// Rows never dispatched because the run was interrupted
    pub not_attempted: usize,
    pub elapsed_secs: f64,
}

impl RecalcSummary {
    pub fn new(matched: usize) -> Self {
        Self {
            matched,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Updated { .. } => self.updated += 1,
            RowOutcome::Skipped { reason } => self.skipped.record(reason),
        }
    }

    pub fn processed(&self) -> usize {
        self.updated + self.skipped.total()
    }
}
