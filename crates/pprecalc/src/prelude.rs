//! Prelude module for convenient imports
//!
//! ```ignore
//! use pprecalc::prelude::*;
//! ```

// Pipeline
pub use crate::recalc::{Progress, RecalcSummary, Recalculator, RowOutcome, SkipReason};

// Collaborator traits
pub use crate::beatmap::MapSource;
pub use crate::engine::ComputeEngine;
pub use crate::store::ScoreStore;

// Domain types
pub use crate::game::{GameMode, Mods, RankedStatus, Ruleset};
pub use crate::score::{ScoreRecord, SelectionFilter};

// Error handling
pub use crate::error::{Error, Result};
