//! # pprecalc
//!
//! Recalculates performance points for submitted scores.
//!
//! This crate provides:
//! - Game domain types (GameMode, Ruleset, RankedStatus, Mods)
//! - Score selection and pp persistence against MySQL
//! - A local `.osu` cache backed by a remote map source
//! - Invocation of the external pp calculator and result validation
//! - The recalculation pipeline with a bounded worker pool

pub mod beatmap;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod prelude;
pub mod recalc;
pub mod score;
pub mod shutdown;
pub mod store;

pub use beatmap::{HttpMapSource, MapCache, MapSource};
pub use config::RecalcConfig;
pub use engine::{ComputeEngine, ComputeRequest, ProcessEngine, Rejection, validate};
pub use error::{Error, Result};
pub use game::{GameMode, Mods, RankedStatus, Ruleset};
pub use recalc::{
    Progress, RecalcSummary, Recalculator, RowOutcome, RowReport, SkipCounts, SkipReason,
};
pub use score::{PlayStats, ScoreRecord, SelectionFilter, SelectionVariant};
pub use shutdown::ShutdownSignal;
pub use store::{LOVED_PP, MemoryScore, MemoryScoreStore, MySqlScoreStore, PpWrite, ScoreStore};
