//! External pp computation.
//!
//! The engine is an opaque executable. It receives the map path, hit counts,
//! combo and mods as positional arguments and writes its result as a raw
//! little-endian f32 at the end of stdout.

mod args;
mod process;
mod validate;

pub use args::{BINARY_OUTPUT_FLAG, TAIKO_FLAG, build_args};
pub use process::{ProcessEngine, RESULT_SIZE, parse_binary_tail};
pub use validate::{Rejection, validate};

use std::future::Future;
use std::path::PathBuf;

use crate::error::Result;
use crate::game::{GameMode, Mods};
use crate::score::PlayStats;

/// Inputs for one computation
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeRequest {
    pub map_path: PathBuf,
    pub stats: PlayStats,
    pub mods: Mods,
    pub mode: GameMode,
}

/// Converts play statistics into a pp value.
pub trait ComputeEngine: Send + Sync + 'static {
    fn compute(&self, request: &ComputeRequest) -> impl Future<Output = Result<f32>> + Send;
}
