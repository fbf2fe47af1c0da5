//! CLI command implementations.

pub mod recalc;
