//! Game domain types: modes, rulesets, map statuses and modifiers.

mod enums;
mod mods;

pub use enums::*;
pub use mods::*;
