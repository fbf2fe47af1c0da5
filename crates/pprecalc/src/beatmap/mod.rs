//! Beatmap files: remote source and local cache.

mod cache;
mod source;

pub use cache::MapCache;
pub use source::{HttpMapSource, MapSource};
