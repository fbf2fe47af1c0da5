//! Local `.osu` file cache
//!
//! One file per map id under the cache directory. A file that exists is
//! trusted and never fetched again; missing files are downloaded, decoded as
//! strict UTF-8 and written through a temporary file that is renamed into
//! place, so concurrent fetches of the same id never expose a partial file.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::source::MapSource;
use crate::error::{Error, Result};

const MAP_EXTENSION: &str = "osu";

pub struct MapCache<M> {
    dir: PathBuf,
    source: M,
}

impl<M: MapSource> MapCache<M> {
    pub fn new<P: Into<PathBuf>>(dir: P, source: M) -> Self {
        Self {
            dir: dir.into(),
            source,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn source(&self) -> &M {
        &self.source
    }

    /// Canonical cache path for a map
    pub fn path_for(&self, map_id: u32) -> PathBuf {
        self.dir.join(format!("{}.{}", map_id, MAP_EXTENSION))
    }

    /// Return the cached file for `map_id`, downloading it on a miss
    pub async fn get(&self, map_id: u32) -> Result<PathBuf> {
        let path = self.path_for(map_id);
        if tokio::fs::try_exists(&path).await? {
            debug!("Beatmap {} cache hit", map_id);
            return Ok(path);
        }

        let body = self
            .source
            .fetch(map_id)
            .await
            .map_err(|e| match e {
                e @ Error::MapFetchFailed { .. } => e,
                other => Error::MapFetchFailed {
                    map_id,
                    message: other.to_string(),
                },
            })?;

        let text = decode_strict_utf8(&body).ok_or(Error::MapDecodeFailed(map_id))?;

        let dir = self.dir.clone();
        let dest = path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&dir, &dest, text.as_bytes()))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;

        info!("Cached beatmap {} ({} bytes)", map_id, body.len());
        Ok(path)
    }
}

/// Decode bytes as UTF-8, refusing any malformed sequence
fn decode_strict_utf8(bytes: &[u8]) -> Option<String> {
    encoding_rs::UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Write through a temp file in the destination directory, then rename.
fn write_atomic(dir: &Path, dest: &Path, content: &[u8]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(dest).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
