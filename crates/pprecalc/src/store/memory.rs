use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::game::{GameMode, Ruleset};
use crate::score::{ScoreRecord, SelectionFilter};

use super::query::COMPLETED_STATUS;
use super::{LOVED_PP, PpWrite, ScoreStore};

/// A stored score with the columns the selection and writes look at
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryScore {
    pub ruleset: Ruleset,
    pub mode: GameMode,
    pub completed: u8,
    /// Owner's `privileges & 1`
    pub user_active: bool,
    pub record: ScoreRecord,
    /// Rating column
    pub pp: f64,
    /// Raw-value column
    pub score: f64,
}

impl MemoryScore {
    /// A completed play by an active user
    pub fn completed(ruleset: Ruleset, mode: GameMode, record: ScoreRecord) -> Self {
        Self {
            ruleset,
            mode,
            completed: COMPLETED_STATUS,
            user_active: true,
            record,
            pp: 0.0,
            score: 0.0,
        }
    }

    fn matches(&self, filter: &SelectionFilter) -> bool {
        let status_ok = match self.record.map_id {
            None => true,
            Some(_) => self
                .record
                .ranked
                .is_some_and(|status| filter.statuses().contains(&status)),
        };

        self.ruleset == filter.ruleset()
            && self.mode == filter.mode()
            && self.completed == COMPLETED_STATUS
            && self.user_active
            && status_ok
            && filter
                .map_id()
                .is_none_or(|id| self.record.map_id == Some(id))
    }
}

/// In-memory score store applying the same rules as the MySQL store.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    rows: Mutex<Vec<MemoryScore>>,
    writes: AtomicUsize,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<MemoryScore>) -> Self {
        Self {
            rows: Mutex::new(rows),
            writes: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MemoryScore>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, row: MemoryScore) {
        self.lock().push(row);
    }

    pub fn get(&self, ruleset: Ruleset, score_id: i64) -> Option<MemoryScore> {
        self.lock()
            .iter()
            .find(|row| row.ruleset == ruleset && row.record.id == score_id)
            .cloned()
    }

    /// Number of update statements applied
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ScoreStore for MemoryScoreStore {
    async fn select(&self, filter: &SelectionFilter) -> Result<Vec<ScoreRecord>> {
        let rows = self.lock();
        let matched = rows
            .iter()
            .filter(|row| row.matches(filter))
            .map(|row| row.record.clone());

        Ok(match filter.limit() {
            Some(limit) => matched.take(limit as usize).collect(),
            None => matched.collect(),
        })
    }

    async fn apply(&self, ruleset: Ruleset, write: PpWrite) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        let mut rows = self.lock();
        let target = rows
            .iter_mut()
            .find(|row| row.ruleset == ruleset && row.record.id == write.score_id());

        if let Some(row) = target {
            match write {
                PpWrite::Loved { value, .. } => {
                    row.score = f64::from(value);
                    row.pp = LOVED_PP;
                }
                PpWrite::Rating { pp, .. } => {
                    row.pp = f64::from(pp);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Mods, RankedStatus};

    fn record(id: i64, map_id: Option<u32>, ranked: Option<RankedStatus>) -> ScoreRecord {
        ScoreRecord {
            id,
            mods: Mods::NOMOD,
            max_combo: 100,
            count_100: 0,
            count_50: 0,
            misses: 0,
            map_id,
            ranked,
        }
    }

    fn store() -> MemoryScoreStore {
        let mut banned = MemoryScore::completed(
            Ruleset::Relax,
            GameMode::Std,
            record(4, Some(40), Some(RankedStatus::Ranked)),
        );
        banned.user_active = false;

        let mut failed = MemoryScore::completed(
            Ruleset::Relax,
            GameMode::Std,
            record(5, Some(50), Some(RankedStatus::Ranked)),
        );
        failed.completed = 2;

        MemoryScoreStore::with_rows(vec![
            MemoryScore::completed(
                Ruleset::Relax,
                GameMode::Std,
                record(1, Some(10), Some(RankedStatus::Ranked)),
            ),
            MemoryScore::completed(
                Ruleset::Relax,
                GameMode::Std,
                record(2, Some(20), Some(RankedStatus::Loved)),
            ),
            MemoryScore::completed(Ruleset::Relax, GameMode::Std, record(3, Some(30), None)),
            banned,
            failed,
            MemoryScore::completed(
                Ruleset::Vanilla,
                GameMode::Std,
                record(6, Some(10), Some(RankedStatus::Ranked)),
            ),
            MemoryScore::completed(
                Ruleset::Relax,
                GameMode::Taiko,
                record(7, Some(10), Some(RankedStatus::Ranked)),
            ),
        ])
    }

    fn ids(records: &[ScoreRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[tokio::test]
    async fn test_select_excludes_ineligible_rows() {
        let store = store();
        let filter = SelectionFilter::builder().build().unwrap();
        let rows = store.select(&filter).await.unwrap();
        assert_eq!(ids(&rows), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_select_by_status_and_map() {
        let store = store();
        let loved = SelectionFilter::builder()
            .ranked(Some(RankedStatus::Loved))
            .build()
            .unwrap();
        assert_eq!(ids(&store.select(&loved).await.unwrap()), vec![2]);

        let by_map = SelectionFilter::builder()
            .map_id(Some(10))
            .build()
            .unwrap();
        assert_eq!(ids(&store.select(&by_map).await.unwrap()), vec![1]);
    }

    #[tokio::test]
    async fn test_select_limit() {
        let store = store();
        let filter = SelectionFilter::builder().limit(Some(1)).build().unwrap();
        assert_eq!(ids(&store.select(&filter).await.unwrap()), vec![1]);
    }

    #[tokio::test]
    async fn test_missing_map_rows_are_selected() {
        let store = MemoryScoreStore::new();
        store.insert(MemoryScore::completed(
            Ruleset::Relax,
            GameMode::Std,
            record(9, None, None),
        ));
        let filter = SelectionFilter::builder()
            .ranked(Some(RankedStatus::Ranked))
            .build()
            .unwrap();
        assert_eq!(ids(&store.select(&filter).await.unwrap()), vec![9]);
    }

    #[tokio::test]
    async fn test_apply_is_keyed_and_idempotent() {
        let store = store();
        let write = PpWrite::Rating {
            score_id: 1,
            pp: 321.5,
        };
        store.apply(Ruleset::Relax, write).await.unwrap();
        store.apply(Ruleset::Relax, write).await.unwrap();

        assert_eq!(store.get(Ruleset::Relax, 1).unwrap().pp, 321.5);
        assert_eq!(store.get(Ruleset::Relax, 1).unwrap().score, 0.0);
        assert_eq!(store.get(Ruleset::Vanilla, 6).unwrap().pp, 0.0);
        assert_eq!(store.write_count(), 2);
    }
}
