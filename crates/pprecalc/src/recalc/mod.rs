//! Recalculation pipeline.
//!
//! `Recalculator` selects the candidate rows once, then hands each row to a
//! bounded pool of workers. Every worker runs the whole chain for its row:
//!
//! 1. resolve the map file through `MapCache`
//! 2. run the `ComputeEngine`
//! 3. `validate` the value
//! 4. write it through the `ScoreStore`
//!
//! Outcomes flow back over a channel and are reported in completion order.
//! With one worker the run is strictly sequential. Rows are independent, so
//! completion order has no effect on the stored state.
//!
//! ## Example
//!
//! ```ignore
//! let recalc = Recalculator::new(store, MapCache::new("beatmaps", source), engine)
//!     .workers(4);
//! let summary = recalc.run(&filter, shutdown, |progress| println!("{:?}", progress)).await?;
//! ```

mod outcome;

pub use outcome::*;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::beatmap::{MapCache, MapSource};
use crate::config::MAX_WORKERS;
use crate::engine::{ComputeEngine, ComputeRequest, validate};
use crate::error::{Error, Result};
use crate::game::{GameMode, Ruleset};
use crate::score::{ScoreRecord, SelectionFilter};
use crate::shutdown::ShutdownSignal;
use crate::store::{PpWrite, ScoreStore};

/// The collaborators every worker shares
struct Components<S, M, E> {
    store: S,
    maps: MapCache<M>,
    engine: E,
}

impl<S: ScoreStore, M: MapSource, E: ComputeEngine> Components<S, M, E> {
    async fn process(&self, mode: GameMode, ruleset: Ruleset, row: &ScoreRecord) -> RowOutcome {
        let Some(map_id) = row.map_id else {
            return RowOutcome::Skipped {
                reason: SkipReason::MissingBeatmap,
            };
        };

        let map_path = match self.maps.get(map_id).await {
            Ok(path) => path,
            Err(Error::MapDecodeFailed(_)) => {
                return RowOutcome::Skipped {
                    reason: SkipReason::MapInvalid { map_id },
                };
            }
            Err(e) => {
                return RowOutcome::Skipped {
                    reason: SkipReason::MapUnavailable {
                        map_id,
                        message: e.to_string(),
                    },
                };
            }
        };

        let request = ComputeRequest {
            map_path,
            stats: row.stats(),
            mods: row.mods,
            mode,
        };

        let value = match self.engine.compute(&request).await {
            Ok(value) => value,
            Err(e) => {
                return RowOutcome::Skipped {
                    reason: SkipReason::EngineFailed {
                        map_id,
                        message: e.to_string(),
                    },
                };
            }
        };

        let pp = match validate(value) {
            Ok(pp) => pp,
            Err(rejection) => {
                return RowOutcome::Skipped {
                    reason: SkipReason::Rejected { rejection },
                };
            }
        };

        let write = PpWrite::for_status(row.id, row.ranked, pp);
        match self.store.apply(ruleset, write).await {
            Ok(()) => RowOutcome::Updated {
                pp,
                loved: row.is_loved(),
            },
            Err(e) => RowOutcome::Skipped {
                reason: SkipReason::PersistFailed {
                    message: e.to_string(),
                },
            },
        }
    }
}

pub struct Recalculator<S, M, E> {
    components: Arc<Components<S, M, E>>,
    workers: usize,
}

impl<S: ScoreStore, M: MapSource, E: ComputeEngine> Recalculator<S, M, E> {
    /// Create a sequential (single worker) recalculator
    pub fn new(store: S, maps: MapCache<M>, engine: E) -> Self {
        Self {
            components: Arc::new(Components {
                store,
                maps,
                engine,
            }),
            workers: 1,
        }
    }

    /// Set the number of rows processed concurrently, clamped to
    /// `1..=MAX_WORKERS`
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(1, MAX_WORKERS);
        self
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    pub fn store(&self) -> &S {
        &self.components.store
    }

    pub fn maps(&self) -> &MapCache<M> {
        &self.components.maps
    }

    /// Run the full chain for a single row
    pub async fn process_row(&self, filter: &SelectionFilter, row: &ScoreRecord) -> RowOutcome {
        self.components
            .process(filter.mode(), filter.ruleset(), row)
            .await
    }

    /// Select candidate rows and recalculate them.
    ///
    /// `report` receives `Progress::Matched` once, then one `Progress::Row`
    /// per processed row. Only the selection can fail the run; per-row
    /// failures are reported as skips.
    pub async fn run<F>(
        &self,
        filter: &SelectionFilter,
        shutdown: Arc<ShutdownSignal>,
        mut report: F,
    ) -> Result<RecalcSummary>
    where
        F: FnMut(Progress),
    {
        let start = Instant::now();
        let rows = self.components.store.select(filter).await?;
        let matched = rows.len();
        info!(
            "Found {} scores to recalculate in {}",
            matched,
            filter.table()
        );
        report(Progress::Matched(matched));

        let mut summary = RecalcSummary::new(matched);
        if rows.is_empty() {
            summary.elapsed_secs = start.elapsed().as_secs_f64();
            return Ok(summary);
        }

        let (tx, mut rx) = mpsc::channel(self.workers.saturating_mul(2));
        let dispatcher = tokio::spawn(dispatch(
            Arc::clone(&self.components),
            rows,
            filter.mode(),
            filter.ruleset(),
            self.workers,
            shutdown,
            tx,
        ));

        while let Some(row_report) = rx.recv().await {
            summary.record(&row_report.outcome);
            report(Progress::Row(row_report));
        }

        let dispatched = dispatcher
            .await
            .map_err(|e| Error::WorkerFailed(e.to_string()))?;
        summary.not_attempted = matched.saturating_sub(dispatched);
        summary.elapsed_secs = start.elapsed().as_secs_f64();

        info!(
            "Recalculation finished: {} updated, {} skipped, {} not attempted in {:.1}s",
            summary.updated,
            summary.skipped.total(),
            summary.not_attempted,
            summary.elapsed_secs
        );
        Ok(summary)
    }
}

/// Hand rows to at most `workers` concurrent tasks. Returns how many rows were
/// dispatched before the input ran out or shutdown was requested.
async fn dispatch<S, M, E>(
    components: Arc<Components<S, M, E>>,
    rows: Vec<ScoreRecord>,
    mode: GameMode,
    ruleset: Ruleset,
    workers: usize,
    shutdown: Arc<ShutdownSignal>,
    tx: mpsc::Sender<RowReport>,
) -> usize
where
    S: ScoreStore,
    M: MapSource,
    E: ComputeEngine,
{
    let total = rows.len();
    let semaphore = Arc::new(Semaphore::new(workers));
    let mut tasks = JoinSet::new();
    let mut in_flight = HashMap::new();
    let mut dispatched = 0;

    for row in rows {
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };
        if shutdown.is_shutdown() {
            info!("Shutdown requested, not dispatching remaining rows");
            break;
        }

        let components = Arc::clone(&components);
        let task_tx = tx.clone();
        let key = (row.id, row.map_id);
        dispatched += 1;

        let handle = tasks.spawn(async move {
            let outcome = components.process(mode, ruleset, &row).await;
            drop(permit);

            let report = RowReport {
                score_id: row.id,
                map_id: row.map_id,
                outcome,
            };
            if task_tx.send(report).await.is_err() {
                debug!("Outcome receiver closed for score {}", row.id);
            }
        });
        in_flight.insert(handle.id(), key);

        while let Some(result) = tasks.try_join_next_with_id() {
            reap(result, &mut in_flight, &tx).await;
        }
    }

    while let Some(result) = tasks.join_next_with_id().await {
        reap(result, &mut in_flight, &tx).await;
    }

    if dispatched < total {
        warn!("Run interrupted after {} of {} rows", dispatched, total);
    }

    dispatched
}

/// Forget a finished task. A task that panicked never sent its report, so
/// one is sent on its behalf.
async fn reap(
    result: std::result::Result<(task::Id, ()), JoinError>,
    in_flight: &mut HashMap<task::Id, (i64, Option<u32>)>,
    tx: &mpsc::Sender<RowReport>,
) {
    let (id, failure) = match result {
        Ok((id, ())) => (id, None),
        Err(e) => (e.id(), Some(e)),
    };
    let Some((score_id, map_id)) = in_flight.remove(&id) else {
        return;
    };
    let Some(e) = failure else {
        return;
    };

    error!("Worker for score {} failed: {}", score_id, e);
    let report = RowReport {
        score_id,
        map_id,
        outcome: RowOutcome::Skipped {
            reason: SkipReason::WorkerFailed {
                message: e.to_string(),
            },
        },
    };
    if tx.send(report).await.is_err() {
        debug!("Outcome receiver closed for score {}", score_id);
    }
}
