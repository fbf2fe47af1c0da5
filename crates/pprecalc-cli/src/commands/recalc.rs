//! Recalculate pp for the selected scores.

use std::sync::Arc;

use anyhow::{Context, Result};
use pprecalc::{
    HttpMapSource, MapCache, MySqlScoreStore, ProcessEngine, Recalculator, SelectionFilter,
    ShutdownSignal,
};
use tracing::{debug, info};

use crate::cli::Args;
use crate::{config, render};

fn build_filter(args: &Args) -> Result<SelectionFilter> {
    let filter = SelectionFilter::builder()
        .variant(args.variant)
        .mode(args.gamemode)
        .ruleset(args.relax)
        .ranked(args.ranked_status())
        .map_id(args.beatmap)
        .limit(args.limit)
        .build()?;
    Ok(filter)
}

pub async fn run(args: Args) -> Result<()> {
    let config = config::resolve(&args)?;
    let filter = build_filter(&args)?;
    let workers = config.recalc.workers;
    debug!("Selection: {:?}, workers: {}", filter, workers);

    let shutdown = Arc::new(ShutdownSignal::new());
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, finishing in-flight scores...");
        shutdown_ctrlc.trigger();
    })?;

    let store = MySqlScoreStore::connect(&config.database, config.pool_size(workers))
        .await
        .context("Failed to connect to SQL")?;
    let source = HttpMapSource::new(&config.beatmaps).context("Failed to create HTTP client")?;
    let maps = MapCache::new(config.beatmaps.cache_dir.clone(), source);
    let engine = ProcessEngine::from_config(&config.engine);

    let recalc = Recalculator::new(store, maps, engine).workers(workers);

    let json = args.json;
    let result = recalc
        .run(&filter, shutdown, |progress| {
            if !json {
                render::print_progress(&progress);
            }
        })
        .await;
    recalc.store().close().await;
    let summary = result.context("Failed to select scores")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render::print_summary(&summary);
    }

    Ok(())
}
