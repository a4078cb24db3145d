//! Background jobs for the server.
//!
//! Three periodic tasks: warm the aggregate cache, run change detection,
//! and purge expired cache entries.

use std::sync::Arc;

use tokenpulse_core::Scheduler;
use tracing::{debug, info};

use crate::config::Config;
use crate::main_lib::AppState;

/// Records fetched on every cache warm-up run.
pub const FETCH_LIMIT: usize = 50;

/// Starts every background task and returns the handle used to stop them.
pub fn start_scheduler(state: &Arc<AppState>, config: &Config) -> Scheduler {
    let mut scheduler = Scheduler::new();

    let fetch_state = state.clone();
    scheduler.spawn_periodic("token-fetch", config.fetch_interval, move || {
        let state = fetch_state.clone();
        async move { run_scheduled_fetch(&state).await }
    });

    let detect_state = state.clone();
    scheduler.spawn_periodic("change-detection", config.broadcast_interval, move || {
        let state = detect_state.clone();
        async move {
            let events = state.detector.tick().await;
            debug!("Change detection produced {} events", events.len());
        }
    });

    let cleanup_state = state.clone();
    scheduler.spawn_periodic("cache-cleanup", config.cache_cleanup_interval, move || {
        let state = cleanup_state.clone();
        async move {
            let purged = state.cache.purge_expired().await;
            info!("Cache cleanup removed {} expired entries", purged);
        }
    });

    scheduler
}

async fn run_scheduled_fetch(state: &Arc<AppState>) {
    debug!("Running scheduled token fetch...");
    let tokens = state.aggregator.aggregate(FETCH_LIMIT).await;
    info!("Scheduled fetch completed: {} tokens", tokens.len());
}
