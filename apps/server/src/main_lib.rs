use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, LogFormat};
use tokenpulse_core::{
    aggregator::{AggregatorService, AggregatorServiceTrait},
    cache::{CacheService, CacheStore, MemoryCacheStore},
    detector::{ChangeDetector, DetectorConfig},
    events::{BroadcastHub, TopicSink},
};
use tokenpulse_market_data::provider::USER_AGENT;
use tokenpulse_market_data::{
    AssetProvider, DexScreenerProvider, GeckoTerminalProvider, JupiterProvider, ProviderRegistry,
};
use tokio::sync::watch;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub aggregator: Arc<dyn AggregatorServiceTrait>,
    pub cache: CacheService,
    pub hub: Arc<BroadcastHub>,
    pub detector: Arc<ChangeDetector>,
    pub started_at: Instant,
    shutdown: watch::Sender<bool>,
}

impl AppState {
    /// Tell long-lived responses (the SSE stream) to finish.
    pub fn request_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Resolves once [`request_shutdown`](Self::request_shutdown) has been
    /// called, immediately if it already was.
    pub fn shutdown_requested(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut shutdown_rx = self.shutdown.subscribe();
        async move {
            let _ = shutdown_rx.wait_for(|stop| *stop).await;
        }
    }
}

pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

/// Build the live provider set in registry order.
pub fn build_providers(config: &Config) -> anyhow::Result<Vec<Arc<dyn AssetProvider>>> {
    // One pooled client shared by every adapter
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.provider_timeout)
        .build()?;

    let dexscreener = DexScreenerProvider::new(
        client.clone(),
        config.dexscreener.clone(),
        config.reference_usd_price,
    );
    let jupiter = JupiterProvider::new(client.clone(), config.jupiter.clone());
    let geckoterminal = GeckoTerminalProvider::new(
        client,
        config.geckoterminal.clone(),
        config.reference_usd_price,
    );

    Ok(vec![
        Arc::new(dexscreener) as Arc<dyn AssetProvider>,
        Arc::new(jupiter) as Arc<dyn AssetProvider>,
        Arc::new(geckoterminal) as Arc<dyn AssetProvider>,
    ])
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let providers = build_providers(config)?;
    tracing::info!("Configured {} market data providers", providers.len());
    Ok(build_state_with_providers(config, providers))
}

/// Wire cache, registry, orchestrator, hub and detector around `providers`.
pub fn build_state_with_providers(
    config: &Config,
    providers: Vec<Arc<dyn AssetProvider>>,
) -> Arc<AppState> {
    let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let cache = CacheService::with_settings(store, config.cache_prefix.clone(), config.cache_ttl);

    let registry = Arc::new(ProviderRegistry::new(providers));
    let aggregator: Arc<dyn AggregatorServiceTrait> =
        Arc::new(AggregatorService::new(registry, cache.clone()));

    let hub = Arc::new(BroadcastHub::default());
    let detector = Arc::new(ChangeDetector::new(
        aggregator.clone(),
        Arc::new(TopicSink::token_updates(hub.clone())),
        DetectorConfig {
            bounded_snapshot: config.bounded_snapshot,
            ..DetectorConfig::default()
        },
    ));

    Arc::new(AppState {
        aggregator,
        cache,
        hub,
        detector,
        started_at: Instant::now(),
        shutdown: watch::channel(false).0,
    })
}
