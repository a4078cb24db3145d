use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use rust_decimal::Decimal;
use tokenpulse_core::cache::{DEFAULT_CACHE_PREFIX, DEFAULT_CACHE_TTL};
use tokenpulse_market_data::provider::{dexscreener, geckoterminal, jupiter};
use tokenpulse_market_data::ProviderEndpoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_prefix: String,
    pub fetch_interval: Duration,
    pub broadcast_interval: Duration,
    pub cache_cleanup_interval: Duration,
    pub provider_timeout: Duration,
    pub dexscreener: ProviderEndpoint,
    pub geckoterminal: ProviderEndpoint,
    pub jupiter: ProviderEndpoint,
    /// USD price of the reference unit, used when no live rate is available.
    pub reference_usd_price: Decimal,
    pub bounded_snapshot: bool,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable numbers fall back
    /// to their defaults; an unparseable listen address is an error.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let num = |key: &str, default: u64| parse_or(lookup(key), default);

        let listen_addr: SocketAddr = var("TP_LISTEN_ADDR", "0.0.0.0:3000")
            .parse()
            .context("Invalid TP_LISTEN_ADDR")?;
        let cors_allow = var("TP_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let provider_timeout = Duration::from_millis(num("TP_PROVIDER_TIMEOUT_MS", 10_000));
        let endpoint = |url_key: &str, default_url: &str, rpm_key: &str, default_rpm: u32| {
            ProviderEndpoint::new(
                var(url_key, default_url),
                parse_or(lookup(rpm_key), default_rpm),
            )
            .with_timeout(provider_timeout)
        };

        let log_format = if var("TP_LOG_FORMAT", "text").eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        };

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(num("TP_REQUEST_TIMEOUT_MS", 30_000)),
            cache_ttl: Duration::from_secs(num("TP_CACHE_TTL_SECS", DEFAULT_CACHE_TTL.as_secs())),
            cache_prefix: var("TP_CACHE_PREFIX", DEFAULT_CACHE_PREFIX),
            fetch_interval: Duration::from_secs(num("TP_FETCH_INTERVAL_SECS", 30)),
            broadcast_interval: Duration::from_secs(num("TP_BROADCAST_INTERVAL_SECS", 30)),
            cache_cleanup_interval: Duration::from_secs(num(
                "TP_CACHE_CLEANUP_INTERVAL_SECS",
                3600,
            )),
            provider_timeout,
            dexscreener: endpoint(
                "TP_DEXSCREENER_URL",
                dexscreener::BASE_URL,
                "TP_DEXSCREENER_RPM",
                dexscreener::REQUESTS_PER_MINUTE,
            ),
            geckoterminal: endpoint(
                "TP_GECKOTERMINAL_URL",
                geckoterminal::BASE_URL,
                "TP_GECKOTERMINAL_RPM",
                geckoterminal::REQUESTS_PER_MINUTE,
            ),
            jupiter: endpoint(
                "TP_JUPITER_URL",
                jupiter::BASE_URL,
                "TP_JUPITER_RPM",
                jupiter::REQUESTS_PER_MINUTE,
            ),
            reference_usd_price: parse_or(lookup("TP_REFERENCE_USD_PRICE"), Decimal::from(130)),
            bounded_snapshot: parse_or(lookup("TP_BOUNDED_SNAPSHOT"), false),
            log_format,
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
