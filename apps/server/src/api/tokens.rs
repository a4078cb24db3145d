use std::{convert::Infallible, str::FromStr, sync::Arc, time::Duration};

use axum::{
    extract::{Query, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use futures_core::stream::Stream;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokenpulse_core::query::{Page, QueryFilter, DEFAULT_PAGE_SIZE};
use tokenpulse_core::TOKEN_UPDATES_TOPIC;
use tokenpulse_market_data::AssetRecord;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// SSE event name carrying change events.
pub const TOKEN_UPDATE_EVENT: &str = "token_update";

#[derive(Serialize)]
struct TokenListResponse {
    success: bool,
    data: Vec<AssetRecord>,
    count: usize,
}

impl From<Vec<AssetRecord>> for TokenListResponse {
    fn from(data: Vec<AssetRecord>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Serialize)]
struct PageResponse {
    success: bool,
    #[serde(flatten)]
    page: Page,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

/// Positive integer or the default page size.
fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Unknown values are ignored rather than rejected.
fn parse_opt<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<String>,
}

async fn list_tokens(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<TokenListResponse> {
    let limit = parse_limit(query.limit.as_deref());
    Json(state.aggregator.aggregate(limit).await.into())
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct FilterQuery {
    #[serde(alias = "time_period")]
    time_period: Option<String>,
    #[serde(alias = "sort_by")]
    sort_by: Option<String>,
    #[serde(alias = "sort_order")]
    sort_order: Option<String>,
    #[serde(alias = "min_volume")]
    min_volume: Option<String>,
    #[serde(alias = "min_market_cap")]
    min_market_cap: Option<String>,
    limit: Option<String>,
    cursor: Option<String>,
}

impl FilterQuery {
    fn into_filter(self) -> QueryFilter {
        let defaults = QueryFilter::default();
        QueryFilter {
            time_period: parse_opt(self.time_period.as_deref()),
            sort_by: parse_opt(self.sort_by.as_deref()).unwrap_or(defaults.sort_by),
            sort_order: parse_opt(self.sort_order.as_deref()).unwrap_or(defaults.sort_order),
            min_volume: parse_opt::<Decimal>(self.min_volume.as_deref()),
            min_market_cap: parse_opt::<Decimal>(self.min_market_cap.as_deref()),
            limit: parse_limit(self.limit.as_deref()),
            cursor: self.cursor.filter(|c| !c.is_empty()),
        }
    }
}

async fn filter_tokens(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Json<PageResponse> {
    let filter = query.into_filter();
    let page = state.aggregator.get_filtered(&filter).await;
    Json(PageResponse {
        success: true,
        page,
    })
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
    limit: Option<String>,
}

async fn search_tokens(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<TokenListResponse>> {
    let term = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Query parameter is required".to_string()))?;

    let limit = parse_limit(query.limit.as_deref());
    Ok(Json(state.aggregator.search(term, limit).await.into()))
}

async fn invalidate_cache(State(state): State<Arc<AppState>>) -> Json<MessageResponse> {
    state.aggregator.invalidate_all().await;
    Json(MessageResponse {
        success: true,
        message: "Cache invalidated successfully",
    })
}

async fn stream_token_updates(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = BroadcastStream::new(state.hub.subscribe(TOKEN_UPDATES_TOPIC));
    tracing::debug!(
        "Client joined {} ({} subscribers)",
        TOKEN_UPDATES_TOPIC,
        state.hub.subscriber_count(TOKEN_UPDATES_TOPIC)
    );

    let stream = tokio_stream::StreamExt::filter_map(receiver, |event| match event {
        Ok(evt) => match SseEvent::default().event(TOKEN_UPDATE_EVENT).json_data(&evt) {
            Ok(sse_event) => Some(Ok(sse_event)),
            Err(err) => {
                tracing::error!("Failed to serialize SSE payload for {}: {}", evt.kind(), err);
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!("SSE subscriber lagged, skipped {} events", skipped);
            None
        }
    });

    let stream = stream.take_until(state.shutdown_requested());

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tokens", get(list_tokens))
        .route("/tokens/filter", get(filter_tokens))
        .route("/tokens/search", get(search_tokens))
        .route("/tokens/cache/invalidate", post(invalidate_cache))
        .route("/tokens/stream", get(stream_token_updates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tokenpulse_core::query::{SortKey, SortOrder, TimePeriod};

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None), 20);
        assert_eq!(parse_limit(Some("5")), 5);
        assert_eq!(parse_limit(Some("0")), 20);
        assert_eq!(parse_limit(Some("lots")), 20);
    }

    #[test]
    fn test_filter_query_conversion() {
        let filter = FilterQuery {
            time_period: Some("24h".into()),
            sort_by: Some("market_cap".into()),
            sort_order: Some("asc".into()),
            min_volume: Some("1000.5".into()),
            min_market_cap: Some("oops".into()),
            limit: Some("10".into()),
            cursor: Some(String::new()),
        }
        .into_filter();

        assert_eq!(filter.time_period, Some(TimePeriod::OneDay));
        assert_eq!(filter.sort_by, SortKey::MarketCap);
        assert_eq!(filter.sort_order, SortOrder::Asc);
        assert_eq!(filter.min_volume, Some(dec!(1000.5)));
        assert_eq!(filter.min_market_cap, None);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.cursor, None);
    }

    #[test]
    fn test_unknown_sort_falls_back() {
        let filter = FilterQuery {
            sort_by: Some("hype".into()),
            sort_order: Some("sideways".into()),
            ..FilterQuery::default()
        }
        .into_filter();
        assert_eq!(filter, QueryFilter::default());
    }
}
