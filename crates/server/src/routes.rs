//! Router and request handlers

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Json, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use pnlcard_core::{
    format_figures, gain_for, unwrap_body, validate, Theme, ValidatedRequest,
};
use pnlcard_render::{compose_card, SurfaceFactory};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Format used when the server stamps a card with the current time
const TIMESTAMP_FORMAT: &str = "%b %-d, %Y %H:%M UTC";

const GAIN_HEADER: HeaderName = HeaderName::from_static("x-gain-percentage");

/// Build the axum router with all routes and middleware
pub fn build_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/api/card", post(handle_card))
        .route("/api/gain", post(handle_gain))
        .route("/api/themes", get(handle_themes))
        .route("/api/health", get(handle_health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Gain figures returned by `POST /api/gain`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GainResponse {
    pub ticker: String,
    pub percentage: f64,
    pub is_profit: bool,
    pub gain_text: String,
    pub entry_price_text: String,
    pub current_price_text: String,
    pub theme: Theme,
}

/// Unwrap, validate and count a JSON body
fn validated(
    state: &AppState,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<ValidatedRequest, ApiError> {
    let Json(raw) = payload.map_err(|rejection| {
        state.metrics.validation_failed();
        ApiError::from(rejection)
    })?;

    validate(unwrap_body(&raw)).map_err(|errors| {
        state.metrics.validation_failed();
        ApiError::from(errors)
    })
}

/// POST /api/card
///
/// Renders the PNG card for a trade.
async fn handle_card(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let mut request = validated(&state, payload)?;
    if state.stamp_time {
        request = request.with_default_timestamp(
            chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string(),
        );
    }

    let gain = gain_for(&request)?;
    let figures = format_figures(&request, &gain);
    let rounded = gain.percentage.rounded();

    let renderer = state.renderer.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        compose_card(renderer.as_ref(), &request, &gain, &figures)
    })
    .await;

    let bytes = match rendered {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            state.metrics.render_failed();
            return Err(e.into());
        }
        Err(e) => {
            state.metrics.render_failed();
            return Err(ApiError::render(e.to_string()));
        }
    };
    state.metrics.card_rendered();
    debug!(bytes = bytes.len(), "Card served");

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Ok(value) = HeaderValue::from_str(&rounded.to_string()) {
        headers.insert(GAIN_HEADER, value);
    }

    Ok((headers, bytes).into_response())
}

/// POST /api/gain
///
/// Same pipeline as the card, returning the formatted figures as JSON.
async fn handle_gain(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GainResponse>, ApiError> {
    let request = validated(&state, payload)?;
    let gain = gain_for(&request)?;
    let figures = format_figures(&request, &gain);
    state.metrics.gain_computed();

    Ok(Json(GainResponse {
        ticker: request.ticker().to_string(),
        percentage: gain.percentage.rounded(),
        is_profit: gain.is_profit,
        gain_text: figures.gain_text,
        entry_price_text: figures.entry_price_text,
        current_price_text: figures.current_price_text,
        theme: request.theme(),
    }))
}

/// GET /api/themes
async fn handle_themes() -> Json<[Theme; 3]> {
    Json(Theme::ALL)
}

/// GET /api/health
async fn handle_health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "fontLoaded": state.renderer.has_font(),
        "requests": state.metrics.snapshot(),
        "uptimeSeconds": state.started_at.elapsed().as_secs(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pnlcard_render::SkiaFactory;
    use tower::ServiceExt;

    fn app() -> (Router, AppState) {
        let state = AppState::new(SkiaFactory::without_font(), false);
        (build_router(state.clone(), 16 * 1024), state)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_gain_endpoint() {
        let (app, state) = app();
        let response = app
            .oneshot(post_json(
                "/api/gain",
                r#"{"ticker":"bonk","entryPrice":100,"currentPrice":150,"theme":"degen"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["ticker"], "BONK");
        assert_eq!(body["percentage"], 50.0);
        assert_eq!(body["isProfit"], true);
        assert_eq!(body["gainText"], "+50.0%");
        assert_eq!(body["entryPriceText"], "$100.00");
        assert_eq!(body["currentPriceText"], "$150.00");
        assert_eq!(body["theme"], "degen");
        assert_eq!(state.metrics.snapshot().gains, 1);
    }

    #[tokio::test]
    async fn test_wrapped_body_is_unwrapped() {
        let (app, _) = app();
        let response = app
            .oneshot(post_json(
                "/api/gain",
                r#"{"body":{"ticker":"wif","entryPrice":2,"currentPrice":1}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["gainText"], "-50.0%");
        assert_eq!(body["isProfit"], false);
    }

    #[tokio::test]
    async fn test_validation_errors_aggregated() {
        let (app, state) = app();
        let response = app.oneshot(post_json("/api/card", "{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Validation failed");
        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["ticker", "entryPrice", "currentPrice"]);
        assert_eq!(state.metrics.snapshot().validation_failures, 1);
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (app, _) = app();
        let response = app
            .oneshot(post_json("/api/gain", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_card_endpoint_returns_png() {
        let (app, state) = app();
        let response = app
            .oneshot(post_json(
                "/api/card",
                r#"{"ticker":"pepe","entryPrice":0.0000024,"currentPrice":0.0000096}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        assert_eq!(response.headers()["x-gain-percentage"], "300");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(state.metrics.snapshot().cards, 1);
    }

    #[tokio::test]
    async fn test_identical_requests_give_identical_cards() {
        let (app, _) = app();
        let body = r#"{"ticker":"sol","entryPrice":20,"currentPrice":180,"theme":"light"}"#;

        let first = app.clone().oneshot(post_json("/api/card", body)).await.unwrap();
        let second = app.oneshot(post_json("/api/card", body)).await.unwrap();

        let first = to_bytes(first.into_body(), usize::MAX).await.unwrap();
        let second = to_bytes(second.into_body(), usize::MAX).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_themes_and_health() {
        let (app, _) = app();
        let themes = app
            .clone()
            .oneshot(Request::get("/api/themes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(json_body(themes).await, json!(["dark", "light", "degen"]));

        let health = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(health).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["fontLoaded"], false);
        assert_eq!(body["requests"]["cards"], 0);
    }

    #[tokio::test]
    async fn test_card_text_reaches_png() {
        let state = AppState::new(SkiaFactory::bundled().unwrap(), false);
        let app = build_router(state, 16 * 1024);

        let card = |ticker: &str| {
            post_json(
                "/api/card",
                &format!(r#"{{"ticker":"{}","entryPrice":1,"currentPrice":2}}"#, ticker),
            )
        };
        let pepe = app.clone().oneshot(card("pepe")).await.unwrap();
        let wif = app.clone().oneshot(card("wif")).await.unwrap();
        let pepe = to_bytes(pepe.into_body(), usize::MAX).await.unwrap();
        let wif = to_bytes(wif.into_body(), usize::MAX).await.unwrap();
        assert_ne!(pepe, wif);

        let health = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(json_body(health).await["fontLoaded"], true);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let state = AppState::new(SkiaFactory::without_font(), false);
        let app = build_router(state, 64);
        let big = format!(r#"{{"ticker":"{}","entryPrice":1,"currentPrice":1}}"#, "a".repeat(200));
        let response = app.oneshot(post_json("/api/gain", &big)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
