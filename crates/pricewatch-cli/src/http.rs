//! HTTP trigger (axum)
//!
//! - `GET /export_xlsx?codes=A,B[&format=xlsx]`: 1 サイクル実行
//! - `GET /get_codes?codes=A,B`: 取得のみ（スナップショット・通知なし）
//! - `GET /healthz`
//!
//! サイクルは Mutex で直列化する（スナップショットファイルの競合防止）。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use pricewatch_core::app::{CycleError, PriceWatch};
use pricewatch_core::domain::{PriceRecord, ProductCode};
use pricewatch_core::ports::Document;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    watch: Arc<PriceWatch>,
    cycle_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(watch: PriceWatch) -> Self {
        Self {
            watch: Arc::new(watch),
            cycle_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CodesQuery {
    codes: Option<String>,
    format: Option<String>,
}

impl CodesQuery {
    fn product_codes(&self) -> Result<Vec<ProductCode>, ApiError> {
        let codes = self
            .codes
            .as_deref()
            .map(ProductCode::parse_list)
            .unwrap_or_default();
        if codes.is_empty() {
            return Err(ApiError::NoCodes);
        }
        Ok(codes)
    }

    fn wants_file(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("xlsx"))
    }
}

#[derive(Debug)]
pub enum ApiError {
    NoCodes,
    Cycle(CycleError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NoCodes => (StatusCode::BAD_REQUEST, "No codes provided".to_string()),
            Self::Cycle(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/export_xlsx", get(export_xlsx))
        .route("/get_codes", get(get_codes))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn export_xlsx(
    State(state): State<AppState>,
    Query(query): Query<CodesQuery>,
) -> Result<Response, ApiError> {
    let codes = query.product_codes()?;

    let _guard = state.cycle_lock.lock().await;
    let report = state
        .watch
        .run_cycle(&codes)
        .await
        .map_err(ApiError::Cycle)?;

    if query.wants_file() {
        if let Some(document) = &report.export {
            return Ok(attachment(document));
        }
        tracing::info!("no spreadsheet produced this cycle, returning summary");
    }
    Ok(Json(report.summary()).into_response())
}

pub async fn get_codes(
    State(state): State<AppState>,
    Query(query): Query<CodesQuery>,
) -> Result<Json<Vec<PriceRecord>>, ApiError> {
    let codes = query.product_codes()?;
    Ok(Json(state.watch.fetch_only(&codes).await))
}

pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn attachment(document: &Document) -> Response {
    (
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.file_name),
            ),
        ],
        document.bytes.clone(),
    )
        .into_response()
}
