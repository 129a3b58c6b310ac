use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use hvac_client::{query, Field, Reading, SeriesDescriptor};
use serde::{Deserialize, Serialize};

use crate::{
    chart::{self, ChartError, ChartLayout, LineUpdate, ScatterUpdate},
    config::ChartConfig,
    store::{DatasetStore, LoadState},
};

#[derive(Clone)]
pub struct ApiState {
    pub store: DatasetStore,
    pub chart: Arc<ChartConfig>,
}

impl ApiState {
    pub fn new(store: DatasetStore, chart: ChartConfig) -> Self {
        Self {
            store,
            chart: Arc::new(chart),
        }
    }
}

impl IntoResponse for ChartError {
    fn into_response(self) -> Response {
        let status = match &self {
            ChartError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            ChartError::LoadFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ChartError::Selection(_) => {
                metrics::counter!("hvac_invalid_selections_total").increment(1);
                StatusCode::BAD_REQUEST
            }
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/fields", get(fields))
        .route("/api/layout", get(layout))
        .route("/api/years", get(years))
        .route("/api/readings", get(readings))
        .route("/api/chart/line", get(line_chart))
        .route("/api/chart/scatter", get(scatter_chart))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    rows: Option<usize>,
    error: Option<String>,
}

async fn healthz(State(state): State<ApiState>) -> Json<Health> {
    let health = match state.store.state().await {
        LoadState::Pending => Health {
            status: "loading",
            rows: None,
            error: None,
        },
        LoadState::Ready(readings) => Health {
            status: "ready",
            rows: Some(readings.len()),
            error: None,
        },
        LoadState::Failed(reason) => Health {
            status: "failed",
            rows: None,
            error: Some(reason),
        },
    };
    Json(health)
}

async fn fields() -> Json<Vec<&'static SeriesDescriptor>> {
    Json(Field::ALL.iter().map(|f| f.descriptor()).collect())
}

async fn layout(State(state): State<ApiState>) -> Json<ChartLayout> {
    Json(ChartLayout::from_config(&state.chart))
}

async fn years(State(state): State<ApiState>) -> Result<Json<Vec<i32>>, ChartError> {
    let readings = state.store.readings().await?;
    Ok(Json(query::available_years(&readings)))
}

async fn readings(State(state): State<ApiState>) -> Result<Json<Vec<Reading>>, ChartError> {
    let readings = state.store.readings().await?;
    Ok(Json(readings.to_vec()))
}

#[derive(Debug, Deserialize)]
pub struct LineParams {
    pub field: String,
    pub previous: Option<String>,
}

async fn line_chart(
    State(state): State<ApiState>,
    Query(params): Query<LineParams>,
) -> Result<Json<LineUpdate>, ChartError> {
    metrics::counter!("hvac_chart_requests_total", "chart" => "line").increment(1);

    let readings = state.store.readings().await?;
    let previous = params
        .previous
        .as_deref()
        .map(str::parse::<Field>)
        .transpose()?;

    let update = chart::on_field_selected(&readings, &params.field, previous, &state.chart)?;
    Ok(Json(update))
}

#[derive(Debug, Deserialize)]
pub struct ScatterParams {
    /// One year, or several separated by commas.
    pub year: String,
}

async fn scatter_chart(
    State(state): State<ApiState>,
    Query(params): Query<ScatterParams>,
) -> Result<Json<ScatterUpdate>, ChartError> {
    metrics::counter!("hvac_chart_requests_total", "chart" => "scatter").increment(1);

    let readings = state.store.readings().await?;
    let update = chart::on_year_selected(&readings, &params.year, &state.chart)?;
    Ok(Json(update))
}
