use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::controller;
use crate::dataset::Dataset;
use crate::error::DashboardError;
use crate::filter::RangeSelection;
use crate::models::ALL_TEAMS;

const DASHBOARD_HTML: &str = include_str!("../assets/dashboard.html");

/// Handlers only ever read the dataset, so sharing it needs no lock.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
}

pub struct DashboardServer {
    port: u16,
    state: AppState,
}

impl DashboardServer {
    pub fn new(dataset: Arc<Dataset>, port: u16) -> Self {
        Self {
            port,
            state: AppState { dataset },
        }
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let app = build_router(self.state);

        let addr = SocketAddr::from(([127, 0, 0, 1], self.port));
        info!("Dashboard listening on http://{addr}");

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_home))
        .route("/api/options", get(options))
        .route("/api/charts", get(charts))
        .route("/api/charts/initial", get(initial_charts))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn dashboard_home() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[derive(Debug, Serialize)]
struct Mark {
    index: usize,
    label: NaiveDate,
}

#[derive(Debug, Serialize)]
struct DashboardOptions {
    teams: Vec<String>,
    default_team: &'static str,
    marks: Vec<Mark>,
    default_range: RangeSelection,
}

async fn options(State(state): State<AppState>) -> Json<DashboardOptions> {
    let dataset = &state.dataset;
    let mut teams = dataset.teams().to_vec();
    teams.push(ALL_TEAMS.to_string());

    let marks = dataset
        .marks()
        .iter()
        .enumerate()
        .map(|(index, label)| Mark {
            index,
            label: *label,
        })
        .collect();

    Json(DashboardOptions {
        teams,
        default_team: ALL_TEAMS,
        marks,
        default_range: dataset.default_range(),
    })
}

#[derive(Debug, Deserialize)]
struct ChartQuery {
    team: Option<String>,
    lo: Option<usize>,
    hi: Option<usize>,
}

async fn charts(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<Value>, ApiError> {
    let dataset = &state.dataset;
    let default = dataset.default_range();
    let range = RangeSelection::new(
        query.lo.unwrap_or(default.lo),
        query.hi.unwrap_or(default.hi),
    );
    let team = query.team.as_deref().unwrap_or(ALL_TEAMS);

    let data = controller::update(dataset, team, range)?;
    Ok(Json(data.to_plotly()))
}

async fn initial_charts(State(state): State<AppState>) -> Json<Value> {
    Json(controller::initial(&state.dataset).to_plotly())
}

#[derive(Debug)]
struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_invalid_selection() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        warn!("Chart request failed: {}", self.0);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample_dataset;

    fn state() -> AppState {
        AppState {
            dataset: Arc::new(sample_dataset()),
        }
    }

    #[tokio::test]
    async fn options_list_teams_then_all() {
        let Json(opts) = options(State(state())).await;
        assert_eq!(opts.teams, vec!["Engineering", "Sales", "All"]);
        assert_eq!(opts.default_team, "All");
        assert_eq!(opts.marks.len(), 7);
        assert_eq!(opts.default_range, RangeSelection::new(1, 6));
    }

    #[tokio::test]
    async fn charts_default_to_company_and_default_range() {
        let query = ChartQuery {
            team: None,
            lo: None,
            hi: None,
        };
        let Json(body) = charts(State(state()), Query(query)).await.unwrap();
        assert_eq!(body["breakdowns"].as_array().unwrap().len(), 4);
        assert_eq!(body["plot"]["data"][0]["name"], "<b>Company</b> Productivity");
        // weeks strictly between week 3 and week 18
        assert_eq!(body["plot"]["data"][0]["x"].as_array().unwrap().len(), 14);
    }

    #[tokio::test]
    async fn unknown_team_is_bad_request() {
        let query = ChartQuery {
            team: Some("Marketing".to_string()),
            lo: Some(1),
            hi: Some(3),
        };
        let err = charts(State(state()), Query(query)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn range_past_last_mark_is_bad_request() {
        let query = ChartQuery {
            team: Some("Sales".to_string()),
            lo: Some(0),
            hi: Some(17),
        };
        let err = charts(State(state()), Query(query)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn page_labels_slider_marks() {
        let Html(page) = dashboard_home().await;
        assert!(page.contains(r#"<input id="lo" type="range" step="1" list="marks">"#));
        assert!(page.contains(r#"<datalist id="marks">"#));
        assert!(page.contains(r#"<div id="ticks">"#));

        let Json(opts) = options(State(state())).await;
        let labels: Vec<NaiveDate> = opts.marks.iter().map(|m| m.label).collect();
        assert_eq!(labels, state().dataset.marks());
        assert!(opts.marks.iter().enumerate().all(|(i, m)| m.index == i));
    }

    #[tokio::test]
    async fn initial_charts_are_unfiltered() {
        let Json(body) = initial_charts(State(state())).await;
        assert_eq!(body["plot"]["data"][0]["x"].as_array().unwrap().len(), 20);
    }
}
