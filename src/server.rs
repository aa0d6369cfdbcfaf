// Web Server - dashboard page, layout and control-event dispatch (Axum)

use crate::chart::Figure;
use crate::controller::{BindingError, Dispatcher};
use crate::dataset::TransactionTable;
use crate::layout::DashboardLayout;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Shared application state; everything in it is read-only
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub layout: Arc<DashboardLayout>,
    pub initial: Arc<Vec<InitialChart>>,
}

impl AppState {
    pub fn new(table: Arc<TransactionTable>) -> Self {
        let layout = DashboardLayout::build(&table);
        let dispatcher = Dispatcher::new(table);

        // Bindings are pure, so the first render is the same for every visitor
        let initial = layout
            .panels()
            .zip(dispatcher.initial_updates(&layout))
            .map(|(panel, result)| match result {
                Ok(update) => InitialChart {
                    output: update.output,
                    figure: Some(update.figure),
                    error: None,
                },
                Err(e) => InitialChart {
                    output: panel.graph_id.clone(),
                    figure: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        Self {
            dispatcher: Arc::new(dispatcher),
            layout: Arc::new(layout),
            initial: Arc::new(initial),
        }
    }
}

/// First render of one graph; a failed binding carries its error instead
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitialChart {
    pub output: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub figure: Option<Figure>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Event body with the value kept raw until the event is resolved
#[derive(Deserialize)]
struct EventRequest {
    event: String,
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    known_events: Option<Vec<&'static str>>,
}

fn error_response(status: StatusCode, error: String, known_events: Option<Vec<&'static str>>) -> Response {
    (status, Json(ErrorResponse { error, known_events })).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / - Serve the dashboard page
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

/// GET /api/layout - Static page description
async fn get_layout(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.layout.as_ref().clone())
}

/// GET /api/initial - Every graph rendered from the layout's initial values
async fn get_initial(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.initial.as_ref().clone())
}

/// POST /api/events - Re-render the graph bound to one control
async fn post_event(
    State(state): State<AppState>,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "malformed event body");
            return error_response(rejection.status(), rejection.body_text(), None);
        }
    };

    match state.dispatcher.dispatch_json(&request.event, request.value) {
        Ok(update) => Json(update).into_response(),
        Err(e) => {
            warn!(event = %request.event, error = %e, "control event rejected");
            match e {
                BindingError::UnknownEvent(_) => {
                    error_response(StatusCode::NOT_FOUND, e.to_string(), Some(state.dispatcher.events()))
                }
                BindingError::InvalidValue { .. } => {
                    error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string(), None)
                }
            }
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/layout", get(get_layout))
        .route("/initial", get(get_initial))
        .route("/events", post(post_event))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
}
