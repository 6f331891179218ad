use axum::{
    Json, Router,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{info, warn};
use payment_lookup::{
    ClipboardRelay, Credentials, LookupController, LookupError, PaymentClient,
    lookup::demo_credentials,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::model::{CopyResponse, ErrorResponse, StateView};

pub type Lookup = LookupController<PaymentClient>;

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<Lookup>,
    pub clipboard: Arc<ClipboardRelay>,
}

impl FromRef<AppState> for Arc<ClipboardRelay> {
    fn from_ref(state: &AppState) -> Self {
        state.clipboard.clone()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/state", get(handle_state))
        .route("/lookup", post(handle_lookup))
        .route("/lookup/demo", post(handle_demo_lookup))
        .route("/page/next", post(handle_next_page))
        .route("/page/prev", post(handle_prev_page))
        .route("/copy/{id}", post(handle_copy))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn render(state: &AppState) -> Json<StateView> {
    Json(StateView::new(&state.lookup.snapshot(), state.clipboard.copied()))
}

async fn handle_state(State(state): State<AppState>) -> Json<StateView> {
    render(&state)
}

async fn handle_lookup(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Response {
    submit(&state, credentials).await
}

async fn handle_demo_lookup(State(state): State<AppState>) -> Response {
    let credentials = demo_credentials(state.lookup.demo_api_key());
    submit(&state, credentials).await
}

async fn submit(state: &AppState, credentials: Credentials) -> Response {
    if state.lookup.is_loading() {
        warn!("Lookup requested while another one is in flight");
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "A lookup is already in progress".to_string(),
            }),
        )
            .into_response();
    }

    match state.lookup.submit(credentials).await {
        Ok(_) => render(state).into_response(),
        Err(e @ LookupError::MissingCredentials) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn handle_next_page(State(state): State<AppState>) -> Json<StateView> {
    state.lookup.next_page();
    render(&state)
}

async fn handle_prev_page(State(state): State<AppState>) -> Json<StateView> {
    state.lookup.prev_page();
    render(&state)
}

async fn handle_copy(
    State(clipboard): State<Arc<ClipboardRelay>>,
    Path(id): Path<i64>,
) -> Json<CopyResponse> {
    let mark = clipboard.copy(id).await;
    info!("Copied payment method id {}", mark.id);
    Json(CopyResponse {
        id: mark.id,
        copied_for_ms: clipboard.hold().as_millis() as u64,
    })
}
