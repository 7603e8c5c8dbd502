use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower_http::trace::TraceLayer;

use crate::db::RecordStore;
use crate::handlers::records::{
    RECORDS_PATH, create_record, delete_record, get_record, health, list_records, update_record,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct RecordsState {
    pub store: RecordStore,
    pub body_limit: usize,
}

impl RecordsState {
    pub fn new(store: RecordStore, body_limit: usize) -> Self {
        Self { store, body_limit }
    }
}

pub fn records_router(state: RecordsState) -> Router {
    let body_limit = state.body_limit;
    Router::new()
        .route(RECORDS_PATH, get(list_records).post(create_record))
        .route(
            &format!("{RECORDS_PATH}/{{id}}"),
            get(get_record).patch(update_record).delete(delete_record),
        )
        .route("/healthz", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
