use std::sync::Arc;
use axum::{routing::{delete, get, post}, Router};
use shared_utils::AppState;

use crate::handlers::*;

pub fn create_patient_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(create_patient).get(list_patients))
        .route("/{id}", get(get_patient).put(update_patient).delete(delete_patient))
        .route("/{id}/history", post(append_history))
        .route("/{id}/history/{entry_id}", delete(remove_history))
        .with_state(state)
}
