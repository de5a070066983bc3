use axum::{body::Bytes, extract::State, Json};
use common::types::UploadAck;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::ApiError;
use crate::observability;
use crate::routes::AppState;

/// Store the request body as one JSON item and report the new total.
pub async fn upload(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<UploadAck>, ApiError> {
    match service::payloads::ingest(&state.store, &body, observability::record_stored).await {
        Ok(total) => {
            info!(event = "payload_stored", total, "payload stored");
            Ok(Json(UploadAck::stored(total)))
        }
        Err(e) => {
            observability::record_rejected();
            warn!(event = "payload_rejected", reason = e.reason(), error = %e, "upload rejected");
            Err(e.into())
        }
    }
}

/// Every stored item, oldest first.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Value>> {
    Json(state.store.list().await)
}
