//! Upload ingestion: raw body bytes in, stored item count out.

use serde_json::Value;
use tracing::debug;

use crate::errors::ServiceError;
use crate::storage::memory_store::PayloadStore;

/// Parse a request body as a single JSON value.
///
/// Empty or whitespace-only bodies are reported separately from malformed ones.
pub fn parse_payload(body: &[u8]) -> Result<Value, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ServiceError::EmptyPayload);
    }
    Ok(serde_json::from_slice(body)?)
}

/// Parse `body` and append it to `store`; the store is untouched on error.
///
/// `on_stored` runs with the new item count before the store lock is released.
pub async fn ingest<F>(store: &PayloadStore, body: &[u8], on_stored: F) -> Result<usize, ServiceError>
where
    F: FnOnce(usize),
{
    let value = parse_payload(body)?;
    let total = store.append_with(value, on_stored).await;
    debug!(total, bytes = body.len(), "payload appended");
    Ok(total)
}
