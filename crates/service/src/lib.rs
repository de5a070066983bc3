//! Service layer for the JSON inbox.
//! - `storage` owns the in-memory payload store.
//! - `payloads` turns raw request bodies into stored items.

pub mod errors;
pub mod payloads;
pub mod storage;
