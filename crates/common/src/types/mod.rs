use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body returned by a successful `POST /upload`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadAck {
    pub message: String,
    /// Number of stored items right after this upload was appended.
    pub total: usize,
}

impl UploadAck {
    pub const STORED: &'static str = "data received and stored";

    pub fn stored(total: usize) -> Self {
        Self { message: Self::STORED.to_string(), total }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
