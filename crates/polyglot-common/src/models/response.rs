//! Response envelopes shared by the mutation endpoints.

use serde::Serialize;

/// `{success, message}` plus the affected record when there is one.
#[derive(Debug, Serialize)]
pub struct MutationResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> MutationResponse<T> {
    pub fn with_data(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }
}

impl MutationResponse<()> {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: None,
        }
    }
}
