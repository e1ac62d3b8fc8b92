use serde::{Deserialize, Serialize};

// -- Envelope --

/// Every JSON endpoint answers with this shape, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub error: bool,
    pub message: String,
    pub data: Vec<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: Vec<T>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: Vec::new(),
        }
    }
}

// -- Auth --

/// Missing fields deserialize as empty strings so validation reports them
/// through the envelope instead of an extractor rejection.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignUpRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignInRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// -- Squiggs --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSquiggRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct TopSquiggsQuery {
    pub limit: Option<usize>,
}
