use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use squigg_types::api::ApiResponse;

/// Failure kinds of the identity and content services.
///
/// `Display` is the human-readable reason callers see in the `message`
/// field of the JSON envelope.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Something went wrong, please try again.")]
    Persistence(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Malformed requests answer with the envelope instead of axum's plain-text body.
impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::InvalidInput(rejection.body_text())
    }
}

/// Run store work off the async runtime; every write rewrites the whole document.
pub async fn blocking<F, T, E>(f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<ServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        E::from(ServiceError::Persistence(e.into()))
    })?
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let ServiceError::Persistence(e) = &self {
            error!("Persistence failure: {:#}", e);
        }
        let body: ApiResponse = ApiResponse::failure(self.to_string());
        (self.status(), Json(body)).into_response()
    }
}
