use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::CatalogError;

/// Catalog errors as HTTP responses. Persistence details never reach the
/// client; they are logged and collapsed to a 500.
pub struct ApiError(CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CatalogError::Validation { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string())
            }
            CatalogError::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            CatalogError::Conflict(_) => (StatusCode::CONFLICT, self.0.to_string()),
            CatalogError::Persistence(_) => {
                log::error!("{}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
