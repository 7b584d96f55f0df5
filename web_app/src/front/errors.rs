use crate::config;
use derive_more::{Display, Error};
use ntex::{http, web};
use serde_json::json;

/// Every failure an endpoint can answer with. Rendered as a JSON envelope
/// `{success: false, message}`.
#[derive(Debug, Display, Error, PartialEq)]
pub enum ApiError {
    #[display("{_0}")]
    InvalidInput(#[error(not(source))] String),
    #[display("{_0}")]
    NotFound(#[error(not(source))] String),
    #[display("Invalid credentials")]
    Unauthenticated,
    #[display("Server error")]
    StoreFailure(#[error(not(source))] String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::StoreFailure(format!("{e:#}"))
    }
}

impl ApiError {
    /// The raw cause is only attached to store failures, and only on demand
    pub fn envelope(&self, expose_details: bool) -> serde_json::Value {
        let mut body = json!({
            "success": false,
            "message": self.to_string(),
        });

        if let (ApiError::StoreFailure(cause), true) = (self, expose_details) {
            body["error"] = json!(cause);
        }

        body
    }
}

impl web::error::WebResponseError for ApiError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        match self {
            ApiError::StoreFailure(cause) => tracing::error!("[StoreFailure] {cause}"),
            other => logfire::info!("request rejected: {error}", error = format!("{other:?}")),
        }

        web::HttpResponse::build(self.status_code())
            .json(&self.envelope(config::APP_CONFIG.expose_error_details))
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            ApiError::InvalidInput(_) => http::StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => http::StatusCode::NOT_FOUND,
            ApiError::Unauthenticated => http::StatusCode::UNAUTHORIZED,
            ApiError::StoreFailure(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
