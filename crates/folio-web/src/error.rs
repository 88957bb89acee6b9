use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_core::ContactError;
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    /// A refusal the visitor can act on; the message is shown as-is.
    Rejected(StatusCode, String),
    /// The detail is logged; only `public` reaches the client.
    Internal { public: &'static str, detail: String },
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl AppError {
    /// Maps a core error, using `failure` as the public text for internal ones.
    pub fn contact(err: ContactError, failure: &'static str) -> Self {
        if err.is_internal() {
            return AppError::Internal {
                public: failure,
                detail: err.to_string(),
            };
        }
        let status =
            StatusCode::from_u16(err.status_hint()).unwrap_or(StatusCode::BAD_REQUEST);
        AppError::Rejected(status, err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Rejected(status, msg) => (status, msg),
            AppError::Internal { public, detail } => {
                // Log the real error server-side, return generic message to client
                tracing::error!("Internal error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, public.to_string())
            }
        };

        let body = ErrorBody {
            success: false,
            error: message,
        };

        (status, axum::Json(body)).into_response()
    }
}
