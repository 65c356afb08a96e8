use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::http_server::pages;

/// Failures a page handler hands back to axum.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Not found")]
    NotFound,
    // `Report` is not `std::error::Error`, so no #[from]/#[source] here
    #[error("Internal error: {0}")]
    Internal(color_eyre::Report),
}

impl From<color_eyre::Report> for HttpError {
    fn from(err: color_eyre::Report) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::NotFound => (StatusCode::NOT_FOUND, pages::not_found()).into_response(),
            HttpError::Internal(err) => {
                log::error!("{err:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, pages::server_error()).into_response()
            }
        }
    }
}
