use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error(transparent)]
    Libcenote(#[from] libcenote::Error),
}

impl Error {
    pub(crate) fn to_client_status(&self) -> (StatusCode, String) {
        match self {
            Error::Other(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unknown error".to_string(),
            ),
            Error::Libcenote(libcenote::Error::SchemaMismatch { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Survey data does not match the configured schema".to_string(),
            ),
            Error::Libcenote(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Library error".to_string()),
        }
    }
}

// Tell axum how to convert `Error` into a response.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        warn!("Got error for response: {self:?}");
        self.to_client_status().into_response()
    }
}
