use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Prefix of every 500 body returned by the blog endpoints.
pub const FETCH_ERROR_PREFIX: &str = "Error fetching blog";

/// Failure to establish the shared document store connection.
#[derive(Clone, Debug, Error)]
pub enum ConnectionError {
    #[error("database connection string is not configured")]
    MissingUri,

    #[error("invalid database connection string: {0}")]
    InvalidUri(String),

    #[error("database handshake failed: {0}")]
    Handshake(String),

    #[error("database connection has been closed")]
    Closed,
}

/// Failure while reading from an established connection.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query failed: {0}")]
    Driver(String),

    #[error("malformed blog document: {0}")]
    Decode(String),
}

impl From<mongodb::error::Error> for QueryError {
    fn from(err: mongodb::error::Error) -> Self {
        match *err.kind {
            mongodb::error::ErrorKind::BsonDeserialization(ref e) => {
                QueryError::Decode(e.to_string())
            }
            _ => QueryError::Driver(err.to_string()),
        }
    }
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("{0}")]
    NotFound(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Connection(err) => {
                tracing::error!(error = %err, "Database connection error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{FETCH_ERROR_PREFIX}: {err}"),
                )
            }
            AppError::Query(err) => {
                tracing::error!(error = %err, "Database query error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{FETCH_ERROR_PREFIX}: {err}"),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.status_and_body().into_response()
    }
}
