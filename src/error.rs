use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::error::ErrorKind;
use thiserror::Error;
use tracing::error;

/// Everything a handler can fail with. Client-attributable kinds carry a
/// fixed message; internal kinds keep their source for the log and answer
/// with a generic body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("credential signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("invalid {0}")]
    InvalidId(&'static str),
    #[error("invalid date, expected YYYY-M-D")]
    InvalidDate,
    #[error("name too long, max length is 128")]
    NameTooLong,
    #[error("missing required fields")]
    MissingFields,
    #[error("destination does not exist")]
    UnknownDestination,
    #[error("email already in use")]
    EmailTaken,
    #[error("not found")]
    NotFound,
    #[error("no {0} found")]
    EmptyList(&'static str),
    #[error("unauthorized")]
    Unauthorized,
}

/// Single classification point for storage failures. The only foreign key in
/// the schema is `trips.destination_id`, so a foreign-key violation always
/// means the referenced destination is missing. Anything unrecognized stays
/// wrapped as an internal database error.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(ref db)
                if matches!(db.kind(), ErrorKind::ForeignKeyViolation) =>
            {
                AppError::UnknownDestination
            }
            other => AppError::Database(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Database(_)
            | AppError::Jwt(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidId(_)
            | AppError::InvalidDate
            | AppError::NameTooLong
            | AppError::MissingFields
            | AppError::UnknownDestination
            | AppError::EmailTaken => StatusCode::BAD_REQUEST,
            AppError::NotFound | AppError::EmptyList(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("{self}");
            return (status, Json(json!({ "error": "unknown error" }))).into_response();
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
