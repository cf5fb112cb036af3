//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod birthdays;
mod share;
mod wishes;

pub use birthdays::*;
pub use share::*;
pub use wishes::*;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;

/// Response type that is either a success body or an error.
pub type ApiResult<T> = Result<T, AppError>;

/// 201 Created with a JSON body.
#[derive(Debug)]
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// Unwrap a JSON body, turning axum's plain-text rejection into the JSON error body.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!("Rejected JSON body: {}", rejection.body_text());
            Err(AppError::from_body_rejection(
                rejection.status(),
                rejection.body_text(),
            ))
        }
    }
}
