use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppError;

/// JSON request body whose rejections render as [`AppError::BadRequest`].
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(reject(rejection)),
        }
    }
}

fn reject(rejection: JsonRejection) -> AppError {
    tracing::debug!(status = rejection.status().as_u16(), "rejected request body");
    AppError::BadRequest(rejection.body_text())
}

/// Serializes `data` as the JSON body with the given status.
pub fn respond<T: Serialize>(data: T, status: StatusCode) -> Response {
    (status, Json(data)).into_response()
}
