use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use sooru_api::{ApiError, ApiErrorCode};
use sooru_core::UserId;
use sooru_model::User;
use sooru_store::StoreExt;

use super::error::HandlerError;
use crate::AppState;

/// JSON body whose rejections use the API error envelope.
pub(crate) struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(HandlerError(json_rejection(&rejection))),
        }
    }
}

fn json_rejection(rejection: &JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::bare(ApiErrorCode::PayloadTooLarge, "request body too large")
    } else {
        ApiError::validation_failed(rejection.body_text())
    }
}

/// The authenticated caller. Rejects with 401 when the bearer token is
/// missing, invalid, expired or names a user that no longer exists.
#[derive(Debug, Clone)]
pub(crate) struct Principal(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = HandlerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let user_id = state
            .tokens
            .authenticate(header, state.now_secs())
            .map_err(|err| {
                tracing::debug!(reason = err.as_str(), "authentication rejected");
                HandlerError(ApiError::unauthorized(err.as_str()))
            })?;
        if state.store.find::<User>(user_id.as_str())?.is_none() {
            return Err(HandlerError(ApiError::unauthorized("unknown user")));
        }
        Ok(Self(user_id))
    }
}
