//! Request extractors.

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use celula_common::AppError;
use celula_db::entities::member;
use serde::Serialize;

/// JSON body extractor and responder.
///
/// Same as `axum::Json`, except that a rejected body is reported through
/// [`AppError`] so clients always get the `{"error": ...}` envelope.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Authenticated member extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub member::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware
        parts
            .extensions
            .get::<member::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated member extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<member::Model>);

impl MaybeAuthUser {
    /// Id of the viewer, if any.
    #[must_use]
    pub fn id(&self) -> Option<i32> {
        self.0.as_ref().map(|m| m.id)
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<member::Model>().cloned()))
    }
}
