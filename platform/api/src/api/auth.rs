use common::http::RouteError;
use hyper::StatusCode;

use super::error::ApiError;
use crate::database::{Session, User};

#[derive(thiserror::Error, Debug, Clone)]
pub enum AuthError {
	#[error("token must be ascii only")]
	HeaderToStr,
	#[error("token must be a bearer token")]
	NotBearerToken,
	#[error("not logged in")]
	NotLoggedIn,
	#[error("invalid token")]
	InvalidToken,
	#[error("user not found")]
	UserNotFound,
}

impl From<AuthError> for RouteError<ApiError> {
	fn from(value: AuthError) -> Self {
		RouteError::from(match &value {
			AuthError::HeaderToStr => (StatusCode::BAD_REQUEST, "token must be ascii only"),
			AuthError::NotBearerToken => (StatusCode::BAD_REQUEST, "token must be a bearer token"),
			AuthError::NotLoggedIn => (StatusCode::UNAUTHORIZED, "not logged in"),
			AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid token"),
			AuthError::UserNotFound => (StatusCode::INTERNAL_SERVER_ERROR, "user not found"),
		})
		.with_source(Some(ApiError::Auth(value)))
	}
}

/// The resolved identity of a request, stored on the [`RequestContext`]
/// by the auth middleware.
///
/// [`RequestContext`]: super::request_context::RequestContext
#[derive(Clone)]
pub struct AuthData {
	pub session: Session,
	pub user: User,
}
