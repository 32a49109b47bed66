use common::http::RouteError;

use super::auth::AuthError;
use crate::store::StoreError;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
	#[error("failed to parse http body: {0}")]
	ParseHttpBody(#[from] hyper::Error),
	#[error("store error: {0}")]
	Store(#[from] StoreError),
	#[error("auth error: {0}")]
	Auth(#[from] AuthError),
}
