use bytes::Bytes;
use common::http::ext::{OptionExt, ResultExt};
use common::make_response;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use serde_json::json;

use super::auth::AuthData;
use super::error::Result;
use super::request_context::RequestContext;
use super::Body;
use crate::database::Ulid;

pub mod auth;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod profiles;

pub(super) fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Body>> {
	let body = serde_json::to_string(value)
		.map_ignore_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to serialize response"))?;

	Ok(make_response!(status, body))
}

pub(super) fn redirect(status: StatusCode, location: &str) -> Response<Body> {
	hyper::Response::builder()
		.status(status)
		.header(hyper::header::LOCATION, location)
		.body(Body::new(Bytes::new()))
		.expect("failed to build response")
}

/// 400 response in the shape clients expect for invalid form input,
/// one message per offending field.
pub(super) fn validation_error(field: &str, message: &str) -> Response<Body> {
	let mut errors = serde_json::Map::new();
	errors.insert(field.to_owned(), message.into());

	make_response!(StatusCode::BAD_REQUEST, json!({ "errors": errors }))
}

pub(super) async fn auth_of<B>(req: &Request<B>) -> Option<AuthData> {
	match req.extensions().get::<RequestContext>() {
		Some(context) => context.auth().await,
		None => None,
	}
}

/// Resolves the viewer or fails the request with a 302 to the login
/// page, carrying the original path in `next`.
pub(super) async fn require_auth<B>(req: &Request<B>) -> Result<AuthData> {
	match auth_of(req).await {
		Some(auth) => Ok(auth),
		None => {
			let next: String = url::form_urlencoded::byte_serialize(req.uri().path().as_bytes()).collect();
			Err(redirect(StatusCode::FOUND, &format!("/auth/login/?next={next}")).into())
		}
	}
}

/// Reads a path parameter as a ULID. Malformed ids resolve to 404 like
/// unknown ones, the distinction is not interesting to clients.
pub(super) fn param_ulid<B>(req: &Request<B>, key: &str) -> Result<Ulid> {
	use common::http::router::ext::RequestExt;

	req.param(key)
		.and_then(|value| Ulid::from_string(value).ok())
		.map_err_route((StatusCode::NOT_FOUND, "not found"))
}

pub(super) async fn parse_json_body<T: serde::de::DeserializeOwned>(req: Request<Incoming>) -> Result<T> {
	let body = req
		.into_body()
		.collect()
		.await
		.map_err_route((StatusCode::BAD_REQUEST, "failed to read request body"))?
		.to_bytes();

	serde_json::from_slice(&body).map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid json body"))
}
