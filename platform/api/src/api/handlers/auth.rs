use common::http::ext::{OptionExt, ResultExt};
use common::http::RouteError;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{json_response, parse_json_body, validation_error};
use crate::api::error::Result;
use crate::api::ext::RequestExt;
use crate::api::Body;
use crate::database::{Session, User};
use crate::global::ApiGlobal;
use crate::store::StoreError;

#[derive(Deserialize)]
struct Credentials {
	#[serde(default)]
	username: String,
	#[serde(default)]
	password: String,
}

pub async fn signup<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let body: Credentials = parse_json_body(req).await?;

	if let Err(message) = User::validate_username(&body.username) {
		return Ok(validation_error("username", message));
	}

	if body.password.len() < 8 {
		return Ok(validation_error("password", "password must be at least 8 characters long"));
	}

	let user = User::new(body.username, &body.password);
	match global.store().create_user(&user).await {
		Ok(()) => {}
		Err(StoreError::Conflict(field)) => return Ok(validation_error(field, "is already taken")),
		Err(err) => {
			return Err(RouteError::from((StatusCode::INTERNAL_SERVER_ERROR, "failed to create user"))
				.with_source(Some(err.into())));
		}
	}

	json_response(
		StatusCode::CREATED,
		&json!({
			"id": user.id,
			"username": user.username,
		}),
	)
}

/// The target of the unauthenticated redirect. There is no form to
/// render, clients POST the same path.
pub async fn login_page<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let next = req
		.uri()
		.query()
		.and_then(|query| {
			url::form_urlencoded::parse(query.as_bytes())
				.find(|(key, _)| key == "next")
				.map(|(_, value)| value.into_owned())
		})
		.unwrap_or_else(|| "/".to_owned());

	json_response(
		StatusCode::OK,
		&json!({
			"detail": "authentication required",
			"next": next,
		}),
	)
}

pub async fn login<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let body: Credentials = parse_json_body(req).await?;

	let user = global
		.store()
		.user_by_username(&body.username)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch user"))?
		.map_err_route((StatusCode::UNAUTHORIZED, "invalid username or password"))?;

	if !user.verify_password(&body.password) {
		return Err((StatusCode::UNAUTHORIZED, "invalid username or password").into());
	}

	let session = Session::new(user.id);
	global
		.store()
		.create_session(&session)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to create session"))?;

	json_response(
		StatusCode::OK,
		&json!({
			"token": session.token,
		}),
	)
}
