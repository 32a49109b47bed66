use std::sync::Arc;

use common::http::ext::{OptionExt, ResultExt};
use common::http::router::ext::RequestExt as _;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde_json::json;

use super::posts::listing_page;
use super::{auth_of, json_response};
use crate::api::error::Result;
use crate::api::ext::RequestExt;
use crate::api::Body;
use crate::database::User;
use crate::global::ApiGlobal;
use crate::services::FollowManager;
use crate::store::PostFilter;

pub(in crate::api) async fn fetch_profile<G: ApiGlobal>(global: &Arc<G>, username: &str) -> Result<User> {
	global
		.store()
		.user_by_username(username)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch user"))?
		.map_err_route((StatusCode::NOT_FOUND, "user not found"))
}

pub async fn profile<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let username = req.param("username").map_err_route((StatusCode::NOT_FOUND, "user not found"))?;

	let author = fetch_profile(&global, username).await?;
	let page = listing_page(&global, &PostFilter::Author(author.id), req.uri().query()).await?;

	// `following` is only meaningful for an authenticated viewer.
	let following = match auth_of(&req).await {
		Some(auth) => Some(
			FollowManager::new(global.store().clone())
				.is_following(auth.user.id, author.id)
				.await
				.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch follow state"))?,
		),
		None => None,
	};

	json_response(
		StatusCode::OK,
		&json!({
			"username": author.username,
			"posts_count": page.total_items,
			"following": following,
			"page": page,
		}),
	)
}
