use common::http::ext::{OptionExt, ResultExt};
use common::http::router::ext::RequestExt as _;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};

use super::profiles::fetch_profile;
use super::{json_response, redirect, require_auth};
use crate::api::error::Result;
use crate::api::ext::RequestExt;
use crate::api::Body;
use crate::global::ApiGlobal;
use crate::pagination::requested_page;
use crate::services::{FeedService, FollowManager};

/// The viewer's feed: posts of every author they follow.
pub async fn feed<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let auth = require_auth(&req).await?;

	let page = FeedService::new(global.store().clone())
		.feed_page(
			auth.user.id,
			global.config().api.posts_per_page,
			requested_page(req.uri().query()),
		)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to build feed"))?;

	json_response(StatusCode::OK, &page)
}

pub async fn follow<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let auth = require_auth(&req).await?;
	let username = req.param("username").map_err_route((StatusCode::NOT_FOUND, "user not found"))?;

	let author = fetch_profile(&global, username).await?;
	FollowManager::new(global.store().clone())
		.follow(auth.user.id, author.id)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to create follow"))?;

	Ok(redirect(StatusCode::FOUND, &format!("/profile/{}/", author.username)))
}

pub async fn unfollow<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let auth = require_auth(&req).await?;
	let username = req.param("username").map_err_route((StatusCode::NOT_FOUND, "user not found"))?;

	let author = fetch_profile(&global, username).await?;
	FollowManager::new(global.store().clone())
		.unfollow(auth.user.id, author.id)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to delete follow"))?;

	Ok(redirect(StatusCode::FOUND, &format!("/profile/{}/", author.username)))
}
