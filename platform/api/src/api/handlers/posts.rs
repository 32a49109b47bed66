use std::sync::Arc;

use common::http::ext::ResultExt;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{json_response, param_ulid, parse_json_body, redirect, require_auth, validation_error};
use crate::api::error::Result;
use crate::api::ext::RequestExt;
use crate::api::Body;
use crate::database::{Comment, Post, Ulid};
use crate::global::ApiGlobal;
use crate::pagination::{requested_page, Page, PageSpec};
use crate::store::PostFilter;

/// Runs one counted listing query pair for any filter. Every listing
/// endpoint funnels through here so they all share the clamping
/// pagination behavior.
pub(in crate::api) async fn listing_page<G: ApiGlobal>(
	global: &Arc<G>,
	filter: &PostFilter,
	query: Option<&str>,
) -> Result<Page<Post>> {
	let per_page = global.config().api.posts_per_page;
	let requested = requested_page(query);

	let total = global
		.store()
		.count_posts(filter)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to count posts"))?;
	let spec = PageSpec::clamped(total, per_page, requested);
	let posts = global
		.store()
		.list_posts(filter, spec.limit, spec.offset)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch posts"))?;

	Ok(Page::new(posts, spec, total))
}

pub async fn index<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let page = listing_page(&global, &PostFilter::All, req.uri().query()).await?;

	json_response(StatusCode::OK, &page)
}

pub async fn detail<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let post_id = param_ulid(&req, "id")?;

	let post = fetch_post(&global, post_id).await?;
	let author = global
		.store()
		.user_by_id(post.author_id)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch author"))?;
	let comments = global
		.store()
		.comments_for_post(post.id)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch comments"))?;

	json_response(
		StatusCode::OK,
		&json!({
			"post": post,
			"author": author.map(|author| author.username),
			"comments": comments,
		}),
	)
}

#[derive(Deserialize)]
struct PostBody {
	#[serde(default)]
	text: String,
	group: Option<String>,
	image: Option<String>,
}

/// GET of the create form. There is no form to render here, the stub
/// response keeps the auth-redirect contract observable.
pub async fn create_form<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let auth = require_auth(&req).await?;

	json_response(StatusCode::OK, &json!({ "author": auth.user.username }))
}

pub async fn edit_form<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let auth = require_auth(&req).await?;
	let post_id = param_ulid(&req, "id")?;

	let post = fetch_post(&global, post_id).await?;
	if post.author_id != auth.user.id {
		return Ok(redirect(StatusCode::SEE_OTHER, &format!("/posts/{}/", post.id)));
	}

	json_response(StatusCode::OK, &json!({ "post": post }))
}

pub async fn create<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let auth = require_auth(&req).await?;
	let body: PostBody = parse_json_body(req).await?;

	if body.text.trim().is_empty() {
		return Ok(validation_error("text", "this field is required"));
	}

	let group_id = match resolve_group(&global, body.group.as_deref()).await? {
		Ok(group_id) => group_id,
		Err(resp) => return Ok(resp),
	};

	let post = Post::new(auth.user.id, group_id, body.text, body.image);
	global
		.store()
		.create_post(&post)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to create post"))?;

	Ok(redirect(StatusCode::FOUND, &format!("/profile/{}/", auth.user.username)))
}

pub async fn edit<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let auth = require_auth(&req).await?;
	let post_id = param_ulid(&req, "id")?;

	let post = fetch_post(&global, post_id).await?;
	// Editing someone else's post bounces back to the detail view.
	if post.author_id != auth.user.id {
		return Ok(redirect(StatusCode::SEE_OTHER, &format!("/posts/{}/", post.id)));
	}

	let body: PostBody = parse_json_body(req).await?;
	if body.text.trim().is_empty() {
		return Ok(validation_error("text", "this field is required"));
	}

	let group_id = match resolve_group(&global, body.group.as_deref()).await? {
		Ok(group_id) => group_id,
		Err(resp) => return Ok(resp),
	};

	// pub_date and author never change on edit.
	global
		.store()
		.update_post(post.id, &body.text, group_id, body.image.as_deref())
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to update post"))?;

	Ok(redirect(StatusCode::SEE_OTHER, &format!("/posts/{}/", post.id)))
}

#[derive(Deserialize)]
struct CommentBody {
	#[serde(default)]
	text: String,
}

pub async fn add_comment<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let auth = require_auth(&req).await?;
	let post_id = param_ulid(&req, "id")?;

	let post = fetch_post(&global, post_id).await?;

	let body: CommentBody = parse_json_body(req).await?;
	if body.text.trim().is_empty() {
		return Ok(validation_error("text", "this field is required"));
	}

	let comment = Comment::new(post.id, auth.user.id, body.text);
	global
		.store()
		.create_comment(&comment)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to create comment"))?;

	Ok(redirect(StatusCode::SEE_OTHER, &format!("/posts/{}/", post.id)))
}

async fn fetch_post<G: ApiGlobal>(global: &Arc<G>, post_id: Ulid) -> Result<Post> {
	use common::http::ext::OptionExt;

	global
		.store()
		.post_by_id(post_id)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch post"))?
		.map_err_route((StatusCode::NOT_FOUND, "post not found"))
}

/// Maps an optional group slug to its id. An unknown slug is a form
/// error, not a 404, because the client submitted it as input.
async fn resolve_group<G: ApiGlobal>(
	global: &Arc<G>,
	slug: Option<&str>,
) -> Result<std::result::Result<Option<Ulid>, Response<Body>>> {
	let Some(slug) = slug else {
		return Ok(Ok(None));
	};

	let group = global
		.store()
		.group_by_slug(slug)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch group"))?;

	match group {
		Some(group) => Ok(Ok(Some(group.id))),
		None => Ok(Err(validation_error("group", "unknown group"))),
	}
}
