use common::http::ext::{OptionExt, ResultExt};
use common::http::router::ext::RequestExt as _;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use serde_json::json;

use super::json_response;
use super::posts::listing_page;
use crate::api::error::Result;
use crate::api::ext::RequestExt;
use crate::api::Body;
use crate::global::ApiGlobal;
use crate::store::PostFilter;

pub async fn group_posts<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let slug = req.param("slug").map_err_route((StatusCode::NOT_FOUND, "group not found"))?;

	let group = global
		.store()
		.group_by_slug(slug)
		.await
		.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch group"))?
		.map_err_route((StatusCode::NOT_FOUND, "group not found"))?;

	let page = listing_page(&global, &PostFilter::Group(group.id), req.uri().query()).await?;

	json_response(
		StatusCode::OK,
		&json!({
			"group": group,
			"page": page,
		}),
	)
}
