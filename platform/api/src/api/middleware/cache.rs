use std::sync::Arc;

use common::http::ext::OptionExt;
use common::http::router::middleware::{middleware_fn, Middleware, NextFn};
use common::http::RouteError;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::{Method, StatusCode};

use crate::api::error::ApiError;
use crate::api::Body;
use crate::global::ApiGlobal;

/// Serves the home listing from the TTL snapshot cache.
///
/// Only successful GET responses are cached. While a snapshot is live
/// every request gets the identical bytes, so new posts surface only
/// after the TTL lapses.
pub fn cache_middleware<G: ApiGlobal>(global: &Arc<G>) -> impl Middleware<Incoming, Body, RouteError<ApiError>> {
	let weak = Arc::downgrade(global);
	middleware_fn(move |req: hyper::Request<Incoming>, next: NextFn<Incoming, Body, RouteError<ApiError>>| {
		let weak = weak.clone();
		async move {
			if req.method() != Method::GET {
				return next(req).await;
			}

			let global = weak
				.upgrade()
				.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to upgrade global state"))?;

			if let Some(page) = global.listing_cache().get().await {
				let mut resp = hyper::Response::new(Body::new(page.body));
				*resp.status_mut() = page.status;
				resp.headers_mut()
					.insert(hyper::header::CONTENT_TYPE, hyper::header::HeaderValue::from_static("application/json"));
				return Ok(resp);
			}

			let resp = next(req).await?;
			if resp.status() != StatusCode::OK {
				return Ok(resp);
			}

			let (parts, body) = resp.into_parts();
			let body = match body.collect().await {
				Ok(collected) => collected.to_bytes(),
				Err(never) => match never {},
			};

			global.listing_cache().set(parts.status, body.clone()).await;

			Ok(hyper::Response::from_parts(parts, Body::new(body)))
		}
	})
}
