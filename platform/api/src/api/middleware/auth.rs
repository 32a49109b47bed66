use std::sync::Arc;

use common::http::ext::{OptionExt, ResultExt};
use common::http::router::ext::RequestExt;
use common::http::router::middleware::{middleware_fn, Middleware, NextFn};
use common::http::RouteError;
use hyper::body::Incoming;
use hyper::http::header;
use hyper::StatusCode;

use crate::api::auth::{AuthData, AuthError};
use crate::api::error::ApiError;
use crate::api::request_context::RequestContext;
use crate::api::Body;
use crate::global::ApiGlobal;

/// Resolves the `Authorization: Bearer <token>` header into an
/// [`AuthData`] on the request context. A missing header is fine, the
/// request just stays anonymous. A present but invalid token fails the
/// request so clients notice a broken credential instead of silently
/// losing their identity.
pub fn auth_middleware<G: ApiGlobal>(global: &Arc<G>) -> impl Middleware<Incoming, Body, RouteError<ApiError>> {
	let weak = Arc::downgrade(global);
	middleware_fn(move |mut req: hyper::Request<Incoming>, next: NextFn<Incoming, Body, RouteError<ApiError>>| {
		let weak = weak.clone();
		async move {
			let context = RequestContext::default();
			req.provide(context.clone());

			let Some(token) = req.headers().get(header::AUTHORIZATION) else {
				return next(req).await;
			};

			let global = weak
				.upgrade()
				.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to upgrade global state"))?;

			let token = token
				.to_str()
				.map_err(|_| AuthError::HeaderToStr)?
				.strip_prefix("Bearer ")
				.ok_or(AuthError::NotBearerToken)?;

			let session = global
				.store()
				.session_by_token(token)
				.await
				.map_ignore_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch session"))?
				.ok_or(AuthError::InvalidToken)?;

			let user = global
				.store()
				.user_by_id(session.user_id)
				.await
				.map_ignore_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch user"))?
				.ok_or(AuthError::UserNotFound)?;

			context.set_auth(AuthData { session, user }).await;

			next(req).await
		}
	})
}
