use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use error::RouterError;
use route::RouteHandler;

use self::builder::RouterBuilder;
use self::middleware::{Middleware, NextFn, NextFut};
use self::types::{ErrorHandler, RouteInfo, RouteParams};

pub mod builder;
pub mod error;
pub mod ext;
pub mod middleware;
pub mod route;
pub mod types;

pub struct Router<I, O, E> {
	routes: Vec<RouteHandler<I, O, E>>,
	error_handlers: Vec<ErrorHandler<O, E>>,
	middlewares: Vec<Arc<dyn Middleware<I, O, E>>>,
	tree: path_tree::PathTree<RouteInfo>,
}

impl<I: Send + 'static, O: Send + 'static, E: Send + 'static> Router<I, O, E> {
	pub fn builder() -> RouterBuilder<I, O, E> {
		RouterBuilder::new()
	}

	pub async fn handle(&self, mut req: hyper::Request<I>) -> Result<hyper::Response<O>, RouterError<E>> {
		// Routes are registered without trailing slashes, requests may
		// carry one. Both forms resolve to the same handler.
		let path = req.uri().path();
		let trimmed = path.trim_end_matches('/');
		let path = if trimmed.is_empty() { "/" } else { trimmed };

		let key = format!("/{}{}", req.method().as_str(), path);
		let (info, matched) = self.tree.find(&key).ok_or(RouterError::NotFound)?;

		req.extensions_mut().insert(RouteParams(
			matched.params_iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect(),
		));

		let handler = self.routes[info.route].clone();
		let error_handler = info.error_handler.map(|i| self.error_handlers[i].clone());

		let wrap_error = |next: NextFn<I, O, E>| {
			if let Some(error_handler) = error_handler.clone() {
				Box::new(move |req: hyper::Request<I>| {
					Box::pin(async move {
						let (parts, body) = req.into_parts();
						match next(hyper::Request::from_parts(parts.clone(), body)).await {
							Ok(res) => Ok(res),
							Err(err) => Ok(error_handler(hyper::Request::from_parts(parts, ()), err).await),
						}
					}) as NextFut<O, E>
				}) as NextFn<I, O, E>
			} else {
				next
			}
		};

		let next = wrap_error(Box::new(move |req| {
			Box::pin(async move { handler(req).await }) as NextFut<O, E>
		}));

		info.middleware
			.iter()
			.rev()
			.map(|i| self.middlewares[*i].clone())
			.fold(next, |next, middleware| {
				wrap_error(Box::new(move |req| {
					Box::pin(async move { middleware.handle(req, next).await }) as NextFut<O, E>
				}))
			})(req)
		.await
		.map_err(RouterError::Unhandled)
	}
}

impl<I, O, E> Debug for Router<I, O, E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router").field("tree", &self.tree).finish()
	}
}

#[cfg(test)]
mod tests {
	use bytes::Bytes;
	use http_body_util::{BodyExt, Full};
	use hyper::StatusCode;

	use super::ext::RequestExt;
	use super::middleware::middleware_fn;
	use super::Router;

	type Body = Full<Bytes>;

	fn respond(status: StatusCode, body: &str) -> hyper::Response<Body> {
		hyper::Response::builder()
			.status(status)
			.body(Full::new(Bytes::from(body.to_string())))
			.unwrap()
	}

	fn request(method: hyper::Method, path: &str) -> hyper::Request<()> {
		hyper::Request::builder().method(method).uri(path).body(()).unwrap()
	}

	async fn body_text(res: hyper::Response<Body>) -> String {
		let bytes = res.into_body().collect().await.unwrap().to_bytes();
		String::from_utf8(bytes.to_vec()).unwrap()
	}

	fn test_router() -> Router<(), Body, String> {
		Router::builder()
			.get("/", |_| async move { Ok(respond(StatusCode::OK, "index")) })
			.get("/profile/:username", |req: hyper::Request<()>| async move {
				let username = req.param("username").unwrap().to_string();
				Ok(respond(StatusCode::OK, &username))
			})
			.scope(
				"/nested",
				Router::builder().get("/inner", |_| async move { Ok(respond(StatusCode::OK, "inner")) }),
			)
			.get("/fails", |_| async move { Err("boom".to_string()) })
			.error_handler(|_, err: String| async move { respond(StatusCode::INTERNAL_SERVER_ERROR, &err) })
			.not_found(|_| async move { Ok(respond(StatusCode::NOT_FOUND, "nope")) })
			.build()
	}

	#[tokio::test]
	async fn test_route_dispatch_and_params() {
		let router = test_router();

		let res = router.handle(request(hyper::Method::GET, "/")).await.unwrap();
		assert_eq!(body_text(res).await, "index");

		let res = router.handle(request(hyper::Method::GET, "/profile/mario")).await.unwrap();
		assert_eq!(body_text(res).await, "mario");

		let res = router.handle(request(hyper::Method::GET, "/nested/inner")).await.unwrap();
		assert_eq!(body_text(res).await, "inner");
	}

	#[tokio::test]
	async fn test_trailing_slash_normalized() {
		let router = test_router();

		let res = router.handle(request(hyper::Method::GET, "/profile/mario/")).await.unwrap();
		assert_eq!(body_text(res).await, "mario");
	}

	#[tokio::test]
	async fn test_not_found_catch_all() {
		let router = test_router();

		let res = router.handle(request(hyper::Method::GET, "/missing/page")).await.unwrap();
		assert_eq!(res.status(), StatusCode::NOT_FOUND);

		// Unregistered method on a known path falls through too.
		let res = router.handle(request(hyper::Method::POST, "/profile/mario")).await.unwrap();
		assert_eq!(res.status(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn test_error_handler_converts_errors() {
		let router = test_router();

		let res = router.handle(request(hyper::Method::GET, "/fails")).await.unwrap();
		assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body_text(res).await, "boom");
	}

	#[tokio::test]
	async fn test_middleware_can_short_circuit() {
		let router: Router<(), Body, String> = Router::builder()
			.middleware(middleware_fn(|req: hyper::Request<()>, next| async move {
				if req.uri().path() == "/blocked" {
					return Ok(respond(StatusCode::FORBIDDEN, "blocked"));
				}
				next(req).await
			}))
			.get("/blocked", |_| async move { Ok(respond(StatusCode::OK, "unreachable")) })
			.get("/open", |_| async move { Ok(respond(StatusCode::OK, "open")) })
			.build();

		let res = router.handle(request(hyper::Method::GET, "/blocked")).await.unwrap();
		assert_eq!(res.status(), StatusCode::FORBIDDEN);

		let res = router.handle(request(hyper::Method::GET, "/open")).await.unwrap();
		assert_eq!(body_text(res).await, "open");
	}
}
