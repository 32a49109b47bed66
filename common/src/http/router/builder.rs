use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use super::middleware::Middleware;
use super::route::{Route, RouteHandler, RouterItem};
use super::types::{ErrorHandler, RouteInfo};
use super::Router;

pub struct RouterBuilder<I, O, E> {
	tree: Vec<(&'static str, RouterItem<I, O, E>)>,
	middlewares: Vec<Arc<dyn Middleware<I, O, E>>>,
	error_handler: Option<ErrorHandler<O, E>>,
}

impl<I, O, E> Debug for RouterBuilder<I, O, E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterBuilder")
			.field("tree", &self.tree)
			.field("middlewares", &self.middlewares.len())
			.field("error_handler", &self.error_handler.is_some())
			.finish()
	}
}

impl<I: Send + 'static, O: Send + 'static, E: Send + 'static> Default for RouterBuilder<I, O, E> {
	fn default() -> Self {
		Self::new()
	}
}

impl<I: Send + 'static, O: Send + 'static, E: Send + 'static> RouterBuilder<I, O, E> {
	pub fn new() -> Self {
		Self {
			tree: Vec::new(),
			middlewares: Vec::new(),
			error_handler: None,
		}
	}

	/// Middleware applies to every route of this builder, including nested
	/// scopes, in registration order (first registered runs outermost).
	pub fn middleware(mut self, middleware: impl Middleware<I, O, E>) -> Self {
		self.middlewares.push(Arc::new(middleware));
		self
	}

	/// Makes `data` available to handlers via request extensions.
	pub fn data<T: Clone + Send + Sync + 'static>(self, data: T) -> Self {
		self.middleware(super::middleware::middleware_fn(
			move |mut req: hyper::Request<I>, next: super::middleware::NextFn<I, O, E>| {
				req.extensions_mut().insert(data.clone());
				next(req)
			},
		))
	}

	pub fn error_handler<F: std::future::Future<Output = hyper::Response<O>> + Send + 'static>(
		mut self,
		handler: impl Fn(hyper::Request<()>, E) -> F + Send + Sync + 'static,
	) -> Self {
		self.error_handler = Some(Arc::new(move |req, err| Box::pin(handler(req, err))));
		self
	}

	pub fn get<F: std::future::Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		path: &'static str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(Some(hyper::Method::GET), path, handler)
	}

	pub fn post<F: std::future::Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		path: &'static str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(Some(hyper::Method::POST), path, handler)
	}

	pub fn delete<F: std::future::Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		path: &'static str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(Some(hyper::Method::DELETE), path, handler)
	}

	pub fn any<F: std::future::Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		path: &'static str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(None, path, handler)
	}

	pub fn add_route<F: std::future::Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		mut self,
		method: Option<hyper::Method>,
		path: &'static str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.tree.push((
			path,
			RouterItem::Route(Route {
				method,
				handler: Arc::new(move |req| {
					Box::pin(handler(req))
						as std::pin::Pin<
							Box<dyn std::future::Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>,
						>
				}) as RouteHandler<I, O, E>,
			}),
		));
		self
	}

	pub fn scope(mut self, path: &'static str, router: RouterBuilder<I, O, E>) -> Self {
		self.tree.push((path, RouterItem::Router(router)));
		self
	}

	pub fn not_found<F: std::future::Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(None, "/*", handler)
	}

	fn build_scoped(self, parent_path: &str, target: &mut Router<I, O, E>, middlewares: &[usize], error_handler: Option<usize>) {
		let error_handler = match self.error_handler {
			Some(handler) => {
				target.error_handlers.push(handler);
				Some(target.error_handlers.len() - 1)
			}
			// Nested scopes inherit the closest enclosing error handler.
			None => error_handler,
		};

		let middleware_idxs = middlewares
			.iter()
			.copied()
			.chain(self.middlewares.into_iter().map(|handler| {
				target.middlewares.push(handler);
				target.middlewares.len() - 1
			}))
			.collect::<Vec<_>>();

		for (path, item) in self.tree {
			match item {
				RouterItem::Route(route) => {
					target.routes.push(route.handler);

					let info = RouteInfo {
						route: target.routes.len() - 1,
						middleware: middleware_idxs.clone(),
						error_handler,
					};

					let method = if let Some(method) = &route.method {
						method.as_str()
					} else {
						"*"
					};

					let parent_path = parent_path.trim_matches('/');
					let path = path.trim_matches('/');

					let full_path = format!(
						"/{method}/{}{}{}",
						parent_path,
						if parent_path.is_empty() || path.is_empty() { "" } else { "/" },
						path
					);

					tracing::debug!(parent_path, path, full_path, "adding route");

					let _ = target.tree.insert(&full_path, info);
				}
				RouterItem::Router(router) => {
					let parent_path = parent_path.trim_matches('/');
					let path = path.trim_matches('/');
					router.build_scoped(
						&format!(
							"{parent_path}{}{path}",
							if parent_path.is_empty() || path.is_empty() { "" } else { "/" }
						),
						target,
						&middleware_idxs,
						error_handler,
					);
				}
			}
		}
	}

	pub fn build(self) -> Router<I, O, E> {
		let mut router = Router {
			routes: Vec::new(),
			error_handlers: Vec::new(),
			middlewares: Vec::new(),
			tree: path_tree::PathTree::new(),
		};

		self.build_scoped("", &mut router, &[], None);

		router
	}
}
