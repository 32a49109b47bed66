use std::sync::Arc;

use bytes::Bytes;
use common::http::router::builder::RouterBuilder;
use common::http::router::Router;
use common::http::RouteError;
use common::make_response;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpSocket;
use tokio::select;

use self::error::ApiError;
use crate::global::ApiGlobal;

mod auth;
mod error;
mod ext;
mod handlers;
mod middleware;
mod request_context;

pub type Body = Full<Bytes>;

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> Router<Incoming, Body, RouteError<ApiError>> {
	let weak = Arc::downgrade(global);
	Router::builder()
		.data(weak)
		// The auth middleware resolves the Authorization header into a
		// request context. It does not fail anonymous requests, handlers
		// decide what requires a login.
		.middleware(middleware::auth::auth_middleware(global))
		// The home listing sits in its own scope so the snapshot cache
		// only wraps that one route.
		.scope(
			"/",
			RouterBuilder::new()
				.middleware(middleware::cache::cache_middleware(global))
				.get("/", handlers::posts::index::<G>),
		)
		.get("/group/:slug", handlers::groups::group_posts::<G>)
		.get("/profile/:username", handlers::profiles::profile::<G>)
		.get("/profile/:username/follow", handlers::follows::follow::<G>)
		.get("/profile/:username/unfollow", handlers::follows::unfollow::<G>)
		.get("/posts/:id", handlers::posts::detail::<G>)
		.get("/posts/:id/edit", handlers::posts::edit_form::<G>)
		.post("/posts/:id/edit", handlers::posts::edit::<G>)
		.post("/posts/:id/comment", handlers::posts::add_comment::<G>)
		.get("/create", handlers::posts::create_form::<G>)
		.post("/create", handlers::posts::create::<G>)
		.get("/follow", handlers::follows::feed::<G>)
		.post("/auth/signup", handlers::auth::signup::<G>)
		.get("/auth/login", handlers::auth::login_page::<G>)
		.post("/auth/login", handlers::auth::login::<G>)
		.error_handler(common::http::error_handler::<ApiError>)
		.not_found(|_| async move {
			Ok(make_response!(
				hyper::StatusCode::NOT_FOUND,
				json!({
					"error": "not_found",
				})
			))
		})
		.build()
}

pub async fn run<G: ApiGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let config = &global.config().api;

	tracing::info!("listening on {}", config.bind_address);
	let socket = if config.bind_address.is_ipv6() {
		TcpSocket::new_v6()?
	} else {
		TcpSocket::new_v4()?
	};

	socket.set_reuseaddr(true)?;
	socket.set_reuseport(true)?;
	socket.bind(config.bind_address)?;
	let listener = socket.listen(1024)?;

	// The router service holds the global state through a Weak reference
	// so lingering keep-alive connections cannot stall the shutdown.
	let router = Arc::new(routes(&global));
	let service = service_fn(move |req| {
		let this = router.clone();
		async move { this.handle(req).await }
	});

	loop {
		select! {
			_ = global.ctx().done() => {
				return Ok(());
			},
			r = listener.accept() => {
				let (socket, addr) = r?;

				let service = service.clone();

				tracing::debug!("accepted connection from {}", addr);

				tokio::spawn(async move {
					http1::Builder::new()
						.serve_connection(TokioIo::new(socket), service)
						.await
						.ok();
				});
			},
		}
	}
}
