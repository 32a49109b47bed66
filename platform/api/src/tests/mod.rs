use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use crate::api;
use crate::config::{ApiConfig, AppConfig};
use crate::global::ServerGlobal;
use crate::store::{DataStore, MemoryStore};

mod auth;
mod cache;
mod cascade;
mod feed;

pub struct TestServer {
	pub port: u16,
	pub global: Arc<ServerGlobal>,
	pub client: reqwest::Client,
	_handler: common::context::Handler,
}

/// Boots the real HTTP server on an unused port against an in-memory
/// store. Every test gets its own server and port, so tests run in
/// parallel without sharing state.
pub async fn spawn_server(mut api_config: ApiConfig) -> TestServer {
	let port = portpicker::pick_unused_port().expect("failed to pick port");
	api_config.bind_address = format!("127.0.0.1:{port}").parse().expect("failed to parse bind address");

	let config = AppConfig {
		api: api_config,
		..Default::default()
	};

	let (ctx, handler) = common::context::Context::new();
	let store: Arc<dyn DataStore> = Arc::new(MemoryStore::default());
	let global = Arc::new(ServerGlobal::new(config, ctx, store));

	tokio::spawn(api::run(global.clone()));

	let client = reqwest::Client::builder()
		// Redirects carry the assertions, the client must not follow them.
		.redirect(reqwest::redirect::Policy::none())
		.build()
		.expect("failed to build client");

	// Wait for the accept loop to come up.
	let probe = format!("http://127.0.0.1:{port}/auth/login/");
	for _ in 0..100 {
		if client.get(&probe).send().await.is_ok() {
			break;
		}
		tokio::time::sleep(Duration::from_millis(10)).await;
	}

	TestServer {
		port,
		global,
		client,
		_handler: handler,
	}
}

impl TestServer {
	pub fn url(&self, path: &str) -> String {
		format!("http://127.0.0.1:{}{}", self.port, path)
	}

	pub async fn get(&self, path: &str) -> reqwest::Response {
		self.client.get(self.url(path)).send().await.expect("request failed")
	}

	pub async fn get_auth(&self, path: &str, token: &str) -> reqwest::Response {
		self.client
			.get(self.url(path))
			.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
			.send()
			.await
			.expect("request failed")
	}

	pub async fn post_json(&self, path: &str, token: Option<&str>, body: &Value) -> reqwest::Response {
		let mut req = self.client.post(self.url(path)).json(body);
		if let Some(token) = token {
			req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
		}
		req.send().await.expect("request failed")
	}

	/// Signs the user up and returns a session token.
	pub async fn signup_and_login(&self, username: &str) -> String {
		let resp = self
			.post_json(
				"/auth/signup/",
				None,
				&json!({ "username": username, "password": "password123" }),
			)
			.await;
		assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

		let resp = self
			.post_json(
				"/auth/login/",
				None,
				&json!({ "username": username, "password": "password123" }),
			)
			.await;
		assert_eq!(resp.status(), reqwest::StatusCode::OK);

		let body: Value = resp.json().await.expect("failed to read body");
		body["token"].as_str().expect("missing token").to_owned()
	}
}
