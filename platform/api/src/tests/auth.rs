use serde_json::{json, Value};

use super::spawn_server;
use crate::config::ApiConfig;

#[tokio::test]
async fn test_signup_validation() {
	let server = spawn_server(ApiConfig::default()).await;

	let resp = server
		.post_json("/auth/signup/", None, &json!({ "username": "ab", "password": "password123" }))
		.await;
	assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
	let body: Value = resp.json().await.unwrap();
	assert!(body["errors"]["username"].is_string());

	let resp = server
		.post_json("/auth/signup/", None, &json!({ "username": "mario", "password": "short" }))
		.await;
	assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
	let body: Value = resp.json().await.unwrap();
	assert!(body["errors"]["password"].is_string());
}

#[tokio::test]
async fn test_signup_duplicate_username() {
	let server = spawn_server(ApiConfig::default()).await;

	server.signup_and_login("mario").await;

	let resp = server
		.post_json("/auth/signup/", None, &json!({ "username": "mario", "password": "password123" }))
		.await;
	assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
	let body: Value = resp.json().await.unwrap();
	assert!(body["errors"]["username"].is_string());
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
	let server = spawn_server(ApiConfig::default()).await;

	server.signup_and_login("mario").await;

	let resp = server
		.post_json("/auth/login/", None, &json!({ "username": "mario", "password": "wrong-password" }))
		.await;
	assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

	let resp = server
		.post_json("/auth/login/", None, &json!({ "username": "nobody", "password": "password123" }))
		.await;
	assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_redirects_to_login() {
	let server = spawn_server(ApiConfig::default()).await;

	let resp = server.post_json("/create/", None, &json!({ "text": "hello" })).await;
	assert_eq!(resp.status(), reqwest::StatusCode::FOUND);
	assert_eq!(
		resp.headers().get(reqwest::header::LOCATION).and_then(|v| v.to_str().ok()),
		Some("/auth/login/?next=%2Fcreate%2F")
	);

	let resp = server.get("/follow/").await;
	assert_eq!(resp.status(), reqwest::StatusCode::FOUND);

	// The form views guard too, and open up once logged in.
	let resp = server.get("/create/").await;
	assert_eq!(resp.status(), reqwest::StatusCode::FOUND);

	let token = server.signup_and_login("mario").await;
	let resp = server.get_auth("/create/", &token).await;
	assert_eq!(resp.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
	let server = spawn_server(ApiConfig::default()).await;

	let resp = server.get_auth("/follow/", "bogus-token").await;
	assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
}
