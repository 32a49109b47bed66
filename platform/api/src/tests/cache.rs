use std::time::Duration;

use serde_json::{json, Value};

use super::spawn_server;
use crate::config::ApiConfig;
use crate::database::Ulid;
use crate::global::ApiGlobal as _;
use crate::store::DataStore as _;

#[tokio::test]
async fn test_home_listing_is_served_stale_within_ttl() {
	let server = spawn_server(ApiConfig {
		listing_cache_ttl_secs: 60,
		..Default::default()
	})
	.await;
	let token = server.signup_and_login("mario").await;

	server.post_json("/create/", Some(&token), &json!({ "text": "cached post" })).await;

	// First read populates the snapshot.
	let resp = server.get("/").await;
	assert_eq!(resp.status(), reqwest::StatusCode::OK);
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 1);
	let post_id = Ulid::from_string(body["items"][0]["id"].as_str().unwrap()).unwrap();

	// Delete the post behind the cache's back.
	server.global.store.delete_post(post_id).await.unwrap();

	// Within the TTL the stale snapshot still lists it.
	let resp = server.get("/").await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 1);

	// An explicit flush brings the listing back in sync.
	server.global.listing_cache().clear().await;
	let resp = server.get("/").await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 0);
}

#[tokio::test]
async fn test_home_listing_refreshes_after_ttl() {
	let server = spawn_server(ApiConfig {
		listing_cache_ttl_secs: 1,
		..Default::default()
	})
	.await;
	let token = server.signup_and_login("mario").await;

	let resp = server.get("/").await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 0);

	// A write during the TTL is invisible to the listing.
	server.post_json("/create/", Some(&token), &json!({ "text": "new post" })).await;
	let resp = server.get("/").await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 0);

	tokio::time::sleep(Duration::from_millis(1100)).await;

	let resp = server.get("/").await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 1);
}

#[tokio::test]
async fn test_only_the_home_listing_is_cached() {
	let server = spawn_server(ApiConfig {
		listing_cache_ttl_secs: 60,
		..Default::default()
	})
	.await;
	let token = server.signup_and_login("mario").await;

	// Populate the snapshot with an empty listing.
	server.get("/").await;

	server.post_json("/create/", Some(&token), &json!({ "text": "fresh" })).await;

	// The profile listing is not behind the cache and sees the write.
	let resp = server.get("/profile/mario/").await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["posts_count"], 1);

	// The home listing still serves the pre-write snapshot.
	let resp = server.get("/").await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 0);
}
