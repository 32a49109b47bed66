use serde_json::{json, Value};

use super::spawn_server;
use crate::config::ApiConfig;
use crate::database::Group;
use crate::store::DataStore as _;

/// mario posts into a group; supermario follows him and sees the post
/// lead his feed; after unfollowing the feed is empty again.
#[tokio::test]
async fn test_feed_follows_the_follow_graph() {
	let server = spawn_server(ApiConfig::default()).await;
	let mario = server.signup_and_login("mario").await;
	let supermario = server.signup_and_login("supermario").await;

	let group = Group::new("Test".into(), "test-slug".into(), "a group".into());
	server.global.store.create_group(&group).await.unwrap();

	server
		.post_json(
			"/create/",
			Some(&mario),
			&json!({ "text": "its-a-me", "group": "test-slug" }),
		)
		.await;

	// Before following, the feed is empty.
	let resp = server.get_auth("/follow/", &supermario).await;
	assert_eq!(resp.status(), reqwest::StatusCode::OK);
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 0);

	server.get_auth("/profile/mario/follow/", &supermario).await;

	let resp = server.get_auth("/follow/", &supermario).await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 1);
	assert_eq!(body["items"][0]["text"], "its-a-me");

	server.get_auth("/profile/mario/unfollow/", &supermario).await;

	let resp = server.get_auth("/follow/", &supermario).await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 0);
	assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_feed_is_scoped_to_the_viewer() {
	let server = spawn_server(ApiConfig::default()).await;
	let mario = server.signup_and_login("mario").await;
	let luigi = server.signup_and_login("luigi").await;
	let peach = server.signup_and_login("peach").await;

	server.post_json("/create/", Some(&mario), &json!({ "text": "by mario" })).await;
	server.post_json("/create/", Some(&luigi), &json!({ "text": "by luigi" })).await;

	server.get_auth("/profile/mario/follow/", &peach).await;

	let resp = server.get_auth("/follow/", &peach).await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 1);
	assert_eq!(body["items"][0]["text"], "by mario");

	// luigi follows nobody.
	let resp = server.get_auth("/follow/", &luigi).await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 0);
}

#[tokio::test]
async fn test_feed_orders_newest_first() {
	let server = spawn_server(ApiConfig::default()).await;
	let mario = server.signup_and_login("mario").await;
	let luigi = server.signup_and_login("luigi").await;
	let peach = server.signup_and_login("peach").await;

	server.post_json("/create/", Some(&mario), &json!({ "text": "first" })).await;
	server.post_json("/create/", Some(&luigi), &json!({ "text": "second" })).await;
	server.post_json("/create/", Some(&mario), &json!({ "text": "third" })).await;

	server.get_auth("/profile/mario/follow/", &peach).await;
	server.get_auth("/profile/luigi/follow/", &peach).await;

	let resp = server.get_auth("/follow/", &peach).await;
	let body: Value = resp.json().await.unwrap();
	let texts: Vec<&str> = body["items"]
		.as_array()
		.unwrap()
		.iter()
		.map(|item| item["text"].as_str().unwrap())
		.collect();
	assert_eq!(texts, vec!["third", "second", "first"]);
}
