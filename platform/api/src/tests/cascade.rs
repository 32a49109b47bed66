use serde_json::{json, Value};

use super::spawn_server;
use crate::config::ApiConfig;
use crate::database::Group;
use crate::store::DataStore as _;

#[tokio::test]
async fn test_group_delete_orphans_posts_gracefully() {
	let server = spawn_server(ApiConfig::default()).await;
	let token = server.signup_and_login("mario").await;

	let group = Group::new("Test".into(), "test-slug".into(), "a group".into());
	server.global.store.create_group(&group).await.unwrap();

	server
		.post_json("/create/", Some(&token), &json!({ "text": "grouped", "group": "test-slug" }))
		.await;

	assert!(server.global.store.delete_group(group.id).await.unwrap());

	// The group is gone but the post survives without one.
	let resp = server.get("/group/test-slug/").await;
	assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

	let resp = server.get("/profile/mario/").await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["posts_count"], 1);
	assert_eq!(body["page"]["items"][0]["group_id"], Value::Null);
}

#[tokio::test]
async fn test_user_delete_cascades() {
	let server = spawn_server(ApiConfig::default()).await;
	let mario = server.signup_and_login("mario").await;
	let luigi = server.signup_and_login("luigi").await;

	server.post_json("/create/", Some(&mario), &json!({ "text": "by mario" })).await;

	let resp = server.get("/profile/mario/").await;
	let body: Value = resp.json().await.unwrap();
	let post_id = body["page"]["items"][0]["id"].as_str().unwrap().to_owned();

	// luigi comments on mario's post and follows him, mario follows back.
	server
		.post_json(&format!("/posts/{post_id}/comment/"), Some(&luigi), &json!({ "text": "hi" }))
		.await;
	server.get_auth("/profile/mario/follow/", &luigi).await;
	server.get_auth("/profile/luigi/follow/", &mario).await;

	let mario_user = server.global.store.user_by_username("mario").await.unwrap().unwrap();
	let luigi_user = server.global.store.user_by_username("luigi").await.unwrap().unwrap();

	assert!(server.global.store.delete_user(mario_user.id).await.unwrap());

	// Profile, posts and sessions are gone.
	let resp = server.get("/profile/mario/").await;
	assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
	let resp = server.get(&format!("/posts/{post_id}/")).await;
	assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
	let resp = server.get_auth("/follow/", &mario).await;
	assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

	// Both directions of the follow edges are gone too.
	assert!(!server.global.store.follow_exists(luigi_user.id, mario_user.id).await.unwrap());
	assert!(!server.global.store.follow_exists(mario_user.id, luigi_user.id).await.unwrap());

	// luigi's feed no longer references the deleted author.
	let resp = server.get_auth("/follow/", &luigi).await;
	let body: Value = resp.json().await.unwrap();
	assert_eq!(body["total_items"], 0);
}
