use chrono::{DateTime, Utc};

use super::Ulid;

#[derive(Debug, Clone, Default, sqlx::FromRow, serde::Serialize)]
pub struct Post {
	/// The unique identifier for the post.
	pub id: Ulid,
	/// The author of the post. Posts are deleted with their author.
	pub author_id: Ulid,
	/// The group the post is filed under, if any. Nulled when the group
	/// is deleted.
	pub group_id: Option<Ulid>,
	/// The body text of the post.
	pub text: String,
	/// Opaque path to an attached image. Never interpreted by the core.
	pub image: Option<String>,
	/// The time the post was published. Set once at creation.
	pub pub_date: DateTime<Utc>,
}

impl Post {
	pub fn new(author_id: Ulid, group_id: Option<Ulid>, text: String, image: Option<String>) -> Self {
		Self {
			id: Ulid::new(),
			author_id,
			group_id,
			text,
			image,
			pub_date: Utc::now(),
		}
	}
}
