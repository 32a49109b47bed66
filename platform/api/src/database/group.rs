use super::Ulid;

/// A group is an admin-curated topic a post can be filed under. Deleting a
/// group detaches its posts instead of deleting them.
#[derive(Debug, Clone, Default, sqlx::FromRow, serde::Serialize)]
pub struct Group {
	/// The unique identifier for the group.
	pub id: Ulid,
	/// The display title of the group. Unique.
	pub title: String,
	/// The URL-safe identifier of the group. Unique.
	pub slug: String,
	/// The description of the group.
	pub description: String,
}

impl Group {
	pub fn new(title: String, slug: String, description: String) -> Self {
		Self {
			id: Ulid::new(),
			title,
			slug,
			description,
		}
	}
}
