use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

use super::Ulid;

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Session {
	/// The unique identifier for the session.
	pub id: Ulid,
	/// The user the session belongs to. Sessions are deleted with their user.
	pub user_id: Ulid,
	/// The opaque bearer token presented on authenticated requests. Unique.
	pub token: String,
	/// The time the session was created.
	pub created_at: DateTime<Utc>,
}

impl Session {
	pub fn new(user_id: Ulid) -> Self {
		Self {
			id: Ulid::new(),
			user_id,
			token: Self::generate_token(),
			created_at: Utc::now(),
		}
	}

	fn generate_token() -> String {
		rand::thread_rng()
			.sample_iter(&Alphanumeric)
			.take(48)
			.map(char::from)
			.collect()
	}
}
