use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};

use super::Ulid;

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct User {
	/// The unique identifier for the user.
	pub id: Ulid,
	/// The username of the user.
	pub username: String,
	/// The hashed password of the user. (argon2)
	pub password_hash: String,
	/// The time the user was created.
	pub created_at: DateTime<Utc>,
}

impl User {
	pub fn new(username: String, password: &str) -> Self {
		Self {
			id: Ulid::new(),
			username,
			password_hash: Self::hash_password(password),
			created_at: Utc::now(),
		}
	}

	/// Uses argon2 to verify the password hash against the provided password.
	pub fn verify_password(&self, password: &str) -> bool {
		let hash = match PasswordHash::new(&self.password_hash) {
			Ok(hash) => hash,
			Err(err) => {
				tracing::error!("failed to parse password hash: {}", err);
				return false;
			}
		};

		Argon2::default().verify_password(password.as_bytes(), &hash).is_ok()
	}

	/// Generates a new password hash using argon2.
	pub fn hash_password(password: &str) -> String {
		let salt = SaltString::generate(&mut OsRng);

		let hash = Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.expect("failed to hash password");

		hash.to_string()
	}

	/// Validates a username.
	pub fn validate_username(username: &str) -> Result<(), &'static str> {
		if username.len() < 3 {
			return Err("Username must be at least 3 characters long");
		}

		if username.len() > 20 {
			return Err("Username must be at most 20 characters long");
		}

		if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
			return Err("Username must only contain alphanumeric characters and underscores");
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::User;

	#[test]
	fn test_password_roundtrip() {
		let user = User::new("mario".to_string(), "its-a-me");

		assert!(user.verify_password("its-a-me"));
		assert!(!user.verify_password("luigi"));
	}

	#[test]
	fn test_validate_username() {
		assert!(User::validate_username("mario").is_ok());
		assert!(User::validate_username("super_mario64").is_ok());
		assert!(User::validate_username("ab").is_err());
		assert!(User::validate_username("a".repeat(21).as_str()).is_err());
		assert!(User::validate_username("mario!").is_err());
	}
}
