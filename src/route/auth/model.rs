use schemars::{gen::SchemaGenerator, schema::Schema, JsonSchema};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user's privilege level. Lower is more privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum Level {
	Admin = 0,
	Moderator = 1,
	#[default]
	User = 2,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid privilege level {0}, expected 0, 1 or 2")]
pub struct InvalidLevel(pub i16);

impl Level {
	/// Admins and moderators may delete content they do not own.
	pub fn is_staff(self) -> bool {
		self < Self::User
	}
}

impl From<Level> for i16 {
	fn from(level: Level) -> Self {
		level as i16
	}
}

impl TryFrom<i16> for Level {
	type Error = InvalidLevel;

	fn try_from(value: i16) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(Self::Admin),
			1 => Ok(Self::Moderator),
			2 => Ok(Self::User),
			_ => Err(InvalidLevel(value)),
		}
	}
}

impl JsonSchema for Level {
	fn schema_name() -> String {
		"Level".into()
	}

	fn json_schema(gen: &mut SchemaGenerator) -> Schema {
		i16::json_schema(gen)
	}
}

/// A single user, as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
	pub id: i32,
	pub username: String,
	/// The Argon2 hash in PHC string format.
	pub password: String,
	#[sqlx(try_from = "i16")]
	pub level: Level,
	#[allow(dead_code)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The identity returned after registering or logging in.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Identity {
	pub user_id: i32,
	pub username: String,
	pub level: Level,
}

impl From<User> for Identity {
	fn from(user: User) -> Self {
		Self {
			user_id: user.id,
			username: user.username,
			level: user.level,
		}
	}
}

/// The identity carried by the current session cookie.
#[derive(Debug, Serialize, JsonSchema)]
pub struct SessionInfo {
	pub user_id: i32,
	pub level: Level,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	#[validate(length(min = 1, max = 80))]
	pub username: String,
	#[validate(length(min = 1, max = 128))]
	pub password: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct RegisterInput {
	/// The username that is displayed to the public.
	#[validate(length(min = 1, max = 80))]
	pub username: String,
	#[validate(length(min = 1, max = 128))]
	pub password: String,
	/// Defaults to an ordinary user.
	///
	/// Any caller may ask for a privileged level here, including admin, so
	/// deployments that expose registration publicly should not trust it.
	#[serde(default)]
	pub level: Level,
}

#[cfg(test)]
mod test {
	use super::Level;

	#[test]
	fn test_level_ordering() {
		assert!(Level::Admin.is_staff());
		assert!(Level::Moderator.is_staff());
		assert!(!Level::User.is_staff());
	}

	#[test]
	fn test_level_conversion() {
		assert_eq!(Level::try_from(1).unwrap(), Level::Moderator);
		assert!(Level::try_from(3).is_err());
		assert!(Level::try_from(-1).is_err());
		assert_eq!(i16::from(Level::User), 2);
	}

	#[test]
	fn test_level_serde() {
		assert_eq!(serde_json::to_value(Level::Admin).unwrap(), 0);
		assert_eq!(
			serde_json::from_value::<Level>(serde_json::json!(2)).unwrap(),
			Level::User
		);
		assert!(serde_json::from_value::<Level>(serde_json::json!(5)).is_err());
	}
}
