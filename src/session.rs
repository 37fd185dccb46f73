use cookie::{Cookie, CookieBuilder, CookieJar, Key, SameSite};

use crate::route::auth::model::Level;

pub const COOKIE_NAME: &str = "session";

/// Signs and verifies session cookies.
///
/// The cookie value is `<user id>.<level>`, signed with a key derived from the
/// configured secret. When `secure` is set the cookie is marked `Secure` and
/// `SameSite=None` so a browser client hosted elsewhere can send it.
#[derive(Clone)]
pub struct CookieConfig {
	key: Key,
	secure: bool,
}

impl CookieConfig {
	/// # Panics
	///
	/// Panics if `secret` is shorter than 32 bytes. The configuration loader
	/// rejects such secrets before this is reached.
	pub fn new(secret: &[u8], secure: bool) -> Self {
		Self {
			key: Key::derive_from(secret),
			secure,
		}
	}

	fn builder(&self, value: String) -> CookieBuilder<'static> {
		Cookie::build((COOKIE_NAME, value))
			.http_only(true)
			.path("/")
			.secure(self.secure)
			.same_site(if self.secure {
				SameSite::None
			} else {
				SameSite::Lax
			})
	}

	/// Creates a signed session cookie with no expiry.
	pub fn create_cookie(&self, user_id: i32, level: Level) -> Cookie<'static> {
		let cookie: Cookie<'static> = self.builder(encode(user_id, level)).into();
		let mut jar = CookieJar::new();

		jar.signed_mut(&self.key).add(cookie);
		jar.get(COOKIE_NAME)
			.cloned()
			.expect("a signed jar holds the cookie it was just given")
	}

	/// Creates an empty session cookie used to invalidate a previous one.
	pub fn clear_cookie(&self) -> Cookie<'static> {
		self.builder(String::new())
			.max_age(cookie::time::Duration::ZERO)
			.into()
	}

	/// Verifies the session cookie in `jar`.
	///
	/// Returns `None` if the signature does not match or the value is malformed.
	pub fn verify(&self, jar: &CookieJar) -> Option<(i32, Level)> {
		let cookie = jar.signed(&self.key).get(COOKIE_NAME)?;

		decode(cookie.value())
	}
}

fn encode(user_id: i32, level: Level) -> String {
	format!("{user_id}.{}", i16::from(level))
}

fn decode(value: &str) -> Option<(i32, Level)> {
	let (user_id, level) = value.split_once('.')?;
	let level = level.parse::<i16>().ok()?;

	Some((user_id.parse().ok()?, Level::try_from(level).ok()?))
}

#[cfg(test)]
mod test {
	use super::*;

	fn config() -> CookieConfig {
		CookieConfig::new(&[3; 32], true)
	}

	fn jar_with(cookie: Cookie<'static>) -> CookieJar {
		let mut jar = CookieJar::new();

		jar.add_original(cookie);
		jar
	}

	#[test]
	fn test_cookie_roundtrip() {
		let config = config();
		let cookie = config.create_cookie(42, Level::Moderator);

		assert_ne!(cookie.value(), "42.1");
		assert_eq!(
			config.verify(&jar_with(cookie)),
			Some((42, Level::Moderator))
		);
	}

	#[test]
	fn test_issued_cookie_carries_signature() {
		let config = config();
		let cookie = config.create_cookie(42, Level::Moderator);

		// the signature is prepended to the plain value
		assert!(cookie.value().ends_with("42.1"));
		assert!(cookie.value().len() > "42.1".len());
		assert_eq!(cookie.name(), COOKIE_NAME);

		let other = CookieConfig::new(&[9; 64], true).create_cookie(42, Level::Moderator);

		assert_ne!(cookie.value(), other.value());
	}

	#[test]
	fn test_cookie_attributes() {
		let cookie = config().create_cookie(1, Level::User);

		assert_eq!(cookie.http_only(), Some(true));
		assert_eq!(cookie.secure(), Some(true));
		assert_eq!(cookie.same_site(), Some(SameSite::None));
		assert_eq!(cookie.path(), Some("/"));

		let local = CookieConfig::new(&[3; 32], false).create_cookie(1, Level::User);

		assert_eq!(local.same_site(), Some(SameSite::Lax));
	}

	#[test]
	fn test_tampered_cookie_is_rejected() {
		let config = config();
		let cookie = config.create_cookie(42, Level::User);
		let forged = cookie.value().replace("42.2", "42.0");

		assert_eq!(
			config.verify(&jar_with(Cookie::new(COOKIE_NAME, forged))),
			None
		);
		assert_eq!(
			config.verify(&jar_with(Cookie::new(COOKIE_NAME, "42.0"))),
			None
		);
	}

	#[test]
	fn test_cookie_from_other_key_is_rejected() {
		let cookie = CookieConfig::new(&[9; 32], true).create_cookie(42, Level::Admin);

		assert_eq!(config().verify(&jar_with(cookie)), None);
	}

	#[test]
	fn test_clear_cookie_expires() {
		let cookie = config().clear_cookie();

		assert_eq!(cookie.value(), "");
		assert_eq!(cookie.max_age(), Some(cookie::time::Duration::ZERO));
	}

	#[test]
	fn test_decode() {
		assert_eq!(decode("7.2"), Some((7, Level::User)));
		assert_eq!(decode("7.3"), None);
		assert_eq!(decode("7"), None);
		assert_eq!(decode("x.1"), None);
	}
}
