use aide::axum::IntoApiResponse;
use argon2::{
	password_hash::{self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};
use axum::{
	extract::State,
	http::{header, StatusCode},
	response::IntoResponse,
};
use macros::route;

use crate::{
	extract::{Json, Session},
	openapi::tag,
	route::model::Confirmation,
	session::CookieConfig,
	AppState,
};

use super::{model, Error, RouteError};

/// Hashes a password with Argon2 and a random salt, returning a PHC string.
fn hash_password(hasher: &Argon2, password: &str) -> Result<String, password_hash::Error> {
	let salt = SaltString::generate(&mut OsRng);

	Ok(hasher.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Checks a password against a stored PHC string.
fn verify_password(
	hasher: &Argon2,
	password: &str,
	hash: &str,
) -> Result<bool, password_hash::Error> {
	let hash = PasswordHash::new(hash)?;

	match hasher.verify_password(password.as_bytes(), &hash) {
		Ok(()) => Ok(true),
		Err(password_hash::Error::Password) => Ok(false),
		Err(e) => Err(e),
	}
}

/// Register account
/// Creates a new account and signs in to it, returning an associated session cookie.
#[route(
	tag = tag::AUTH,
	response(status = 201, description = "Registered successfully.", shape = "Json<model::Identity>"),
	response(status = 409, description = "The username is already taken.")
)]
pub async fn register(
	State(state): State<AppState>,
	Json(input): Json<model::RegisterInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let hashed = hash_password(&state.hasher, &input.password).map_err(Error::Hash)?;

	let user = state
		.database
		.create_user(&input.username, &hashed, input.level)
		.await?
		.ok_or(Error::UsernameTaken)?;

	tracing::info!(user = user.id, level = ?user.level, "registered user");

	let cookie = state.cookies.create_cookie(user.id, user.level);

	Ok((
		StatusCode::CREATED,
		[(header::SET_COOKIE, cookie.to_string())],
		Json(model::Identity::from(user)),
	)
		.into_response())
}

/// Log in
/// Logs in to an account, returning an associated session cookie.
#[route(
	tag = tag::AUTH,
	response(status = 200, description = "Logged in successfully.", shape = "Json<model::Identity>")
)]
pub async fn login(
	State(state): State<AppState>,
	Json(auth): Json<model::LoginInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user = state
		.database
		.user_by_username(&auth.username)
		.await?
		.ok_or(Error::InvalidUsernameOrPassword)?;

	if !verify_password(&state.hasher, &auth.password, &user.password).map_err(Error::Hash)? {
		return Err(Error::InvalidUsernameOrPassword.into());
	}

	let cookie = state.cookies.create_cookie(user.id, user.level);

	Ok((
		[(header::SET_COOKIE, cookie.to_string())],
		Json(model::Identity::from(user)),
	)
		.into_response())
}

/// Log out
/// Clears the session cookie. This succeeds whether or not a session exists.
#[route(tag = tag::AUTH, response(status = 200, description = "Logged out successfully.", shape = "Json<Confirmation>"))]
pub async fn logout(State(cookies): State<CookieConfig>) -> impl IntoApiResponse {
	(
		[(header::SET_COOKIE, cookies.clear_cookie().to_string())],
		Json(Confirmation::new("Logged out")),
	)
		.into_response()
}

/// Check session
/// Returns the identity carried by the session cookie.
#[route(tag = tag::AUTH)]
pub async fn check_session(session: Session) -> Json<model::SessionInfo> {
	Json(model::SessionInfo {
		user_id: session.user_id,
		level: session.level,
	})
}

#[cfg(test)]
mod test {
	use argon2::Argon2;

	use super::{hash_password, verify_password};

	#[test]
	fn test_password_hash_is_salted() {
		let hasher = Argon2::default();
		let first = hash_password(&hasher, "hunter2").unwrap();
		let second = hash_password(&hasher, "hunter2").unwrap();

		assert_ne!(first, second);
		assert!(!first.contains("hunter2"));
		assert!(verify_password(&hasher, "hunter2", &first).unwrap());
		assert!(verify_password(&hasher, "hunter2", &second).unwrap());
		assert!(!verify_password(&hasher, "hunter3", &first).unwrap());
	}

	#[test]
	fn test_malformed_hash_is_an_error() {
		assert!(verify_password(&Argon2::default(), "hunter2", "not a hash").is_err());
	}
}
