use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid username or password")]
	InvalidUsernameOrPassword,
	#[error("password hashing error")]
	Hash(#[from] argon2::password_hash::Error),
	#[error("no session cookie")]
	NoSessionCookie,
	#[error("invalid session cookie")]
	InvalidSessionCookie,
	#[error("username already taken")]
	UsernameTaken,
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/register", post_with(register, register_docs))
		.api_route("/login", post_with(login, login_docs))
		.api_route("/logout", post_with(logout, logout_docs))
		.api_route("/checksession", get_with(check_session, check_session_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidUsernameOrPassword | Self::NoSessionCookie | Self::InvalidSessionCookie => {
				StatusCode::UNAUTHORIZED
			}
			Self::Hash(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::UsernameTaken => StatusCode::CONFLICT,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let code = match self {
			Self::InvalidUsernameOrPassword => "invalid_credentials",
			Self::NoSessionCookie => "no_session",
			Self::InvalidSessionCookie => "invalid_session",
			Self::UsernameTaken => "username_taken",
			Self::Hash(ref error) => {
				tracing::error!(%error, "password hashing failed");
				return Vec::new();
			}
		};

		error::Message::new(code)
			.content(self.to_string())
			.into_vec()
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_signup_flow(pool: PgPool) {
		let state = state(pool);
		let app = client(&state);

		let response = app
			.post("/register")
			.json(&json!({
				"username": "alice",
				"password": "pw1",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::CREATED);

		let user = response.json::<Value>();

		assert_eq!(user["username"], "alice");
		assert_eq!(user["level"], 2);

		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("session="));

		// registering signs the user in
		let response = app.get("/checksession").await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["user_id"], user["user_id"]);

		let response = app.post("/logout").await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(app.get("/checksession").await.status_code(), StatusCode::UNAUTHORIZED);

		let response = app
			.post("/login")
			.json(&json!({
				"username": "alice",
				"password": "pw1",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.json::<Value>()["username"], "alice");
		assert_eq!(app.get("/checksession").await.status_code(), StatusCode::OK);
	}

	#[sqlx::test]
	async fn test_login_with_wrong_password(pool: PgPool) {
		let state = state(pool);
		let app = client(&state);

		register(&app, "alice", "pw1").await;

		let other = client(&state);
		let response = other
			.post("/login")
			.json(&json!({
				"username": "alice",
				"password": "wrong",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(response.json::<Value>()["error"], "invalid username or password");

		let response = other
			.post("/login")
			.json(&json!({
				"username": "nobody",
				"password": "pw1",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
	}

	#[sqlx::test]
	async fn test_duplicate_username_keeps_original(pool: PgPool) {
		let state = state(pool);
		let app = client(&state);

		register(&app, "alice", "pw1").await;

		let response = client(&state)
			.post("/register")
			.json(&json!({
				"username": "alice",
				"password": "other",
			}))
			.await;

		assert_eq!(response.status_code(), StatusCode::CONFLICT);
		assert_eq!(response.json::<Value>()["errors"][0]["code"], "username_taken");

		// the first password still works, the second does not
		let response = client(&state)
			.post("/login")
			.json(&json!({ "username": "alice", "password": "pw1" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let response = client(&state)
			.post("/login")
			.json(&json!({ "username": "alice", "password": "other" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
	}

	#[sqlx::test]
	async fn test_register_requires_fields(pool: PgPool) {
		let app = client(&state(pool));

		let response = app
			.post("/register")
			.json(&json!({ "username": "alice" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

		let response = app
			.post("/register")
			.json(&json!({ "username": "", "password": "pw1" }))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(response.json::<Value>()["errors"][0]["field"], "username");

		let response = app
			.post("/register")
			.json(&json!({ "username": "alice", "password": "pw1", "level": 7 }))
			.await;

		assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
	}

	#[sqlx::test]
	async fn test_register_trusts_requested_level(pool: PgPool) {
		let app = client(&state(pool));

		let response = app
			.post("/register")
			.json(&json!({ "username": "root", "password": "pw1", "level": 0 }))
			.await;

		assert_eq!(response.status_code(), StatusCode::CREATED);
		assert_eq!(response.json::<Value>()["level"], 0);
		assert_eq!(app.get("/checksession").await.json::<Value>()["level"], 0);
	}

	#[sqlx::test]
	async fn test_check_session_without_cookie(pool: PgPool) {
		let response = client(&state(pool)).get("/checksession").await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(response.json::<Value>()["errors"][0]["code"], "no_session");
	}

	#[sqlx::test]
	async fn test_forged_cookie_is_rejected(pool: PgPool) {
		let response = client(&state(pool))
			.get("/checksession")
			.add_header(
				axum::http::header::COOKIE,
				axum::http::HeaderValue::from_static("session=1.0"),
			)
			.await;

		assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
		assert_eq!(response.json::<Value>()["errors"][0]["code"], "invalid_session");
	}
}
