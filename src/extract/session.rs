use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};
use cookie::{Cookie, CookieJar};

use crate::{
	error::RouteError,
	openapi::SECURITY_SCHEME_SESSION,
	route::auth::{self, model::Level},
	session::{CookieConfig, COOKIE_NAME},
};

/// The identity of the caller, resolved from the signed session cookie
/// before the handler runs.
///
/// If the cookie does not exist, a [`auth::Error::NoSessionCookie`] is returned.
/// If its signature or value is invalid, a [`auth::Error::InvalidSessionCookie`] is returned.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{}", session.user_id);
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Session {
	pub user_id: i32,
	pub level: Level,
}

impl Session {
	/// Whether the caller may remove content owned by `owner_id`.
	pub fn can_moderate(&self, owner_id: i32) -> bool {
		self.user_id == owner_id || self.level.is_staff()
	}
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	CookieConfig: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let mut jar = CookieJar::new();

		parts
			.headers
			.get_all(header::COOKIE)
			.into_iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(Cookie::split_parse)
			.filter_map(Result::ok)
			.for_each(|cookie| jar.add_original(cookie.into_owned()));

		if jar.get(COOKIE_NAME).is_none() {
			return Err(auth::Error::NoSessionCookie.into());
		}

		let (user_id, level) = CookieConfig::from_ref(state)
			.verify(&jar)
			.ok_or(auth::Error::InvalidSessionCookie)?;

		Ok(Self { user_id, level })
	}
}

impl OperationInput for Session {
	/// Operation input for the session extractor.
	///
	/// This adds a session cookie requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.push(
			[(SECURITY_SCHEME_SESSION.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		);
	}
}
