mod session;

pub use session::Session;

use aide::OperationIo;
use axum::{
	body::Body,
	extract::{FromRequest, FromRequestParts, Request},
	http::{request, Response},
	response::IntoResponse,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use crate::error::AppError;

/// Runs the input's `validator` rules, turning failures into a 400.
fn validated<T: Validate>(input: T) -> Result<T, AppError> {
	input.validate()?;
	Ok(input)
}

/// A JSON request body that has passed validation, or a JSON response.
///
/// Malformed bodies and rule violations are both rejected with an
/// [`AppError`] before the handler runs.
///
/// ```rust
/// async fn route(Json(post): Json<CreatePostInput>) {
///   // ...
/// }
/// ```
#[derive(OperationIo)]
#[aide(input_with = "axum::Json<T>", output_with = "axum::Json<T>", json_schema)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
	fn into_response(self) -> Response<Body> {
		axum::Json(self.0).into_response()
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: DeserializeOwned + Validate,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let axum::Json(input) = axum::Json::<T>::from_request(req, state).await?;

		validated(input).map(Self)
	}
}

/// A validated query string, such as the `topic` filter on post listings.
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Query<T>",
	output_with = "axum::Json<T>",
	json_schema
)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
	T: DeserializeOwned + Validate,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let axum::extract::Query(input) =
			axum::extract::Query::<T>::from_request_parts(parts, state).await?;

		validated(input).map(Self)
	}
}

/// Path parameters, such as the numeric id in `/posts/:id`.
///
/// A non-numeric id is rejected in the same JSON shape as every other error.
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Path<T>",
	output_with = "axum::Json<T>",
	json_schema
)]
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: DeserializeOwned + Send,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let axum::extract::Path(params) =
			axum::extract::Path::<T>::from_request_parts(parts, state).await?;

		Ok(Self(params))
	}
}
