use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection::{JsonRejection, PathRejection, QueryRejection},
	http::{Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::Serialize;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message.
///
/// The `code` is stable and meant for programs, the `content` is meant for people.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	pub code: Cow<'a, str>,
	pub content: Cow<'a, str>,
	/// The input field the message refers to, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Map>,
}

impl<'a> Message<'a> {
	pub fn new(code: impl Into<Cow<'a, str>>) -> Self {
		let code = code.into();

		Self {
			content: code.clone(),
			code,
			field: None,
			details: None,
		}
	}

	#[must_use]
	pub fn content(mut self, content: impl Into<Cow<'a, str>>) -> Self {
		self.content = content.into();
		self
	}

	#[must_use]
	pub fn field(mut self, field: impl Into<Cow<'a, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	#[must_use]
	pub fn detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(Map::new)
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

/// The body of every error response.
///
/// `error` repeats the first message so simple clients can show it directly.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorBody<'a> {
	pub success: bool,
	pub error: Cow<'a, str>,
	pub errors: Vec<Message<'a>>,
}

impl<'a> ErrorBody<'a> {
	pub fn new(status: StatusCode, errors: Vec<Message<'a>>) -> Self {
		let error = errors.first().map_or_else(
			|| {
				Cow::Borrowed(
					status
						.canonical_reason()
						.unwrap_or("unknown error"),
				)
			},
			|message| message.content.clone(),
		);

		Self {
			success: false,
			error,
			errors,
		}
	}
}

/// Describes how a route-specific error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;
	fn into_errors(self) -> Vec<Message<'static>>;
}

/// Errors that any route can produce, independent of its resource.
///
/// The Display implementation is never sent to the client, so it can contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] PathRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl AppError {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Query(..) | Self::Path(..) => {
				StatusCode::BAD_REQUEST
			}
			Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn into_errors(self) -> Vec<Message<'static>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					let field = field.to_string();

					errors.iter().map(move |error| {
						Message::new(error.code.clone())
							.content(format!(
								"{field}: {}",
								error.message.as_ref().unwrap_or(&error.code)
							))
							.field(field.clone())
					})
				})
				.collect(),
			Self::Json(rejection) => Message::new("invalid_body")
				.content(rejection.body_text())
				.into_vec(),
			Self::Query(rejection) => Message::new("invalid_query")
				.content(rejection.body_text())
				.into_vec(),
			Self::Path(rejection) => Message::new("invalid_path")
				.content(rejection.body_text())
				.into_vec(),
			Self::Database(error) => {
				tracing::error!(%error, "database query failed");
				Vec::new()
			}
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		respond(status, self.into_errors())
	}
}

impl OperationOutput for AppError {
	type Inner = Self;
}

/// The error type returned by route handlers.
///
/// Either a resource-specific error `E` or an [`AppError`].
#[derive(Debug)]
pub enum RouteError<E> {
	App(AppError),
	Route(E),
}

impl<E: ErrorShape> From<E> for RouteError<E> {
	fn from(error: E) -> Self {
		Self::Route(error)
	}
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<sqlx::Error> for RouteError<E> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(AppError::Database(error))
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => {
				let status = error.status();

				respond(status, error.into_errors())
			}
		}
	}
}

impl<E> OperationOutput for RouteError<E> {
	type Inner = Self;
}

fn respond(status: StatusCode, errors: Vec<Message<'static>>) -> Response<Body> {
	(status, axum::Json(ErrorBody::new(status, errors))).into_response()
}
