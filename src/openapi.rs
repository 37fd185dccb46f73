use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};
use axum::http::StatusCode;

use crate::{error, extract::Json, session};

pub const SECURITY_SCHEME_SESSION: &str = "Session";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const POST: &str = "Post";
	pub const COMMENT: &str = "Comment";
	pub const VOTE: &str = "Vote";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Forum API")
		.summary("Posts, threaded comments and votes")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::AUTH.into(),
			description: Some("Registration and session management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Posts and their vote scores".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::COMMENT.into(),
			description: Some("Comments with one level of replies".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::VOTE.into(),
			description: Some("Up and down votes on posts".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: session::COOKIE_NAME.into(),
				description: Some("A signed user session cookie".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::ErrorBody<'static>>, _>(|res| {
			res.example(error::ErrorBody::new(
				StatusCode::NOT_FOUND,
				error::Message::new("unknown_post")
					.content("The post you requested does not exist.")
					.detail("post", 1)
					.into_vec(),
			))
		})
}
