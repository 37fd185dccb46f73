use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Session},
	openapi::tag,
	route::model::Confirmation,
	Database,
};

use super::{model, Error, RouteError};

/// Vote on post
/// Records the caller's vote on a post, replacing any earlier vote.
/// A value of `0` removes the vote instead.
#[route(
	tag = tag::VOTE,
	response(status = 200, description = "The vote was recorded or removed.", shape = "Json<Confirmation>"),
	response(status = 404, description = "The post does not exist.")
)]
pub async fn cast_vote(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::VoteInput>,
) -> Result<Json<Confirmation>, RouteError> {
	if database.post(input.post_id).await?.is_none() {
		return Err(Error::UnknownPost(input.post_id).into());
	}

	if input.value == 0 {
		database.retract_vote(session.user_id, input.post_id).await?;

		return Ok(Json(Confirmation::new("Vote removed")));
	}

	database
		.upsert_vote(session.user_id, input.post_id, input.value)
		.await?;

	tracing::debug!(post = input.post_id, user = session.user_id, value = input.value, "recorded vote");

	Ok(Json(Confirmation::new("Vote recorded")))
}
