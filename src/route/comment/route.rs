use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use macros::route;

use crate::{
	extract::{Json, Path, Session},
	openapi::tag,
	route::model::Confirmation,
	Database,
};

use super::{model, Error, RouteError};

/// Get post comments
/// Returns the top-level comments of a post, oldest first, each with its direct replies.
#[route(
	tag = tag::COMMENT,
	response(status = 200, description = "The comment threads.", shape = "Json<Vec<model::CommentThread>>"),
	response(status = 404, description = "The post does not exist.")
)]
pub async fn get_comments(
	State(database): State<Database>,
	Path(post_id): Path<i32>,
) -> Result<Json<Vec<model::CommentThread>>, RouteError> {
	if database.post(post_id).await?.is_none() {
		return Err(Error::UnknownPost(post_id).into());
	}

	let comments = database.comments_for_post(post_id).await?;

	Ok(Json(model::threads(comments, Utc::now())))
}

/// Create comment
/// Comments on a post, or replies to one of its top-level comments when `parent` is set.
#[route(
	tag = tag::COMMENT,
	response(status = 201, description = "The created comment.", shape = "Json<model::Comment>"),
	response(status = 400, description = "The parent is not a top-level comment on this post."),
	response(status = 404, description = "The post does not exist.")
)]
pub async fn create_comment(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<i32>,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	if database.post(post_id).await?.is_none() {
		return Err(Error::UnknownPost(post_id).into());
	}

	if let Some(parent) = input.parent {
		let valid = database
			.comment(parent)
			.await?
			.is_some_and(|comment| comment.post_id == post_id && comment.parent.is_none());

		if !valid {
			return Err(Error::InvalidParent(parent).into());
		}
	}

	let comment = database
		.create_comment(post_id, session.user_id, input)
		.await?;

	Ok((StatusCode::CREATED, Json(comment)).into_response())
}

/// Update comment
/// Replaces the body of a comment. Only its author may do this.
#[route(
	tag = tag::COMMENT,
	response(status = 200, description = "The comment was updated.", shape = "Json<Confirmation>"),
	response(status = 403, description = "The caller is not the author."),
	response(status = 404, description = "The comment does not exist.")
)]
pub async fn update_comment(
	State(database): State<Database>,
	session: Session,
	Path(comment_id): Path<i32>,
	Json(input): Json<model::UpdateCommentInput>,
) -> Result<Json<Confirmation>, RouteError> {
	let comment = database
		.comment(comment_id)
		.await?
		.ok_or(Error::UnknownComment(comment_id))?;

	if comment.author_id != session.user_id {
		return Err(Error::NotAuthor(comment_id).into());
	}

	database
		.update_comment(comment_id, &input.body)
		.await?
		.ok_or(Error::UnknownComment(comment_id))?;

	Ok(Json(Confirmation::new("Comment updated")))
}

/// Delete comment
/// Deletes a comment and its replies. Its author, moderators and administrators may do this.
#[route(
	tag = tag::COMMENT,
	response(status = 200, description = "The comment was deleted.", shape = "Json<Confirmation>"),
	response(status = 403, description = "The caller may not delete this comment."),
	response(status = 404, description = "The comment does not exist.")
)]
pub async fn delete_comment(
	State(database): State<Database>,
	session: Session,
	Path(comment_id): Path<i32>,
) -> Result<Json<Confirmation>, RouteError> {
	let comment = database
		.comment(comment_id)
		.await?
		.ok_or(Error::UnknownComment(comment_id))?;

	if !session.can_moderate(comment.author_id) {
		return Err(Error::NotAuthor(comment_id).into());
	}

	if !database.delete_comment(comment_id).await? {
		return Err(Error::UnknownComment(comment_id).into());
	}

	tracing::info!(comment = comment_id, user = session.user_id, "deleted comment");

	Ok(Json(Confirmation::new("Comment deleted")))
}
