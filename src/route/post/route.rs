use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path, Query, Session},
	openapi::tag,
	route::model::Confirmation,
	store::{PostFilter, PostOrder},
	Database,
};

use super::{model, Error, RouteError};

/// Get all posts
/// Returns every post with its vote score, newest first.
/// Pass `topic` to only return posts with that topic.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(database): State<Database>,
	Query(query): Query<model::PostQuery>,
) -> Result<Json<Vec<model::Post>>, RouteError> {
	let filter = query.topic.map_or(PostFilter::All, PostFilter::Topic);

	Ok(Json(database.list_posts(filter, PostOrder::Newest).await?))
}

/// Get popular posts
/// Returns every post ordered by vote score, highest first.
/// Posts with the same score are ordered newest first.
#[route(tag = tag::POST)]
pub async fn get_popular_posts(
	State(database): State<Database>,
) -> Result<Json<Vec<model::Post>>, RouteError> {
	Ok(Json(
		database
			.list_posts(PostFilter::All, PostOrder::Popular)
			.await?,
	))
}

/// Get user posts
/// Returns the posts written by a user, newest first.
#[route(tag = tag::POST)]
pub async fn get_user_posts(
	State(database): State<Database>,
	Path(user_id): Path<i32>,
) -> Result<Json<Vec<model::Post>>, RouteError> {
	Ok(Json(
		database
			.list_posts(PostFilter::Author(user_id), PostOrder::Newest)
			.await?,
	))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(tag = tag::POST, response(status = 404, description = "The post does not exist."))]
pub async fn get_post(
	State(database): State<Database>,
	Path(post_id): Path<i32>,
) -> Result<Json<model::Post>, RouteError> {
	let post = database.post(post_id).await?;

	Ok(Json(post.ok_or(Error::UnknownPost(post_id))?))
}

/// Create post
/// Creates a new post authored by the caller.
#[route(
	tag = tag::POST,
	response(status = 201, description = "The created post.", shape = "Json<model::Post>")
)]
pub async fn create_post(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreatePostInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = database.create_post(session.user_id, input).await?;

	tracing::info!(post = post.id, user = session.user_id, "created post");

	Ok((StatusCode::CREATED, Json(post)).into_response())
}

/// Update post
/// Updates the supplied fields of a post. Only its author may do this.
#[route(
	tag = tag::POST,
	response(status = 403, description = "The caller is not the author."),
	response(status = 404, description = "The post does not exist.")
)]
pub async fn update_post(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<i32>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = database
		.post(post_id)
		.await?
		.ok_or(Error::UnknownPost(post_id))?;

	if post.author_id != session.user_id {
		return Err(Error::NotAuthor(post_id).into());
	}

	let post = database
		.update_post(post_id, input)
		.await?
		.ok_or(Error::UnknownPost(post_id))?;

	Ok(Json(post))
}

/// Delete post
/// Deletes a post along with its comments and votes.
/// Its author, moderators and administrators may do this.
#[route(
	tag = tag::POST,
	response(status = 200, description = "The post was deleted.", shape = "Json<Confirmation>"),
	response(status = 403, description = "The caller may not delete this post."),
	response(status = 404, description = "The post does not exist.")
)]
pub async fn delete_post(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<i32>,
) -> Result<Json<Confirmation>, RouteError> {
	let post = database
		.post(post_id)
		.await?
		.ok_or(Error::UnknownPost(post_id))?;

	if !session.can_moderate(post.author_id) {
		return Err(Error::NotAuthor(post_id).into());
	}

	if !database.delete_post(post_id).await? {
		return Err(Error::UnknownPost(post_id).into());
	}

	tracing::info!(post = post_id, user = session.user_id, "deleted post");

	Ok(Json(Confirmation::new("Post deleted")))
}
