use axum::{
	extract::{Path, State},
	http::{header, StatusCode},
	response::{Html, IntoResponse, Redirect, Response},
	Extension,
};

use crate::{
	auth::Admin,
	database,
	extract::{CurrentUser, Form},
	flash,
	form::{CommentInput, FormErrors, PostInput},
	model, view, AppState, Database, Error,
};

use super::Error as PostError;

const NEW_POST: &str = "New Post";
const EDIT_POST: &str = "Edit Post";
const TITLE_TAKEN: &str = "A post with this title already exists.";

async fn find_post(database: &Database, post_id: i64) -> Result<model::Post, Error> {
	database::find_post_by_id(database, post_id)
		.await?
		.ok_or_else(|| PostError::UnknownPost(post_id).into())
}

/// All posts, oldest first.
pub async fn list_posts(
	State(state): State<AppState>,
	user: CurrentUser,
) -> Result<Html<String>, Error> {
	let posts = database::list_all_posts(&state.database).await?;

	view::render(&view::IndexTemplate {
		logged_in: user.is_authenticated(),
		is_admin: user.is_admin(state.config.admin_id),
		posts,
	})
}

async fn post_page(
	state: &AppState,
	user: &CurrentUser,
	post: model::Post,
	form: CommentInput,
	errors: FormErrors,
) -> Result<Html<String>, Error> {
	let comments = database::list_comments_for_post(&state.database, post.id).await?;
	let more_posts = database::list_posts_by_author(&state.database, post.author_id)
		.await?
		.into_iter()
		.filter(|other| other.id != post.id)
		.collect();

	view::render(&view::PostTemplate {
		logged_in: user.is_authenticated(),
		is_admin: user.is_admin(state.config.admin_id),
		post,
		comments,
		more_posts,
		form,
		errors,
	})
}

/// A post with its comments and the comment form.
pub async fn show_post(
	State(state): State<AppState>,
	user: CurrentUser,
	Path(post_id): Path<i64>,
) -> Result<Html<String>, Error> {
	let post = find_post(&state.database, post_id).await?;

	let (form, errors) = (CommentInput::default(), FormErrors::default());

	post_page(&state, &user, post, form, errors).await
}

/// Adds a comment by the current user, then shows the post again.
///
/// Anonymous visitors are sent to the login page whatever they submitted,
/// even a body that is not a form at all.
pub async fn comment(
	State(state): State<AppState>,
	user: CurrentUser,
	Path(post_id): Path<i64>,
	form: Result<Form<CommentInput>, Error>,
) -> Result<Response, Error> {
	let Some(author) = user.user() else {
		let cookie = flash::create_cookie(flash::Message::LoginToComment);
		let headers = [(header::SET_COOKIE, cookie.to_string())];

		return Ok((headers, Redirect::to("/login")).into_response());
	};

	let post = find_post(&state.database, post_id).await?;

	match form? {
		Form::Invalid(input, errors) => {
			let page = post_page(&state, &user, post, input, errors).await?;

			Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
		}
		Form::Valid(input) => {
			let comment =
				database::create_comment(&state.database, post.id, author.id, &input).await?;

			tracing::info!(
				comment_id = comment.id,
				post_id = post.id,
				user_id = author.id,
				"comment created"
			);

			let (form, errors) = (CommentInput::default(), FormErrors::default());
			let page = post_page(&state, &user, post, form, errors).await?;

			Ok(page.into_response())
		}
	}
}

fn post_form(
	heading: &'static str,
	action: String,
	form: PostInput,
	errors: FormErrors,
) -> view::MakePostTemplate {
	view::MakePostTemplate {
		logged_in: true,
		heading,
		action,
		form,
		errors,
	}
}

fn invalid_post_form(
	heading: &'static str,
	action: String,
	form: PostInput,
	errors: FormErrors,
) -> Result<Response, Error> {
	let page = view::render(&post_form(heading, action, form, errors))?;

	Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

fn title_taken(field: &str) -> FormErrors {
	let mut errors = FormErrors::default();

	errors.insert(field, TITLE_TAKEN);
	errors
}

pub async fn new_post_page() -> Result<Html<String>, Error> {
	view::render(&post_form(
		NEW_POST,
		"/new-post".into(),
		PostInput::default(),
		FormErrors::default(),
	))
}

/// Creates a post authored by the administrator and dated today.
pub async fn new_post(
	State(database): State<Database>,
	Extension(Admin(admin)): Extension<Admin>,
	form: Form<PostInput>,
) -> Result<Response, Error> {
	let input = match form {
		Form::Valid(input) => input,
		Form::Invalid(input, errors) => {
			return invalid_post_form(NEW_POST, "/new-post".into(), input, errors)
		}
	};

	let date = chrono::Local::now().format("%B %d, %Y").to_string();

	match database::create_post(&database, admin.id, &date, &input).await {
		Ok(post) => {
			tracing::info!(post_id = post.id, "post created");

			Ok(Redirect::to("/").into_response())
		}
		Err(database::Error::ConstraintViolation(field)) => {
			invalid_post_form(NEW_POST, "/new-post".into(), input, title_taken(field))
		}
		Err(error) => Err(error.into()),
	}
}

/// Edit form, pre-filled from the stored post.
pub async fn edit_post_page(
	State(database): State<Database>,
	Path(post_id): Path<i64>,
) -> Result<Html<String>, Error> {
	let post = find_post(&database, post_id).await?;

	view::render(&post_form(
		EDIT_POST,
		format!("/edit-post/{post_id}"),
		PostInput::from(&post),
		FormErrors::default(),
	))
}

/// Overwrites a post. The administrator becomes its author; the date stays.
pub async fn edit_post(
	State(database): State<Database>,
	Extension(Admin(admin)): Extension<Admin>,
	Path(post_id): Path<i64>,
	form: Form<PostInput>,
) -> Result<Response, Error> {
	find_post(&database, post_id).await?;

	let action = format!("/edit-post/{post_id}");
	let input = match form {
		Form::Valid(input) => input,
		Form::Invalid(input, errors) => {
			return invalid_post_form(EDIT_POST, action, input, errors)
		}
	};

	match database::update_post(&database, post_id, admin.id, &input).await {
		Ok(true) => {
			tracing::info!(post_id, "post edited");

			Ok(Redirect::to(&format!("/post/{post_id}")).into_response())
		}
		Ok(false) => Err(PostError::UnknownPost(post_id).into()),
		Err(database::Error::ConstraintViolation(field)) => {
			invalid_post_form(EDIT_POST, action, input, title_taken(field))
		}
		Err(error) => Err(error.into()),
	}
}

/// Deletes a post along with its comments. There is no confirmation step.
pub async fn delete_post(
	State(database): State<Database>,
	Path(post_id): Path<i64>,
) -> Result<Redirect, Error> {
	if !database::delete_post(&database, post_id).await? {
		return Err(PostError::UnknownPost(post_id).into());
	}

	tracing::info!(post_id, "post deleted");

	Ok(Redirect::to("/"))
}
