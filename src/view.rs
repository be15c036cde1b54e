//! Askama templates for the blog pages.
//!
//! Every page carries `logged_in` for the navigation bar.

use askama::Template;
use axum::response::Html;

use crate::{
	form::{CommentInput, FormErrors, LoginInput, PostInput, RegisterInput},
	model::{Comment, Post},
	Error,
};

/// Renders a template into an HTML response body.
pub fn render<T: Template>(template: &T) -> Result<Html<String>, Error> {
	Ok(Html(template.render()?))
}

/// Post listing
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
	pub logged_in: bool,
	pub is_admin: bool,
	pub posts: Vec<Post>,
}

/// A single post with its comments and the comment form
#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
	pub logged_in: bool,
	pub is_admin: bool,
	pub post: Post,
	pub comments: Vec<Comment>,
	/// The author's other posts.
	pub more_posts: Vec<Post>,
	pub form: CommentInput,
	pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
	pub logged_in: bool,
	pub form: RegisterInput,
	pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
	pub logged_in: bool,
	pub flash: Option<String>,
	pub form: LoginInput,
	pub errors: FormErrors,
}

/// New and edit post form. `action` is the path the form posts back to.
#[derive(Template)]
#[template(path = "make-post.html")]
pub struct MakePostTemplate {
	pub logged_in: bool,
	pub heading: &'static str,
	pub action: String,
	pub form: PostInput,
	pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
	pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
	pub logged_in: bool,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
	pub logged_in: bool,
	pub status: u16,
	pub reason: &'static str,
	pub message: String,
}
