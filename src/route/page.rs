//! Static pages.

use axum::{response::Html, routing::get, Router};

use crate::{extract::CurrentUser, view, AppState, Error};

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/about", get(about))
		.route("/contact", get(contact))
}

pub async fn about(user: CurrentUser) -> Result<Html<String>, Error> {
	view::render(&view::AboutTemplate {
		logged_in: user.is_authenticated(),
	})
}

pub async fn contact(user: CurrentUser) -> Result<Html<String>, Error> {
	view::render(&view::ContactTemplate {
		logged_in: user.is_authenticated(),
	})
}
