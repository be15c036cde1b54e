use axum::{routing::get, Router};

use crate::AppState;

pub mod route;

/// A failed login attempt.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("That email does not exist, please try again.")]
	UnknownEmail,
	#[error("Incorrect password, please try again.")]
	IncorrectPassword,
}

pub fn routes() -> Router<AppState> {
	use route::*;

	Router::new()
		.route("/register", get(register_page).post(register))
		.route("/login", get(login_page).post(login))
		.route("/logout", get(logout))
}
