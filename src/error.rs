use axum::{
	body::Body,
	extract::{rejection::FormRejection, Request, State},
	http::{Response, StatusCode},
	middleware::Next,
	response::{Html, IntoResponse},
};

use askama::Template;

use crate::{database, extract::CurrentUser, route, view, AppState};

/// Error type for the application.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("post error: {0}")]
	Post(#[from] route::post::Error),
	#[error("forbidden")]
	Forbidden,
	#[error("form error: {0}")]
	Form(#[from] FormRejection),
	#[error("database error: {0}")]
	Database(#[from] database::Error),
	#[error("template error: {0}")]
	Template(#[from] askama::Error),
	#[error("password hash error: {0}")]
	Password(#[from] argon2::password_hash::Error),
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Post(error) => error.status(),
			Self::Forbidden => StatusCode::FORBIDDEN,
			Self::Form(rejection) => rejection.status(),
			Self::Database(..) | Self::Template(..) | Self::Password(..) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	/// The message shown on the error page.
	fn public_message(&self) -> String {
		match self {
			Self::Post(error) => error.to_string(),
			Self::Forbidden => "You are not allowed to do that.".into(),
			Self::Form(rejection) => rejection.body_text(),
			_ => "Something went wrong on our end.".into(),
		}
	}
}

/// What an error page shows, kept in the response extensions so that
/// [`render_error_pages`] can render it again for a signed-in visitor.
#[derive(Debug, Clone)]
pub struct ErrorPage {
	status: StatusCode,
	message: String,
}

impl ErrorPage {
	fn render(&self, logged_in: bool) -> Response<Body> {
		let page = view::ErrorTemplate {
			logged_in,
			status: self.status.as_u16(),
			reason: self.status.canonical_reason().unwrap_or("Error"),
			message: self.message.clone(),
		};

		let mut response = match page.render() {
			Ok(html) => (self.status, Html(html)).into_response(),
			Err(error) => {
				tracing::error!(%error, "failed to render error page");
				self.status.into_response()
			}
		};

		response.extensions_mut().insert(self.clone());
		response
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		// Errors are raised without the session at hand, so the page starts out
		// anonymous.
		ErrorPage {
			status,
			message: self.public_message(),
		}
		.render(false)
	}
}

/// Middleware that gives error pages the navigation of a signed-in visitor.
///
/// The session is only resolved when the response is an error page.
pub async fn render_error_pages(
	State(state): State<AppState>,
	request: Request,
	next: Next,
) -> Response<Body> {
	let headers = request.headers().clone();
	let response = next.run(request).await;

	let Some(page) = response.extensions().get::<ErrorPage>().cloned() else {
		return response;
	};

	match CurrentUser::from_headers(&headers, &state.database, &state.key, &state.config).await {
		Ok(user) if user.is_authenticated() => page.render(true),
		Ok(..) => response,
		Err(error) => {
			tracing::warn!(%error, "could not resolve session for error page");
			response
		}
	}
}
