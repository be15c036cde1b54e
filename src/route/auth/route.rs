use axum::{
	extract::State,
	http::{header, StatusCode},
	response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
	auth, database,
	extract::{CurrentUser, Flash, Form},
	flash,
	form::{FormErrors, LoginInput, RegisterInput},
	session, view, AppState, Database, Error,
};

/// Registration form
pub async fn register_page(user: CurrentUser) -> Result<Html<String>, Error> {
	view::render(&view::RegisterTemplate {
		logged_in: user.is_authenticated(),
		form: RegisterInput::default(),
		errors: FormErrors::default(),
	})
}

/// Creates an account and logs into it. An email that is already registered
/// sends the visitor to the login page instead.
pub async fn register(
	State(state): State<AppState>,
	user: CurrentUser,
	form: Form<RegisterInput>,
) -> Result<Response, Error> {
	let input = match form {
		Form::Valid(input) => input,
		Form::Invalid(input, errors) => {
			let page = view::RegisterTemplate {
				logged_in: user.is_authenticated(),
				form: RegisterInput {
					password: String::new(),
					..input
				},
				errors,
			};

			return Ok((StatusCode::UNPROCESSABLE_ENTITY, view::render(&page)?).into_response());
		}
	};

	if database::find_user_by_email(&state.database, &input.email)
		.await?
		.is_some()
	{
		return Ok(email_taken());
	}

	let hashed = auth::hash_password(&state.hasher, &input.password)?;

	let created = database::create_user(&state.database, &input.name, &input.email, &hashed).await;
	let account = match created {
		Ok(account) => account,
		Err(database::Error::ConstraintViolation(..)) => return Ok(email_taken()),
		Err(error) => return Err(error.into()),
	};

	tracing::info!(user_id = account.id, "user registered");

	let cookie = auth::start_session(
		&state.database,
		&state.key,
		&state.config,
		&account,
		user.session_id(),
	)
	.await?;

	Ok(([(header::SET_COOKIE, cookie.to_string())], Redirect::to("/")).into_response())
}

fn email_taken() -> Response {
	let cookie = flash::create_cookie(flash::Message::EmailTaken);

	([(header::SET_COOKIE, cookie.to_string())], Redirect::to("/login")).into_response()
}

/// Login form, showing any pending flash message.
pub async fn login_page(user: CurrentUser, flash: Flash) -> Result<impl IntoResponse, Error> {
	let page = view::LoginTemplate {
		logged_in: user.is_authenticated(),
		flash: flash.text().map(Into::into),
		form: LoginInput::default(),
		errors: FormErrors::default(),
	};

	Ok((flash, view::render(&page)?))
}

/// Logs into an existing account. Unknown emails and wrong passwords re-render
/// the form with a notice.
pub async fn login(
	State(state): State<AppState>,
	user: CurrentUser,
	form: Form<LoginInput>,
) -> Result<Response, Error> {
	let logged_in = user.is_authenticated();

	let input = match form {
		Form::Valid(input) => input,
		Form::Invalid(input, errors) => {
			return login_form(logged_in, StatusCode::UNPROCESSABLE_ENTITY, input, errors, None)
		}
	};

	let account = database::find_user_by_email(&state.database, &input.email).await?;
	let Some(account) = account else {
		let notice = super::Error::UnknownEmail.to_string();
		return login_form(logged_in, StatusCode::OK, input, FormErrors::default(), Some(notice));
	};

	if !auth::verify_password(&state.hasher, &input.password, &account.password) {
		tracing::info!(user_id = account.id, "login with incorrect password");

		let notice = super::Error::IncorrectPassword.to_string();
		return login_form(logged_in, StatusCode::OK, input, FormErrors::default(), Some(notice));
	}

	let cookie = auth::start_session(
		&state.database,
		&state.key,
		&state.config,
		&account,
		user.session_id(),
	)
	.await?;

	Ok(([(header::SET_COOKIE, cookie.to_string())], Redirect::to("/")).into_response())
}

/// Re-renders the login form. The password is never echoed back.
fn login_form(
	logged_in: bool,
	status: StatusCode,
	input: LoginInput,
	errors: FormErrors,
	notice: Option<String>,
) -> Result<Response, Error> {
	let page = view::LoginTemplate {
		logged_in,
		flash: notice,
		form: LoginInput {
			password: String::new(),
			..input
		},
		errors,
	};

	Ok((status, view::render(&page)?).into_response())
}

/// Ends the session, if there is one, and goes back to the post list.
pub async fn logout(
	State(database): State<Database>,
	user: CurrentUser,
) -> Result<Response, Error> {
	let cookie = match user {
		CurrentUser::Authenticated { session_id, .. } => {
			auth::end_session(&database, session_id).await?
		}
		CurrentUser::Anonymous => session::clear_cookie(),
	};

	Ok(([(header::SET_COOKIE, cookie.to_string())], Redirect::to("/")).into_response())
}
