use axum::http::{header, HeaderMap};
use cookie::{Cookie, CookieJar, Key, SameSite};
use uuid::Uuid;

pub const COOKIE_NAME: &str = "session";

/// Creates a signed session cookie with no expiry, so it lasts for the
/// browser session. The server-side row enforces the real lifetime.
pub fn create_cookie(key: &Key, session_id: Uuid, secure: bool) -> Cookie<'static> {
	let cookie = Cookie::build((COOKIE_NAME, session_id.to_string()))
		.secure(secure)
		.http_only(true)
		.same_site(SameSite::Lax)
		.path("/");

	let mut jar = CookieJar::new();
	jar.signed_mut(key).add(cookie);

	jar.get(COOKIE_NAME)
		.cloned()
		.expect("signed cookie was just added to the jar")
}

/// Creates an empty session cookie used to invalidate a previous one
pub fn clear_cookie() -> Cookie<'static> {
	Cookie::build(COOKIE_NAME)
		.http_only(true)
		.path("/")
		.max_age(cookie::time::Duration::ZERO)
		.into()
}

/// Reads the session id from the request cookies, if one is present and its
/// signature checks out.
pub fn session_id(headers: &HeaderMap, key: &Key) -> Option<Uuid> {
	let mut jar = CookieJar::new();

	headers
		.get_all(header::COOKIE)
		.into_iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(Cookie::split_parse)
		.filter_map(Result::ok)
		.filter(|cookie| cookie.name() == COOKIE_NAME)
		.for_each(|cookie| jar.add_original(cookie.into_owned()));

	let cookie = jar.signed(key).get(COOKIE_NAME)?;

	Uuid::parse_str(cookie.value()).ok()
}
