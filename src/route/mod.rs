use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{auth::require_admin, error::render_error_pages, AppState};

pub mod auth;
pub mod page;
pub mod post;

/// Builds the whole application.
///
/// The post management routes are composed behind [`require_admin`],
/// so their handlers only ever run for the administrator. Error pages are
/// rendered again with the visitor's navigation by [`render_error_pages`].
pub fn router(state: AppState) -> Router {
	let admin = post::admin_routes().route_layer(middleware::from_fn_with_state(
		state.clone(),
		require_admin,
	));

	Router::new()
		.merge(post::routes())
		.merge(auth::routes())
		.merge(page::routes())
		.merge(admin)
		.layer(middleware::from_fn_with_state(
			state.clone(),
			render_error_pages,
		))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}
