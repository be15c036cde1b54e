#![warn(clippy::pedantic)]

mod auth;
mod config;
mod database;
mod error;
mod extract;
mod flash;
mod form;
mod model;
mod route;
mod session;
mod trace;
mod view;

use std::{str::FromStr, sync::Arc};

use argon2::Argon2;
use cookie::Key;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::config::Config;

pub use error::Error;

pub type Database = sqlx::SqlitePool;
pub type AppState = State;

/// The shared application state.
///
/// Handlers can extract any single field on its own (`State<Database>`,
/// `State<Arc<Config>>`, ...) through [`FromRef`](axum::extract::FromRef).
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub config: Arc<Config>,
	/// Signs the session cookie.
	pub key: Key,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	dotenvy::dotenv().ok();

	let config = Config::from_env()?;
	let _guard = trace::init_tracing_subscriber(config.otlp_endpoint.as_deref())?;

	let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
	let database = SqlitePoolOptions::new()
		.max_connections(config.max_connections)
		.connect_with(options)
		.await?;

	sqlx::migrate!().run(&database).await?;

	let cutoff = chrono::Utc::now() - config.session_ttl;
	let swept = database::delete_sessions_before(&database, cutoff).await?;

	tracing::info!(swept, "removed expired sessions");

	let key = match &config.secret_key {
		Some(secret) => Key::try_from(secret.as_bytes())?,
		None => {
			tracing::warn!("SECRET_KEY is not set, sessions will not survive a restart");
			Key::generate()
		}
	};

	let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;

	tracing::info!("listening on {}", listener.local_addr()?);

	let state = State {
		database: database.clone(),
		hasher: Argon2::default(),
		config: Arc::new(config),
		key,
	};

	axum::serve(listener, route::router(state))
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	database.close().await;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(error) = tokio::signal::ctrl_c().await {
		tracing::error!(%error, "failed to listen for shutdown signal");
		std::future::pending::<()>().await;
	}

	tracing::info!("shutting down");
}
