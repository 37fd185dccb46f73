#![warn(clippy::pedantic)]

mod age;
mod config;
mod error;
mod extract;
mod openapi;
mod route;
mod session;
mod store;
mod trace;

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use argon2::Argon2;
use axum::{
	extract::Request,
	http::{header, HeaderValue, Method},
	Extension,
};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::{AllowOrigin, CorsLayer},
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{config::Config, session::CookieConfig, store::postgres::PgStore};

pub type Database = Arc<dyn store::Repository>;
pub type AppState = State;

/// The shared application state.
///
/// Handlers extract the parts they need, such as `State<Database>`.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub cookies: CookieConfig,
}

/// Builds the complete application: every route, the API reference under
/// `/docs`, and the HTTP middleware.
pub fn app(state: State, origins: Vec<HeaderValue>) -> axum::Router {
	aide::gen::on_error(|error| tracing::error!(%error, "failed to generate api docs"));
	aide::gen::extract_schemas(true);

	let mut api = OpenApi::default();

	let cors = CorsLayer::new()
		.allow_origin(AllowOrigin::list(origins))
		.allow_credentials(true)
		.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
		.allow_headers([header::CONTENT_TYPE]);

	ApiRouter::new()
		.merge(route::auth::routes())
		.merge(route::post::routes())
		.merge(route::comment::routes())
		.merge(route::vote::routes())
		.nest_api_service("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(
					TraceLayer::new_for_http().make_span_with(|request: &Request| {
						let request_id = request
							.headers()
							.get("x-request-id")
							.and_then(|value| value.to_str().ok())
							.unwrap_or_default();

						tracing::info_span!(
							"request",
							method = %request.method(),
							uri = %request.uri(),
							request_id,
						)
					}),
				)
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(cors),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	dotenvy::dotenv().ok();

	let config = Config::from_env()?;
	let _guard = trace::init_tracing_subscriber(&config)?;

	let pool = PgPoolOptions::new()
		.max_connections(config.database_max_connections)
		.connect(&config.database_url)
		.await?;

	sqlx::migrate!().run(&pool).await?;

	let state = State {
		database: Arc::new(PgStore::new(pool)),
		hasher: Argon2::default(),
		cookies: CookieConfig::new(&config.session_secret, config.cookie_secure),
	};

	let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;

	tracing::info!(address = %listener.local_addr()?, "listening");

	axum::serve(listener, app(state, config.allowed_origins))
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	tracing::info!("server stopped");

	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(error) = signal::ctrl_c().await {
			tracing::error!(%error, "failed to listen for ctrl-c");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(error) => {
				tracing::error!(%error, "failed to listen for terminate signal");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}

	tracing::info!("shutting down");
}
