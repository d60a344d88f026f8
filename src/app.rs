/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (security headers / CORS / HTTP)
 * - axum::serve() で起動
 */
use std::sync::Arc;

use anyhow::Result;
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{self, pages},
    config::Config,
    middleware::{self, check::TracingLogger},
    services::{
        environment::{EnvironmentResolver, PgDirectory},
        session::SessionVerifier,
        settings::StaticSettings,
        urls::UrlGenerator,
    },
    state::AppState,
};

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    let directory = Arc::new(PgDirectory::new(db));

    let sessions = Arc::new(SessionVerifier::new(
        &config.auth_jwt_secret,
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_leeway_seconds,
    ));
    let resolver = Arc::new(EnvironmentResolver::new(
        directory.clone(),
        directory,
        sessions,
    ));

    let state = AppState::new(
        config.app_name.as_str(),
        Arc::new(StaticSettings::new(config.share_links_enabled)),
        resolver,
        UrlGenerator::new(config.app_name.as_str(), config.public_base_path.as_str()),
        Arc::new(TracingLogger),
    );

    if !config.share_links_enabled {
        tracing::info!("public link sharing is disabled");
    }

    let app = build_router(state);
    let app = middleware::security_headers::apply(app);
    let app = middleware::cors::apply(app, &config);
    let app = middleware::http::apply(app, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, app = %config.app_name, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/error_page", get(pages::error_page))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state)
}
