use std::sync::Arc;

use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use showspree::{
    api::{create_router, AppState},
    auth::SessionKeys,
    config::Config,
    middleware,
    services::catalog::TmdbClient,
    store::{self, PgStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,showspree=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let pool = store::create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("database migrations applied");

    let catalog = TmdbClient::new(
        reqwest::Client::new(),
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_url.clone(),
    );

    let state = AppState::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(catalog),
        SessionKeys::new(&config.session_secret),
    );

    let app = create_router(state)
        .layer(axum::middleware::from_fn(middleware::request_id))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
