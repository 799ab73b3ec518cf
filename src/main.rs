use exp_reviews::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, run_migrations, PgStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("exp_reviews=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let settings = config.engine_settings();
    tracing::info!(
        similar_user_limit = settings.similar_user_limit,
        games_per_peer = settings.games_per_peer,
        "Recommendation engine configured"
    );

    let state = AppState::with_postgres(PgStore::new(pool), settings);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
