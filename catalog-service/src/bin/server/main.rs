use std::sync::Arc;

use auth::Authenticator;
use catalog_service::config::Config;
use catalog_service::domain::movie::service::MovieService;
use catalog_service::domain::user::service::UserService;
use catalog_service::inbound::http::router::create_router;
use catalog_service::outbound::repositories::MongoMovieRepository;
use catalog_service::outbound::repositories::MongoUserRepository;
use chrono::Duration;
use mongodb::Client;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "catalog-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_url = %config.database.url,
        database_name = %config.database.name,
        http_port = config.server.http_port,
        token_ttl_days = config.jwt.expiration_days,
        "Configuration loaded"
    );

    let client = Client::with_uri_str(&config.database.url).await?;
    let database = client.database(&config.database.name);
    tracing::info!(database = "mongodb", "Database client connected");

    let user_repository = Arc::new(MongoUserRepository::new(&database));
    user_repository.ensure_indexes().await?;
    tracing::info!(database = "mongodb", "Unique indexes ensured");

    let movie_repository = Arc::new(MongoMovieRepository::new(&database));

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        Duration::days(config.jwt.expiration_days),
    ));

    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repository),
        Arc::clone(&movie_repository),
    ));
    let movie_service = Arc::new(MovieService::new(movie_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, movie_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
