use std::sync::Arc;

use auth::Authenticator;
use auth::TokenCodec;
use chrono::Duration;
use library_service::bootstrap::ensure_admin;
use library_service::config::Config;
use library_service::domain::auth::service::AuthenticationService;
use library_service::domain::book::service::BookService;
use library_service::domain::borrow::service::BorrowService;
use library_service::domain::principal::service::PrincipalService;
use library_service::inbound::http::router::create_router;
use library_service::inbound::http::router::AppState;
use library_service::outbound::repositories::PostgresBookRepository;
use library_service::outbound::repositories::PostgresBorrowRepository;
use library_service::outbound::repositories::PostgresPrincipalRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "library-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_url = %config.database.redacted_url(),
        bootstrap_admin = config.bootstrap.is_some(),
        http_port = config.server.http_port,
        jwt_algorithm = %config.jwt.algorithm,
        jwt_expiration_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let codec = TokenCodec::new(
        config.jwt.secret.as_bytes(),
        config.jwt.algorithm()?,
        Duration::hours(config.jwt.expiration_hours),
    )?;
    let authenticator = Arc::new(Authenticator::new(codec));

    let principal_repository = Arc::new(PostgresPrincipalRepository::new(pg_pool.clone()));
    let book_repository = Arc::new(PostgresBookRepository::new(pg_pool.clone()));
    let borrow_repository = Arc::new(PostgresBorrowRepository::new(pg_pool));

    let principal_service = Arc::new(PrincipalService::new(
        Arc::clone(&principal_repository),
        Arc::clone(&authenticator),
    ));

    if let Some(bootstrap) = &config.bootstrap {
        ensure_admin(principal_service.as_ref(), bootstrap).await?;
    }

    let state = AppState {
        auth_service: Arc::new(AuthenticationService::new(
            Arc::clone(&principal_repository),
            authenticator,
        )),
        principal_service,
        book_service: Arc::new(BookService::new(Arc::clone(&book_repository))),
        borrow_service: Arc::new(BorrowService::new(
            borrow_repository,
            book_repository,
            principal_repository,
        )),
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    if let Err(e) = axum::serve(http_listener, create_router(state)).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
