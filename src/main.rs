use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, get_service},
    Router,
};
use secrecy::ExposeSecret;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pipcheck::api;
use pipcheck::api::middleware::session::{create_session_layer, AppState};
use pipcheck::config::Config;
use pipcheck::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipcheck=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting pipcheck server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create session layer
    let session_secret = config.session_secret.expose_secret().as_bytes();
    let session_layer = create_session_layer(pool.clone(), session_secret).await?;
    tracing::info!("Session layer initialized");

    // CORS: exactly one browser origin, with credentials
    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .allow_credentials(true);

    // Build application state
    let state = AppState {
        pool: pool.clone(),
        config: config.clone(),
    };

    // Serve uploaded files
    let upload_routes = Router::new().nest_service(
        "/uploads/files",
        get_service(ServeDir::new(&config.upload_dir)),
    );

    // Build router
    let mut app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(api::auth::router())
        .merge(api::expert::router())
        .merge(api::superuser::router())
        .merge(api::systems::router())
        .merge(api::selftest::router())
        .merge(api::results::router())
        .merge(api::feedback::router())
        .merge(api::email::router())
        .merge(api::uploads::router())
        .merge(api::middleware::csrf::router())
        .merge(upload_routes);

    if config.csrf_enabled {
        app = app.layer(axum::middleware::from_fn(
            api::middleware::csrf::verify_csrf,
        ));
        tracing::info!("CSRF protection enabled");
    }

    let app = app
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, cleaning up...");
}
