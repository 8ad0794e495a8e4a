use axum::extract::FromRef;
use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

/// Session keys used in the application. Each role logs in under its own key;
/// a session may carry any subset.
pub const SESSION_KEY_USER_ID: &str = "user_id";
pub const SESSION_KEY_EXPERT_ID: &str = "expert_id";
pub const SESSION_KEY_SUPERUSER_ID: &str = "superuser_id";
pub const SESSION_KEY_CSRF_TOKEN: &str = "csrf_token";

/// Creates a session layer for Axum
pub async fn create_session_layer(
    pool: PgPool,
    _session_secret: &[u8],
) -> Result<SessionManagerLayer<PostgresStore>, sqlx::Error> {
    // Create the session store backed by PostgreSQL
    let session_store = PostgresStore::new(pool);
    session_store.migrate().await?;

    // Build the session layer. The frontend runs on another origin, so the
    // cookie must survive cross-site fetches with credentials.
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // TLS terminates at the reverse proxy
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(1)));

    Ok(session_layer)
}

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: crate::config::Config,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> PgPool {
        state.pool.clone()
    }
}
