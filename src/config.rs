use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Single allowed browser origin; cookies are sent cross-origin from here
    pub frontend_origin: String,

    // Mail delivery API
    pub mail_api_url: String,
    pub mail_api_key: Secret<String>,
    pub mail_from: String,

    // File uploads
    pub upload_dir: String,

    // Security
    pub session_secret: Secret<String>,
    pub csrf_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for local development)
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        Ok(Self {
            database_url: config.get("database_url")?,
            host: config.get("host").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: config.get("port").unwrap_or(3000),

            frontend_origin: config
                .get("frontend_origin")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),

            mail_api_url: config.get("mail_api_url")?,
            mail_api_key: Secret::new(config.get("mail_api_key")?),
            mail_from: config.get("mail_from")?,

            upload_dir: config
                .get("upload_dir")
                .unwrap_or_else(|_| "uploads".to_string()),

            session_secret: Secret::new(config.get("session_secret")?),
            csrf_enabled: config.get("csrf_enabled").unwrap_or(false),
        })
    }
}
