use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub sqlite_path: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub cors_origin: String,
    pub auto_tag_enabled: bool,
    pub embedding_url: Option<String>,
    pub embedding_model: String,
    pub embedding_api_key: Option<String>,
    pub embedding_dimensions: usize,
    pub index_on_startup: bool,
}

const DEFAULT_BCRYPT_COST: u32 = 10;

impl AppConfig {
    pub fn from_env() -> Self {
        let server_port = env::var("SERVER_PORT")
            .or_else(|_| env::var("PORT"))
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5000);

        let sqlite_path =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "./data/database.sqlite".to_string());
        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using the built-in development secret");
            "memo-app-dev-secret-change-me".to_string()
        });

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let embedding_url = env::var("EMBEDDING_URL").ok().filter(|v| !v.trim().is_empty());
        let embedding_model = env::var("EMBEDDING_MODEL")
            .unwrap_or_else(|_| "text-embedding-3-small".to_string());
        let embedding_api_key = env::var("EMBEDDING_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Self {
            server_port,
            sqlite_path,
            database_url,
            jwt_secret,
            token_ttl_hours: parse_env("TOKEN_TTL_HOURS", 24),
            bcrypt_cost: parse_env("BCRYPT_COST", DEFAULT_BCRYPT_COST),
            cors_origin,
            auto_tag_enabled: parse_bool_env("AUTO_TAG_ENABLED", true),
            embedding_url,
            embedding_model,
            embedding_api_key,
            embedding_dimensions: parse_env("EMBEDDING_DIMENSIONS", 256),
            index_on_startup: parse_bool_env("INDEX_ON_STARTUP", true),
        }
    }

    /// In-memory database, offline embedder and the cheapest bcrypt cost.
    pub fn test_default() -> Self {
        Self {
            server_port: 0,
            sqlite_path: ":memory:".to_string(),
            database_url: Some("sqlite::memory:".to_string()),
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 24,
            bcrypt_cost: 4,
            cors_origin: "http://localhost:3000".to_string(),
            auto_tag_enabled: true,
            embedding_url: None,
            embedding_model: "test".to_string(),
            embedding_api_key: None,
            embedding_dimensions: 256,
            index_on_startup: false,
        }
    }

    pub fn database_url(&self) -> String {
        if let Some(url) = &self.database_url {
            return url.clone();
        }

        let path = self.sqlite_path.trim();
        if path.starts_with("sqlite:") || path.starts_with("file:") {
            return path.to_string();
        }
        format!("sqlite://{}", path)
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_bool_env(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
