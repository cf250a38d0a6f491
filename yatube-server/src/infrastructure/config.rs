use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    pub pagination: PaginationConfig,
}

/// Limit/offset defaults for paginated listings.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PaginationConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = parse_var("PORT", 8080)?;
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let jwt_ttl_minutes = parse_var("JWT_TTL_MINUTES", 60)?;
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let defaults = PaginationConfig::default();
        let pagination = PaginationConfig {
            default_limit: parse_var("DEFAULT_PAGE_SIZE", defaults.default_limit)?,
            max_limit: parse_var("MAX_PAGE_SIZE", defaults.max_limit)?,
        };
        if pagination.default_limit == 0 || pagination.default_limit > pagination.max_limit {
            anyhow::bail!("DEFAULT_PAGE_SIZE must be between 1 and MAX_PAGE_SIZE");
        }

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            jwt_ttl_minutes,
            cors_origins,
            pagination,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}
