mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::security::JwtKeys;
use server::{AppServices, Repositories, start_rest_server};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let keys = JwtKeys::new(config.jwt_secret.clone(), config.jwt_ttl_minutes);
    let services = AppServices::new(Repositories::postgres(pool), keys, config.pagination);

    start_rest_server(config, services).await
}
