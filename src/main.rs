use dotenvy::dotenv;
use pocket_ledger::{
    bot, config,
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;

    // 4. Initialize database
    let database = config::database::init_db(&app_config.database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;

    // 5. Run the bot. The token is read directly before use, never stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(|e| Error::Config {
            message: format!("DISCORD_BOT_TOKEN: {e}"),
        })?;

    bot::run_bot(token, app_config, database).await
}
