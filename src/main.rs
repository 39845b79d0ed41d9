use dotenvy::dotenv;
use farmguard::{
    ai::{GeminiClient, GeminiConfig},
    bot::{BotData, framework::run_bot},
    config::{credentials, load_default_settings},
    core::{catalog::Catalog, chat::ChatDesk, guides::GuideLibrary},
    errors::Result,
};
use std::sync::Arc;
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

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load application settings
    let settings = load_default_settings()
        .inspect(|_| info!("Settings loaded."))
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Build the read-only catalog and guide library
    let catalog = Catalog::seeded()
        .map(Arc::new)
        .inspect(|c| info!("Catalog loaded with {} products.", c.len()))
        .inspect_err(|e| error!("Invalid product catalog: {}", e))?;
    let guides = GuideLibrary::seeded();

    // 5. Build the agronomist backend
    let api_key = credentials::gemini_api_key()
        .inspect_err(|e| error!("Gemini API key not found: {}", e))?;
    let client = GeminiClient::new(GeminiConfig::from_settings(&settings.agronomist, api_key))
        .inspect(|c| info!("Agronomist using model {}.", c.model()))?;
    let chat = ChatDesk::new(Arc::new(client), settings.agronomist.timeout())
        .with_history_limit(settings.agronomist.max_history_turns);

    let data = BotData::new(catalog, guides, settings, chat);

    // 6. Run the bot
    // DISCORD_BOT_TOKEN is loaded directly before use, not stored in Settings
    let token = credentials::discord_token()
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))?;

    run_bot(token, data).await
}
