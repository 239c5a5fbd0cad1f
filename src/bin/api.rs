use intent_responder::{api::start_server, ConversationResponder};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "5000".to_string())
        .parse()?;

    info!("🚀 Customer Service Bot - API Server");
    info!("📍 Port: {}", api_port);

    // Config, intent data and sentiment strategy are loaded once here
    let responder = Arc::new(ConversationResponder::from_env().await);

    info!("✅ Responder initialized: {}", responder.bot_name());
    info!("📡 Starting API server...");

    start_server(responder, api_port).await?;

    Ok(())
}
