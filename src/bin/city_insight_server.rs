use city_insight::{run_server, CityInsight, ProviderConfig};
use log::{error, info};
use std::sync::Arc;

const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let config = ProviderConfig::from_env()?;
    if config.openweather_api_key.is_none() {
        info!("OPENWEATHER_API_KEY not set, weather and air quality will be unavailable");
    }
    if config.gemini_api_key.is_none() {
        info!("GEMINI_API_KEY not set, narratives will use the fallback text");
    }

    let bind = std::env::var("CITY_INSIGHT_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let insight = Arc::new(CityInsight::new(&config)?);

    if let Err(e) = run_server(insight, &bind).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }
    Ok(())
}
