//! Health command handler.

use anyhow::Result;
use lexa_core::api::ApiClient;
use lexa_core::config::Config;

pub async fn run(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(config);
    let health = client.health().await?;

    match health.version {
        Some(version) => println!("{} (backend {version})", health.status),
        None => println!("{}", health.status),
    }
    Ok(())
}
