//! `leasebot gateway`: Start the HTTP chat server.

use super::load_config;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🚗 Leasebot Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Storage:   {}", config.storage.backend);
    if config.gateway.allowed_origins.is_empty() {
        println!("   CORS:      any origin");
    } else {
        println!("   CORS:      {}", config.gateway.allowed_origins.join(", "));
    }

    leasebot_gateway::start(config).await?;

    Ok(())
}
