//! `leasebot config`: Configuration management commands.

use leasebot_config::{AppConfig, BotData};

pub fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");
            config
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    };

    match BotData::load(&config.dialogue) {
        Ok(data) => {
            println!(
                "   ✅ Bot data loaded ({} states, {} fallbacks, {} greetings)",
                data.transitions.len(),
                data.fallbacks.len(),
                data.greetings.len()
            );
        }
        Err(e) => {
            println!("   ❌ Bot data error: {e}");
            return Err(e.into());
        }
    }

    let mut warnings = Vec::new();
    if config.gateway.host == "0.0.0.0" && !config.gateway.allowed_origins.is_empty() {
        warnings.push("Gateway is public but CORS only admits the configured origins");
    }
    match config.storage.backend.as_str() {
        "file" => {}
        "memory" => warnings.push("Memory storage: saved summaries are lost on exit"),
        _ => warnings.push("Unknown storage backend: the file store is used instead"),
    }

    if warnings.is_empty() {
        println!("   ✅ All checks passed");
    } else {
        println!();
        for w in &warnings {
            println!("   ⚠️  {w}");
        }
    }

    println!();
    println!(
        "   Gateway:   {}:{}",
        config.gateway.host, config.gateway.port
    );
    println!("   Storage:   {}", config.storage.backend);
    println!(
        "   Summaries: {}",
        config.storage.resolved_summary_dir().display()
    );

    Ok(())
}

pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}
