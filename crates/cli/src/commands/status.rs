//! `leasebot status`: Show system status.

use leasebot_config::AppConfig;

use super::{load_config, open_store};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let store = open_store(&config);

    println!("🚗 Leasebot Status");
    println!("==================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Storage:      {}", store.name());
    println!(
        "  Summaries:    {}",
        config.storage.resolved_summary_dir().display()
    );
    match store.list_ids() {
        Ok(ids) => println!("  Saved:        {} of {}", ids.len(), leasebot_core::MAX_SUMMARY_ID),
        Err(e) => println!("  Saved:        ⚠️  {e}"),
    }
    println!(
        "  Bot data:     {}",
        config
            .dialogue
            .data_dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "built-in".into())
    );
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);

    if AppConfig::config_path().exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file, using defaults");
    }

    Ok(())
}
