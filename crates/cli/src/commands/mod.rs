//! Subcommand implementations.

pub mod chat;
pub mod config_cmd;
pub mod gateway;
pub mod status;
pub mod summaries;

use leasebot_config::AppConfig;
use leasebot_core::SummaryStore;
use std::sync::Arc;

pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    AppConfig::load().map_err(|e| format!("Failed to load config: {e}").into())
}

pub(crate) fn open_store(config: &AppConfig) -> Arc<dyn SummaryStore> {
    leasebot_storage::open_store(
        &config.storage.backend,
        config.storage.resolved_summary_dir(),
    )
}
