//! `leasebot summaries`: Manage saved summaries.

use leasebot_core::StorageError;
use leasebot_summary::render_data;

use super::{load_config, open_store};

pub fn list() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let store = open_store(&config);
    let ids = store.list_ids()?;

    println!("📋 Saved Summaries ({})", store.name());
    println!("====================");
    if ids.is_empty() {
        println!("  (none yet)");
        return Ok(());
    }

    for id in ids {
        match store.load(id) {
            Ok(data) => {
                let contract = data.get("contract").unwrap_or("?");
                let driven = data.get("driven").unwrap_or("?");
                println!("  {id:>2}  {contract}, {driven} driven");
            }
            Err(e) => println!("  {id:>2}  ⚠️  unreadable: {e}"),
        }
    }

    Ok(())
}

pub fn show(id: u32) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let store = open_store(&config);

    match store.load(id) {
        Ok(data) => {
            println!("{}", render_data(&data));
            Ok(())
        }
        Err(StorageError::NotFound(_)) => Err(format!("No summary with ID {id}").into()),
        Err(e) => Err(e.into()),
    }
}

pub fn delete(id: u32) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let store = open_store(&config);

    if store.delete(id)? {
        println!("🗑️  Deleted summary {id}");
    } else {
        println!("   No summary with ID {id}");
    }
    Ok(())
}
