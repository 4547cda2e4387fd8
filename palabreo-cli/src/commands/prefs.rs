//! Reading preferences commands

use anyhow::{Context, Result};
use palabreo_core::storage::LocalStorage;
use palabreo_core::{PreferencesStore, PreferencesUpdate, ReadingPreferences};
use std::path::Path;
use std::sync::Arc;

async fn open_store(data_dir: &Path) -> PreferencesStore {
    tracing::debug!("Using preferences in {}", data_dir.display());
    PreferencesStore::open(Arc::new(LocalStorage::new(data_dir))).await
}

/// Saved preferences, or defaults when none are stored
pub async fn load_preferences(data_dir: &Path) -> ReadingPreferences {
    open_store(data_dir).await.current().await
}

fn print_preferences(preferences: &ReadingPreferences) -> Result<()> {
    // Through text, so f32 fields print with their shortest representation
    let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(preferences)?)?;
    let fields = value
        .as_object()
        .context("Preferences did not serialize to an object")?;
    for (name, value) in fields {
        match value.as_str() {
            Some(s) => println!("{} = {}", name, s),
            None => println!("{} = {}", name, value),
        }
    }
    Ok(())
}

pub async fn prefs_show(data_dir: &Path, json: bool, css: bool) -> Result<()> {
    let preferences = load_preferences(data_dir).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&preferences)?);
    } else if css {
        println!("{}", preferences.css_declarations());
    } else {
        print_preferences(&preferences)?;
    }
    Ok(())
}

pub async fn prefs_set(data_dir: &Path, field: &str, value: &str) -> Result<()> {
    let update = PreferencesUpdate::from_assignment(field, value)?;
    let store = open_store(data_dir).await;
    let updated = store
        .set(&update)
        .await
        .with_context(|| format!("Failed to save preferences in {}", data_dir.display()))?;

    tracing::info!("Updated {}", field);
    print_preferences(&updated)
}

pub async fn prefs_reset(data_dir: &Path) -> Result<()> {
    let store = open_store(data_dir).await;
    store
        .reset()
        .await
        .with_context(|| format!("Failed to save preferences in {}", data_dir.display()))?;
    println!("Reading preferences restored to defaults");
    Ok(())
}
