//! Settings and initiative state files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use st_mechanics::{ChannelId, InitiativeTable, RollSettings};

/// Settings file used when `--settings` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "storyteller.json";

/// Initiative state file used when `--state` is not given.
pub const DEFAULT_STATE_FILE: &str = "initiative.json";

/// Saved initiative tables, keyed by channel.
pub type InitiativeState = BTreeMap<ChannelId, InitiativeTable>;

/// Read a JSON file, or `None` if it does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, String> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no file, using defaults");
        return Ok(None);
    }
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&text)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded");
    Ok(Some(value))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    fs::write(path, text).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), "saved");
    Ok(())
}

/// Load settings, falling back to defaults when the file is missing.
pub fn load_settings(path: &Path) -> Result<RollSettings, String> {
    let settings: RollSettings = read_json(path)?.unwrap_or_default();
    settings
        .validate()
        .map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(settings)
}

/// Save settings as pretty-printed JSON.
pub fn save_settings(path: &Path, settings: &RollSettings) -> Result<(), String> {
    write_json(path, settings)
}

/// Load saved initiative tables; a missing file means no tables.
pub fn load_initiative(path: &Path) -> Result<InitiativeState, String> {
    Ok(read_json(path)?.unwrap_or_default())
}

/// Save initiative tables as pretty-printed JSON.
pub fn save_initiative(path: &Path, state: &InitiativeState) -> Result<(), String> {
    write_json(path, state)
}
