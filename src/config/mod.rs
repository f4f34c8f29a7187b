use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{DEFAULT_AUTO_SAVE_NUMBER, MAX_RECENT_DOCUMENTS};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Recently opened or saved documents, most recent first
    #[serde(default)]
    pub recent_documents: Vec<PathBuf>,

    /// Last document loaded or saved
    #[serde(default)]
    pub last_document_path: Option<PathBuf>,

    /// Save the open document automatically after a number of edits
    #[serde(default)]
    pub auto_save: bool,

    /// Recorded edits between two auto-saves
    #[serde(default = "default_auto_save_number")]
    pub auto_save_number: u32,
}

fn default_auto_save_number() -> u32 {
    DEFAULT_AUTO_SAVE_NUMBER
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            recent_documents: Vec::new(),
            last_document_path: None,
            auto_save: false,
            auto_save_number: DEFAULT_AUTO_SAVE_NUMBER,
        }
    }
}

impl AppConfigData {
    /// Move `path` to the front of the recent list and remember it as the
    /// last document.
    pub fn remember_document(&mut self, path: PathBuf) {
        self.recent_documents.retain(|p| p != &path);
        self.recent_documents.insert(0, path.clone());
        self.recent_documents.truncate(MAX_RECENT_DOCUMENTS);
        self.last_document_path = Some(path);
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Set when the config file could not be used and defaults were loaded
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    pub show: bool,
    /// Why the config was reset (parse error, read error, ...)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message sent after a document was loaded from or saved to `path`
#[derive(Message)]
pub struct UpdateLastDocumentPathRequest {
    pub path: PathBuf,
}

/// Read the config file at `path`.
///
/// Returns the defaults plus a reason when the file exists but cannot be
/// read or parsed. A missing file is not an error.
fn load_config(path: &std::path::Path) -> (AppConfigData, Option<String>) {
    if !path.exists() {
        info!("No config file found, using defaults");
        return (AppConfigData::default(), None);
    }

    match std::fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(data) => {
                info!("Loaded config from {:?}", path);
                (data, None)
            }
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                (
                    AppConfigData::default(),
                    Some(format!("Configuration file was corrupted: {}", e)),
                )
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Could not read configuration file: {}", e)),
            )
        }
    }
}

fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let (data, reset_reason) = load_config(&config.config_path);
    config.data = data;
    config.dirty = false;

    if let Some(reason) = reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

fn update_last_document_path_system(
    mut events: MessageReader<UpdateLastDocumentPathRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.remember_document(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastDocumentPathRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    update_last_document_path_system
                        .run_if(on_message::<UpdateLastDocumentPathRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}
