use crate::settings::{CfgDefaultKeymaps, Keymap, Settings};
use eyre::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{fs, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub keymap: Keymap,
    keymap_user_dict: CfgDefaultKeymaps, // Used for building help text
    filepath: PathBuf,
}

impl Config {
    /// Load the configuration from the application data directory, writing
    /// a default file on first run.
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join("configuration.json");
        let existed = filepath.exists();

        let config = Self::load_from(filepath)?;
        if !existed {
            config.save()?;
        }
        Ok(config)
    }

    /// Get the configuration file path
    pub fn filepath(&self) -> &PathBuf {
        &self.filepath
    }

    /// Get the user-configured keymap dictionary (used for help text)
    pub fn keymap_user_dict(&self) -> &CfgDefaultKeymaps {
        &self.keymap_user_dict
    }

    /// Configuration that never touches the filesystem
    pub fn in_memory(settings: Settings) -> Self {
        let keymap_user_dict = CfgDefaultKeymaps::default();
        Self {
            settings,
            keymap: Keymap::from_user_dict(&keymap_user_dict),
            keymap_user_dict,
            filepath: PathBuf::new(),
        }
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<()> {
        let config_json = serde_json::json!({
            "Setting": self.settings,
            "Keymap": self.keymap_user_dict,
        });

        let config_str = serde_json::to_string_pretty(&config_json)?;

        // Ensure directory exists before writing
        if let Some(parent) = self.filepath.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.filepath, config_str)?;
        Ok(())
    }

    /// Load configuration from a custom path. Missing files, invalid JSON and
    /// missing keys all fall back to defaults.
    pub fn load_from(filepath: PathBuf) -> Result<Self> {
        let mut settings = Settings::default();
        let mut keymap_user_dict = CfgDefaultKeymaps::default();

        if filepath.exists() {
            let config_str = fs::read_to_string(&filepath)?;
            match serde_json::from_str::<Value>(&config_str) {
                Ok(user_config) => {
                    if let Some(section) = read_section(&user_config, "Setting") {
                        settings = section;
                    }
                    if let Some(section) = read_section(&user_config, "Keymap") {
                        keymap_user_dict = section;
                    }
                }
                Err(err) => {
                    log::warn!(
                        "Ignoring unreadable configuration {}: {}",
                        filepath.display(),
                        err
                    );
                }
            }
        }

        let keymap = Keymap::from_user_dict(&keymap_user_dict);
        Ok(Self {
            settings,
            keymap,
            keymap_user_dict,
            filepath,
        })
    }
}

fn read_section<T: DeserializeOwned>(config: &Value, name: &str) -> Option<T> {
    let section = config.get(name)?;
    match serde_json::from_value(section.clone()) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Ignoring invalid \"{}\" section: {}", name, err);
            None
        }
    }
}

pub fn get_app_data_prefix() -> Result<PathBuf> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(config_home).join("flipbook");
        return Ok(path);
    } else if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home.clone()).join(".config").join("flipbook");
        if path.exists() {
            return Ok(path);
        } else {
            return Ok(PathBuf::from(home).join(".flipbook"));
        }
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(user_profile).join(".flipbook"));
    }

    Err(eyre::eyre!(
        "Could not determine application data directory"
    ))
}
