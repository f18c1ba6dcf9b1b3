use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub data_dir: PathBuf,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_tagline")]
    pub tagline: String,
    #[serde(default = "default_composer_title")]
    pub composer_title: String,
    #[serde(default = "default_send_button_text")]
    pub send_button_text: String,
}

fn default_app_name() -> String {
    "NIRBHAAS".to_string()
}

fn default_tagline() -> String {
    "Silent Understanding".to_string()
}

fn default_composer_title() -> String {
    "Create Emotion".to_string()
}

fn default_send_button_text() -> String {
    "Send".to_string()
}

impl Config {
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("nirbhaas")
        });

        // Ensure data directory exists
        std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

        let config_path = data_dir.join("config.json");

        // Try to load existing config
        if config_path.exists() {
            let config_str =
                std::fs::read_to_string(&config_path).context("Failed to read config.json")?;

            if config_str.trim().is_empty() {
                eprintln!("Config file is empty, recreating defaults");
            } else {
                match serde_json::from_str::<Config>(&config_str) {
                    Ok(mut config) => {
                        config.data_dir = data_dir;
                        return Ok(config);
                    }
                    Err(e) => {
                        eprintln!("Failed to parse existing config.json: {}", e);
                        eprintln!("Falling back to defaults...");
                    }
                }
            }
        }

        // Create default config
        let config = Self::default_config(data_dir);

        let json_str =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config")?;
        std::fs::write(&config_path, json_str).context("Failed to write default config.json")?;

        Ok(config)
    }

    fn default_config(data_dir: PathBuf) -> Self {
        Config {
            data_dir,
            app_name: default_app_name(),
            tagline: default_tagline(),
            composer_title: default_composer_title(),
            send_button_text: default_send_button_text(),
        }
    }

    pub fn learned_emotions_file(&self) -> PathBuf {
        self.data_dir.join("learned_emotions.json")
    }

    pub fn custom_colors_file(&self) -> PathBuf {
        self.data_dir.join("custom_colors.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_survive_partial_config() {
        let json = r#"{"app_name": "MYAPP"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.app_name, "MYAPP");
        assert_eq!(config.tagline, "Silent Understanding");
        assert_eq!(config.send_button_text, "Send");
    }

    #[test]
    fn test_data_file_paths() {
        let config = Config::default_config(PathBuf::from("/tmp/nirbhaas-test"));
        assert!(config
            .learned_emotions_file()
            .ends_with("learned_emotions.json"));
        assert!(config.custom_colors_file().ends_with("custom_colors.json"));
    }
}
