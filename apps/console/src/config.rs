use std::fs;

use serde::Deserialize;

use input::InputTuning;

#[derive(Debug, Clone)]
pub struct Settings {
    pub service_url: String,
    pub channel: String,
    pub display_name: String,
    pub tuning: InputTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: "ws://127.0.0.1:9090".into(),
            channel: "main".into(),
            display_name: "console".into(),
            tuning: InputTuning::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    service_url: Option<String>,
    channel: Option<String>,
    display_name: Option<String>,
    #[serde(default)]
    tuning: Option<InputTuning>,
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("controller.toml") {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.service_url {
                    settings.service_url = v;
                }
                if let Some(v) = file_cfg.channel {
                    settings.channel = v;
                }
                if let Some(v) = file_cfg.display_name {
                    settings.display_name = v;
                }
                if let Some(v) = file_cfg.tuning {
                    settings.tuning = v;
                }
            }
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable controller.toml");
            }
        }
    }

    if let Ok(v) = std::env::var("STAGECAST_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Ok(v) = std::env::var("STAGECAST_CHANNEL") {
        settings.channel = v;
    }
    if let Ok(v) = std::env::var("STAGECAST_NAME") {
        settings.display_name = v;
    }

    settings
}
