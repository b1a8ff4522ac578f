use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::preferences::{ColorScheme, Language};

pub const MIN_DEBOUNCE_MS: u64 = 50;
pub const MAX_DEBOUNCE_MS: u64 = 2000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Stored language preference; `None` follows the system locale.
    #[serde(default)]
    pub language: Option<Language>,
    /// Stored colour scheme preference; `None` follows the terminal.
    #[serde(default)]
    pub color_scheme: Option<ColorScheme>,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_pdf_download_dir")]
    pub pdf_download_dir: String,
    #[serde(default = "default_onboarding_done")]
    pub onboarding_done: bool,
    #[serde(default)]
    pub display_name: String,
}

fn default_debounce_ms() -> u64 {
    300
}
fn default_pdf_download_dir() -> String {
    dirs::download_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rimba")
        .to_string_lossy()
        .to_string()
}
fn default_onboarding_done() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: None,
            color_scheme: None,
            debounce_ms: default_debounce_ms(),
            pdf_download_dir: default_pdf_download_dir(),
            onboarding_done: default_onboarding_done(),
            display_name: String::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rimba")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn validate(&mut self) {
        self.debounce_ms = self.debounce_ms.clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS);
        if self.pdf_download_dir.trim().is_empty() {
            self.pdf_download_dir = default_pdf_download_dir();
        }
        self.display_name = self.display_name.trim().to_string();
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}
