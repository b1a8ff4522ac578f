use std::env;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    #[value(name = "en")]
    English,
    #[serde(rename = "ms")]
    #[value(name = "ms")]
    Malay,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Malay];

    /// Locale code used for both rust-i18n and the lesson files.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Malay => "ms",
        }
    }

    /// Name of the language in the language itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Malay => "Bahasa Melayu",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::English => Language::Malay,
            Language::Malay => Language::English,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::English),
            "ms" => Some(Language::Malay),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    #[default]
    Dark,
}

impl ColorScheme {
    pub fn toggled(self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }

    /// Name of the bundled theme for this scheme.
    pub fn theme_name(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

/// Manual override beats the stored preference, which beats the system value.
pub fn resolve<T: Copy>(system: T, stored: Option<T>, manual: Option<T>) -> T {
    manual.or(stored).unwrap_or(system)
}

/// What the environment reports before any user choice is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemPreferences {
    pub language: Language,
    pub color_scheme: ColorScheme,
}

impl SystemPreferences {
    pub fn detect() -> Self {
        let language = ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.is_empty())
            .and_then(|value| language_from_locale(&value))
            .unwrap_or_default();
        let color_scheme = env::var("COLORFGBG")
            .ok()
            .and_then(|value| scheme_from_colorfgbg(&value))
            .unwrap_or_default();
        Self {
            language,
            color_scheme,
        }
    }
}

/// Explicit, per-run choices. Never read from disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    pub language: Option<Language>,
    pub color_scheme: Option<ColorScheme>,
}

/// The active language and colour scheme, passed explicitly to whoever needs them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
    pub language: Language,
    pub color_scheme: ColorScheme,
}

impl Preferences {
    pub fn resolve(
        system: SystemPreferences,
        stored_language: Option<Language>,
        stored_scheme: Option<ColorScheme>,
        manual: Overrides,
    ) -> Self {
        Self {
            language: resolve(system.language, stored_language, manual.language),
            color_scheme: resolve(system.color_scheme, stored_scheme, manual.color_scheme),
        }
    }
}

/// Parse a POSIX locale string such as `ms_MY.UTF-8`.
pub fn language_from_locale(locale: &str) -> Option<Language> {
    let lang = locale
        .split(['_', '.', '@', '-'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match lang.as_str() {
        "ms" | "may" | "msa" => Some(Language::Malay),
        "en" | "eng" | "c" | "posix" => Some(Language::English),
        _ => None,
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`). Only the last field matters.
pub fn scheme_from_colorfgbg(value: &str) -> Option<ColorScheme> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        7 | 9..=15 => Some(ColorScheme::Light),
        0..=6 | 8 => Some(ColorScheme::Dark),
        _ => None,
    }
}
