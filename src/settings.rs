use std::path::{Path, PathBuf};
use std::time::Duration;

use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Alignment, Element, Length};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::media::{BACKGROUND_BLACK, BRAND_RED, TEXT_GRAY, TEXT_WHITE};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "ko-KR";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine the config directory")]
    NoHome,
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            base_url: default_base_url(),
            language: default_language(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppSettings {
    pub fn config_path() -> Result<PathBuf, SettingsError> {
        std::env::var("HOME")
            .map(|home| {
                PathBuf::from(home)
                    .join(".config")
                    .join("movieflix")
                    .join("config.json")
            })
            .map_err(|_| SettingsError::NoHome)
    }

    /// Reads the saved file (if any) and layers `.env` / environment overrides on top.
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = match Self::config_path() {
            Ok(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        dotenvy::dotenv().ok();
        settings.apply_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(token) = non_blank("TMDB_TOKEN") {
            self.access_token = token.trim().to_string();
        }
        if let Some(base_url) = non_blank("TMDB_BASE_URL") {
            self.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(language) = non_blank("TMDB_LANGUAGE") {
            self.language = language.trim().to_string();
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn is_valid(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum SetupMessage {
    TokenChanged(String),
    LanguageChanged(String),
    Submit,
}

pub struct SetupPage {
    pub token: String,
    pub language: String,
    pub error: Option<String>,
    base: AppSettings,
}

impl SetupPage {
    pub fn new(base: AppSettings) -> Self {
        Self {
            token: base.access_token.clone(),
            language: base.language.clone(),
            error: None,
            base,
        }
    }

    pub fn update(&mut self, message: SetupMessage) -> Option<AppSettings> {
        match message {
            SetupMessage::TokenChanged(token) => {
                self.token = token;
                self.error = None;
                None
            }
            SetupMessage::LanguageChanged(lang) => {
                self.language = lang;
                None
            }
            SetupMessage::Submit => {
                if self.token.trim().is_empty() {
                    self.error = Some(String::from("Access token is required"));
                    return None;
                }
                let settings = AppSettings {
                    access_token: self.token.trim().to_string(),
                    language: if self.language.trim().is_empty() {
                        default_language()
                    } else {
                        self.language.trim().to_string()
                    },
                    ..self.base.clone()
                };
                if let Err(e) = settings.save() {
                    tracing::warn!(error = %e, "failed to save settings");
                    self.error = Some(format!("Failed to save: {}", e));
                    return None;
                }
                Some(settings)
            }
        }
    }

    pub fn view(&self) -> Element<'_, SetupMessage> {
        let logo = text("MOVIEFLIX").size(48).color(BRAND_RED);

        let title = text("Welcome to Movieflix").size(28).color(TEXT_WHITE);
        let subtitle = text("Connect your TMDB account to get started")
            .size(14)
            .color(TEXT_GRAY);

        let token_label = text("TMDB API Read Access Token").size(14).color(TEXT_WHITE);
        let token_hint = text("Find it at themoviedb.org/settings/api")
            .size(12)
            .color(TEXT_GRAY);
        let token_input = text_input("Paste your access token...", &self.token)
            .on_input(SetupMessage::TokenChanged)
            .on_submit(SetupMessage::Submit)
            .secure(true)
            .padding(12)
            .size(14)
            .width(Length::Fill);

        let lang_label = text("Language").size(14).color(TEXT_WHITE);
        let lang_hint = text("Examples: ko-KR, en-US, de-DE")
            .size(12)
            .color(TEXT_GRAY);
        let lang_input = text_input(DEFAULT_LANGUAGE, &self.language)
            .on_input(SetupMessage::LanguageChanged)
            .on_submit(SetupMessage::Submit)
            .padding(12)
            .size(14)
            .width(Length::Fill);

        let submit_button = button(text("Get Started").size(16).color(TEXT_WHITE))
            .padding([12, 32])
            .style(|_theme, status| {
                let bg = match status {
                    button::Status::Hovered => iced::Color::from_rgb(0.7, 0.02, 0.06),
                    _ => BRAND_RED,
                };
                button::Style {
                    background: Some(iced::Background::Color(bg)),
                    text_color: TEXT_WHITE,
                    border: iced::Border::default().rounded(4),
                    ..Default::default()
                }
            })
            .on_press(SetupMessage::Submit);

        let error_text = match &self.error {
            Some(err) => text(err).size(14).color(BRAND_RED),
            None => text("").size(14),
        };

        let spacer = || Space::new().height(16);
        let small_spacer = || Space::new().height(4);

        let form = column![
            logo,
            spacer(),
            title,
            small_spacer(),
            subtitle,
            spacer(),
            spacer(),
            token_label,
            small_spacer(),
            token_hint,
            small_spacer(),
            token_input,
            spacer(),
            lang_label,
            small_spacer(),
            lang_hint,
            small_spacer(),
            lang_input,
            spacer(),
            error_text,
            small_spacer(),
            row![submit_button].width(Length::Fill),
        ]
        .width(Length::Fixed(400.0))
        .align_x(Alignment::Start);

        container(form)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(BACKGROUND_BLACK)),
                ..Default::default()
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(settings.access_token, "abc");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.language, "ko-KR");
        assert_eq!(settings.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn environment_overrides_win_over_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TMDB_TOKEN", " from-env "),
            ("TMDB_BASE_URL", "http://localhost:8080/3/"),
            ("TMDB_LANGUAGE", ""),
        ]);
        let mut settings = AppSettings {
            access_token: String::from("from-file"),
            language: String::from("en-US"),
            ..AppSettings::default()
        };
        settings.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.access_token, "from-env");
        assert_eq!(settings.base_url, "http://localhost:8080/3");
        assert_eq!(settings.language, "en-US");
    }

    #[test]
    fn settings_survive_a_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("movieflix-settings-{}", std::process::id()))
            .join("config.json");
        let settings = AppSettings {
            access_token: String::from("token"),
            request_timeout_secs: 5,
            ..AppSettings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path).unwrap(), settings);
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn blank_token_is_rejected() {
        let mut page = SetupPage::new(AppSettings::default());
        page.update(SetupMessage::TokenChanged(String::from("   ")));
        assert!(page.update(SetupMessage::Submit).is_none());
        assert!(page.error.is_some());
    }
}
