//! Picker settings.

use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// Settings that shape how the picker behaves and looks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Placeholder shown in the empty input.
    pub placeholder: String,
    /// Close the candidate list after each selection.
    pub close_on_commit: bool,
    /// Maximum candidate rows shown at once.
    pub max_visible_candidates: usize,
    /// Chip color, as a color name or `#rrggbb`.
    pub tag_color: String,
    /// Form field name printed alongside the result.
    pub form_name: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            placeholder: "Type to search...".to_string(),
            close_on_commit: false,
            max_visible_candidates: 8,
            tag_color: "blue".to_string(),
            form_name: None,
        }
    }
}

impl Settings {
    /// Validate these settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` if a value is out of range
    /// or the tag color can't be parsed.
    pub fn validate(&self) -> Result<()> {
        if self.max_visible_candidates == 0 {
            return Err(ConfigError::ValidationError(
                "max_visible_candidates must be at least 1".to_string(),
            ));
        }

        self.tag_color()?;

        if let Some(name) = &self.form_name {
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(ConfigError::ValidationError(format!(
                    "form name '{}' must be non-empty and contain no whitespace",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Parse the chip color.
    pub fn tag_color(&self) -> Result<Color> {
        Color::from_str(&self.tag_color).map_err(|_| {
            ConfigError::ValidationError(format!("unknown tag color '{}'", self.tag_color))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_visible_rejected() {
        let settings = Settings {
            max_visible_candidates: 0,
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("max_visible_candidates"));
    }

    #[test]
    fn test_named_and_hex_colors() {
        let mut settings = Settings::default();
        assert_eq!(settings.tag_color().unwrap(), Color::Blue);

        settings.tag_color = "#ff8800".to_string();
        assert_eq!(settings.tag_color().unwrap(), Color::Rgb(0xff, 0x88, 0x00));
    }

    #[test]
    fn test_unknown_color_rejected() {
        let settings = Settings {
            tag_color: "not-a-color".to_string(),
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("not-a-color"));
    }

    #[test]
    fn test_form_name_with_whitespace_rejected() {
        let settings = Settings {
            form_name: Some("my field".to_string()),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings {
            close_on_commit: true,
            form_name: Some("members".to_string()),
            ..Settings::default()
        };
        let toml_str = toml::to_string(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, settings);
    }
}
