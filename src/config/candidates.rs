//! Candidate collections loaded from TOML or JSON files.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ConfigError, Result};
use crate::select::{Item, ItemKey};

/// Extra data carried by each candidate from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDetails {
    /// Shown next to the label in the list.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional grouping label.
    #[serde(default)]
    pub group: Option<String>,
}

/// One `[[items]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub key: ItemKey,
    pub text: String,
    #[serde(flatten)]
    pub details: CandidateDetails,
}

/// On-disk candidate collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFile {
    #[serde(default)]
    pub items: Vec<CandidateEntry>,
}

impl CandidateFile {
    /// Check keys are unique and every entry has visible text.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.items {
            if entry.text.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "candidate '{}' has empty text",
                    entry.key
                )));
            }
            if !seen.insert(&entry.key) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate candidate key '{}'",
                    entry.key
                )));
            }
        }
        Ok(())
    }

    /// Convert the entries into items, keeping file order.
    pub fn into_items(self) -> Vec<Item<CandidateDetails>> {
        self.items
            .into_iter()
            .map(|entry| Item::new(entry.key, entry.text, entry.details))
            .collect()
    }
}

/// Parse candidates from `contents`; `extension` selects the format.
pub fn parse_candidates(contents: &str, extension: &str) -> Result<CandidateFile> {
    let file: CandidateFile = match extension {
        "toml" => toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: format!("<{}>", extension),
            message: e.to_string(),
        })?,
        "json" => serde_json::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: format!("<{}>", extension),
            message: e.to_string(),
        })?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };
    file.validate()?;
    Ok(file)
}

/// Load a candidate file, picking the format from its extension.
pub fn load_candidates(path: &Path) -> Result<Vec<Item<CandidateDetails>>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if extension != "toml" && extension != "json" {
        warn!(path = %path.display(), "Unsupported candidate file");
        return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
    }

    let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
    let file = parse_candidates(&contents, &extension).map_err(|e| match e {
        ConfigError::ParseError { message, .. } => ConfigError::ParseError {
            path: path.display().to_string(),
            message,
        },
        other => other,
    })?;

    debug!(path = %path.display(), count = file.items.len(), "Loaded candidates");
    Ok(file.into_items())
}

/// Candidates used when no file is given.
pub fn builtin_palette() -> Vec<Item<CandidateDetails>> {
    const PALETTE: &[(&str, &str, &str, &str)] = &[
        ("red", "Red", "#ff0000", "warm"),
        ("orange", "Orange", "#ffa500", "warm"),
        ("yellow", "Yellow", "#ffff00", "warm"),
        ("green", "Green", "#008000", "cool"),
        ("teal", "Teal", "#008080", "cool"),
        ("blue", "Blue", "#0000ff", "cool"),
        ("indigo", "Indigo", "#4b0082", "cool"),
        ("violet", "Violet", "#ee82ee", "cool"),
        ("magenta", "Magenta", "#ff00ff", "warm"),
        ("brown", "Brown", "#a52a2a", "neutral"),
        ("gray", "Gray", "#808080", "neutral"),
        ("black", "Black", "#000000", "neutral"),
        ("white", "White", "#ffffff", "neutral"),
    ];

    PALETTE
        .iter()
        .map(|(key, text, hex, group)| {
            Item::new(
                *key,
                *text,
                CandidateDetails {
                    description: Some((*hex).to_string()),
                    group: Some((*group).to_string()),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    const TOML_ITEMS: &str = r#"
[[items]]
key = "eng"
text = "Engineering"
description = "Builds things"

[[items]]
key = "ops"
text = "Operations"
group = "support"
"#;

    #[test]
    fn test_parse_toml() {
        let file = parse_candidates(TOML_ITEMS, "toml").unwrap();
        assert_eq!(file.items.len(), 2);
        assert_eq!(file.items[0].key, ItemKey::from("eng"));
        assert_eq!(
            file.items[0].details.description.as_deref(),
            Some("Builds things")
        );
        assert_eq!(file.items[1].details.group.as_deref(), Some("support"));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"items":[{"key":"a","text":"Alpha"},{"key":"b","text":"Beta"}]}"#;
        let items = parse_candidates(json, "json").unwrap().into_items();
        let texts: Vec<_> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha", "Beta"]);
        assert_eq!(items[0].payload, CandidateDetails::default());
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let json = r#"{"items":[{"key":"a","text":"Alpha"},{"key":"a","text":"Again"}]}"#;
        let err = parse_candidates(json, "json").unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_empty_text_rejected() {
        let json = r#"{"items":[{"key":"a","text":"  "}]}"#;
        assert!(matches!(
            parse_candidates(json, "json"),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            parse_candidates("", "yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("teams.toml");
        std::fs::write(&path, TOML_ITEMS).unwrap();

        let items = load_candidates(&path).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].text, "Operations");
    }

    #[test]
    fn test_load_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();

        let err = load_candidates(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_load_unsupported_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("teams.csv");
        std::fs::write(&path, "a,b").unwrap();
        assert!(matches!(
            load_candidates(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_builtin_palette_has_unique_keys() {
        let palette = builtin_palette();
        assert!(crate::select::has_unique_keys(&palette));
        assert_eq!(palette[0].text, "Red");
    }
}
