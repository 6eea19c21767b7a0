//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use tagpick::config::Settings;
use tagpick::select::ItemKey;

#[derive(Parser, Debug)]
#[command(name = "tagpick")]
#[command(about = "Pick several items from a filtered list")]
#[command(version)]
pub struct Cli {
    /// Candidate file (.toml or .json); a color palette is used if omitted
    #[arg(short, long, value_name = "FILE")]
    pub candidates: Option<PathBuf>,

    /// Preselect an item by key (repeatable)
    #[arg(short, long = "select", value_name = "KEY")]
    pub select: Vec<String>,

    /// Form field name; the result is printed as NAME=VALUE
    #[arg(short, long)]
    pub name: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Close the candidate list after each selection
    #[arg(long)]
    pub close_on_commit: bool,

    /// Placeholder shown in the empty input
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Maximum candidate rows shown at once
    #[arg(long, value_name = "N")]
    pub max_visible: Option<usize>,
}

impl Cli {
    /// Overlay flags on settings loaded from the config file.
    pub fn apply(&self, settings: &mut Settings) {
        if self.close_on_commit {
            settings.close_on_commit = true;
        }
        if let Some(name) = &self.name {
            settings.form_name = Some(name.clone());
        }
        if let Some(placeholder) = &self.placeholder {
            settings.placeholder = placeholder.clone();
        }
        if let Some(max) = self.max_visible {
            settings.max_visible_candidates = max;
        }
    }

    /// Preselected keys in the order given.
    pub fn initial_keys(&self) -> Vec<ItemKey> {
        self.select.iter().map(|k| ItemKey::from(k.as_str())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["tagpick"]).unwrap();
        assert!(cli.candidates.is_none());
        assert!(cli.select.is_empty());
        assert!(!cli.close_on_commit);
    }

    #[test]
    fn test_repeated_select_keeps_order() {
        let cli = Cli::try_parse_from(["tagpick", "-s", "blue", "--select", "red"]).unwrap();
        assert_eq!(
            cli.initial_keys(),
            vec![ItemKey::from("blue"), ItemKey::from("red")]
        );
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::try_parse_from([
            "tagpick",
            "--name",
            "colors",
            "--close-on-commit",
            "--max-visible",
            "3",
        ])
        .unwrap();
        let mut settings = Settings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.form_name.as_deref(), Some("colors"));
        assert!(settings.close_on_commit);
        assert_eq!(settings.max_visible_candidates, 3);
        assert_eq!(settings.placeholder, Settings::default().placeholder);
    }

    #[test]
    fn test_absent_flags_leave_settings() {
        let cli = Cli::try_parse_from(["tagpick"]).unwrap();
        let mut settings = Settings {
            close_on_commit: true,
            ..Settings::default()
        };
        cli.apply(&mut settings);
        assert!(settings.close_on_commit);
    }
}
