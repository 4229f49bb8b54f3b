use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use slogscope_logs::SeverityVisibility;

use crate::error::Result;

/// Smallest and largest detail pane height, in rows
pub const DETAIL_HEIGHT_RANGE: (u16, u16) = (3, 40);

/// Console preferences persisted between runs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub show_errors: bool,
    pub show_warnings: bool,
    pub show_infos: bool,

    /// Keep the newest entry selected as records arrive
    pub auto_scroll: bool,

    /// Start in collapsed mode
    pub collapse: bool,

    /// Detail pane height in rows
    pub detail_height: u16,

    /// Clear the console whenever the input is (re)opened
    pub clear_on_start: bool,

    /// Command used to open a stack frame; `{path}` and `{line}` are substituted
    pub editor: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_errors: true,
            show_warnings: true,
            show_infos: true,
            auto_scroll: true,
            collapse: false,
            detail_height: 10,
            clear_on_start: true,
            editor: "code --goto {path}:{line}".to_string(),
        }
    }
}

impl Preferences {
    /// Load preferences from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut prefs: Self = toml::from_str(&content)?;
        prefs.detail_height = clamp_detail_height(prefs.detail_height);
        Ok(prefs)
    }

    /// Load preferences, falling back to defaults when missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring preferences file");
                Self::default()
            }
        }
    }

    /// Write preferences to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn severities(&self) -> SeverityVisibility {
        SeverityVisibility {
            errors: self.show_errors,
            warnings: self.show_warnings,
            infos: self.show_infos,
        }
    }

    pub fn set_severities(&mut self, severities: SeverityVisibility) {
        self.show_errors = severities.errors;
        self.show_warnings = severities.warnings;
        self.show_infos = severities.infos;
    }
}

pub fn clamp_detail_height(height: u16) -> u16 {
    height.clamp(DETAIL_HEIGHT_RANGE.0, DETAIL_HEIGHT_RANGE.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "collapse = true\nshow_infos = false\n").unwrap();

        let prefs = Preferences::load(&path).unwrap();
        assert!(prefs.collapse);
        assert!(!prefs.show_infos);
        assert!(prefs.show_errors);
        assert_eq!(prefs.detail_height, 10);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");

        let prefs = Preferences {
            auto_scroll: false,
            editor: "subl {path}:{line}".to_string(),
            ..Default::default()
        };
        prefs.save(&path).unwrap();

        assert_eq!(Preferences::load(&path).unwrap(), prefs);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "collapse = \"sometimes\"").unwrap();

        assert!(Preferences::load(&path).is_err());
        assert_eq!(Preferences::load_or_default(&path), Preferences::default());
    }

    #[test]
    fn test_detail_height_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "detail_height = 500").unwrap();
        assert_eq!(Preferences::load(&path).unwrap().detail_height, 40);
    }

    #[test]
    fn test_severity_round_trip() {
        let mut prefs = Preferences::default();
        let mut severities = prefs.severities();
        severities.toggle(slogscope_logs::Severity::Warning);
        prefs.set_severities(severities);
        assert!(!prefs.show_warnings);
        assert_eq!(prefs.severities(), severities);
    }
}
