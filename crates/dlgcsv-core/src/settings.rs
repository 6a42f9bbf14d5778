//! Tool settings
//!
//! Stored as JSON. Every field has a default, so a partial file is valid
//! and a missing file means "all defaults".

use crate::codec::LineEnding;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CSV_DIR: &str = "Resources/Dialogue Editor/CSV File";
pub const DEFAULT_CSV_FILE: &str = "DialogueCSV_Save.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory of the localization CSV, relative to the project root
    pub csv_dir: PathBuf,
    /// File name of the localization CSV
    pub csv_file: String,
    /// Line ending used when saving
    pub line_ending: LineEnding,
    /// Reject files with unterminated quotes instead of completing them
    pub strict: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            csv_dir: PathBuf::from(DEFAULT_CSV_DIR),
            csv_file: DEFAULT_CSV_FILE.to_string(),
            line_ending: LineEnding::Crlf,
            strict: false,
        }
    }
}

impl Settings {
    /// Load settings from a file, or defaults if it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save settings to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Full path of the localization CSV under a project root
    pub fn csv_path<P: AsRef<Path>>(&self, root: P) -> PathBuf {
        root.as_ref().join(&self.csv_dir).join(&self.csv_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path().join("dlgcsv.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dlgcsv.json");
        fs::write(&path, r#"{"line_ending":"lf","strict":true}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.line_ending, LineEnding::Lf);
        assert!(settings.strict);
        assert_eq!(settings.csv_file, DEFAULT_CSV_FILE);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dlgcsv.json");
        let settings = Settings {
            csv_file: "loc.csv".to_string(),
            ..Settings::default()
        };
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_csv_path() {
        let settings = Settings::default();
        assert_eq!(
            settings.csv_path("Assets"),
            PathBuf::from("Assets/Resources/Dialogue Editor/CSV File/DialogueCSV_Save.csv")
        );
    }
}
