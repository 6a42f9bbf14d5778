//! Dialogue containers: the records a localization table is exported from
//! and imported into

use crate::error::{Error, Result};
use crate::localization::LanguageTexts;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A dialogue asset holding every translatable text of one conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueContainer {
    /// Container name, written to the first column on export
    pub name: String,
    /// Text entries of dialogue nodes
    #[serde(default)]
    pub dialogue_texts: Vec<DialogueText>,
    /// Choice nodes
    #[serde(default)]
    pub choices: Vec<ChoiceText>,
}

impl DialogueContainer {
    /// Create a new empty container
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Number of exportable records
    pub fn record_count(&self) -> usize {
        self.dialogue_texts.len() + self.choices.len()
    }

    /// Load a container from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the container to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).map_err(|e| Error::FileWrite {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }
}

/// One text entry of a dialogue node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueText {
    pub node_id: String,
    pub text_id: String,
    #[serde(default)]
    pub texts: LanguageTexts,
}

impl DialogueText {
    pub fn new(node_id: impl Into<String>, text_id: impl Into<String>, texts: LanguageTexts) -> Self {
        Self {
            node_id: node_id.into(),
            text_id: text_id.into(),
            texts,
        }
    }
}

/// A choice node; it has a single text per language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceText {
    pub node_id: String,
    #[serde(default)]
    pub texts: LanguageTexts,
}

impl ChoiceText {
    pub fn new(node_id: impl Into<String>, texts: LanguageTexts) -> Self {
        Self {
            node_id: node_id.into(),
            texts,
        }
    }
}
