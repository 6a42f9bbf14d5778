//! Mapping between dialogue containers and localization tables
//!
//! Table layout:
//! - column 0: dialogue container name
//! - column 1: node identifier
//! - column 2: text-entry identifier (empty for choice nodes)
//! - columns 3..: one per [`Language`], headed by its canonical name
//!
//! Identifier columns are fixed-position. Language columns are found by
//! header name, so a file with reordered or missing language columns still
//! imports.

use crate::container::DialogueContainer;
use crate::error::Error;
use crate::report::{ImportReport, SkipReason};
use crate::table::{Row, Table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Column holding the dialogue container name
pub const DIALOGUE_NAME_COLUMN: usize = 0;
/// Column holding the node identifier
pub const NODE_ID_COLUMN: usize = 1;
/// Column holding the text-entry identifier
pub const TEXT_ID_COLUMN: usize = 2;

/// Header names of the identifier columns, in column order
pub const IDENTIFIER_HEADERS: [&str; 3] = ["Dialogue Name", "Node Guid ID", "Text Guid ID"];

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    German,
    Danish,
    Japanese,
    Latin,
}

impl Language {
    /// Every supported language, in column order
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::German,
        Language::Danish,
        Language::Japanese,
        Language::Latin,
    ];

    /// Canonical name, used as the column header
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::German => "German",
            Language::Danish => "Danish",
            Language::Japanese => "Japanese",
            Language::Latin => "Latin",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Exact, case-sensitive match on the canonical name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| l.name() == s)
            .ok_or_else(|| Error::UnknownLanguage(s.to_string()))
    }
}

/// One text slot per language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTexts(BTreeMap<Language, String>);

impl LanguageTexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text for a language; empty if never set
    pub fn get(&self, language: Language) -> &str {
        self.0.get(&language).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, language: Language, text: impl Into<String>) {
        self.0.insert(language, text.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (Language, &str)> {
        self.0.iter().map(|(l, t)| (*l, t.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(Language, S)> for LanguageTexts {
    fn from_iter<I: IntoIterator<Item = (Language, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(l, t)| (l, t.into())).collect())
    }
}

/// Header position to language, built once per import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: Vec<(usize, Language)>,
}

impl ColumnMap {
    /// Map every header that names a supported language
    pub fn from_headers(headers: &Row) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .filter_map(|(i, name)| name.parse::<Language>().ok().map(|l| (i, l)))
            .collect();
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column index of a language, if the header has one
    pub fn column_of(&self, language: Language) -> Option<usize> {
        self.columns
            .iter()
            .find(|(_, l)| *l == language)
            .map(|(i, _)| *i)
    }

    /// Copy every language cell present in `row` into `texts`.
    /// Cells past the end of a short row are left untouched.
    /// Returns the number of slots written.
    pub fn apply(&self, row: &Row, texts: &mut LanguageTexts) -> usize {
        let mut written = 0;
        for &(index, language) in &self.columns {
            if let Some(cell) = row.get(index) {
                texts.set(language, cell);
                written += 1;
            }
        }
        written
    }
}

/// Build the export table: a header row, then one row per dialogue text
/// entry and one per choice node, container by container
pub fn export_table(containers: &[DialogueContainer]) -> Table {
    let mut table = Table::new();

    let header: Row = IDENTIFIER_HEADERS
        .into_iter()
        .chain(Language::ALL.into_iter().map(Language::name))
        .collect();
    table.push(header);

    for container in containers {
        for entry in &container.dialogue_texts {
            table.push(export_row(
                &container.name,
                &entry.node_id,
                &entry.text_id,
                &entry.texts,
            ));
        }
        for choice in &container.choices {
            table.push(export_row(&container.name, &choice.node_id, "", &choice.texts));
        }
    }

    debug!(
        containers = containers.len(),
        rows = table.records().len(),
        "built localization table"
    );
    table
}

fn export_row(name: &str, node_id: &str, text_id: &str, texts: &LanguageTexts) -> Row {
    [name, node_id, text_id]
        .into_iter()
        .chain(Language::ALL.into_iter().map(|l| texts.get(l)))
        .collect()
}

/// Write the language cells of `table` back into `containers`.
///
/// Dialogue text entries are matched on the text identifier column, choice
/// nodes on the node identifier column. Every matching row is applied in
/// order, so a later duplicate row wins. Rows that match nothing or lack
/// identifier columns are recorded in the report and skipped.
pub fn import_table(table: &Table, containers: &mut [DialogueContainer]) -> ImportReport {
    let mut report = ImportReport::new();

    let Some(headers) = table.headers() else {
        return report;
    };
    let columns = ColumnMap::from_headers(headers);
    if columns.is_empty() {
        warn!("no language columns in header row");
    }

    let mut texts_by_id: HashMap<String, Vec<(usize, usize)>> = HashMap::new();
    let mut choices_by_id: HashMap<String, Vec<(usize, usize)>> = HashMap::new();
    for (c, container) in containers.iter().enumerate() {
        for (t, entry) in container.dialogue_texts.iter().enumerate() {
            texts_by_id.entry(entry.text_id.clone()).or_default().push((c, t));
        }
        for (n, choice) in container.choices.iter().enumerate() {
            choices_by_id.entry(choice.node_id.clone()).or_default().push((c, n));
        }
    }

    for (i, row) in table.records().iter().enumerate() {
        // 1-based, header is row 1
        let row_number = i + 2;
        report.rows_seen += 1;

        let node_id = row.get(NODE_ID_COLUMN).filter(|s| !s.is_empty());
        let text_id = row.get(TEXT_ID_COLUMN).filter(|s| !s.is_empty());
        if node_id.is_none() && text_id.is_none() {
            warn!(row = row_number, "row has no identifier, skipping");
            report.skip(row_number, SkipReason::MissingIdentifier);
            continue;
        }

        let mut matched = false;

        if let Some(targets) = text_id.and_then(|id| texts_by_id.get(id)) {
            for &(c, t) in targets {
                report.cells_written += columns.apply(row, &mut containers[c].dialogue_texts[t].texts);
            }
            matched = true;
        }
        if let Some(targets) = node_id.and_then(|id| choices_by_id.get(id)) {
            for &(c, n) in targets {
                report.cells_written += columns.apply(row, &mut containers[c].choices[n].texts);
            }
            matched = true;
        }

        if matched {
            report.rows_matched += 1;
        } else {
            warn!(row = row_number, node = ?node_id, text = ?text_id, "row matches no record, skipping");
            report.skip(row_number, SkipReason::Unmatched);
        }
    }

    debug!(
        rows = report.rows_seen,
        matched = report.rows_matched,
        cells = report.cells_written,
        "imported localization table"
    );
    report
}
