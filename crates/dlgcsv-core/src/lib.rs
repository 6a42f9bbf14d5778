//! dlgcsv-core: Core library for dialogue localization CSV files
//!
//! This library provides functionality to:
//! - Parse and format RFC 4180-style delimited text (quoted fields,
//!   embedded commas and line breaks, CRLF or LF)
//! - Scan directories for dialogue container files
//! - Export container texts to a localization table, one column per language
//! - Import an edited table back into the containers, matching rows by id

pub mod codec;
pub mod container;
pub mod error;
pub mod file;
pub mod localization;
pub mod report;
pub mod scanner;
pub mod settings;
pub mod table;

pub use codec::{format, format_with, parse, parse_strict, LineEnding};
pub use container::{ChoiceText, DialogueContainer, DialogueText};
pub use error::{Error, Result};
pub use file::{read_table, write_table};
pub use localization::{export_table, import_table, ColumnMap, Language, LanguageTexts};
pub use report::{ImportReport, SkipReason, SkippedRow};
pub use scanner::{scan_containers, ScanResult};
pub use settings::Settings;
pub use table::{Row, Table};
