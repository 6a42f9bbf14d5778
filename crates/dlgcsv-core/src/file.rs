//! Reading and writing localization CSV files

use crate::codec::{format_with, parse, parse_strict, LineEnding};
use crate::error::{Error, Result};
use crate::table::Table;
use std::fs;
use std::path::Path;
use tracing::debug;

const UTF8_BOM: char = '\u{feff}';

/// Read and parse a CSV file.
///
/// A leading UTF-8 byte order mark is dropped. With `strict`, an
/// unterminated quoted field is an error instead of being completed.
pub fn read_table<P: AsRef<Path>>(path: P, strict: bool) -> Result<Table> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = content.strip_prefix(UTF8_BOM).unwrap_or(&content);

    let table = if strict { parse_strict(text)? } else { parse(text) };
    debug!(path = %path.display(), rows = table.row_count(), "read table");
    Ok(table)
}

/// Format a table and write it to a file, creating parent directories
pub fn write_table<P: AsRef<Path>>(path: P, table: &Table, line_ending: LineEnding) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, format_with(table, line_ending)).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), rows = table.row_count(), "wrote table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CSV File/loc.csv");
        let table: Table = vec![vec!["id", "English"], vec!["1", "Hi, \"you\""]]
            .into_iter()
            .collect();

        write_table(&path, &table, LineEnding::Crlf).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "id,English\r\n1,\"Hi, \"\"you\"\"\"");
        assert_eq!(read_table(&path, true).unwrap(), table);
    }

    #[test]
    fn test_read_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loc.csv");
        fs::write(&path, "\u{feff}Dialogue Name,English\r\n").unwrap();

        let table = read_table(&path, false).unwrap();
        assert_eq!(table.headers().unwrap().get(0), Some("Dialogue Name"));
    }

    #[test]
    fn test_read_strict_rejects_unterminated_quote() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "a,\"b").unwrap();

        assert!(matches!(
            read_table(&path, true),
            Err(Error::MalformedQuoting { line: 1, column: 3 })
        ));
        assert_eq!(read_table(&path, false).unwrap().rows[0].cells, vec!["a", "b"]);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_table(dir.path().join("missing.csv"), false),
            Err(Error::FileRead { .. })
        ));
    }
}
