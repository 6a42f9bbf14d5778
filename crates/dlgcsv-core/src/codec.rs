//! Delimited-text codec for localization CSV files
//!
//! Parsing is a single pass over the input driven by a two-mode automaton
//! ([`Mode::Unquoted`] / [`Mode::Quoted`]). The transition table lives in
//! [`step`], a pure function of the current mode, the current character and
//! one character of lookahead; the scanner only applies the transitions it
//! returns.
//!
//! The parser is permissive: malformed quoting is completed rather than
//! rejected. [`parse_strict`] runs the same automaton but reports input that
//! ends inside a quoted span.

use crate::error::{Error, Result};
use crate::table::{Row, Table};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Line terminator written between rows by [`format_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n`, the dialogue editor's save format
    #[default]
    Crlf,
    /// `\n`
    Lf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

/// Scanner mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Outside quotes: commas and line breaks are structural
    Unquoted,
    /// Inside a quoted span: everything is literal except `"`
    Quoted,
}

/// What the scanner does with the character(s) a transition consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// Drop the character
    Skip,
    /// Opening quote; starts a cell even if nothing follows
    OpenQuote,
    /// Closing quote; does not end the cell
    CloseQuote,
    /// Append a character to the cell buffer
    Push(char),
    /// Close the current cell and start another in the same row
    EndCell,
    /// Close the current cell and row
    EndRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transition {
    pub action: Action,
    pub mode: Mode,
    /// Characters consumed, the current one included (1 or 2)
    pub consumed: usize,
    /// Skip whitespace at the head of the next line
    pub trim_line_head: bool,
}

impl Transition {
    fn one(action: Action, mode: Mode) -> Self {
        Self {
            action,
            mode,
            consumed: 1,
            trim_line_head: false,
        }
    }

    fn two(action: Action, mode: Mode) -> Self {
        Self {
            consumed: 2,
            ..Self::one(action, mode)
        }
    }

    fn line_break(consumed: usize) -> Self {
        Self {
            action: Action::EndRow,
            mode: Mode::Unquoted,
            consumed,
            trim_line_head: true,
        }
    }
}

/// The transition table.
///
/// `next` is `None` when `c` is the last character of the input.
/// `row_is_empty` is true when nothing of the current row has been scanned
/// yet: no closed cell, no buffered character and no opened quote.
pub(crate) fn step(mode: Mode, c: char, next: Option<char>, row_is_empty: bool) -> Transition {
    match (mode, c, next) {
        (Mode::Unquoted, '"', _) => Transition::one(Action::OpenQuote, Mode::Quoted),
        // A blank final line is not a row
        (Mode::Unquoted, c, None) if row_is_empty && c.is_whitespace() => {
            Transition::one(Action::Skip, Mode::Unquoted)
        }
        (Mode::Unquoted, ',', _) => Transition::one(Action::EndCell, Mode::Unquoted),
        (Mode::Unquoted, '\r', Some('\n')) => Transition::line_break(2),
        (Mode::Unquoted, '\r' | '\n', _) => Transition::line_break(1),
        (Mode::Unquoted, c, _) => Transition::one(Action::Push(c), Mode::Unquoted),

        (Mode::Quoted, '"', Some('"')) => Transition::two(Action::Push('"'), Mode::Quoted),
        (Mode::Quoted, '"', _) => Transition::one(Action::CloseQuote, Mode::Unquoted),
        (Mode::Quoted, c, _) => Transition::one(Action::Push(c), Mode::Quoted),
    }
}

/// Scanner state for one parse call
#[derive(Debug)]
struct Scanner {
    rows: Vec<Row>,
    cells: Vec<String>,
    buffer: String,
    mode: Mode,
    /// Something of the current row has been scanned
    pending: bool,
    trim_line_head: bool,
    /// Byte offset of the most recent opening quote
    quote_start: usize,
}

impl Scanner {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            cells: Vec::new(),
            buffer: String::new(),
            mode: Mode::Unquoted,
            pending: false,
            trim_line_head: false,
            quote_start: 0,
        }
    }

    fn run(&mut self, text: &str) {
        let mut chars = text.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            if self.trim_line_head {
                if c.is_whitespace() {
                    continue;
                }
                self.trim_line_head = false;
            }

            let next = chars.peek().map(|&(_, n)| n);
            let transition = step(self.mode, c, next, !self.pending);

            if transition.consumed == 2 {
                chars.next();
            }
            if transition.action == Action::OpenQuote {
                self.quote_start = offset;
            }

            self.apply(transition.action);
            self.mode = transition.mode;
            self.trim_line_head = transition.trim_line_head;
        }

        // End of input closes whatever row is in progress
        if self.pending {
            self.end_row();
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Skip => {}
            Action::OpenQuote | Action::CloseQuote => self.pending = true,
            Action::Push(c) => {
                self.buffer.push(c);
                self.pending = true;
            }
            Action::EndCell => {
                self.end_cell();
                self.pending = true;
            }
            Action::EndRow => self.end_row(),
        }
    }

    fn end_cell(&mut self) {
        self.cells.push(std::mem::take(&mut self.buffer));
    }

    fn end_row(&mut self) {
        self.end_cell();
        self.rows.push(Row::new(std::mem::take(&mut self.cells)));
        self.pending = false;
    }
}

/// Parse delimited text into a table.
///
/// Never fails: an empty or blank input yields an empty table, and a quoted
/// field missing its closing quote runs to the end of the input.
pub fn parse(text: &str) -> Table {
    let mut scanner = Scanner::new();
    scanner.run(text);
    debug!(rows = scanner.rows.len(), "parsed delimited text");
    Table {
        rows: scanner.rows,
    }
}

/// Parse delimited text, rejecting input that ends inside a quoted field
pub fn parse_strict(text: &str) -> Result<Table> {
    let mut scanner = Scanner::new();
    scanner.run(text);

    if scanner.mode == Mode::Quoted {
        let (line, column) = position(text, scanner.quote_start);
        return Err(Error::MalformedQuoting { line, column });
    }

    Ok(Table {
        rows: scanner.rows,
    })
}

/// 1-based line and column of a byte offset. `\r\n`, `\n` and a lone `\r`
/// each count as one line break.
fn position(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    let mut chars = text[..offset].chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => {
                line += 1;
                column = 1;
            }
            _ => column += 1,
        }
    }

    (line, column)
}

/// Format a table with CRLF line endings
pub fn format(table: &Table) -> String {
    format_with(table, LineEnding::Crlf)
}

/// Format a table. Rows are joined by `line_ending`; no terminator follows
/// the last row.
///
/// A row with no cells cannot be told apart from a blank line and is not
/// preserved by a later [`parse`].
pub fn format_with(table: &Table, line_ending: LineEnding) -> String {
    let mut out = String::new();

    for (i, row) in table.rows.iter().enumerate() {
        if i > 0 {
            out.push_str(line_ending.as_str());
        }
        for (j, cell) in row.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            let line_head =
                j == 0 && (starts_with_whitespace(cell) || (row.len() == 1 && cell.is_empty()));
            write_cell(&mut out, cell, line_head);
        }
    }

    out
}

fn starts_with_whitespace(cell: &str) -> bool {
    cell.chars().next().is_some_and(char::is_whitespace)
}

/// Append a cell, quoting it if it contains a comma, quote or line break.
/// `line_head` forces quotes on a first cell that the parser would otherwise
/// trim away: leading whitespace, or the only cell of a row being empty.
fn write_cell(out: &mut String, cell: &str, line_head: bool) {
    if line_head || cell.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&cell.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(table: &Table) -> Vec<Vec<&str>> {
        table.rows.iter().map(|r| r.iter().collect()).collect()
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_single_row() {
        assert_eq!(rows(&parse("a,b,c")), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_parse_trailing_comma_then_newline() {
        assert_eq!(rows(&parse("a,b,\n")), vec![vec!["a", "b", ""]]);
    }

    #[test]
    fn test_parse_trailing_comma_at_end() {
        assert_eq!(rows(&parse("a,b,")), vec![vec!["a", "b", ""]]);
    }

    #[test]
    fn test_parse_trailing_newline_adds_no_row() {
        assert_eq!(rows(&parse("a,b\n")), vec![vec!["a", "b"]]);
        assert_eq!(rows(&parse("a,b\r\n")), vec![vec!["a", "b"]]);
        assert_eq!(rows(&parse("x\n")), vec![vec!["x"]]);
    }

    #[test]
    fn test_parse_embedded_crlf_in_quotes() {
        assert_eq!(
            rows(&parse("a,\"b\r\nc\",d")),
            vec![vec!["a", "b\r\nc", "d"]]
        );
    }

    #[test]
    fn test_parse_embedded_comma_in_quotes() {
        assert_eq!(
            rows(&parse("id,\"Hello, world\"")),
            vec![vec!["id", "Hello, world"]]
        );
    }

    #[test]
    fn test_parse_escaped_quote() {
        assert_eq!(rows(&parse("\"a\"\"b\"")), vec![vec!["a\"b"]]);
    }

    #[test]
    fn test_parse_trims_line_head_only() {
        assert_eq!(
            rows(&parse("x\n  a,b")),
            vec![vec!["x"], vec!["a", "b"]]
        );
        // Whitespace after a comma is kept
        assert_eq!(rows(&parse("a, b")), vec![vec!["a", " b"]]);
    }

    #[test]
    fn test_parse_leading_whitespace_of_first_line_kept() {
        assert_eq!(rows(&parse(" a,b")), vec![vec![" a", "b"]]);
    }

    #[test]
    fn test_parse_blank_lines_collapse() {
        assert_eq!(
            rows(&parse("a\n\n\nb")),
            vec![vec!["a"], vec!["b"]]
        );
    }

    #[test]
    fn test_parse_line_endings() {
        let expected = vec![vec!["a", "b"], vec!["c", "d"]];
        assert_eq!(rows(&parse("a,b\r\nc,d")), expected);
        assert_eq!(rows(&parse("a,b\nc,d")), expected);
        assert_eq!(rows(&parse("a,b\rc,d")), expected);
    }

    #[test]
    fn test_parse_whitespace_only_is_empty() {
        assert!(parse(" ").is_empty());
        assert!(parse("\n").is_empty());
    }

    #[test]
    fn test_parse_leading_line_break_gives_empty_row() {
        assert_eq!(rows(&parse("\nx")), vec![vec![""], vec!["x"]]);
        assert_eq!(rows(&parse("\r\n")), vec![vec![""]]);
    }

    #[test]
    fn test_parse_empty_quoted_cell() {
        assert_eq!(rows(&parse("\"\"")), vec![vec![""]]);
        assert_eq!(rows(&parse("a,\"\"")), vec![vec!["a", ""]]);
    }

    #[test]
    fn test_parse_unterminated_quote_is_tolerated() {
        assert_eq!(rows(&parse("a,\"b")), vec![vec!["a", "b"]]);
        assert_eq!(rows(&parse("a,\"b,c\nd")), vec![vec!["a", "b,c\nd"]]);
    }

    #[test]
    fn test_parse_escaped_quote_at_end_keeps_row() {
        assert_eq!(rows(&parse("x,\"a\"\"")), vec![vec!["x", "a\""]]);
    }

    #[test]
    fn test_parse_text_after_closing_quote() {
        assert_eq!(rows(&parse("\"ab\"c,d")), vec![vec!["abc", "d"]]);
    }

    #[test]
    fn test_parse_short_rows_not_padded() {
        assert_eq!(
            rows(&parse("a,b,c\n1\n2,3")),
            vec![vec!["a", "b", "c"], vec!["1"], vec!["2", "3"]]
        );
    }

    #[test]
    fn test_parse_non_ascii() {
        assert_eq!(
            rows(&parse("English,Japanese\nHello,こんにちは")),
            vec![vec!["English", "Japanese"], vec!["Hello", "こんにちは"]]
        );
    }

    #[test]
    fn test_parse_strict_accepts_well_formed() {
        let table = parse_strict("a,\"b\"\"c\"\n").unwrap();
        assert_eq!(rows(&table), vec![vec!["a", "b\"c"]]);
    }

    #[test]
    fn test_parse_strict_reports_unterminated_quote() {
        let err = parse_strict("a,b\r\nc,\"d\ne").unwrap_err();
        match err {
            Error::MalformedQuoting { line, column } => {
                assert_eq!(line, 2);
                assert_eq!(column, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_strict_escaped_quote_at_end_is_unterminated() {
        assert!(parse_strict("\"a\"\"").is_err());
    }

    #[test]
    fn test_step_escaped_quote_consumes_two() {
        let t = step(Mode::Quoted, '"', Some('"'), false);
        assert_eq!(t.action, Action::Push('"'));
        assert_eq!(t.consumed, 2);
        assert_eq!(t.mode, Mode::Quoted);
    }

    #[test]
    fn test_step_crlf_is_one_break() {
        let t = step(Mode::Unquoted, '\r', Some('\n'), false);
        assert_eq!(t.action, Action::EndRow);
        assert_eq!(t.consumed, 2);
        assert!(t.trim_line_head);
    }

    #[test]
    fn test_step_line_break_inside_quotes_is_literal() {
        let t = step(Mode::Quoted, '\n', Some('x'), false);
        assert_eq!(t.action, Action::Push('\n'));
        assert_eq!(t.mode, Mode::Quoted);
    }

    #[test]
    fn test_step_blank_final_character() {
        assert_eq!(step(Mode::Unquoted, ' ', None, true).action, Action::Skip);
        assert_eq!(step(Mode::Unquoted, ' ', None, false).action, Action::Push(' '));
    }

    #[test]
    fn test_format_plain() {
        let table: Table = vec![vec!["a", "b"], vec!["c", "d"]].into_iter().collect();
        assert_eq!(format(&table), "a,b\r\nc,d");
        assert_eq!(format_with(&table, LineEnding::Lf), "a,b\nc,d");
    }

    #[test]
    fn test_format_quotes_special_cells() {
        let table: Table = vec![vec!["with,comma", "with\"quote", "with\nnewline", "cr\r"]]
            .into_iter()
            .collect();
        assert_eq!(
            format(&table),
            "\"with,comma\",\"with\"\"quote\",\"with\nnewline\",\"cr\r\""
        );
    }

    #[test]
    fn test_format_empty_table() {
        assert_eq!(format(&Table::new()), "");
    }

    #[test]
    fn test_round_trip_plain_cells() {
        let table: Table = vec![
            vec!["Dialogue Name", "Node Guid ID", "Text Guid ID", "English"],
            vec!["intro", "n-1", "t-1", "Hello there"],
            vec!["intro", "n-2", "", ""],
        ]
        .into_iter()
        .collect();
        assert_eq!(parse(&format(&table)), table);
    }

    #[test]
    fn test_format_quotes_line_head_cells() {
        let table: Table = vec![vec![" a", "b"], vec![""], vec!["", "c"], vec!["d", " e"]]
            .into_iter()
            .collect();
        assert_eq!(format(&table), "\" a\",b\r\n\"\"\r\n,c\r\nd, e");
    }

    #[test]
    fn test_round_trip_empty_middle_row() {
        let table: Table = vec![vec!["a"], vec![""], vec!["b"]].into_iter().collect();
        assert_eq!(parse(&format(&table)), table);
    }

    #[test]
    fn test_round_trip_whitespace_led_first_cell() {
        let table: Table = vec![vec!["a"], vec![" b", "c"]].into_iter().collect();
        assert_eq!(parse(&format(&table)), table);
    }

    #[test]
    fn test_round_trip_blank_only_table() {
        let table: Table = vec![vec![" "]].into_iter().collect();
        assert_eq!(format(&table), "\" \"");
        assert_eq!(parse(&format(&table)), table);
    }

    #[test]
    fn test_round_trip_edge_shapes() {
        let shapes: Vec<Vec<Vec<&str>>> = vec![
            vec![],
            vec![vec![""]],
            vec![vec![" "]],
            vec![vec!["a"], vec![""]],
            vec![vec!["a"], vec![""], vec!["b"]],
            vec![vec!["a"], vec!["  "]],
            vec![vec!["a"], vec![" b", "c"]],
            vec![vec!["\tlead", "trail "], vec!["x"]],
            vec![vec!["\u{3000}wide", "x"]],
            vec![vec!["", "x"], vec!["", ""]],
            vec![vec!["a"], vec!["", "b"]],
            vec![vec!["x", ""]],
            vec![vec!["a", "b", "c"], vec!["d"], vec!["e", "f"]],
            vec![vec!["single"], vec!["cells"], vec!["only"]],
            vec![vec!["id", "line\r\nbreak"], vec!["2", "lf\nonly"], vec!["3", "cr\ronly"]],
            vec![vec!["\nled", "x"], vec!["\r\n", ""]],
            vec![vec!["say \"hi\"", "\"\""], vec!["\"", ","]],
            vec![vec!["English", "Japanese"], vec!["Hello", "こんにちは"]],
        ];

        for shape in shapes {
            let table: Table = shape.into_iter().collect();
            for line_ending in [LineEnding::Crlf, LineEnding::Lf] {
                let text = format_with(&table, line_ending);
                assert_eq!(parse(&text), table, "formatted as {text:?}");
                assert_eq!(parse_strict(&text).unwrap(), table, "formatted as {text:?}");
            }
        }
    }

    #[test]
    fn test_parse_lone_quote_at_end_opens_empty_cell() {
        assert_eq!(rows(&parse("a,\"")), vec![vec!["a", ""]]);
        assert!(parse_strict("a,\"").is_err());
    }

    #[test]
    fn test_round_trip_escaped_cells() {
        let table: Table = vec![
            vec!["id", "text"],
            vec!["1", "She said \"hi\", then left.\r\nThe end"],
            vec!["2", "line one\nline two"],
        ]
        .into_iter()
        .collect();
        assert_eq!(parse(&format(&table)), table);
        assert_eq!(parse(&format_with(&table, LineEnding::Lf)), table);
    }

    #[test]
    fn test_agrees_with_csv_crate_on_well_formed_input() {
        let inputs = [
            "name,text\n1,\"Hello, world\"\n2,\"She said \"\"hi\"\"\"\n3,\"multi\nline\"\n",
            "a,b,c\r\nd,e,f\r\n",
            "a,,c\n,,\n",
            "x,\"\"\ny,z",
        ];

        for input in inputs {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(input.as_bytes());
            let expected: Vec<Vec<String>> = reader
                .records()
                .map(|r| r.unwrap().iter().map(str::to_string).collect())
                .collect();

            let actual: Vec<Vec<String>> = parse(input)
                .rows
                .into_iter()
                .map(|r| r.cells)
                .collect();

            assert_eq!(actual, expected, "input: {input:?}");
        }
    }

    #[test]
    fn test_position_counts_crlf_once() {
        assert_eq!(position("ab\r\ncd", 5), (2, 2));
        assert_eq!(position("ab\ncd", 0), (1, 1));
        assert_eq!(position("a\rb", 2), (2, 1));
    }
}
