//! C FFI bindings for dlgcsv-core
//!
//! This crate provides a C-compatible API so an editor host can hand raw
//! file text to the codec and read back rows and cells, or format a table
//! it has parsed.

use dlgcsv_core::{LineEnding, Table};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

/// Opaque handle to a parsed table
pub struct FfiTable {
    inner: Table,
}

/// Parse delimited text into a table
///
/// # Safety
/// - `text` must be a valid, NUL-terminated C string or null
/// - Returns null if `text` is null or not valid UTF-8
/// - Caller must free the returned table with `dlg_free_table`
#[no_mangle]
pub unsafe extern "C" fn dlg_parse(text: *const c_char) -> *mut FfiTable {
    if text.is_null() {
        return ptr::null_mut();
    }

    match CStr::from_ptr(text).to_str() {
        Ok(s) => Box::into_raw(Box::new(FfiTable {
            inner: dlgcsv_core::parse(s),
        })),
        Err(_) => ptr::null_mut(),
    }
}

/// Free a table
///
/// # Safety
/// - `table` must be a valid pointer returned by `dlg_parse` or null
#[no_mangle]
pub unsafe extern "C" fn dlg_free_table(table: *mut FfiTable) {
    if !table.is_null() {
        drop(Box::from_raw(table));
    }
}

/// Get the number of rows, header included
///
/// # Safety
/// - `table` must be a valid pointer returned by `dlg_parse`
#[no_mangle]
pub unsafe extern "C" fn dlg_table_row_count(table: *const FfiTable) -> usize {
    if table.is_null() {
        return 0;
    }
    (*table).inner.row_count()
}

/// Get the number of cells in a row; 0 if the row does not exist
///
/// # Safety
/// - `table` must be a valid pointer returned by `dlg_parse`
#[no_mangle]
pub unsafe extern "C" fn dlg_table_cell_count(table: *const FfiTable, row: usize) -> usize {
    if table.is_null() {
        return 0;
    }
    (&(*table).inner.rows).get(row).map(|r| r.len()).unwrap_or(0)
}

/// Get a cell's text
///
/// # Safety
/// - `table` must be a valid pointer returned by `dlg_parse`
/// - Returns null if row or col is out of bounds, or if the cell contains a NUL
/// - Caller must free the returned string with `dlg_free_string`
#[no_mangle]
pub unsafe extern "C" fn dlg_table_cell(table: *const FfiTable, row: usize, col: usize) -> *mut c_char {
    if table.is_null() {
        return ptr::null_mut();
    }

    (&(*table).inner.rows)
        .get(row)
        .and_then(|r| r.get(col))
        .and_then(|c| CString::new(c).ok())
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

/// Format a table back to delimited text
///
/// # Safety
/// - `table` must be a valid pointer returned by `dlg_parse`
/// - `crlf` selects `\r\n` line endings, otherwise `\n`
/// - Caller must free the returned string with `dlg_free_string`
#[no_mangle]
pub unsafe extern "C" fn dlg_format(table: *const FfiTable, crlf: bool) -> *mut c_char {
    if table.is_null() {
        return ptr::null_mut();
    }

    let line_ending = if crlf { LineEnding::Crlf } else { LineEnding::Lf };
    CString::new(dlgcsv_core::format_with(&(*table).inner, line_ending))
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

/// Free a string returned by other FFI functions
///
/// # Safety
/// - `s` must be a valid pointer returned by a dlg_* function or null
#[no_mangle]
pub unsafe extern "C" fn dlg_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
