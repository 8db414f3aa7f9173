//! Purpose: Shared data-file path resolution for the CLI, server, and API.
//! Exports: `DEFAULT_DATA_FILE`, `DATA_FILE_ENV`, `default_data_file`.
//! Role: Keep CLI and library path semantics aligned from one source.
//! Invariants: Default data file remains `Popular_Baby_Names.csv` relative to the working dir.
//! Invariants: A non-empty `HYPERPAGE_FILE` overrides the default; `--file` overrides both.

use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "Popular_Baby_Names.csv";
pub const DATA_FILE_ENV: &str = "HYPERPAGE_FILE";

pub fn default_data_file() -> PathBuf {
    data_file_from(std::env::var_os(DATA_FILE_ENV))
}

fn data_file_from(value: Option<std::ffi::OsString>) -> PathBuf {
    match value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_DATA_FILE),
    }
}
