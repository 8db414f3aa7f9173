//! Purpose: Define the stable public Rust API boundary for hyperpage.
//! Exports: `Pager`, page models, and the core types callers need.
//! Role: Public, additive-only surface used by the CLI, the server, and tests.
//! Invariants: This module is the supported path to loading and paging primitives.

mod page;
mod pager;

pub use crate::core::cursor::{Cursor, CursorResult, Walk};
pub use crate::core::dataset::{Dataset, Row};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::page::{index_range, position_arg, positive_arg};
pub use crate::data_paths::{DATA_FILE_ENV, DEFAULT_DATA_FILE, default_data_file};
pub use page::{ColumnGroup, ColumnGroups, HyperPage, IndexPage};
pub use pager::{ApiResult, DEFAULT_PAGE_SIZE, IndexedDataset, Pager};
