//! Purpose: Own the lazily-loaded dataset and its position-stable index.
//! Exports: `Pager`, `IndexedDataset`.
//! Role: Single entry point for slice pagination, resilient pagination, and summaries.
//! Invariants: The dataset is read from disk at most once per `Pager`; the index is built at most once.
//! Invariants: Failed loads are not cached; the next call reads the file again.
//! Invariants: Index walks hold the read lock for the whole page; removals take the write lock.

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::page::{ColumnGroups, HyperPage, IndexPage};
use crate::core::cursor::{self, Cursor, CursorResult, Walk};
use crate::core::dataset::{self, Dataset, Row};
use crate::core::error::Error;
use crate::core::index::SparseIndex;
use crate::core::page;
use crate::core::summary;
use crate::data_paths::default_data_file;

pub type ApiResult<T> = Result<T, Error>;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Dataset rows keyed by their original position.
///
/// Shared between readers; any holder may remove positions between page walks.
#[derive(Debug)]
pub struct IndexedDataset {
    bound: usize,
    entries: RwLock<SparseIndex<Row>>,
}

impl IndexedDataset {
    fn build(dataset: &Dataset) -> Self {
        let index: SparseIndex<Row> = dataset.rows().iter().cloned().collect();
        Self {
            bound: index.bound(),
            entries: RwLock::new(index),
        }
    }

    /// Build-time row count; the walk limit for every page.
    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn live_len(&self) -> usize {
        self.entries.read().live_len()
    }

    pub fn get(&self, position: usize) -> Option<Row> {
        self.entries.read().get(position).cloned()
    }

    pub fn contains(&self, position: usize) -> bool {
        self.entries.read().contains(position)
    }

    pub fn remove(&self, position: usize) -> Option<Row> {
        let removed = self.entries.write().remove(position);
        if removed.is_some() {
            debug!(position, "removed indexed row");
        }
        removed
    }

    pub fn walk(&self, start: usize, page_size: usize) -> ApiResult<Walk<Row>> {
        let entries = self.entries.read();
        cursor::walk(&*entries, start, page_size)
    }

    pub fn next_page(&self, cursor: &mut Cursor, page_size: usize) -> ApiResult<CursorResult<Row>> {
        let entries = self.entries.read();
        cursor.next(&*entries, page_size)
    }
}

#[derive(Debug)]
pub struct Pager {
    path: PathBuf,
    dataset: OnceCell<Dataset>,
    indexed: OnceCell<IndexedDataset>,
}

impl Pager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dataset: OnceCell::new(),
            indexed: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parsed rows, header excluded. Loaded on first call.
    pub fn dataset(&self) -> ApiResult<&Dataset> {
        self.dataset.get_or_try_init(|| dataset::load(&self.path))
    }

    /// Position-keyed view of `dataset()`. Built on first call.
    pub fn indexed_dataset(&self) -> ApiResult<&IndexedDataset> {
        self.indexed.get_or_try_init(|| {
            let indexed = IndexedDataset::build(self.dataset()?);
            debug!(bound = indexed.bound(), "built position index");
            Ok(indexed)
        })
    }

    pub fn get_page(&self, page: usize, page_size: usize) -> ApiResult<Vec<Row>> {
        page::validate(page, page_size)?;
        let (start, end) = page::index_range(page, page_size);
        Ok(self.dataset()?.slice(start, end).to_vec())
    }

    pub fn get_hyper(&self, page: usize, page_size: usize) -> ApiResult<HyperPage> {
        let data = self.get_page(page, page_size)?;
        let total_pages = page::total_pages(self.dataset()?.len(), page_size);
        Ok(HyperPage {
            page_size,
            page,
            data,
            next_page: page::next_page(page, total_pages),
            prev_page: page::prev_page(page),
            total_pages,
        })
    }

    /// Deletion-resilient page starting at `index` (default 0).
    pub fn get_hyper_index(&self, index: Option<usize>, page_size: usize) -> ApiResult<IndexPage> {
        let walk = self.indexed_dataset()?.walk(index.unwrap_or(0), page_size)?;
        Ok(IndexPage::from_walk(walk, page_size))
    }

    /// Removes `position` from the index; the dataset itself is untouched.
    pub fn remove(&self, position: usize) -> ApiResult<Option<Row>> {
        Ok(self.indexed_dataset()?.remove(position))
    }

    pub fn group_by(&self, by: &str, list: &str) -> ApiResult<ColumnGroups> {
        let groups = summary::group_by(self.dataset()?, by, list)?;
        Ok(ColumnGroups::from(groups))
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(default_data_file())
    }
}
