// Deletion-resilient walks over a sparse index, plus a resumable cursor.
use crate::core::error::{Error, ErrorKind};
use crate::core::index::SparseIndex;

#[derive(Debug, PartialEq)]
pub struct Walk<T> {
    pub start: usize,
    pub items: Vec<T>,
    /// First position not visited; pass it back as the next start.
    pub next: usize,
    /// Removed positions passed over while filling the page.
    pub skipped: Vec<usize>,
}

/// Collects up to `page_size` live entries starting at `start`.
///
/// Removed positions are skipped without shortening the page. The walk stops
/// at `index.bound()`, which is the build-time length, so `next` never exceeds
/// it and may equal it even when trailing entries were removed.
pub fn walk<T: Clone>(
    index: &SparseIndex<T>,
    start: usize,
    page_size: usize,
) -> Result<Walk<T>, Error> {
    if page_size == 0 {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("page_size must be a positive integer")
            .with_hint("Use a page size of 1 or more."));
    }
    let bound = index.bound();
    if start >= bound {
        return Err(Error::new(ErrorKind::OutOfRange)
            .with_message("index out of range")
            .with_position(start as u64)
            .with_hint(format!("Use an index in 0..{bound}.")));
    }

    let mut items = Vec::with_capacity(page_size.min(bound - start));
    let mut skipped = Vec::new();
    let mut cursor = start;
    while items.len() < page_size && cursor < bound {
        match index.get(cursor) {
            Some(item) => items.push(item.clone()),
            None => skipped.push(cursor),
        }
        cursor += 1;
    }

    Ok(Walk {
        start,
        items,
        next: cursor,
        skipped,
    })
}

#[derive(Debug, PartialEq)]
pub enum CursorResult<T> {
    Page(Walk<T>),
    Exhausted,
}

/// Remembers where the previous page stopped.
#[derive(Debug)]
pub struct Cursor {
    next_index: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self { next_index: 0 }
    }

    pub fn at(start: usize) -> Self {
        Self { next_index: start }
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn next<T: Clone>(
        &mut self,
        index: &SparseIndex<T>,
        page_size: usize,
    ) -> Result<CursorResult<T>, Error> {
        if self.next_index >= index.bound() {
            return Ok(CursorResult::Exhausted);
        }
        let page = walk(index, self.next_index, page_size)?;
        self.next_index = page.next;
        Ok(CursorResult::Page(page))
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}
