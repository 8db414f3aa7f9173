// Fixed-slice pagination arithmetic over 1-based page numbers.
use crate::core::error::{Error, ErrorKind};

/// `[start, end)` positions covered by `page` (1-based) at `page_size` rows per page.
pub fn index_range(page: usize, page_size: usize) -> (usize, usize) {
    let end = page_size.saturating_mul(page);
    (end.saturating_sub(page_size), end)
}

pub fn validate(page: usize, page_size: usize) -> Result<(), Error> {
    if page == 0 {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("page must be a positive integer")
            .with_hint("Pages are numbered from 1."));
    }
    if page_size == 0 {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("page_size must be a positive integer")
            .with_hint("Use a page size of 1 or more."));
    }
    Ok(())
}

/// Converts a signed page or page-size argument, rejecting values below 1.
pub fn positive_arg(name: &str, value: i64) -> Result<usize, Error> {
    if value < 1 {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!("{name} must be a positive integer"))
            .with_hint(format!("Use {name} >= 1.")));
    }
    usize::try_from(value)
        .map_err(|_| Error::new(ErrorKind::Usage).with_message(format!("{name} is too large")))
}

/// Converts a signed start position, rejecting negatives as out of range.
pub fn position_arg(value: i64) -> Result<usize, Error> {
    if value < 0 {
        return Err(Error::new(ErrorKind::OutOfRange)
            .with_message("index out of range")
            .with_hint("Positions start at 0."));
    }
    usize::try_from(value).map_err(|_| {
        Error::new(ErrorKind::OutOfRange)
            .with_message("index out of range")
            .with_position(value as u64)
    })
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size)
}

pub fn next_page(page: usize, total_pages: usize) -> Option<usize> {
    let next = page.checked_add(1)?;
    (next <= total_pages).then_some(next)
}

pub fn prev_page(page: usize) -> Option<usize> {
    (page > 1).then(|| page - 1)
}

#[cfg(test)]
mod tests {
    use super::{
        index_range, next_page, position_arg, positive_arg, prev_page, total_pages, validate,
    };
    use crate::core::error::ErrorKind;

    #[test]
    fn signed_arguments_are_checked() {
        assert_eq!(positive_arg("page", 3).expect("ok"), 3);
        assert_eq!(
            positive_arg("page", 0).expect_err("zero").kind(),
            ErrorKind::Usage
        );
        assert_eq!(
            positive_arg("page_size", -4).expect_err("negative").kind(),
            ErrorKind::Usage
        );
        assert_eq!(position_arg(0).expect("zero"), 0);
        assert_eq!(
            position_arg(-1).expect_err("negative").kind(),
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn index_range_matches_page_arithmetic() {
        assert_eq!(index_range(1, 10), (0, 10));
        assert_eq!(index_range(2, 10), (10, 20));
        assert_eq!(index_range(3, 15), (30, 45));
        assert_eq!(index_range(1, 1), (0, 1));
    }

    #[test]
    fn non_positive_arguments_are_rejected() {
        assert_eq!(validate(0, 10).expect_err("page").kind(), ErrorKind::Usage);
        assert_eq!(validate(1, 0).expect_err("size").kind(), ErrorKind::Usage);
        validate(1, 1).expect("ok");
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(1002, 10), 101);
        assert_eq!(total_pages(1000, 10), 100);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn neighbors_are_absent_at_the_edges() {
        assert_eq!(next_page(101, 101), None);
        assert_eq!(next_page(100, 101), Some(101));
        assert_eq!(next_page(200, 101), None);
        assert_eq!(prev_page(1), None);
        assert_eq!(prev_page(101), Some(100));
    }
}
