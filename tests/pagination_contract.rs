// Library-level pagination properties over a realistic baby-names fixture.
use std::io::Write;

use hyperpage::api::{ErrorKind, Pager, index_range};

fn pager_with_rows(rows: usize) -> (tempfile::TempDir, Pager) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Popular_Baby_Names.csv");
    let mut file = std::fs::File::create(&path).expect("create");
    writeln!(file, "Year of Birth,Gender,Ethnicity,Child's First Name,Count,Rank").expect("header");
    for i in 0..rows {
        writeln!(file, "2016,MALE,WHITE NON HISPANIC,Child{i},{},{}", 10 + i, i + 1).expect("row");
    }
    (dir, Pager::new(path))
}

fn names(rows: &[hyperpage::api::Row]) -> Vec<String> {
    rows.iter().map(|row| row[3].clone()).collect()
}

#[test]
fn index_range_examples() {
    assert_eq!(index_range(1, 7), (0, 7));
    assert_eq!(index_range(3, 15), (30, 45));
    assert_eq!(index_range(1, 10), (0, 10));
    assert_eq!(index_range(2, 10), (10, 20));
}

#[test]
fn get_page_full_partial_and_empty() {
    let (_dir, pager) = pager_with_rows(1002);
    assert_eq!(pager.get_page(1, 3).expect("first").len(), 3);
    assert_eq!(names(&pager.get_page(1, 3).expect("first"))[0], "Child0");
    assert_eq!(pager.get_page(51, 20).expect("partial").len(), 2);
    assert!(pager.get_page(3000, 100).expect("beyond").is_empty());
}

#[test]
fn get_hyper_last_page_scenario() {
    let (_dir, pager) = pager_with_rows(1002);
    assert_eq!(pager.dataset().expect("dataset").len(), 1002);

    let hyper = pager.get_hyper(101, 10).expect("hyper");
    assert_eq!(hyper.data.len(), 2);
    assert_eq!(hyper.next_page, None);
    assert_eq!(hyper.prev_page, Some(100));
    assert_eq!(hyper.total_pages, 101);
    assert_eq!(hyper.page, 101);
    assert_eq!(hyper.page_size, 10);
}

#[test]
fn get_hyper_first_and_middle_pages() {
    let (_dir, pager) = pager_with_rows(1002);

    let first = pager.get_hyper(1, 2).expect("first");
    assert_eq!(first.prev_page, None);
    assert_eq!(first.next_page, Some(2));
    assert_eq!(first.total_pages, 501);

    let middle = pager.get_hyper(2, 2).expect("middle");
    assert_eq!(middle.prev_page, Some(1));
    assert_eq!(middle.next_page, Some(3));

    let beyond = pager.get_hyper(3000, 100).expect("beyond");
    assert!(beyond.data.is_empty());
    assert_eq!(beyond.next_page, None);
    assert_eq!(beyond.total_pages, 11);
}

#[test]
fn deletion_between_calls_is_tolerated() {
    let (_dir, pager) = pager_with_rows(1002);
    let index = 3;
    let page_size = 2;

    let before = pager.get_hyper_index(Some(index), page_size).expect("before");
    assert_eq!(names(&before.data), vec!["Child3", "Child4"]);
    assert_eq!(before.next_index, 5);

    assert!(pager.remove(index).expect("remove").is_some());
    let after = pager.get_hyper_index(Some(index), page_size).expect("after");
    assert_eq!(names(&after.data), vec!["Child4", "Child5"]);
    assert_eq!(after.index, index);
    assert_eq!(after.next_index, 6);

    let resumed = pager
        .get_hyper_index(Some(before.next_index), page_size)
        .expect("resumed");
    assert_eq!(names(&resumed.data), vec!["Child5", "Child6"]);
}

#[test]
fn walk_bound_stays_at_original_length() {
    let (_dir, pager) = pager_with_rows(10);
    pager.remove(9).expect("remove");
    pager.remove(8).expect("remove");

    let page = pager.get_hyper_index(Some(6), 5).expect("page");
    assert_eq!(names(&page.data), vec!["Child6", "Child7"]);
    assert_eq!(page.next_index, 10);

    let indexed = pager.indexed_dataset().expect("index");
    assert_eq!(indexed.bound(), 10);
    assert_eq!(indexed.live_len(), 8);

    let err = pager.get_hyper_index(Some(10), 5).expect_err("past bound");
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
}

#[test]
fn next_index_never_exceeds_bound() {
    let (_dir, pager) = pager_with_rows(23);
    let mut start = 0;
    let mut seen = 0;
    while start < 23 {
        let page = pager.get_hyper_index(Some(start), 10).expect("page");
        assert!(page.next_index <= 23);
        seen += page.data.len();
        start = page.next_index;
    }
    assert_eq!(seen, 23);
}

#[test]
fn repeated_calls_return_the_same_instances() {
    let (_dir, pager) = pager_with_rows(4);
    let a = pager.dataset().expect("dataset");
    let b = pager.dataset().expect("dataset");
    assert!(std::ptr::eq(a, b));

    let x = pager.indexed_dataset().expect("index");
    let y = pager.indexed_dataset().expect("index");
    assert!(std::ptr::eq(x, y));
}
