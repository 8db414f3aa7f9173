//! Purpose: Serializable result models for the pagination API.
//! Exports: `HyperPage`, `IndexPage`, `ColumnGroups`, `ColumnGroup`.
//! Role: Shared contract for CLI stdout, HTTP bodies, and library users.
//! Invariants: Absent neighbor pages serialize as `null`, not as missing keys.
//! Invariants: Field names are stable; additions are additive-only.

use serde::Serialize;

use crate::core::cursor::Walk;
use crate::core::dataset::Row;
use crate::core::summary::Groups;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HyperPage {
    pub page_size: usize,
    pub page: usize,
    pub data: Vec<Row>,
    pub next_page: Option<usize>,
    pub prev_page: Option<usize>,
    pub total_pages: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IndexPage {
    pub index: usize,
    pub data: Vec<Row>,
    pub page_size: usize,
    pub next_index: usize,
    /// Removed positions passed over; not part of the wire format.
    #[serde(skip)]
    pub skipped: Vec<usize>,
}

impl IndexPage {
    pub fn from_walk(walk: Walk<Row>, page_size: usize) -> Self {
        Self {
            index: walk.start,
            data: walk.items,
            page_size,
            next_index: walk.next,
            skipped: walk.skipped,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnGroup {
    pub value: String,
    pub count: usize,
    pub list: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnGroups {
    pub total: usize,
    pub groups: Vec<ColumnGroup>,
}

impl From<Groups> for ColumnGroups {
    fn from(groups: Groups) -> Self {
        Self {
            total: groups.total,
            groups: groups
                .groups
                .into_iter()
                .map(|group| ColumnGroup {
                    value: group.value,
                    count: group.list.len(),
                    list: group.list,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HyperPage, IndexPage};
    use crate::core::dataset::Row;
    use serde_json::json;

    #[test]
    fn hyper_page_serializes_missing_neighbors_as_null() {
        let page = HyperPage {
            page_size: 10,
            page: 1,
            data: vec![Row::new(vec!["a".to_string()])],
            next_page: None,
            prev_page: None,
            total_pages: 1,
        };
        let value = serde_json::to_value(&page).expect("json");
        assert_eq!(
            value,
            json!({
                "page_size": 10,
                "page": 1,
                "data": [["a"]],
                "next_page": null,
                "prev_page": null,
                "total_pages": 1
            })
        );
    }

    #[test]
    fn index_page_omits_skipped_positions() {
        let page = IndexPage {
            index: 3,
            data: Vec::new(),
            page_size: 2,
            next_index: 5,
            skipped: vec![3, 4],
        };
        let value = serde_json::to_value(&page).expect("json");
        assert!(value.get("skipped").is_none());
        assert_eq!(value["next_index"], 5);
    }
}
