// Group rows by one column and list another column's values per group.
use std::collections::BTreeMap;

use crate::core::dataset::Dataset;
use crate::core::error::{Error, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub value: String,
    pub list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Groups {
    /// Rows that had both columns.
    pub total: usize,
    pub groups: Vec<Group>,
}

pub fn group_by(dataset: &Dataset, by: &str, list: &str) -> Result<Groups, Error> {
    let by_col = column(dataset, by)?;
    let list_col = column(dataset, list)?;

    let mut total = 0;
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for row in dataset.rows() {
        let (Some(key), Some(value)) = (row.get(by_col), row.get(list_col)) else {
            continue;
        };
        total += 1;
        grouped.entry(key.clone()).or_default().push(value.clone());
    }

    let mut groups: Vec<Group> = grouped
        .into_iter()
        .map(|(value, list)| Group { value, list })
        .collect();
    groups.sort_by(|a, b| {
        a.value
            .to_lowercase()
            .cmp(&b.value.to_lowercase())
            .then_with(|| a.value.cmp(&b.value))
    });

    Ok(Groups { total, groups })
}

fn column(dataset: &Dataset, name: &str) -> Result<usize, Error> {
    dataset.column(name).ok_or_else(|| {
        Error::new(ErrorKind::NotFound)
            .with_message(format!("column not found: {name}"))
            .with_hint(format!(
                "Available columns: {}.",
                dataset.header().join(", ")
            ))
    })
}
