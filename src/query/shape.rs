use std::collections::BTreeMap;

use serde::Serialize;

use super::stats::Accumulator;
use crate::data::filter::Field;
use crate::data::model::Record;

/// One point of a yearly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: i32,
    pub value: f64,
}

/// Mean value of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPoint {
    pub category: String,
    /// `None` when every value of the category is null.
    pub value: Option<f64>,
    /// Bar colour, when the caller assigns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Mean value per year, ascending by year.
///
/// `None` means the subset itself was empty. Rows without a year are
/// dropped, and years whose values are all null produce no point, so a
/// non-empty subset can still yield `Some(vec![])`.
pub fn time_series(rows: &[&Record]) -> Option<Vec<YearPoint>> {
    if rows.is_empty() {
        return None;
    }

    let mut by_year: BTreeMap<i32, Accumulator> = BTreeMap::new();
    for r in rows {
        if let Some(year) = r.year {
            by_year.entry(year).or_default().push(r.value);
        }
    }

    Some(
        by_year
            .into_iter()
            .filter_map(|(year, acc)| acc.finish().map(|m| YearPoint { year, value: m.value }))
            .collect(),
    )
}

/// Mean value per distinct category of `field`, sorted by category.
///
/// Rows with a null category are dropped. `None` means the subset itself
/// was empty.
pub fn breakdown(rows: &[&Record], field: Field) -> Option<Vec<CategoryPoint>> {
    if rows.is_empty() {
        return None;
    }

    let mut by_category: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for r in rows {
        if let Some(category) = field.of(r) {
            by_category.entry(category).or_default().push(r.value);
        }
    }

    Some(
        by_category
            .into_iter()
            .map(|(category, acc)| CategoryPoint {
                category: category.to_string(),
                value: acc.finish().map(|m| m.value),
                color: None,
            })
            .collect(),
    )
}
