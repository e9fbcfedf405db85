use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// CellValue – a raw cell from a column the dashboard does not interpret
// ---------------------------------------------------------------------------

/// A dynamically-typed cell for pass-through columns.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl CellValue {
    /// Best-effort typing of a raw text cell. Empty text is `Null`.
    pub fn guess(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the unified table
// ---------------------------------------------------------------------------

/// One indicator observation. Every key column may be missing in the source
/// file, so all of them are optional except `source`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: Option<String>,
    pub year: Option<i32>,
    pub topic: Option<String>,
    pub indicator: Option<String>,
    /// `Indicator Categories` column: role name, gender, ...
    pub indicator_category: Option<String>,
    /// `Technology or Sector` column (Innovation / Entrepreneurship only).
    pub technology_or_sector: Option<String>,
    pub value: Option<f64>,
    /// Tag derived from the originating file name.
    pub source: String,
    /// Raw columns not listed above, passed through untouched.
    pub extra: BTreeMap<String, CellValue>,
}

impl Record {
    /// An all-null record tagged with `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Record {
            country: None,
            year: None,
            topic: None,
            indicator: None,
            indicator_category: None,
            technology_or_sector: None,
            value: None,
            source: source.into(),
            extra: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the immutable unified table
// ---------------------------------------------------------------------------

/// The unified table. Built once at start-up; there is no way to mutate it
/// afterwards, so every query works on a borrowed view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    records: Vec<Record>,
    /// Column union in order of first appearance across the source files.
    column_names: Vec<String>,
}

impl Dataset {
    pub fn new(records: Vec<Record>, column_names: Vec<String>) -> Self {
        Dataset {
            records,
            column_names,
        }
    }

    /// Row-wise concatenation. Rows keep their part order; the column list is
    /// the union, so a column missing from one part is simply null there.
    pub fn concat(parts: impl IntoIterator<Item = Dataset>) -> Self {
        let mut records = Vec::new();
        let mut column_names: Vec<String> = Vec::new();
        for part in parts {
            for col in part.column_names {
                if !column_names.contains(&col) {
                    column_names.push(col);
                }
            }
            records.extend(part.records);
        }
        Dataset {
            records,
            column_names,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct countries, nulls excluded.
    pub fn countries(&self) -> Vec<String> {
        distinct(self.records.iter().filter_map(|r| r.country.as_deref()))
    }

    /// Sorted distinct topics, nulls excluded.
    pub fn topics(&self) -> Vec<String> {
        distinct(self.records.iter().filter_map(|r| r.topic.as_deref()))
    }

    /// Sorted distinct years, nulls excluded.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .filter_map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Smallest and largest year present, or `None` when no row has a year.
    pub fn year_bounds(&self) -> Option<YearRange> {
        let years = self.years();
        match (years.first(), years.last()) {
            (Some(&start), Some(&end)) => Some(YearRange { start, end }),
            _ => None,
        }
    }
}

pub(crate) fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// YearRange
// ---------------------------------------------------------------------------

/// Inclusive year interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        if start <= end {
            YearRange { start, end }
        } else {
            YearRange {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Intersect with `bounds`; a range entirely outside collapses onto the
    /// nearest bound.
    pub fn clamp_to(&self, bounds: YearRange) -> YearRange {
        let start = self.start.clamp(bounds.start, bounds.end);
        let end = self.end.clamp(bounds.start, bounds.end);
        YearRange::new(start, end)
    }
}
