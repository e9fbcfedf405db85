use serde::Serialize;

use super::model::{Record, YearRange};

// ---------------------------------------------------------------------------
// Field – the text columns a condition can look at
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Field {
    Country,
    Topic,
    Indicator,
    IndicatorCategory,
    TechnologyOrSector,
    Source,
}

impl Field {
    /// The field's value on `record`, `None` when the cell is null.
    pub fn of(self, record: &Record) -> Option<&str> {
        match self {
            Field::Country => record.country.as_deref(),
            Field::Topic => record.topic.as_deref(),
            Field::Indicator => record.indicator.as_deref(),
            Field::IndicatorCategory => record.indicator_category.as_deref(),
            Field::TechnologyOrSector => record.technology_or_sector.as_deref(),
            Field::Source => Some(record.source.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Condition – one predicate over a record
// ---------------------------------------------------------------------------

/// A single row predicate. A null cell fails every condition: there is no
/// condition that selects missing values.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Exact, case-sensitive equality.
    Equals(Field, String),
    /// Equality after lower-casing both sides. Stored lower-cased.
    EqualsIgnoreCase(Field, String),
    /// Case-insensitive substring match against any of the alternatives.
    /// Stored lower-cased.
    Contains(Field, Vec<String>),
    /// Exact membership in a list.
    OneOf(Field, Vec<String>),
    /// Year inside an inclusive range.
    Years(YearRange),
    /// Value strictly between the two bounds.
    ValueWithin(f64, f64),
}

impl Condition {
    pub fn equals(field: Field, value: &str) -> Self {
        Condition::Equals(field, value.to_string())
    }

    pub fn equals_ignore_case(field: Field, value: &str) -> Self {
        Condition::EqualsIgnoreCase(field, value.to_lowercase())
    }

    /// `pattern` may hold several alternatives separated by `|`, as in
    /// `"contract|occupation"`.
    pub fn contains(field: Field, pattern: &str) -> Self {
        Condition::Contains(
            field,
            pattern.split('|').map(str::to_lowercase).collect(),
        )
    }

    pub fn one_of<S: AsRef<str>>(field: Field, values: &[S]) -> Self {
        Condition::OneOf(
            field,
            values.iter().map(|v| v.as_ref().to_string()).collect(),
        )
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Condition::Equals(field, wanted) => field.of(record) == Some(wanted.as_str()),
            Condition::EqualsIgnoreCase(field, wanted) => field
                .of(record)
                .is_some_and(|v| v.to_lowercase() == *wanted),
            Condition::Contains(field, needles) => field.of(record).is_some_and(|v| {
                let haystack = v.to_lowercase();
                needles.iter().any(|n| haystack.contains(n.as_str()))
            }),
            Condition::OneOf(field, allowed) => field
                .of(record)
                .is_some_and(|v| allowed.iter().any(|a| a == v)),
            Condition::Years(range) => record.year.is_some_and(|y| range.contains(y)),
            Condition::ValueWithin(low, high) => {
                record.value.is_some_and(|v| v > *low && v < *high)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Filter – conjunction of conditions
// ---------------------------------------------------------------------------

/// All conditions must hold. An empty filter passes every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn country(self, country: &str) -> Self {
        self.with(Condition::equals(Field::Country, country))
    }

    pub fn topic(self, topic: &str) -> Self {
        self.with(Condition::equals(Field::Topic, topic))
    }

    pub fn indicator(self, indicator: &str) -> Self {
        self.with(Condition::equals(Field::Indicator, indicator))
    }

    pub fn indicator_contains(self, pattern: &str) -> Self {
        self.with(Condition::contains(Field::Indicator, pattern))
    }

    pub fn years(self, range: YearRange) -> Self {
        self.with(Condition::Years(range))
    }

    /// Keep values in the open interval `(-bound, bound)`.
    pub fn value_within(self, bound: f64) -> Self {
        self.with(Condition::ValueWithin(-bound, bound))
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }

    /// Borrowed view of the rows that pass, in input order.
    pub fn apply<'a, I>(&self, rows: I) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        rows.into_iter().filter(|r| self.matches(r)).collect()
    }
}
