//! Record builders shared by the unit tests.

use super::model::{Dataset, Record};

pub fn record(
    country: &str,
    year: i32,
    topic: &str,
    indicator: &str,
    value: Option<f64>,
) -> Record {
    let mut r = Record::new(topic);
    r.country = Some(country.to_string());
    r.year = Some(year);
    r.topic = Some(topic.to_string());
    r.indicator = Some(indicator.to_string());
    r.value = value;
    r
}

pub fn with_category(mut r: Record, category: &str) -> Record {
    r.indicator_category = Some(category.to_string());
    r
}

pub fn with_sector(mut r: Record, sector: &str) -> Record {
    r.technology_or_sector = Some(sector.to_string());
    r
}

pub fn dataset(records: Vec<Record>) -> Dataset {
    Dataset::new(records, Vec::new())
}
