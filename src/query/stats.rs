use serde::Serialize;

use crate::data::model::Record;

/// Mean of the non-null values in a subset, with how many values it covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mean {
    pub value: f64,
    pub count: usize,
}

/// Running sum used by every grouping in the query layer.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    /// Null values are skipped; they count towards neither sum nor count.
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    pub fn finish(self) -> Option<Mean> {
        (self.count > 0).then(|| Mean {
            value: self.sum / self.count as f64,
            count: self.count,
        })
    }
}

/// Arithmetic mean of `value` over `rows`.
///
/// Returns `None` ("no data") when the subset is empty or every value is
/// null, never a zero.
pub fn mean<'a, I>(rows: I) -> Option<Mean>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut acc = Accumulator::default();
    for r in rows {
        acc.push(r.value);
    }
    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::record;

    #[test]
    fn nulls_are_excluded_from_mean_and_count() {
        let rows: Vec<Record> = [Some(10.0), Some(20.0), None, Some(30.0)]
            .into_iter()
            .map(|v| record("France", 2015, "Employment", "Wage gap", v))
            .collect();

        let m = mean(&rows).unwrap();

        assert_eq!(m.value, 20.0);
        assert_eq!(m.count, 3);
    }

    #[test]
    fn empty_or_all_null_is_no_data() {
        let empty: Vec<Record> = Vec::new();
        assert_eq!(mean(&empty), None);

        let nulls = vec![record("France", 2015, "Employment", "Wage gap", None)];
        assert_eq!(mean(&nulls), None);
    }

    #[test]
    fn zero_mean_is_still_data() {
        let rows = vec![
            record("France", 2015, "Employment", "Wage gap", Some(-5.0)),
            record("France", 2016, "Employment", "Wage gap", Some(5.0)),
        ];
        assert_eq!(mean(&rows), Some(Mean { value: 0.0, count: 2 }));
    }
}
