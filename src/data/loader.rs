use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};

use super::error::DataError;
use super::model::{CellValue, Dataset, Record};

// ---------------------------------------------------------------------------
// Source list
// ---------------------------------------------------------------------------

/// One input table: a file name (relative to the data directory) and the
/// topic its rows are expected to carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub file: String,
    pub topic: String,
}

impl SourceSpec {
    pub fn new(file: &str, topic: &str) -> Self {
        SourceSpec {
            file: file.to_string(),
            topic: topic.to_string(),
        }
    }
}

/// The four tables published for the energy-sector gender gap study.
pub fn default_sources() -> Vec<SourceSpec> {
    vec![
        SourceSpec::new("Employment.csv", "Employment"),
        SourceSpec::new("innovation.csv", "Innovation"),
        SourceSpec::new("Senior_Management.csv", "Senior Management"),
        SourceSpec::new("Entrepreneurship.csv", "Entrepreneurship"),
    ]
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every source under `dir` and concatenate them in list order.
pub fn load_sources(dir: &Path, sources: &[SourceSpec]) -> Result<Dataset, DataError> {
    let mut parts = Vec::with_capacity(sources.len());
    for entry in sources {
        let path = dir.join(&entry.file);
        let part = load_file(&path)?;

        let off_topic = part
            .records()
            .iter()
            .filter(|r| r.topic.as_deref() != Some(entry.topic.as_str()))
            .count();
        if off_topic > 0 {
            log::warn!(
                "{}: {off_topic} of {} rows do not carry topic '{}'",
                path.display(),
                part.len(),
                entry.topic
            );
        }
        log::info!(
            "Loaded {} rows ({} columns) from {}",
            part.len(),
            part.column_names().len(),
            path.display()
        );
        parts.push(part);
    }

    let dataset = Dataset::concat(parts);
    log::info!(
        "Unified table: {} rows, {} countries, {} topics",
        dataset.len(),
        dataset.countries().len(),
        dataset.topics().len()
    );
    Ok(dataset)
}

/// Load a single table, dispatching by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one observation per line
/// * `.parquet` – flat columns with the same names as the CSV header
pub fn load_file(path: &Path) -> Result<Dataset, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let source = source_tag(path);

    match ext.as_str() {
        "csv" => load_csv(path, &source),
        "parquet" | "pq" => load_parquet(path, &source),
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }
}

/// `Senior_Management.csv` → `Senior management`.
///
/// Extension stripped, first character upper-cased and the rest
/// lower-cased, underscores turned into spaces.
pub fn source_tag(path: &Path) -> String {
    let stem = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or("");
    let mut chars = stem.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    };
    capitalized.replace('_', " ")
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Column {
    Country,
    Year,
    Topic,
    Indicator,
    IndicatorCategory,
    TechnologyOrSector,
    Value,
    Other(String),
}

impl Column {
    fn from_header(name: &str) -> Self {
        match name {
            "Country" => Column::Country,
            "Year" => Column::Year,
            "Topic" => Column::Topic,
            "Indicator" => Column::Indicator,
            "Indicator Categories" => Column::IndicatorCategory,
            "Technology or Sector" => Column::TechnologyOrSector,
            "Value" => Column::Value,
            other => Column::Other(other.to_string()),
        }
    }
}

/// Markers read as missing, matching what spreadsheet exports emit.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

fn is_na(s: &str) -> bool {
    NA_MARKERS.contains(&s)
}

fn text_cell(s: &str) -> Option<String> {
    (!is_na(s)).then(|| s.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path, source: &str) -> Result<Dataset, DataError> {
    let file = File::open(path).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let csv_err = |e: csv::Error| DataError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut reader = csv::Reader::from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let columns: Vec<Column> = headers.iter().map(|h| Column::from_header(h)).collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.map_err(csv_err)?;
        // Header is line 1.
        let line = row
            .position()
            .map_or(row_no as u64 + 2, csv::Position::line) as usize;
        let mut record = Record::new(source);

        for (column, raw) in columns.iter().zip(row.iter()) {
            match column {
                Column::Country => record.country = text_cell(raw),
                Column::Topic => record.topic = text_cell(raw),
                Column::Indicator => record.indicator = text_cell(raw),
                Column::IndicatorCategory => record.indicator_category = text_cell(raw),
                Column::TechnologyOrSector => record.technology_or_sector = text_cell(raw),
                Column::Year => {
                    record.year = parse_year(raw).ok_or_else(|| DataError::InvalidNumber {
                        path: path.to_path_buf(),
                        row: line,
                        column: "Year".into(),
                        value: raw.to_string(),
                    })?;
                }
                Column::Value => {
                    record.value = parse_value(raw).ok_or_else(|| DataError::InvalidNumber {
                        path: path.to_path_buf(),
                        row: line,
                        column: "Value".into(),
                        value: raw.to_string(),
                    })?;
                }
                Column::Other(name) => {
                    let cell = if is_na(raw) {
                        CellValue::Null
                    } else {
                        CellValue::guess(raw)
                    };
                    record.extra.insert(name.clone(), cell);
                }
            }
        }
        records.push(record);
    }

    Ok(Dataset::new(records, headers))
}

/// `Some(None)` for a missing year, `None` when the text is not a year.
fn parse_year(raw: &str) -> Option<Option<i32>> {
    let s = raw.trim();
    if is_na(s) {
        return Some(None);
    }
    if let Ok(y) = s.parse::<i32>() {
        return Some(Some(y));
    }
    let f = s.parse::<f64>().ok()?;
    year_from_f64(f)
}

fn year_from_f64(f: f64) -> Option<Option<i32>> {
    if f.is_nan() {
        return Some(None);
    }
    let in_range = f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX);
    (f.fract() == 0.0 && in_range).then_some(Some(f as i32))
}

/// `Some(None)` for a missing value, `None` when the text is not a number.
fn parse_value(raw: &str) -> Option<Option<f64>> {
    let s = raw.trim();
    if is_na(s) {
        return Some(None);
    }
    let v = s.parse::<f64>().ok()?;
    Some((!v.is_nan()).then_some(v))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet export of one table. Column names follow the CSV header;
/// string columns may be `Utf8` or `LargeUtf8`, numeric columns any
/// int/float width.
fn load_parquet(path: &Path, source: &str) -> Result<Dataset, DataError> {
    let file = File::open(path).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let pq_err = |e| DataError::Parquet {
        path: path.to_path_buf(),
        source: e,
    };
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(pq_err)?
        .build()
        .map_err(pq_err)?;

    let mut records = Vec::new();
    let mut column_names: Vec<String> = Vec::new();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result.map_err(|e| DataError::Arrow {
            path: path.to_path_buf(),
            source: e,
        })?;
        let schema = batch.schema();
        if column_names.is_empty() {
            column_names = schema.fields().iter().map(|f| f.name().clone()).collect();
        }
        let columns: Vec<(Column, &Arc<dyn Array>)> = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(f, c)| (Column::from_header(f.name()), c))
            .collect();

        for row in 0..batch.num_rows() {
            let mut record = Record::new(source);
            for (column, array) in &columns {
                match column {
                    Column::Country => record.country = string_at(path, "Country", array, row)?,
                    Column::Topic => record.topic = string_at(path, "Topic", array, row)?,
                    Column::Indicator => {
                        record.indicator = string_at(path, "Indicator", array, row)?
                    }
                    Column::IndicatorCategory => {
                        record.indicator_category =
                            string_at(path, "Indicator Categories", array, row)?
                    }
                    Column::TechnologyOrSector => {
                        record.technology_or_sector =
                            string_at(path, "Technology or Sector", array, row)?
                    }
                    Column::Year => {
                        let year = number_at(path, "Year", array, row)?;
                        record.year = match year {
                            None => None,
                            Some(f) => year_from_f64(f).ok_or_else(|| {
                                DataError::InvalidNumber {
                                    path: path.to_path_buf(),
                                    row: row_offset + row + 1,
                                    column: "Year".into(),
                                    value: f.to_string(),
                                }
                            })?,
                        };
                    }
                    Column::Value => {
                        record.value =
                            number_at(path, "Value", array, row)?.filter(|v| !v.is_nan());
                    }
                    Column::Other(name) => {
                        record.extra.insert(name.clone(), cell_at(array, row));
                    }
                }
            }
            records.push(record);
        }
        row_offset += batch.num_rows();
    }

    Ok(Dataset::new(records, column_names))
}

// -- Arrow helpers --

fn unsupported(path: &Path, column: &str, array: &Arc<dyn Array>) -> DataError {
    DataError::UnsupportedColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
        data_type: format!("{:?}", array.data_type()),
    }
}

fn string_at(
    path: &Path,
    column: &str,
    array: &Arc<dyn Array>,
    row: usize,
) -> Result<Option<String>, DataError> {
    if array.is_null(row) {
        return Ok(None);
    }
    let s = match array.data_type() {
        DataType::Utf8 => array.as_string::<i32>().value(row),
        DataType::LargeUtf8 => array.as_string::<i64>().value(row),
        _ => return Err(unsupported(path, column, array)),
    };
    Ok(text_cell(s))
}

fn number_at(
    path: &Path,
    column: &str,
    array: &Arc<dyn Array>,
    row: usize,
) -> Result<Option<f64>, DataError> {
    if array.is_null(row) {
        return Ok(None);
    }
    let v = match array.data_type() {
        DataType::Int32 => f64::from(array.as_primitive::<Int32Type>().value(row)),
        DataType::Int64 => array.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Float32 => f64::from(array.as_primitive::<Float32Type>().value(row)),
        DataType::Float64 => array.as_primitive::<Float64Type>().value(row),
        _ => return Err(unsupported(path, column, array)),
    };
    Ok(Some(v))
}

fn cell_at(array: &Arc<dyn Array>, row: usize) -> CellValue {
    if array.is_null(row) {
        return CellValue::Null;
    }
    match array.data_type() {
        DataType::Utf8 => CellValue::String(array.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(array.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(i64::from(array.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => CellValue::Integer(array.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => {
            CellValue::Float(f64::from(array.as_primitive::<Float32Type>().value(row)))
        }
        DataType::Float64 => CellValue::Float(array.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(array.as_boolean().value(row)),
        other => CellValue::String(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::io::Write;

    fn write_parquet(
        dir: &Path,
        name: &str,
        columns: Vec<(&str, ArrayRef)>,
    ) -> std::path::PathBuf {
        let schema = Arc::new(Schema::new(
            columns
                .iter()
                .map(|(n, a)| Field::new(*n, a.data_type().clone(), true))
                .collect::<Vec<_>>(),
        ));
        let batch =
            RecordBatch::try_new(schema.clone(), columns.into_iter().map(|(_, a)| a).collect())
                .unwrap();
        let path = dir.join(name);
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    fn write_file(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn source_tag_follows_file_name() {
        assert_eq!(source_tag(Path::new("data/Senior_Management.csv")), "Senior management");
        assert_eq!(source_tag(Path::new("innovation.csv")), "Innovation");
        assert_eq!(source_tag(Path::new("Employment.csv")), "Employment");
    }

    #[test]
    fn csv_rows_are_typed_and_tagged() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "Employment.csv",
            "Country,Year,Topic,Indicator,Value,Unit\n\
             France,2015,Employment,Gender wage gap,12.5,%\n\
             France,2016.0,Employment,Gender wage gap,,%\n\
             ,,Employment,Gender wage gap,NaN,\n",
        );

        let ds = load_file(&path).unwrap();

        assert_eq!(ds.len(), 3);
        let first = &ds.records()[0];
        assert_eq!(first.source, "Employment");
        assert_eq!(first.year, Some(2015));
        assert_eq!(first.value, Some(12.5));
        assert_eq!(first.extra.get("Unit"), Some(&CellValue::String("%".into())));
        assert_eq!(ds.records()[1].year, Some(2016));
        assert_eq!(ds.records()[1].value, None);
        assert_eq!(ds.records()[2].country, None);
        assert_eq!(ds.records()[2].year, None);
        assert_eq!(ds.records()[2].value, None);
        assert_eq!(ds.records()[2].extra.get("Unit"), Some(&CellValue::Null));
    }

    #[test]
    fn non_numeric_value_is_rejected_with_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "Employment.csv",
            "Country,Year,Topic,Indicator,Value\nFrance,2015,Employment,Wage gap,high\n",
        );

        let err = load_file(&path).unwrap_err();
        match err {
            DataError::InvalidNumber { row, column, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Value");
                assert_eq!(value, "high");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("Employment.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("Employment.xlsx")).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn sources_concatenate_in_list_order_with_column_union() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "Employment.csv",
            "Country,Year,Topic,Indicator,Value\nFrance,2015,Employment,Wage gap,10\n",
        );
        write_file(
            dir.path(),
            "innovation.csv",
            "Country,Year,Topic,Indicator,Technology or Sector,Value\n\
             Spain,2016,Innovation,Female inventors,Solar,20\n",
        );

        let sources = vec![
            SourceSpec::new("Employment.csv", "Employment"),
            SourceSpec::new("innovation.csv", "Innovation"),
        ];
        let ds = load_sources(dir.path(), &sources).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].source, "Employment");
        assert_eq!(ds.records()[0].technology_or_sector, None);
        assert_eq!(ds.records()[1].source, "Innovation");
        assert_eq!(ds.records()[1].technology_or_sector.as_deref(), Some("Solar"));
        assert!(ds.column_names().iter().any(|c| c == "Technology or Sector"));
    }

    #[test]
    fn parquet_rows_are_typed_and_tagged() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_parquet(
            dir.path(),
            "Senior_Management.parquet",
            vec![
                ("Country", Arc::new(StringArray::from(vec![Some("France"), None])) as ArrayRef),
                ("Year", Arc::new(Int64Array::from(vec![Some(2016), Some(2017)]))),
                (
                    "Topic",
                    Arc::new(StringArray::from(vec!["Senior Management", "Senior Management"])),
                ),
                (
                    "Indicator",
                    Arc::new(StringArray::from(vec![
                        "Share of female senior managers",
                        "Share of female senior managers",
                    ])),
                ),
                (
                    "Indicator Categories",
                    Arc::new(StringArray::from(vec![Some("Women"), Some("NA")])),
                ),
                ("Value", Arc::new(Float64Array::from(vec![Some(30.0), None]))),
                ("Verified", Arc::new(BooleanArray::from(vec![Some(true), None]))),
            ],
        );

        let ds = load_file(&path).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names().len(), 7);
        let first = &ds.records()[0];
        assert_eq!(first.source, "Senior management");
        assert_eq!(first.country.as_deref(), Some("France"));
        assert_eq!(first.year, Some(2016));
        assert_eq!(first.indicator_category.as_deref(), Some("Women"));
        assert_eq!(first.value, Some(30.0));
        assert_eq!(first.extra.get("Verified"), Some(&CellValue::Bool(true)));

        let second = &ds.records()[1];
        assert_eq!(second.country, None);
        assert_eq!(second.year, Some(2017));
        assert_eq!(second.indicator_category, None);
        assert_eq!(second.value, None);
        assert_eq!(second.extra.get("Verified"), Some(&CellValue::Null));
    }

    #[test]
    fn parquet_accepts_pq_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_parquet(
            dir.path(),
            "innovation.pq",
            vec![
                ("Country", Arc::new(StringArray::from(vec!["Spain"])) as ArrayRef),
                ("Year", Arc::new(Int64Array::from(vec![2020]))),
                ("Value", Arc::new(Int64Array::from(vec![12]))),
            ],
        );

        let ds = load_file(&path).unwrap();

        assert_eq!(ds.records()[0].source, "Innovation");
        assert_eq!(ds.records()[0].value, Some(12.0));
    }

    #[test]
    fn parquet_key_column_with_wrong_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_parquet(
            dir.path(),
            "Employment.parquet",
            vec![
                ("Country", Arc::new(BooleanArray::from(vec![true])) as ArrayRef),
                ("Value", Arc::new(Float64Array::from(vec![1.0]))),
            ],
        );

        match load_file(&path).unwrap_err() {
            DataError::UnsupportedColumn { column, data_type, .. } => {
                assert_eq!(column, "Country");
                assert_eq!(data_type, "Boolean");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parquet_fractional_year_reports_one_based_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_parquet(
            dir.path(),
            "Employment.parquet",
            vec![("Year", Arc::new(Float64Array::from(vec![2015.0, 2015.5])) as ArrayRef)],
        );

        match load_file(&path).unwrap_err() {
            DataError::InvalidNumber { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Year");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
