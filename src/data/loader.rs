use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::aggregate::year_extent;
use super::model::{Record, TemperatureDataset};

const COUNTRY: &str = "Country";
const CONTINENT: &str = "Continent";
const YEAR: &str = "Year";
const VALUE: &str = "Value";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a temperature dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "Country": "...", "Continent": "...", "Year": "1990", "Value": 0.4 }, ...]`
/// * `.csv`     – header row with `Country,Continent,Year,Value`
/// * `.parquet` – columns with the same four names
///
/// Malformed rows are skipped and counted in [`TemperatureDataset::skipped`];
/// anything that prevents reading the file as a whole is an error.
pub fn load_file(path: &Path) -> Result<TemperatureDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} records ({} skipped) from {}",
        dataset.len(),
        dataset.skipped,
        path.display()
    );
    if dataset.is_empty() {
        log::warn!("{} contains no usable records", path.display());
    } else if let Some((first, last)) = year_extent(&dataset.records) {
        log::info!("Records span {first}–{last}");
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row-level errors and field coercion
// ---------------------------------------------------------------------------

/// Why a single row was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("row is not an object")]
    NotAnObject,
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' has unusable value '{raw}'")]
    Invalid { field: &'static str, raw: String },
    #[error("unreadable row: {0}")]
    Unreadable(String),
}

/// A cell as found in the source, before coercion.
#[derive(Debug, Clone, PartialEq)]
enum RawField {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawField {
    fn describe(&self) -> String {
        match self {
            RawField::Int(i) => i.to_string(),
            RawField::Float(f) => f.to_string(),
            RawField::Text(s) => s.clone(),
        }
    }
}

fn coerce_text(field: &'static str, raw: Option<RawField>) -> Result<String, RecordError> {
    let text = match raw.ok_or(RecordError::MissingField(field))? {
        RawField::Text(s) => s.trim().to_string(),
        other => other.describe(),
    };
    if text.is_empty() {
        return Err(RecordError::MissingField(field));
    }
    Ok(text)
}

/// Years arrive as integers, integral floats or strings such as `"1990"`.
fn coerce_year(raw: Option<RawField>) -> Result<i32, RecordError> {
    let raw = raw.ok_or(RecordError::MissingField(YEAR))?;
    let invalid = || RecordError::Invalid {
        field: YEAR,
        raw: raw.describe(),
    };
    let as_float = match &raw {
        RawField::Int(i) => return i32::try_from(*i).map_err(|_| invalid()),
        RawField::Float(f) => *f,
        RawField::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(RecordError::MissingField(YEAR));
            }
            if let Ok(i) = s.parse::<i32>() {
                return Ok(i);
            }
            s.parse::<f64>().map_err(|_| invalid())?
        }
    };
    if as_float.fract() != 0.0 || !as_float.is_finite() {
        return Err(invalid());
    }
    if as_float < i32::MIN as f64 || as_float > i32::MAX as f64 {
        return Err(invalid());
    }
    Ok(as_float as i32)
}

fn coerce_value(raw: Option<RawField>) -> Result<f64, RecordError> {
    let raw = raw.ok_or(RecordError::MissingField(VALUE))?;
    let value = match &raw {
        RawField::Int(i) => *i as f64,
        RawField::Float(f) => *f,
        RawField::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(RecordError::MissingField(VALUE));
            }
            s.parse::<f64>().map_err(|_| RecordError::Invalid {
                field: VALUE,
                raw: s.to_string(),
            })?
        }
    };
    if !value.is_finite() {
        return Err(RecordError::Invalid {
            field: VALUE,
            raw: raw.describe(),
        });
    }
    Ok(value)
}

fn build_record(
    country: Option<RawField>,
    continent: Option<RawField>,
    year: Option<RawField>,
    value: Option<RawField>,
) -> Result<Record, RecordError> {
    Ok(Record::new(
        coerce_text(COUNTRY, country)?,
        coerce_text(CONTINENT, continent)?,
        coerce_year(year)?,
        coerce_value(value)?,
    ))
}

/// Collects good rows and counts the rejected ones.
#[derive(Default)]
struct RowSink {
    records: Vec<Record>,
    skipped: usize,
}

impl RowSink {
    fn push(&mut self, row: usize, result: Result<Record, RecordError>) {
        match result {
            Ok(rec) => self.records.push(rec),
            Err(e) => {
                log::warn!("Skipping row {row}: {e}");
                self.skipped += 1;
            }
        }
    }

    fn finish(self) -> TemperatureDataset {
        TemperatureDataset::from_records(self.records, self.skipped)
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "Country": "Chile", "Continent": "South America", "Year": "1990", "Value": 0.31 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<TemperatureDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<TemperatureDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut sink = RowSink::default();
    for (i, row) in rows.iter().enumerate() {
        sink.push(i, json_row(row));
    }
    Ok(sink.finish())
}

fn json_row(row: &JsonValue) -> Result<Record, RecordError> {
    let obj = row.as_object().ok_or(RecordError::NotAnObject)?;
    let field = |name: &str| obj.get(name).and_then(json_to_raw);
    build_record(field(COUNTRY), field(CONTINENT), field(YEAR), field(VALUE))
}

fn json_to_raw(val: &JsonValue) -> Option<RawField> {
    match val {
        JsonValue::String(s) => Some(RawField::Text(s.clone())),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(RawField::Int(i))
            } else {
                n.as_f64().map(RawField::Float)
            }
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming at least `Country`, `Continent`, `Year`
/// and `Value`; extra columns are ignored. Short rows count as malformed.
fn load_csv(path: &Path) -> Result<TemperatureDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let country_idx = column(COUNTRY)?;
    let continent_idx = column(CONTINENT)?;
    let year_idx = column(YEAR)?;
    let value_idx = column(VALUE)?;

    let mut sink = RowSink::default();
    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                return Err(e).with_context(|| format!("CSV row {row_no}"));
            }
            Err(e) => {
                sink.push(row_no, Err(RecordError::Unreadable(e.to_string())));
                continue;
            }
        };
        let field = |idx: usize| record.get(idx).map(|s| RawField::Text(s.to_string()));
        sink.push(
            row_no,
            build_record(
                field(country_idx),
                field(continent_idx),
                field(year_idx),
                field(value_idx),
            ),
        );
    }
    Ok(sink.finish())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of temperature records.
///
/// Expected schema:
/// - `Country`, `Continent`: Utf8 or LargeUtf8
/// - `Year`: Int32, Int64, Float64 or Utf8
/// - `Value`: Float64, Float32, Int64 or Utf8
///
/// Other columns are ignored.
fn load_parquet(path: &Path) -> Result<TemperatureDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut sink = RowSink::default();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &str| -> Result<ArrayRef> {
            let idx = schema
                .index_of(name)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
            Ok(batch.column(idx).clone())
        };
        let country = column(COUNTRY)?;
        let continent = column(CONTINENT)?;
        let year = column(YEAR)?;
        let value = column(VALUE)?;

        for row in 0..batch.num_rows() {
            sink.push(
                row_offset + row,
                build_record(
                    arrow_to_raw(&country, row),
                    arrow_to_raw(&continent, row),
                    arrow_to_raw(&year, row),
                    arrow_to_raw(&value, row),
                ),
            );
        }
        row_offset += batch.num_rows();
    }

    Ok(sink.finish())
}

/// Extract a single cell from an Arrow column; nulls and unsupported
/// types read as absent.
fn arrow_to_raw(col: &ArrayRef, row: usize) -> Option<RawField> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => Some(RawField::Text(col.as_string::<i32>().value(row).to_string())),
        DataType::LargeUtf8 => Some(RawField::Text(col.as_string::<i64>().value(row).to_string())),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| RawField::Int(a.value(row) as i64)),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| RawField::Int(a.value(row))),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| RawField::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| RawField::Float(a.value(row))),
        other => {
            log::debug!("Unsupported parquet column type {other:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::StringArray;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn json_coerces_string_years_and_numbers() {
        let ds = parse_json(
            r#"[
                {"Country": "Chile", "Continent": "South America", "Year": "1990", "Value": 0.31},
                {"Country": "Peru", "Continent": "South America", "Year": 1991, "Value": "-0.2"},
                {"Country": "Chad", "Continent": "Africa", "Year": 1992.0, "Value": 1}
            ]"#,
        )
        .unwrap();

        assert_eq!(ds.skipped, 0);
        assert_eq!(
            ds.records,
            vec![
                Record::new("Chile", "South America", 1990, 0.31),
                Record::new("Peru", "South America", 1991, -0.2),
                Record::new("Chad", "Africa", 1992, 1.0),
            ]
        );
    }

    #[test]
    fn json_skips_malformed_rows() {
        let ds = parse_json(
            r#"[
                {"Country": "Chile", "Continent": "South America", "Year": "1990", "Value": 0.31},
                {"Country": "Peru", "Continent": "South America", "Value": 0.1},
                {"Country": "Chad", "Continent": "Africa", "Year": "soon", "Value": 0.1},
                {"Country": "Mali", "Continent": "Africa", "Year": 1990, "Value": null},
                42
            ]"#,
        )
        .unwrap();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.skipped, 4);
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(parse_json(r#"{"Country": "Chile"}"#).is_err());
        assert!(parse_json("not json").is_err());
    }

    #[test]
    fn row_errors_name_the_field() {
        assert_eq!(
            json_row(&serde_json::json!({"Country": "A", "Continent": "B", "Year": 1990})),
            Err(RecordError::MissingField(VALUE))
        );
        assert_eq!(
            json_row(&serde_json::json!({"Country": "A", "Continent": "B", "Year": 1990.5, "Value": 1})),
            Err(RecordError::Invalid { field: YEAR, raw: "1990.5".into() })
        );
        assert_eq!(json_row(&serde_json::json!([1, 2])), Err(RecordError::NotAnObject));
    }

    #[test]
    fn loads_json_and_csv_files() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("temps.json");
        std::fs::write(
            &json_path,
            r#"[{"Country": "Chile", "Continent": "South America", "Year": "2000", "Value": 0.5}]"#,
        )
        .unwrap();
        assert_eq!(load_file(&json_path).unwrap().len(), 1);

        let csv_path = dir.path().join("temps.csv");
        std::fs::write(
            &csv_path,
            "Country,Continent,Year,Value,Unit\n\
             Chile,South America,2000,0.5,C\n\
             Peru,South America,2000\n\
             Kenya,Africa,2001,-0.25,C\n",
        )
        .unwrap();
        let ds = load_file(&csv_path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.skipped, 1);
        assert_eq!(ds.records[1], Record::new("Kenya", "Africa", 2001, -0.25));
    }

    #[test]
    fn csv_row_with_invalid_utf8_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temps.csv");
        std::fs::write(
            &path,
            b"Country,Continent,Year,Value\n\
              Chile,South America,2000,0.5\n\
              Per\xff,South America,2000,0.1\n\
              Kenya,Africa,2001,0.2\n",
        )
        .unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.skipped, 1);
        assert_eq!(ds.records[1], Record::new("Kenya", "Africa", 2001, 0.2));
    }

    #[test]
    fn csv_without_required_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temps.csv");
        std::fs::write(&path, "Country,Year,Value\nChile,2000,0.5\n").unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Continent"));
    }

    #[test]
    fn loads_parquet_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temps.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new(COUNTRY, DataType::Utf8, false),
            Field::new(CONTINENT, DataType::Utf8, false),
            Field::new(YEAR, DataType::Int64, false),
            Field::new(VALUE, DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Chile", "Kenya"])),
                Arc::new(StringArray::from(vec!["South America", "Africa"])),
                Arc::new(Int64Array::from(vec![2000, 2001])),
                Arc::new(Float64Array::from(vec![Some(0.5), None])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records, vec![Record::new("Chile", "South America", 2000, 0.5)]);
        assert_eq!(ds.skipped, 1);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(load_file(Path::new("temps.xlsx")).is_err());
    }
}
