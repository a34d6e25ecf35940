use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord, Outcome};

// ---------------------------------------------------------------------------
// Column names of the source table
// ---------------------------------------------------------------------------

pub const COL_SITE: &str = "Launch Site";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_CLASS: &str = "class";

const REQUIRED_COLUMNS: [&str; 5] = [
    COL_SITE,
    COL_PAYLOAD,
    COL_BOOSTER_VERSION,
    COL_BOOSTER_CATEGORY,
    COL_CLASS,
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Anything that prevents the launch table from loading. All of these are
/// fatal at startup.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("required column '{0}' is missing")]
    MissingColumn(String),
    #[error("CSV header: {0}")]
    CsvHeader(#[source] csv::Error),
    /// `row` counts data rows from 1; the header is not a row.
    #[error("row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("row {row}: column '{column}' is null")]
    NullValue { row: usize, column: &'static str },
    #[error("row {row}: class must be 0 or 1, got {value}")]
    InvalidClass { row: usize, value: f64 },
    #[error("row {row}: payload mass must be a finite number, got {value}")]
    InvalidPayload { row: usize, value: f64 },
    #[error("dataset contains no launch records")]
    Empty,
}

pub type Result<T> = std::result::Result<T, DatasetError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; extra columns are ignored
/// * `.json`    – `[{ "Launch Site": "...", "Payload Mass (kg)": 0.0, ... }, ...]`
/// * `.parquet` – one column per field, any integer/float type for numbers
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let open = || {
        File::open(path).map_err(|source| DatasetError::Open {
            path: path.display().to_string(),
            source,
        })
    };

    let records = match ext.as_str() {
        "csv" => read_csv(open()?)?,
        "json" => read_json(BufReader::new(open()?))?,
        "parquet" | "pq" => read_parquet(open()?)?,
        other => return Err(DatasetError::UnsupportedExtension(other.to_string())),
    };

    LaunchDataset::from_records(records).ok_or(DatasetError::Empty)
}

// ---------------------------------------------------------------------------
// Row shape shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawLaunchRow {
    #[serde(rename = "Launch Site")]
    site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version")]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
    #[serde(rename = "class")]
    class: f64,
}

impl RawLaunchRow {
    fn into_record(self, row: usize) -> Result<LaunchRecord> {
        build_record(
            row,
            self.site,
            self.payload_mass_kg,
            self.booster_version,
            self.booster_version_category,
            self.class,
        )
    }
}

fn build_record(
    row: usize,
    site: String,
    payload_mass_kg: f64,
    booster_version: String,
    booster_version_category: String,
    class: f64,
) -> Result<LaunchRecord> {
    if !payload_mass_kg.is_finite() {
        return Err(DatasetError::InvalidPayload {
            row,
            value: payload_mass_kg,
        });
    }
    let outcome =
        Outcome::from_class(class).ok_or(DatasetError::InvalidClass { row, value: class })?;
    Ok(LaunchRecord {
        site,
        payload_mass_kg,
        booster_version,
        booster_version_category,
        outcome,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; the five launch columns are
/// looked up by name, everything else (flight number, date, orbit, ...) is
/// skipped.
pub fn read_csv<R: std::io::Read>(input: R) -> Result<Vec<LaunchRecord>> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader
        .headers()
        .map_err(DatasetError::CsvHeader)?
        .clone();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(DatasetError::MissingColumn(required.to_string()));
        }
    }

    reader
        .deserialize::<RawLaunchRow>()
        .enumerate()
        .map(|(i, result)| {
            let row = i + 1;
            result
                .map_err(|source| DatasetError::Csv { row, source })?
                .into_record(row)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 0.0,
///     "Booster Version": "F9 v1.0  B0003",
///     "Booster Version Category": "v1.0",
///     "class": 0
///   },
///   ...
/// ]
/// ```
pub fn read_json<R: std::io::Read>(input: R) -> Result<Vec<LaunchRecord>> {
    let rows: Vec<RawLaunchRow> = serde_json::from_reader(input)?;
    rows.into_iter()
        .enumerate()
        .map(|(i, raw)| raw.into_record(i + 1))
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); numeric columns are cast so int and
/// float payloads both load. `class` is read as Float64 so a float column
/// holding 0.5 is rejected instead of truncated to 0.
pub fn read_parquet(file: File) -> Result<Vec<LaunchRecord>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        let offset = records.len();

        let sites = column_as(&batch, COL_SITE, &DataType::Utf8)?;
        let payloads = column_as(&batch, COL_PAYLOAD, &DataType::Float64)?;
        let versions = column_as(&batch, COL_BOOSTER_VERSION, &DataType::Utf8)?;
        let categories = column_as(&batch, COL_BOOSTER_CATEGORY, &DataType::Utf8)?;
        let classes = column_as(&batch, COL_CLASS, &DataType::Float64)?;

        let sites = sites.as_string::<i32>();
        let payloads = payloads.as_primitive::<Float64Type>();
        let versions = versions.as_string::<i32>();
        let categories = categories.as_string::<i32>();
        let classes = classes.as_primitive::<Float64Type>();

        for i in 0..batch.num_rows() {
            let row = offset + i + 1;
            let null_check = |col: &dyn Array, column: &'static str| {
                if col.is_null(i) {
                    Err(DatasetError::NullValue { row, column })
                } else {
                    Ok(())
                }
            };
            null_check(sites, COL_SITE)?;
            null_check(payloads, COL_PAYLOAD)?;
            null_check(versions, COL_BOOSTER_VERSION)?;
            null_check(categories, COL_BOOSTER_CATEGORY)?;
            null_check(classes, COL_CLASS)?;

            records.push(build_record(
                row,
                sites.value(i).to_string(),
                payloads.value(i),
                versions.value(i).to_string(),
                categories.value(i).to_string(),
                classes.value(i),
            )?);
        }
    }
    Ok(records)
}

/// Look up a column by name and cast it to the type the record needs.
fn column_as(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))?;
    Ok(cast(col, to)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int32Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const CSV: &str = "\
Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
2,CCAFS LC-40,0,0.0,F9 v1.0  B0004,v1.0
3,VAFB SLC-4E,0,500.0,F9 v1.1  B1003,v1.1
4,KSC LC-39A,1,2490.0,F9 FT B1031.1,FT
";

    fn write_temp(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(contents).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn csv_loads_named_columns_and_ignores_extras() {
        let f = write_temp(".csv", CSV.as_bytes());
        let ds = load_file(f.path()).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.sites(), ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A"]);
        let last = &ds.records()[3];
        assert_eq!(last.booster_version, "F9 FT B1031.1");
        assert_eq!(last.booster_version_category, "FT");
        assert_eq!(last.outcome, Outcome::Success);
        assert_eq!(ds.payload_bounds().high(), 2490.0);
    }

    #[test]
    fn csv_missing_column_is_fatal() {
        let input = "Launch Site,Payload Mass (kg),Booster Version,class\nKSC,1.0,F9,1\n";
        let err = read_csv(input.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(c) if c == COL_BOOSTER_CATEGORY));
    }

    #[test]
    fn csv_rejects_unparseable_rows() {
        let input = format!("{CSV}5,KSC LC-39A,1,heavy,F9 B5,B5\n");
        assert!(matches!(
            read_csv(input.as_bytes()),
            Err(DatasetError::Csv { row: 5, .. })
        ));
    }

    #[test]
    fn non_binary_class_is_rejected() {
        let input = format!("{CSV}5,KSC LC-39A,2,100.0,F9 B5,B5\n");
        assert!(matches!(
            read_csv(input.as_bytes()),
            Err(DatasetError::InvalidClass { row: 5, value }) if value == 2.0
        ));
    }

    #[test]
    fn fractional_class_is_rejected_not_truncated() {
        let input = format!("{CSV}5,KSC LC-39A,0.5,100.0,F9 B5,B5\n");
        assert!(matches!(
            read_csv(input.as_bytes()),
            Err(DatasetError::InvalidClass { row: 5, value }) if value == 0.5
        ));
    }

    #[test]
    fn unreadable_header_is_not_a_row_error() {
        let input: &[u8] = b"Launch Site,\xff\xfe\n";
        assert!(matches!(read_csv(input), Err(DatasetError::CsvHeader(_))));
    }

    #[test]
    fn header_only_file_is_empty_error() {
        let f = write_temp(
            ".csv",
            b"Launch Site,Payload Mass (kg),Booster Version,Booster Version Category,class\n",
        );
        assert!(matches!(load_file(f.path()), Err(DatasetError::Empty)));
    }

    #[test]
    fn missing_file_and_unknown_extension_fail() {
        assert!(matches!(
            load_file(Path::new("/nonexistent/launches.csv")),
            Err(DatasetError::Open { .. })
        ));
        let f = write_temp(".xlsx", b"");
        assert!(matches!(
            load_file(f.path()),
            Err(DatasetError::UnsupportedExtension(e)) if e == "xlsx"
        ));
    }

    #[test]
    fn json_records_load() {
        let json = r#"[
            {"Launch Site": "KSC LC-39A", "Payload Mass (kg)": 5300, "Booster Version": "F9 FT B1032.1",
             "Booster Version Category": "FT", "class": 1, "Orbit": "GTO"},
            {"Launch Site": "VAFB SLC-4E", "Payload Mass (kg)": 9600.0, "Booster Version": "F9 B4 B1041.1",
             "Booster Version Category": "B4", "class": 0}
        ]"#;
        let f = write_temp(".json", json.as_bytes());
        let ds = load_file(f.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].payload_mass_kg, 5300.0);
        assert_eq!(ds.records()[1].outcome, Outcome::Failure);
    }

    #[test]
    fn json_missing_field_is_fatal() {
        let json = r#"[{"Launch Site": "KSC", "Payload Mass (kg)": 1.0, "class": 1}]"#;
        assert!(matches!(read_json(json.as_bytes()), Err(DatasetError::Json(_))));
    }

    fn write_parquet(class: ArrayRef, class_type: DataType) -> tempfile::NamedTempFile {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_SITE, DataType::Utf8, false),
            Field::new(COL_PAYLOAD, DataType::Float64, false),
            Field::new(COL_BOOSTER_VERSION, DataType::Utf8, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
            Field::new(COL_CLASS, class_type, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["CCAFS SLC-40", "KSC LC-39A"])) as ArrayRef,
                Arc::new(Float64Array::from(vec![3600.0, 2205.0])),
                Arc::new(StringArray::from(vec!["F9 B5 B1046.2", "F9 FT B1035.1"])),
                Arc::new(StringArray::from(vec!["B5", "FT"])),
                class,
            ],
        )
        .unwrap();

        let f = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer =
            ArrowWriter::try_new(f.as_file().try_clone().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        f
    }

    #[test]
    fn parquet_float_class_must_be_exactly_binary() {
        let f = write_parquet(Arc::new(Float64Array::from(vec![1.0, 0.5])), DataType::Float64);
        assert!(matches!(
            load_file(f.path()),
            Err(DatasetError::InvalidClass { row: 2, value }) if value == 0.5
        ));

        let f = write_parquet(Arc::new(Float64Array::from(vec![1.0, 0.0])), DataType::Float64);
        let ds = load_file(f.path()).unwrap();
        assert_eq!(ds.records()[1].outcome, Outcome::Failure);
    }

    #[test]
    fn parquet_loads_with_integer_class_column() {
        let f = write_parquet(Arc::new(Int32Array::from(vec![1, 0])), DataType::Int32);

        let ds = load_file(f.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.sites(), ["CCAFS SLC-40", "KSC LC-39A"]);
        assert_eq!(ds.records()[0].outcome, Outcome::Success);
        assert_eq!(ds.records()[1].payload_mass_kg, 2205.0);
        assert_eq!(ds.payload_bounds().low(), 2205.0);
    }
}
