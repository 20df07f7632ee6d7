use std::collections::BTreeMap;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Diagnosis, Gender, Record, RecordStore};
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a cleaned medical dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the required columns
/// * `.json`    – `[{ "Age": 63, "Gender": 1, ... }, ...]`
/// * `.parquet` – one column per field, numeric or string typed
///
/// Gender and Result may be binary codes or their text labels; both are
/// normalised to codes here and never change afterwards.
pub fn load_file(path: &Path) -> Result<RecordStore> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let store = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string())),
    };
    log::debug!("{}: {} records, age span {:?}", path.display(), store.len(), store.age_span());
    Ok(store)
}

// ---------------------------------------------------------------------------
// Column resolution and row normalisation (shared by all formats)
// ---------------------------------------------------------------------------

const AGE: &str = "Age";
const GENDER: &str = "Gender";
const HEART_RATE: &str = "Heart rate";
const CK_MB: &str = "CK-MB";
const TROPONIN: &str = "Troponin";
const RESULT: &str = "Result";

/// Positions of the required columns plus the leftover ones.
#[derive(Debug)]
struct ColumnIndex {
    age: usize,
    gender: usize,
    heart_rate: usize,
    ck_mb: usize,
    troponin: usize,
    result: usize,
    extra: Vec<(usize, String)>,
}

fn same_header(header: &str, wanted: &str) -> bool {
    header.trim().eq_ignore_ascii_case(wanted)
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self> {
        let find = |wanted: &'static str| {
            headers
                .iter()
                .position(|h| same_header(h, wanted))
                .ok_or(DataError::MissingColumn { column: wanted, row: None })
        };
        let required = [
            find(AGE)?,
            find(GENDER)?,
            find(HEART_RATE)?,
            find(CK_MB)?,
            find(TROPONIN)?,
            find(RESULT)?,
        ];
        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !required.contains(i))
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect();

        let [age, gender, heart_rate, ck_mb, troponin, result] = required;
        Ok(ColumnIndex {
            age,
            gender,
            heart_rate,
            ck_mb,
            troponin,
            result,
            extra,
        })
    }

    fn extra_names(&self) -> Vec<String> {
        self.extra.iter().map(|(_, name)| name.clone()).collect()
    }
}

/// Turn one row of loosely-typed cells into a [`Record`].
///
/// `cells[i]` is `None` when the row has no value at all for column `i`
/// (a short CSV line, an absent JSON key).
fn normalize_row(row: usize, cells: &[Option<CellValue>], idx: &ColumnIndex) -> Result<Record> {
    let cell = |pos: usize, column: &'static str| {
        cells
            .get(pos)
            .and_then(Option::as_ref)
            .ok_or(DataError::MissingColumn { column, row: Some(row) })
    };

    let extra = idx
        .extra
        .iter()
        .filter_map(|(pos, name)| {
            let value = cells.get(*pos)?.clone()?;
            Some((name.clone(), value))
        })
        .collect::<BTreeMap<_, _>>();

    Ok(Record {
        age: parse_age(row, cell(idx.age, AGE)?)?,
        gender: parse_category(row, GENDER, cell(idx.gender, GENDER)?, Gender::from_code, Gender::from_label)?,
        heart_rate: parse_number(row, HEART_RATE, cell(idx.heart_rate, HEART_RATE)?)?,
        ck_mb: parse_number(row, CK_MB, cell(idx.ck_mb, CK_MB)?)?,
        troponin: parse_number(row, TROPONIN, cell(idx.troponin, TROPONIN)?)?,
        result: parse_category(row, RESULT, cell(idx.result, RESULT)?, Diagnosis::from_code, Diagnosis::from_label)?,
        extra,
    })
}

fn invalid(row: usize, column: &'static str, value: &CellValue) -> DataError {
    DataError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    }
}

fn parse_number(row: usize, column: &'static str, value: &CellValue) -> Result<f64> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(row, column, value))
}

/// Ages are whole, non-negative years. `64.0` is accepted, `64.5` is not.
fn parse_age(row: usize, value: &CellValue) -> Result<u32> {
    parse_number(row, AGE, value)
        .ok()
        .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32)
        .ok_or_else(|| invalid(row, AGE, value))
}

/// Map a categorical cell through its code table or its label table.
///
/// Anything that is neither a known code nor a known label is rejected
/// rather than turned into a missing value.
fn parse_category<T>(
    row: usize,
    column: &'static str,
    value: &CellValue,
    from_code: fn(i64) -> Option<T>,
    from_label: fn(&str) -> Option<T>,
) -> Result<T> {
    let unknown = || DataError::UnknownCategory {
        row,
        column,
        value: value.to_string(),
    };
    match value {
        CellValue::Integer(i) => from_code(*i).ok_or_else(unknown),
        CellValue::Float(f) if f.fract() == 0.0 => from_code(*f as i64).ok_or_else(unknown),
        CellValue::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(code) => from_code(code),
                Err(_) => from_label(s),
            }
            .ok_or_else(unknown)
        }
        CellValue::Null => Err(invalid(row, column, value)),
        _ => Err(unknown()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Columns other than the required six are kept as extras.
fn load_csv(path: &Path) -> Result<RecordStore> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let idx = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let line = result?;
        let cells: Vec<Option<CellValue>> = (0..headers.len())
            .map(|i| line.get(i).map(guess_cell_type))
            .collect();
        records.push(normalize_row(row_no, &cells, &idx)?);
    }

    Ok(RecordStore::from_records(records, idx.extra_names()))
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
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

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Age": 64, "Gender": 1, "Heart rate": 66, "CK-MB": 1.8, "Troponin": 0.012, "Result": "Normal" },
///   ...
/// ]
/// ```
///
/// The column set is taken from the first object.
fn load_json(path: &Path) -> Result<RecordStore> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = root.as_array().ok_or("Expected top-level JSON array")?;

    let headers: Vec<String> = match rows.first() {
        Some(first) => first
            .as_object()
            .ok_or("Row 0 is not a JSON object")?
            .keys()
            .cloned()
            .collect(),
        None => return Ok(RecordStore::default()),
    };
    let idx = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| format!("Row {row_no} is not a JSON object"))?;
        let cells: Vec<Option<CellValue>> = headers
            .iter()
            .map(|h| obj.get(h).map(json_to_cell))
            .collect();
        records.push(normalize_row(row_no, &cells, &idx)?);
    }

    Ok(RecordStore::from_records(records, idx.extra_names()))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); Gender/Result may be integer or
/// string columns.
fn load_parquet(path: &Path) -> Result<RecordStore> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let idx = ColumnIndex::resolve(&headers)?;

    let reader = builder.build()?;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let columns = batch.columns();

        for row in 0..batch.num_rows() {
            let cells = columns
                .iter()
                .map(|col| extract_cell(col, row).map(Some))
                .collect::<Result<Vec<_>>>()?;
            records.push(normalize_row(records.len(), &cells, &idx)?);
        }
    }

    Ok(RecordStore::from_records(records, idx.extra_names()))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        // Anything exotic (dictionary strings, decimals, dates) goes through
        // arrow's display and is re-parsed like a CSV cell.
        _ => guess_cell_type(&array_value_to_string(col, row)?),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field as ArrowField, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    const HEADER: &str = "Age,Gender,Heart rate,Systolic blood pressure,CK-MB,Troponin,Result";

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn csv_with_rows(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    #[test]
    fn test_load_csv_with_text_result() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            &csv_with_rows(&[
                "64,1,66,160,1.80,0.012,Normal",
                "21,1,94,98,6.75,1.060,Abnormal",
                "55,0,64,160,1.99,0.003,Normal",
            ]),
        );

        let store = load_file(&path).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.age_span(), Some((21, 64)));
        assert_eq!(store.extra_columns(), ["Systolic blood pressure".to_string()]);

        let r = &store.records()[1];
        assert_eq!(r.age, 21);
        assert_eq!(r.gender, Gender::Male);
        assert_eq!(r.heart_rate, 94.0);
        assert_eq!(r.ck_mb, 6.75);
        assert_eq!(r.troponin, 1.06);
        assert_eq!(r.result, Diagnosis::Abnormal);
        assert_eq!(r.extra.get("Systolic blood pressure"), Some(&CellValue::Integer(98)));
        assert_eq!(store.records()[2].gender, Gender::Female);
    }

    #[test]
    fn test_load_csv_numeric_codes_and_labels() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            &csv_with_rows(&["63.0,Male,70,120,2.1,0.01,1", "47,Female,80,130,1.5,0.02,0"]),
        );

        let store = load_file(&path).unwrap();
        let records = store.records();
        assert_eq!(records[0].age, 63);
        assert_eq!(records[0].gender, Gender::Male);
        assert_eq!(records[0].result, Diagnosis::Abnormal);
        assert_eq!(records[1].gender, Gender::Female);
        assert_eq!(records[1].result, Diagnosis::Normal);
    }

    #[test]
    fn test_headers_match_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            "age, gender ,HEART RATE,ck-mb,troponin,result\n40,0,72,1.0,0.01,Normal\n",
        );
        let store = load_file(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.extra_columns().is_empty());
    }

    #[rstest]
    #[case("50,1,70,120,2.0,0.01,Borderline", "Result", "Borderline")]
    #[case("50,1,70,120,2.0,0.01,2", "Result", "2")]
    #[case("50,2,70,120,2.0,0.01,Normal", "Gender", "2")]
    #[case("50,-1,70,120,2.0,0.01,Normal", "Gender", "-1")]
    fn test_unknown_category(#[case] row: &str, #[case] column: &str, #[case] expected: &str) {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.csv", &csv_with_rows(&[row]));

        let err = load_file(&path).unwrap_err();
        assert!(!err.is_load_error());
        match err {
            DataError::UnknownCategory { row, column: c, value } => {
                assert_eq!(row, 0);
                assert_eq!(c, column);
                assert_eq!(value, expected);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_gender_category() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.csv", &csv_with_rows(&["50,Other,70,120,2.0,0.01,Normal"]));
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, DataError::UnknownCategory { column: "Gender", .. }));
    }

    #[test]
    fn test_missing_required_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.csv", "Age,Gender,Heart rate,CK-MB,Result\n50,1,70,2.0,Normal\n");
        let err = load_file(&path).unwrap_err();
        assert!(err.is_load_error());
        assert!(matches!(err, DataError::MissingColumn { column: "Troponin", row: None }));
    }

    #[rstest]
    #[case("abc,1,70,120,2.0,0.01,Normal", "Age")]
    #[case("50.5,1,70,120,2.0,0.01,Normal", "Age")]
    #[case("-3,1,70,120,2.0,0.01,Normal", "Age")]
    #[case("50,1,fast,120,2.0,0.01,Normal", "Heart rate")]
    #[case("50,1,70,120,2.0,,Normal", "Troponin")]
    fn test_invalid_numeric_cell(#[case] row: &str, #[case] column: &str) {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.csv", &csv_with_rows(&[row]));
        match load_file(&path).unwrap_err() {
            DataError::InvalidValue { column: c, .. } => assert_eq!(c, column),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let dir = TempDir::new().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(err.is_load_error());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(ref ext) if ext == "xlsx"));
    }

    #[test]
    fn test_load_json_records() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.json",
            r#"[
                {"Age": 64, "Gender": 1, "Heart rate": 66, "CK-MB": 1.8, "Troponin": 0.012, "Result": "Normal", "Blood sugar": 160},
                {"Age": 70, "Gender": "Female", "Heart rate": 80.5, "CK-MB": 9.1, "Troponin": 0.5, "Result": 1, "Blood sugar": 98}
            ]"#,
        );

        let store = load_file(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.extra_columns(), ["Blood sugar".to_string()]);
        assert_eq!(store.records()[1].gender, Gender::Female);
        assert_eq!(store.records()[1].result, Diagnosis::Abnormal);
        assert_eq!(store.records()[1].heart_rate, 80.5);
    }

    #[test]
    fn test_json_extra_columns_keep_key_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.json",
            r#"[
                {"Age": 64, "Gender": 1, "Systolic blood pressure": 130, "Heart rate": 66, "CK-MB": 1.8,
                 "Troponin": 0.012, "Result": 0, "Blood sugar": 160, "Diastolic blood pressure": 82}
            ]"#,
        );

        let store = load_file(&path).unwrap();
        assert_eq!(
            store.extra_columns(),
            [
                "Systolic blood pressure".to_string(),
                "Blood sugar".to_string(),
                "Diastolic blood pressure".to_string(),
            ]
        );
    }

    #[test]
    fn test_json_row_missing_key() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.json",
            r#"[
                {"Age": 64, "Gender": 1, "Heart rate": 66, "CK-MB": 1.8, "Troponin": 0.012, "Result": 0},
                {"Age": 70, "Gender": 0, "Heart rate": 80, "CK-MB": 9.1, "Result": 1}
            ]"#,
        );
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { column: "Troponin", row: Some(1) }));
    }

    #[test]
    fn test_json_not_an_array() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.json", r#"{"Age": 64}"#);
        assert!(matches!(load_file(&path).unwrap_err(), DataError::Malformed(_)));
    }

    #[test]
    fn test_load_parquet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.parquet");

        let schema = Arc::new(Schema::new(vec![
            ArrowField::new("Age", DataType::Int64, false),
            ArrowField::new("Gender", DataType::Int64, false),
            ArrowField::new("Heart rate", DataType::Float64, false),
            ArrowField::new("CK-MB", DataType::Float64, false),
            ArrowField::new("Troponin", DataType::Float64, false),
            ArrowField::new("Result", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![45, 72])) as ArrayRef,
                Arc::new(Int64Array::from(vec![0, 1])) as ArrayRef,
                Arc::new(Float64Array::from(vec![75.0, 90.0])) as ArrayRef,
                Arc::new(Float64Array::from(vec![2.5, 11.0])) as ArrayRef,
                Arc::new(Float64Array::from(vec![0.01, 0.8])) as ArrayRef,
                Arc::new(StringArray::from(vec!["Normal", "Abnormal"])) as ArrayRef,
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let store = load_file(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.age_span(), Some((45, 72)));
        assert_eq!(store.records()[1].gender, Gender::Male);
        assert_eq!(store.records()[1].result, Diagnosis::Abnormal);
        assert_eq!(store.records()[1].troponin, 0.8);
    }
}
