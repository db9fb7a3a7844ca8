use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use calamine::{Data, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Extensions offered in the open dialog, grouped by label.
pub const FILE_FILTERS: &[(&str, &[&str])] = &[
    (
        "Table files",
        &["csv", "tsv", "tab", "xlsx", "xlsm", "xlsb", "xls", "ods", "parquet", "pq", "json"],
    ),
    ("Spreadsheets", &["xlsx", "xlsm", "xlsb", "xls", "ods"]),
    ("Delimited text", &["csv", "tsv", "tab"]),
    ("Parquet", &["parquet", "pq"]),
    ("JSON", &["json"]),
];

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` / `.tab` – header row followed by records
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet only,
///   first row is the header
/// * `.parquet` – flat numeric / string / boolean columns
/// * `.json`    – `[{ "col": value, ... }, ...]`
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_delimited(path, b','),
        "tsv" | "tab" => load_delimited(path, b'\t'),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context("opening delimited file")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        bail!("file has no header row");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }

    Ok(Table::from_rows(headers, rows))
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Only the first worksheet is read.
fn load_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .context("worksheet is empty")?
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => format!("Unnamed: {i}"),
            other => other.to_string().trim().to_string(),
        })
        .collect();

    let body = rows
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();

    Ok(Table::from_rows(header, body))
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::from_text(s),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::Empty | Data::Error(_) => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "time": 0.0, "voltage": 1.25 },
///   { "time": 0.1, "voltage": null },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut header: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !header.contains(key) {
                header.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            header
                .iter()
                .map(|key| obj.get(key).map_or(CellValue::Missing, json_to_cell))
                .collect()
        })
        .collect();

    Ok(Table::from_rows(header, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Number(n) => n.as_f64().map_or(CellValue::Missing, CellValue::Number),
        JsonValue::String(s) => CellValue::from_text(s),
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns.
///
/// Numeric, string and boolean columns are read; nested or other types are
/// kept as text so the column still shows up, but yields no values.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<(String, Vec<CellValue>)> = schema
        .fields()
        .iter()
        .map(|f| (f.name().clone(), Vec::new()))
        .collect();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, (_, cells)) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            cells.extend((0..batch.num_rows()).map(|row| extract_cell(array, row)));
        }
    }

    Ok(Table::from_columns(columns))
}

// -- Arrow helpers --

fn downcast<T: 'static>(col: &Arc<dyn Array>) -> Option<&T> {
    col.as_any().downcast_ref::<T>()
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Missing;
    }
    let cell = match col.data_type() {
        DataType::Float64 => downcast::<Float64Array>(col).map(|a| CellValue::Number(a.value(row))),
        DataType::Float32 => {
            downcast::<Float32Array>(col).map(|a| CellValue::Number(a.value(row) as f64))
        }
        DataType::Int64 => {
            downcast::<Int64Array>(col).map(|a| CellValue::Number(a.value(row) as f64))
        }
        DataType::Int32 => {
            downcast::<Int32Array>(col).map(|a| CellValue::Number(a.value(row) as f64))
        }
        DataType::Boolean => downcast::<BooleanArray>(col).map(|a| CellValue::Bool(a.value(row))),
        DataType::Utf8 => downcast::<StringArray>(col).map(|a| CellValue::from_text(a.value(row))),
        DataType::LargeUtf8 => {
            downcast::<LargeStringArray>(col).map(|a| CellValue::from_text(a.value(row)))
        }
        other => Some(CellValue::Text(format!("{other:?}"))),
    };
    cell.unwrap_or(CellValue::Missing)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn csv_with_gaps_is_cleaned_per_column() {
        let file = write_temp(".csv", "time,volts,label\n0,1.5,a\n1,,b\n2,2.5,\n3,NA,c\n");
        let table = load_file(file.path()).unwrap();

        assert_eq!(table.column_names, vec!["time", "volts", "label"]);
        assert_eq!(table.len(), 4);
        assert_eq!(table.numeric_column("volts").unwrap().values(), &[1.5, 2.5]);
        assert!(table.numeric_column("label").unwrap().is_empty());
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let file = write_temp(".tsv", "a\tb\n1\t10\n2\t20\n");
        let table = load_file(file.path()).unwrap();
        assert_eq!(table.numeric_column("b").unwrap().values(), &[10.0, 20.0]);
    }

    #[test]
    fn json_records_keep_first_seen_order() {
        let file = write_temp(
            ".json",
            r#"[{"z": 1, "a": 2.5}, {"a": null, "m": "3"}, {"z": 4}]"#,
        );
        let table = load_file(file.path()).unwrap();

        assert_eq!(table.column_names, vec!["z", "a", "m"]);
        assert_eq!(table.numeric_column("z").unwrap().values(), &[1.0, 4.0]);
        assert_eq!(table.numeric_column("a").unwrap().values(), &[2.5]);
        assert_eq!(table.numeric_column("m").unwrap().values(), &[3.0]);
    }

    #[test]
    fn json_rejects_non_array_root() {
        let file = write_temp(".json", r#"{"a": [1, 2]}"#);
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("top-level JSON array"));
    }

    #[test]
    fn parquet_flat_columns_with_nulls() {
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let schema = Arc::new(Schema::new(vec![
            Field::new("signal", DataType::Float64, true),
            Field::new("count", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![Some(1.0), None, Some(f64::NAN), Some(4.0)])),
                Arc::new(Int64Array::from(vec![1, 2, 3, 4])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.column_names, vec!["signal", "count"]);
        assert_eq!(table.numeric_column("signal").unwrap().values(), &[1.0, 4.0]);
        assert_eq!(table.numeric_column("count").unwrap().len(), 4);
    }

    #[test]
    fn unsupported_extension_fails() {
        let file = write_temp(".txt", "a,b\n1,2\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension: .txt"));
    }

    #[test]
    fn missing_workbook_reports_context() {
        let err = load_file(Path::new("/definitely/not/here.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("opening workbook"));
    }
}
