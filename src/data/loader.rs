use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{
    CellValue, ListingRecord, NormalizedDataset, LATITUDE_COLUMN, LONGITUDE_COLUMN,
    PRICE_COLUMN, ROOM_TYPE_COLUMN, SHORT_LONGITUDE_COLUMN,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can stop a dataset from loading. All of these are fatal at
/// startup; a failed reload keeps the previous dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not tabular data: {0}")]
    NotTabular(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("dataset contains no rows")]
    EmptyDataset,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listings dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row followed by one listing per line
/// * `.json` – `[{ "price": "$120", "room type": "Private room", ... }, ...]`
pub fn load_file(path: &Path) -> Result<NormalizedDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let open = || {
        File::open(path)
            .map(BufReader::new)
            .map_err(|source| LoadError::Open {
                path: path.to_path_buf(),
                source,
            })
    };

    let dataset = match ext.as_str() {
        "csv" => load_csv_reader(open()?)?,
        "json" => load_json_reader(open()?)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} listings from {} (room types: {}, geo: {})",
        dataset.len(),
        path.display(),
        dataset.capabilities.has_room_type,
        dataset.capabilities.has_geo
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Price cleaning
// ---------------------------------------------------------------------------

/// Parse a price cell: drop every `$` and `,`, then read a float.
/// Returns `None` for anything that is not a finite, non-negative number.
pub fn try_parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    let value: f64 = cleaned.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Price normalization policy: unreadable prices become `0`.
///
/// `"$1,234.50"` → 1234.5 | `""` → 0 | `"N/A"` → 0
pub fn parse_price(text: &str) -> f64 {
    try_parse_price(text).unwrap_or(0.0)
}

fn price_from_cell(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Text(s) => parse_price(s),
        CellValue::Integer(i) if *i >= 0 => *i as f64,
        CellValue::Float(f) if f.is_finite() && *f >= 0.0 => *f,
        _ => 0.0,
    }
}

fn coordinate_from_cell(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        other => other.as_f64(),
    }
}

fn room_type_from_cell(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Null => None,
        CellValue::Text(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Column reconciliation / row normalization (shared by all formats)
// ---------------------------------------------------------------------------

/// Expose the short longitude column under the canonical name.  When both
/// exist the canonical column wins and the short one is left untouched.
pub fn reconcile_longitude(mut columns: Vec<String>) -> Vec<String> {
    if columns.iter().any(|c| c == LONGITUDE_COLUMN) {
        return columns;
    }
    if let Some(col) = columns.iter_mut().find(|c| *c == SHORT_LONGITUDE_COLUMN) {
        log::debug!("Renaming column '{SHORT_LONGITUDE_COLUMN}' to '{LONGITUDE_COLUMN}'");
        *col = LONGITUDE_COLUMN.to_string();
    }
    columns
}

/// Accumulates cleaned rows and counts listings priced at zero.
struct Normalizer {
    columns: Vec<String>,
    rows: Vec<ListingRecord>,
    zero_prices: usize,
}

impl Normalizer {
    fn new(columns: Vec<String>) -> Result<Self, LoadError> {
        if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
            return Err(LoadError::NotTabular("no header row".to_string()));
        }
        Ok(Normalizer {
            columns: reconcile_longitude(columns),
            rows: Vec::new(),
            zero_prices: 0,
        })
    }

    /// Clean one row. `cells` yields values aligned with `self.columns`;
    /// missing trailing cells are treated as `Null`.
    fn push_row(&mut self, cells: impl IntoIterator<Item = CellValue>) {
        let mut price = 0.0;
        let mut room_type = None;
        let mut latitude = None;
        let mut longitude = None;
        let mut fields = BTreeMap::new();

        // First occurrence of a duplicated header wins.
        let mut seen = std::collections::BTreeSet::new();
        let mut cells = cells.into_iter();
        for col in &self.columns {
            let cell = cells.next().unwrap_or(CellValue::Null);
            if !seen.insert(col.as_str()) {
                continue;
            }
            match col.as_str() {
                PRICE_COLUMN => price = price_from_cell(&cell),
                ROOM_TYPE_COLUMN => room_type = room_type_from_cell(&cell),
                LATITUDE_COLUMN => latitude = coordinate_from_cell(&cell),
                LONGITUDE_COLUMN => longitude = coordinate_from_cell(&cell),
                _ => {
                    fields.insert(col.clone(), cell);
                }
            }
        }

        if price == 0.0 {
            self.zero_prices += 1;
        }
        self.rows.push(ListingRecord {
            price,
            room_type,
            latitude,
            longitude,
            fields,
        });
    }

    fn finish(self) -> Result<NormalizedDataset, LoadError> {
        // Missing and unreadable prices are indistinguishable from free
        // listings once cleaned.
        if self.zero_prices > 0 {
            log::warn!(
                "{} of {} listings have a price of 0 (missing, unreadable or free)",
                self.zero_prices,
                self.rows.len()
            );
        }
        log::debug!("Columns: {:?}", self.columns);
        NormalizedDataset::from_records(self.columns, self.rows)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names, one listing per record.
/// Recognized columns are `price`, `room type`, `lat` and `long`/`longitude`;
/// every other column is passed through.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<NormalizedDataset, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut normalizer = Normalizer::new(headers)?;
    for result in reader.records() {
        let record = result?;
        normalizer.push_row(record.iter().map(CellValue::raw));
    }
    normalizer.finish()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "price": "$1,200", "room type": "Entire home/apt", "lat": 40.7, "long": -73.9 },
///   ...
/// ]
/// ```
///
/// Columns are the union of all object keys in first-seen order.
pub fn load_json_reader<R: Read>(reader: R) -> Result<NormalizedDataset, LoadError> {
    let root: JsonValue = serde_json::from_reader(reader)?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::NotTabular("expected a top-level JSON array".to_string()))?;

    let mut objects = Vec::with_capacity(records.len());
    let mut raw_columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::NotTabular(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !raw_columns.contains(key) {
                raw_columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    if raw_columns.is_empty() && objects.is_empty() {
        return Err(LoadError::EmptyDataset);
    }

    let mut normalizer = Normalizer::new(raw_columns.clone())?;
    for obj in objects {
        normalizer.push_row(
            raw_columns
                .iter()
                .map(|key| obj.get(key).map(json_to_cell).unwrap_or(CellValue::Null)),
        );
    }
    normalizer.finish()
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.is_empty() => CellValue::Null,
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_csv_str(text: &str) -> Result<NormalizedDataset, LoadError> {
        load_csv_reader(text.as_bytes())
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$1,234.50"), 1234.50);
        assert_eq!(parse_price("$966 "), 966.0);
        assert_eq!(parse_price("120"), 120.0);
        assert_eq!(parse_price(""), 0.0);
        assert_eq!(parse_price("N/A"), 0.0);
        assert_eq!(parse_price("NaN"), 0.0);
        assert_eq!(parse_price("inf"), 0.0);
        assert_eq!(parse_price("-40"), 0.0);
        assert_eq!(try_parse_price("free"), None);
    }

    #[test]
    fn test_reconcile_longitude() {
        let cols = reconcile_longitude(vec!["lat".into(), "long".into()]);
        assert_eq!(cols, vec!["lat", "longitude"]);

        let cols = reconcile_longitude(vec!["long".into(), "longitude".into()]);
        assert_eq!(cols, vec!["long", "longitude"]);
    }

    #[test]
    fn test_csv_cleans_rows() {
        let ds = load_csv_str(
            "id,price,room type,lat,long\n\
             1,\"$1,234.50\",Private room,40.71,-73.95\n\
             2,,Entire home/apt,,\n\
             3,N/A,,40.60,-73.80\n",
        )
        .unwrap();

        assert_eq!(ds.columns, vec!["id", "price", "room type", "lat", "longitude"]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rows[0].price, 1234.5);
        assert_eq!(ds.rows[0].room_type.as_deref(), Some("Private room"));
        assert_eq!(ds.rows[0].coordinates(), Some([-73.95, 40.71]));
        assert_eq!(ds.rows[0].fields.get("id"), Some(&CellValue::Text("1".into())));
        assert_eq!(ds.rows[1].price, 0.0);
        assert_eq!(ds.rows[1].coordinates(), None);
        assert_eq!(ds.rows[2].price, 0.0);
        assert_eq!(ds.rows[2].room_type, None);
        assert!(ds.capabilities.has_room_type);
        assert!(ds.capabilities.has_geo);
        assert_eq!(ds.price_bounds.min, 0.0);
        assert_eq!(ds.price_bounds.max, 1234.0);
    }

    #[test]
    fn test_passthrough_cells_are_verbatim() {
        let ds = load_csv_str("zip,price,rating,flag\n01234,$5,4.50,+5\n").unwrap();
        let row = &ds.rows[0];
        assert_eq!(row.display_value("zip"), "01234");
        assert_eq!(row.display_value("rating"), "4.50");
        assert_eq!(row.display_value("flag"), "+5");
        assert_eq!(row.price, 5.0);
    }

    #[test]
    fn test_json_columns_keep_source_order() {
        let ds = load_json_reader(r#"[{"price": 1, "name": "a", "id": 7}]"#.as_bytes()).unwrap();
        assert_eq!(ds.columns, vec!["price", "name", "id"]);
    }

    #[test]
    fn test_canonical_longitude_wins() {
        let ds = load_csv_str("price,lat,long,longitude\n10,1.0,2.0,3.0\n").unwrap();
        assert_eq!(ds.rows[0].longitude, Some(3.0));
        assert_eq!(ds.rows[0].fields.get("long"), Some(&CellValue::Text("2.0".into())));
    }

    #[test]
    fn test_missing_optional_columns() {
        let ds = load_csv_str("name,price\nloft,$90\n").unwrap();
        assert!(!ds.capabilities.has_room_type);
        assert!(!ds.capabilities.has_geo);
        assert!(ds.room_types.is_empty());
    }

    #[test]
    fn test_missing_price_column_coerces_to_zero() {
        let ds = load_csv_str("name,room type\nloft,Private room\n").unwrap();
        assert_eq!(ds.rows[0].price, 0.0);
        assert_eq!(ds.price_bounds.min, 0.0);
        assert_eq!(ds.price_bounds.max, 0.0);
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let err = load_csv_str("price,room type\n").unwrap_err();
        assert!(matches!(err, LoadError::EmptyDataset));
    }

    #[test]
    fn test_empty_input_is_not_tabular() {
        let err = load_csv_str("").unwrap_err();
        assert!(matches!(err, LoadError::NotTabular(_)));
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        let err = load_csv_str("price,room type\n10,Private room,extra\n").unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn test_json_records() {
        let json = r#"[
            {"price": "$100", "room type": "Private room", "lat": 40.7, "long": -73.9},
            {"price": 55.5, "room type": null, "host": "Bo"}
        ]"#;
        let ds = load_json_reader(json.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0].price, 100.0);
        assert_eq!(ds.rows[0].coordinates(), Some([-73.9, 40.7]));
        assert_eq!(ds.rows[1].price, 55.5);
        assert_eq!(ds.rows[1].room_type, None);
        assert_eq!(ds.rows[1].fields.get("host"), Some(&CellValue::Text("Bo".into())));
        assert!(ds.columns.contains(&"longitude".to_string()));
    }

    #[test]
    fn test_json_must_be_array_of_objects() {
        let err = load_json_reader(r#"{"price": 1}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::NotTabular(_)));
        let err = load_json_reader(r#"[1, 2]"#.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::NotTabular(_)));
        let err = load_json_reader(r#"[]"#.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyDataset));
    }

    #[test]
    fn test_load_file_dispatch() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("listings.csv");
        let mut file = File::create(&csv_path).unwrap();
        writeln!(file, "price,room type").unwrap();
        writeln!(file, "$80,Shared room").unwrap();
        drop(file);
        let ds = load_file(&csv_path).unwrap();
        assert_eq!(ds.rows[0].price, 80.0);

        let err = load_file(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));

        let xlsx = dir.path().join("listings.xlsx");
        File::create(&xlsx).unwrap();
        let err = load_file(&xlsx).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }
}
