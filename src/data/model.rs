use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::loader::LoadError;

/// Column holding the (possibly currency formatted) nightly price.
pub const PRICE_COLUMN: &str = "price";
/// Column holding the room type category.
pub const ROOM_TYPE_COLUMN: &str = "room type";
pub const LATITUDE_COLUMN: &str = "lat";
/// Canonical longitude column name exposed after loading.
pub const LONGITUDE_COLUMN: &str = "longitude";
/// Short longitude name found in some exports; renamed to [`LONGITUDE_COLUMN`].
pub const SHORT_LONGITUDE_COLUMN: &str = "long";

// ---------------------------------------------------------------------------
// CellValue – a single passthrough cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell for the columns the dashboard does not interpret.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// A raw CSV cell kept verbatim (`"01234"` stays `"01234"`). Empty cells
    /// are `Null`.
    pub fn raw(s: &str) -> CellValue {
        if s.is_empty() {
            CellValue::Null
        } else {
            CellValue::Text(s.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ListingRecord – one cleaned row
// ---------------------------------------------------------------------------

/// A single listing after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    /// Nightly price, always finite and `>= 0`.
    pub price: f64,
    pub room_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Every column not listed above: column_name → value.
    pub fields: BTreeMap<String, CellValue>,
}

impl ListingRecord {
    /// Both coordinates, as `[longitude, latitude]` (x, y on the map).
    pub fn coordinates(&self) -> Option<[f64; 2]> {
        Some([self.longitude?, self.latitude?])
    }

    /// Text shown for `column` in the listings table and in exports.
    pub fn display_value(&self, column: &str) -> String {
        match column {
            PRICE_COLUMN => format!("{}", self.price),
            ROOM_TYPE_COLUMN => self.room_type.clone().unwrap_or_default(),
            LATITUDE_COLUMN => self.latitude.map(|v| v.to_string()).unwrap_or_default(),
            LONGITUDE_COLUMN => self.longitude.map(|v| v.to_string()).unwrap_or_default(),
            other => self
                .fields
                .get(other)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Capabilities / bounds derived once at load time
// ---------------------------------------------------------------------------

/// Which optional features the loaded columns support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// The `room type` column exists (room-type filter and pie chart).
    pub has_room_type: bool,
    /// Both `lat` and `longitude` exist (map).
    pub has_geo: bool,
}

impl Capabilities {
    pub fn from_columns(columns: &[String]) -> Self {
        let has = |name: &str| columns.iter().any(|c| c == name);
        Capabilities {
            has_room_type: has(ROOM_TYPE_COLUMN),
            has_geo: has(LATITUDE_COLUMN) && has(LONGITUDE_COLUMN),
        }
    }
}

/// Global price bounds, truncated to whole numbers for the range sliders.
/// Kept as `f64` so prices beyond the `i64` range are still covered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

// ---------------------------------------------------------------------------
// NormalizedDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full cleaned dataset with pre-computed column facts.
/// Immutable once built; shared by reference with every evaluation.
#[derive(Debug, Clone)]
pub struct NormalizedDataset {
    /// Column names in source order, after the longitude rename.
    pub columns: Vec<String>,
    /// All listings in source order.
    pub rows: Vec<ListingRecord>,
    pub capabilities: Capabilities,
    /// Sorted distinct room types, missing values excluded.
    pub room_types: BTreeSet<String>,
    pub price_bounds: PriceBounds,
}

impl NormalizedDataset {
    /// Build column facts from cleaned records. Fails on an empty dataset
    /// since the price bounds are undefined.
    pub fn from_records(
        columns: Vec<String>,
        rows: Vec<ListingRecord>,
    ) -> Result<Self, LoadError> {
        if rows.is_empty() {
            return Err(LoadError::EmptyDataset);
        }

        let capabilities = Capabilities::from_columns(&columns);

        let room_types: BTreeSet<String> = rows
            .iter()
            .filter_map(|r| r.room_type.clone())
            .collect();

        let (min, max) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.price), hi.max(r.price))
        });

        Ok(NormalizedDataset {
            columns,
            rows,
            capabilities,
            room_types,
            price_bounds: PriceBounds {
                min: min.trunc(),
                max: max.trunc(),
            },
        })
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
