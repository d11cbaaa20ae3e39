//! Record types: raw candidates, the canonical persisted record, and rows read back.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::enums::{Flow, NOT_APPLICABLE, Process, RoofElement, SteelFamily};
use crate::error::{ModelError, Result};

/// Stored datetime layout (`YYYY-MM-DD HH:MM:SS`).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Table that canonical records are appended to.
pub const RECORD_TABLE: &str = "case_database";

/// Read-only table listing every planned roof member.
pub const PLAN_TABLE: &str = "RoofList";

/// Format a datetime in the stored layout.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Layouts a timestamp column may come back in, tried after the stored layout.
const READ_BACK_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Same layouts with a trailing UTC offset (`Z`, `+00`, `+07:00`).
const READ_BACK_OFFSET_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%#z",
];

/// Parse a datetime read back from the table.
///
/// Accepts the stored layout and the ISO 8601 forms a timestamp column is
/// returned in, with or without fractional seconds. Offset-qualified values
/// keep their wall-clock time in that offset.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT) {
        return Ok(dt);
    }
    for fmt in READ_BACK_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }
    for fmt in READ_BACK_OFFSET_LAYOUTS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.naive_local());
        }
    }
    Err(ModelError::InvalidDateTime(value.to_string()))
}

/// Candidate field values as extracted from a user message.
///
/// The six categorical fields are free text in Thai or English; `length`,
/// `quantity` and `description` pass through unvalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub datetime: String,
    pub process: String,
    pub flow: String,
    pub family: String,
    pub dimension: String,
    pub length: f64,
    pub quantity: i64,
    #[serde(default = "not_applicable")]
    pub element: String,
    #[serde(default = "not_applicable")]
    pub description: String,
}

fn not_applicable() -> String {
    NOT_APPLICABLE.to_string()
}

/// One validated row of the `case_database` table.
///
/// Built once by the assembler and never mutated afterwards. Serializes to a
/// flat object with exactly nine keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(with = "stored_datetime")]
    pub datetime: NaiveDateTime,
    pub process: Process,
    pub flow: Flow,
    pub family: SteelFamily,
    pub dimension: String,
    pub length: f64,
    pub quantity: i64,
    pub element: RoofElement,
    pub description: String,
}

impl CanonicalRecord {
    /// Datetime in the stored layout.
    pub fn datetime_string(&self) -> String {
        format_datetime(&self.datetime)
    }
}

/// A row as returned by the table. Every column may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredRow {
    pub datetime: Option<String>,
    pub process: Option<String>,
    pub flow: Option<String>,
    pub family: Option<String>,
    pub dimension: Option<String>,
    pub length: Option<f64>,
    pub quantity: Option<i64>,
    pub element: Option<String>,
    pub description: Option<String>,
}

impl From<&CanonicalRecord> for StoredRow {
    fn from(record: &CanonicalRecord) -> Self {
        Self {
            datetime: Some(record.datetime_string()),
            process: Some(record.process.as_str().to_string()),
            flow: Some(record.flow.as_str().to_string()),
            family: Some(record.family.as_str().to_string()),
            dimension: Some(record.dimension.clone()),
            length: Some(record.length),
            quantity: Some(record.quantity),
            element: Some(record.element.as_str().to_string()),
            description: Some(record.description.clone()),
        }
    }
}

/// One planned member from the roof plan table.
///
/// The planner writes its own column casing and dimension labels
/// (`TUBR100x50x3.2`), so every column is optional and matched loosely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanRow {
    #[serde(alias = "Element", alias = "ELEMENT")]
    pub element: Option<String>,
    #[serde(alias = "Dimension", alias = "DIMENSION")]
    pub dimension: Option<String>,
    /// Cut length in metres.
    #[serde(alias = "CutLength", alias = "Cutlength", alias = "CUTLENGTH")]
    pub cutlength: Option<f64>,
}

mod stored_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATETIME_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(DATETIME_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
