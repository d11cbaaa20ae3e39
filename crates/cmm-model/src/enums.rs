//! Type-safe enumerations for tracked material records.
//!
//! These enums hold the canonical values written to the `case_database`
//! table. Their serde representation is the exact stored string, so a
//! serialized record can be inserted as-is.
//!
//! `FromStr` accepts only canonical spellings (case-insensitive, trimmed).
//! Bilingual keyword matching lives in the normalization crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Placeholder stored for fields that do not apply to a process.
pub const NOT_APPLICABLE: &str = "-";

/// Construction material-flow stage.
///
/// - **Hauling**: transport to site
/// - **Stock**: inventory / warehouse movements
/// - **Usage**: installation into the structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Process {
    Hauling,
    Stock,
    Usage,
}

impl Process {
    /// All processes in declaration order.
    pub const ALL: [Process; 3] = [Process::Hauling, Process::Stock, Process::Usage];

    /// Returns the stored name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Process::Hauling => "hauling",
            Process::Stock => "stock",
            Process::Usage => "usage",
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Process {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Process::ALL
            .into_iter()
            .find(|process| process.as_str() == normalized)
            .ok_or_else(|| ModelError::unknown("process", s))
    }
}

/// Inventory direction. Only meaningful for [`Process::Stock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Flow {
    #[serde(rename = "in")]
    In,
    #[serde(rename = "out")]
    Out,
    #[default]
    #[serde(rename = "-")]
    NotApplicable,
}

impl Flow {
    pub const ALL: [Flow; 3] = [Flow::In, Flow::Out, Flow::NotApplicable];

    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::In => "in",
            Flow::Out => "out",
            Flow::NotApplicable => NOT_APPLICABLE,
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Flow {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Flow::ALL
            .into_iter()
            .find(|flow| flow.as_str() == normalized)
            .ok_or_else(|| ModelError::unknown("flow", s))
    }
}

/// Steel hollow section family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteelFamily {
    /// SHS: square tube.
    #[serde(rename = "SHS - Square Hollow Section")]
    SquareHollowSection,
    /// RHS: rectangular tube.
    #[serde(rename = "RHS - Rectangular Hollow Section")]
    RectangularHollowSection,
}

impl SteelFamily {
    pub const ALL: [SteelFamily; 2] = [
        SteelFamily::SquareHollowSection,
        SteelFamily::RectangularHollowSection,
    ];

    /// Returns the stored label, e.g. `SHS - Square Hollow Section`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SteelFamily::SquareHollowSection => "SHS - Square Hollow Section",
            SteelFamily::RectangularHollowSection => "RHS - Rectangular Hollow Section",
        }
    }

    /// Returns the short code (`SHS` or `RHS`).
    pub fn code(&self) -> &'static str {
        match self {
            SteelFamily::SquareHollowSection => "SHS",
            SteelFamily::RectangularHollowSection => "RHS",
        }
    }
}

impl fmt::Display for SteelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SteelFamily {
    type Err = ModelError;

    /// Accepts the stored label or the short code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SteelFamily::ALL
            .into_iter()
            .find(|family| {
                family.as_str().eq_ignore_ascii_case(trimmed)
                    || family.code().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| ModelError::unknown("family", s))
    }
}

/// Roof structure element a member is installed into.
///
/// Variant order is the matching priority used when normalizing free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum RoofElement {
    #[serde(rename = "ridge")]
    Ridge,
    #[serde(rename = "king post")]
    KingPost,
    #[serde(rename = "hip rafter")]
    HipRafter,
    #[serde(rename = "valley rafter")]
    ValleyRafter,
    #[serde(rename = "rafter")]
    Rafter,
    #[serde(rename = "stud beam")]
    StudBeam,
    #[serde(rename = "tie beam")]
    TieBeam,
    #[serde(rename = "columns")]
    Columns,
    #[default]
    #[serde(rename = "-")]
    NotApplicable,
}

impl RoofElement {
    pub const ALL: [RoofElement; 9] = [
        RoofElement::Ridge,
        RoofElement::KingPost,
        RoofElement::HipRafter,
        RoofElement::ValleyRafter,
        RoofElement::Rafter,
        RoofElement::StudBeam,
        RoofElement::TieBeam,
        RoofElement::Columns,
        RoofElement::NotApplicable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoofElement::Ridge => "ridge",
            RoofElement::KingPost => "king post",
            RoofElement::HipRafter => "hip rafter",
            RoofElement::ValleyRafter => "valley rafter",
            RoofElement::Rafter => "rafter",
            RoofElement::StudBeam => "stud beam",
            RoofElement::TieBeam => "tie beam",
            RoofElement::Columns => "columns",
            RoofElement::NotApplicable => NOT_APPLICABLE,
        }
    }

    /// Thai name used on site drawings, if any.
    pub fn thai_name(&self) -> Option<&'static str> {
        match self {
            RoofElement::Ridge => Some("อกไก่"),
            RoofElement::KingPost => Some("ดั้ง"),
            RoofElement::HipRafter => Some("ตะเข้สัน"),
            RoofElement::ValleyRafter => Some("ตะเข้ราง"),
            RoofElement::Rafter => Some("จันทัน"),
            RoofElement::StudBeam => Some("อะเส"),
            RoofElement::TieBeam => Some("ขื่อ"),
            RoofElement::Columns => Some("เสา"),
            RoofElement::NotApplicable => None,
        }
    }
}

impl fmt::Display for RoofElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoofElement {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        RoofElement::ALL
            .into_iter()
            .find(|element| element.as_str() == normalized)
            .ok_or_else(|| ModelError::unknown("element", s))
    }
}
