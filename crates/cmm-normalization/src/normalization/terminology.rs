//! Vocabulary normalization for process, flow, steel family and roof element.
//!
//! Keyword tables are ordered slices: the first entry with a matching keyword
//! wins. The order is part of the behaviour and must not be re-sorted.

use cmm_model::{Field, Flow, Process, RoofElement, SteelFamily};

use crate::error::FieldRejection;

/// Keywords identifying each steel family, checked square before rectangle.
pub const FAMILY_KEYWORDS: [(SteelFamily, &[&str]); 2] = [
    (
        SteelFamily::SquareHollowSection,
        &["shs", "square", "sq", "sqs", "sqr"],
    ),
    (
        SteelFamily::RectangularHollowSection,
        &["rhs", "rectangle", "rect", "rec"],
    ),
];

/// Thai and English keywords for each roof element, in priority order.
pub const ROOF_ELEMENT_KEYWORDS: [(RoofElement, &[&str]); 9] = [
    (RoofElement::Ridge, &["อกไก่", "ridge"]),
    (RoofElement::KingPost, &["ดั้ง", "king post"]),
    (RoofElement::HipRafter, &["ตะเข้สัน", "hip"]),
    (RoofElement::ValleyRafter, &["ตะเข้ราง", "valley"]),
    (RoofElement::Rafter, &["จันทัน", "rafter"]),
    (RoofElement::StudBeam, &["อะเส", "stud"]),
    (RoofElement::TieBeam, &["ขื่อ", "tie"]),
    (RoofElement::Columns, &["เสา", "column", "columns"]),
    (RoofElement::NotApplicable, &["-"]),
];

/// Normalize a process stage. Only `hauling`, `stock` and `usage` are
/// accepted, in any letter case.
pub fn normalize_process(raw: &str) -> Result<Process, FieldRejection> {
    let value = raw.to_lowercase();
    Process::ALL
        .into_iter()
        .find(|process| process.as_str() == value)
        .ok_or_else(|| {
            FieldRejection::new(
                Field::Process,
                raw,
                "process must be one of 'hauling', 'stock' or 'usage'",
            )
        })
}

/// Normalize a stock flow direction (`in`, `out` or `-`).
pub fn normalize_flow(raw: &str) -> Result<Flow, FieldRejection> {
    let value = raw.to_lowercase();
    Flow::ALL
        .into_iter()
        .find(|flow| flow.as_str() == value)
        .ok_or_else(|| {
            FieldRejection::new(
                Field::Flow,
                raw,
                "flow must be 'in', 'out', or '-' when not a stock movement",
            )
        })
}

/// Normalize a steel family from any text mentioning a known keyword.
pub fn normalize_family(raw: &str) -> Result<SteelFamily, FieldRejection> {
    let value = raw.to_lowercase();
    match_keywords(&value, &FAMILY_KEYWORDS).ok_or_else(|| {
        FieldRejection::new(
            Field::Family,
            raw,
            "steel family must refer to 'SHS - Square Hollow Section' or \
             'RHS - Rectangular Hollow Section' (e.g. 'shs', 'square', 'rhs', 'rect')",
        )
    })
}

/// Normalize a roof element from Thai or English text.
pub fn normalize_roof_element(raw: &str) -> Result<RoofElement, FieldRejection> {
    let value = raw.trim().to_lowercase();
    match_keywords(&value, &ROOF_ELEMENT_KEYWORDS).ok_or_else(|| {
        FieldRejection::new(
            Field::Element,
            raw,
            "unknown roof structure element; use terms such as ขื่อ, จันทัน, อกไก่, \
             'tie beam', 'rafter', or '-' when not applicable",
        )
    })
}

fn match_keywords<T: Copy>(value: &str, table: &[(T, &[&str])]) -> Option<T> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| value.contains(keyword)))
        .map(|(canonical, _)| *canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_case_insensitive() {
        assert_eq!(normalize_process("Stock").unwrap(), Process::Stock);
        assert_eq!(normalize_process("HAULING").unwrap(), Process::Hauling);
        assert_eq!(normalize_process("usage").unwrap(), Process::Usage);
    }

    #[test]
    fn test_process_rejects_synonyms() {
        let rejection = normalize_process("warehouse").unwrap_err();
        assert_eq!(rejection.field, Field::Process);
        assert!(normalize_process("stocks").is_err());
    }

    #[test]
    fn test_flow() {
        assert_eq!(normalize_flow("Out").unwrap(), Flow::Out);
        assert_eq!(normalize_flow("IN").unwrap(), Flow::In);
        assert_eq!(normalize_flow("-").unwrap(), Flow::NotApplicable);
        assert!(normalize_flow("inbound").is_err());
        assert!(normalize_flow("").is_err());
    }

    #[test]
    fn test_family_keywords() {
        for raw in ["SHS", "sq", "Square", "square tube", "SQR 100"] {
            assert_eq!(
                normalize_family(raw).unwrap(),
                SteelFamily::SquareHollowSection,
                "{raw}"
            );
        }
        for raw in ["rect", "RHS", "Rectangle", "rec"] {
            assert_eq!(
                normalize_family(raw).unwrap(),
                SteelFamily::RectangularHollowSection,
                "{raw}"
            );
        }
        assert!(normalize_family("steel").is_err());
    }

    #[test]
    fn test_family_square_checked_first() {
        assert_eq!(
            normalize_family("rectangle or square").unwrap(),
            SteelFamily::SquareHollowSection
        );
    }

    #[test]
    fn test_roof_element_thai_and_english() {
        assert_eq!(normalize_roof_element("ขื่อ").unwrap(), RoofElement::TieBeam);
        assert_eq!(normalize_roof_element("จันทัน").unwrap(), RoofElement::Rafter);
        assert_eq!(normalize_roof_element("อกไก่").unwrap(), RoofElement::Ridge);
        assert_eq!(
            normalize_roof_element(" King Post ").unwrap(),
            RoofElement::KingPost
        );
        assert_eq!(normalize_roof_element("-").unwrap(), RoofElement::NotApplicable);
    }

    #[test]
    fn test_roof_element_priority() {
        assert_eq!(
            normalize_roof_element("hip rafter").unwrap(),
            RoofElement::HipRafter
        );
        assert_eq!(
            normalize_roof_element("valley rafter").unwrap(),
            RoofElement::ValleyRafter
        );
        assert_eq!(normalize_roof_element("rafters").unwrap(), RoofElement::Rafter);
        assert_eq!(normalize_roof_element("เสาเข็ม").unwrap(), RoofElement::Columns);
    }

    #[test]
    fn test_roof_element_rejects_unknown() {
        let rejection = normalize_roof_element("purlin").unwrap_err();
        assert_eq!(rejection.field, Field::Element);
        assert!(rejection.reason.contains("ขื่อ"));
    }
}
