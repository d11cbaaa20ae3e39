//! Cross-section dimension validation.

use std::sync::LazyLock;

use cmm_model::Field;
use regex::Regex;

use crate::error::FieldRejection;

/// `WxHxT`: 2-3 digit width and height, 1-2 digit thickness with up to two
/// decimals. Any Unicode decimal digit counts, so Thai digits pass; the
/// separator is a lowercase `x` only.
pub const DIMENSION_PATTERN: &str = r"^\d{2,3}x\d{2,3}x\d{1,2}(\.\d{1,2})?$";

static DIMENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DIMENSION_PATTERN).expect("valid dimension pattern"));

/// Validate a dimension string. The value is returned unchanged; no unit
/// conversion or case folding is applied.
pub fn normalize_dimension(raw: &str) -> Result<String, FieldRejection> {
    if DIMENSION.is_match(raw) {
        Ok(raw.to_string())
    } else {
        Err(FieldRejection::new(
            Field::Dimension,
            raw,
            "dimension must be 'WxHxT' in millimetres, e.g. '100x100x6' or '100x50x3.2'",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_integer_and_decimal_thickness() {
        assert_eq!(normalize_dimension("100x100x6").unwrap(), "100x100x6");
        assert_eq!(normalize_dimension("100x100x6.5").unwrap(), "100x100x6.5");
        assert_eq!(normalize_dimension("50x25x2.30").unwrap(), "50x25x2.30");
    }

    #[test]
    fn test_rejects_out_of_grammar() {
        for raw in [
            "1000x100x6",
            "100x100x6.55",
            "100X100X6",
            "100x100",
            "100 x 100 x 6",
            "100x100x6mm",
            "100x100x6 ",
        ] {
            let rejection = normalize_dimension(raw).unwrap_err();
            assert_eq!(rejection.field, Field::Dimension, "{raw}");
        }
    }

    #[test]
    fn test_accepts_thai_digits() {
        assert_eq!(normalize_dimension("๑๐๐x๑๐๐x๖").unwrap(), "๑๐๐x๑๐๐x๖");
        assert_eq!(normalize_dimension("๑๐๐x๕๐x๓.๒").unwrap(), "๑๐๐x๕๐x๓.๒");
        assert!(normalize_dimension("๑๐๐๐x๑๐๐x๖").is_err());
    }
}
