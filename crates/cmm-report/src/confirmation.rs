//! Confirmation text shown after a record is stored.

use std::fmt::Write;

use cmm_model::CanonicalRecord;

pub const CONFIRMATION_TITLE: &str = "### Data Recorded Successfully";

/// Render the confirmation block for a stored record.
pub fn render_confirmation(record: &CanonicalRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{CONFIRMATION_TITLE}");
    let _ = writeln!(out, "Datetime: {}", record.datetime_string());
    let _ = writeln!(out, "Process Type: {}", record.process);
    let _ = writeln!(out, "Material Flow: {}", record.flow);
    let _ = writeln!(out, "Steel Family: {}", record.family);
    let _ = writeln!(out, "Dimension: {}", record.dimension);
    let _ = writeln!(out, "Length: {}", format_length(record.length));
    let _ = writeln!(out, "Quantity: {} ea", record.quantity);
    let _ = writeln!(out, "Roof Element: {}", record.element);
    let _ = write!(out, "Description: {}", record.description);
    out
}

/// Lengths keep one decimal when whole (`6.0`), otherwise their shortest form.
pub fn format_length(length: f64) -> String {
    if length.fract() == 0.0 && length.is_finite() {
        format!("{length:.1}")
    } else {
        length.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(6.0), "6.0");
        assert_eq!(format_length(5.85), "5.85");
        assert_eq!(format_length(0.0), "0.0");
    }
}
