//! Record assembly.
//!
//! Runs every field normalizer over a [`RawRecord`], applies the
//! process-gating rules and emits one [`CanonicalRecord`]. Assembly performs
//! no I/O.

use cmm_model::{
    CanonicalRecord, Field, Flow, NOT_APPLICABLE, Process, RawRecord, RoofElement,
    format_datetime,
};
use tracing::{debug, warn};

use crate::error::{AssemblyError, FieldRejection};
use crate::normalization::{
    Clock, SystemClock, normalize_datetime, normalize_dimension, normalize_family,
    normalize_flow, normalize_process, normalize_roof_element,
};

/// Normalize and assemble a raw record against the system clock.
pub fn normalize_and_assemble(raw: &RawRecord) -> Result<CanonicalRecord, AssemblyError> {
    assemble(raw, &SystemClock)
}

/// Normalize every field of `raw` and build the canonical record.
///
/// All six categorical fields are checked even when an earlier one fails,
/// so the error lists every malformed value at once. Gated fields (flow
/// outside stock, element and description outside usage) must still be
/// valid input before they are reset to `-`.
pub fn assemble<C: Clock + ?Sized>(
    raw: &RawRecord,
    clock: &C,
) -> Result<CanonicalRecord, AssemblyError> {
    let mut rejections = Vec::new();

    let datetime = collect(normalize_datetime(&raw.datetime, clock), &mut rejections);
    let process = collect(normalize_process(&raw.process), &mut rejections);
    let flow = collect(normalize_flow(&raw.flow), &mut rejections);
    let family = collect(normalize_family(&raw.family), &mut rejections);
    let dimension = collect(normalize_dimension(&raw.dimension), &mut rejections);
    let element = collect(normalize_roof_element(&raw.element), &mut rejections);

    let (Some(datetime), Some(process), Some(flow), Some(family), Some(dimension), Some(element)) =
        (datetime, process, flow, family, dimension, element)
    else {
        let fields: Vec<&str> = rejections.iter().map(|r| r.field.as_str()).collect();
        warn!(?fields, "record rejected");
        return Err(AssemblyError::new(rejections));
    };

    let is_stock = process == Process::Stock;
    let is_usage = process == Process::Usage;

    let flow = if is_stock { flow } else { Flow::NotApplicable };
    let quantity = if is_stock && flow == Flow::Out {
        -raw.quantity.saturating_abs()
    } else {
        raw.quantity
    };
    let (element, description) = if is_usage {
        (element, raw.description.clone())
    } else {
        (RoofElement::NotApplicable, NOT_APPLICABLE.to_string())
    };

    let record = CanonicalRecord {
        datetime,
        process,
        flow,
        family,
        dimension,
        length: raw.length,
        quantity,
        element,
        description,
    };

    debug!(
        datetime = %record.datetime_string(),
        process = %record.process,
        flow = %record.flow,
        quantity = record.quantity,
        element = %record.element,
        "record assembled"
    );
    Ok(record)
}

/// Normalize a single field value to its stored string form.
///
/// Dispatches on [`Field`] to the matching normalizer.
pub fn normalize_field<C: Clock + ?Sized>(
    field: Field,
    raw: &str,
    clock: &C,
) -> Result<String, FieldRejection> {
    match field {
        Field::Datetime => normalize_datetime(raw, clock).map(|dt| format_datetime(&dt)),
        Field::Process => normalize_process(raw).map(|v| v.as_str().to_string()),
        Field::Flow => normalize_flow(raw).map(|v| v.as_str().to_string()),
        Field::Family => normalize_family(raw).map(|v| v.as_str().to_string()),
        Field::Dimension => normalize_dimension(raw),
        Field::Element => normalize_roof_element(raw).map(|v| v.as_str().to_string()),
    }
}

fn collect<T>(
    result: Result<T, FieldRejection>,
    rejections: &mut Vec<FieldRejection>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(rejection) => {
            debug!(field = %rejection.field, reason = %rejection.reason, "field rejected");
            rejections.push(rejection);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::FixedClock;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2025, 1, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_quantity_negated_only_for_stock_out() {
        let mut raw = RawRecord {
            datetime: "now".to_string(),
            process: "stock".to_string(),
            flow: "out".to_string(),
            family: "shs".to_string(),
            dimension: "100x100x6".to_string(),
            length: 6.0,
            quantity: -4,
            element: "-".to_string(),
            description: "-".to_string(),
        };
        assert_eq!(assemble(&raw, &clock()).unwrap().quantity, -4);

        raw.quantity = 4;
        assert_eq!(assemble(&raw, &clock()).unwrap().quantity, -4);

        raw.flow = "in".to_string();
        assert_eq!(assemble(&raw, &clock()).unwrap().quantity, 4);
    }

    #[test]
    fn test_normalize_field_dispatch() {
        assert_eq!(
            normalize_field(Field::Family, "rect", &clock()).unwrap(),
            "RHS - Rectangular Hollow Section"
        );
        assert_eq!(
            normalize_field(Field::Datetime, "today", &clock()).unwrap(),
            "2025-01-02 09:00:00"
        );
        assert_eq!(
            normalize_field(Field::Element, "ขื่อ", &clock()).unwrap(),
            "tie beam"
        );
        let rejection = normalize_field(Field::Dimension, "10x10", &clock()).unwrap_err();
        assert_eq!(rejection.field, Field::Dimension);
    }
}
