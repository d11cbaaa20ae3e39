//! Field normalizers.
//!
//! Each normalizer is a pure function from a raw value to its canonical form,
//! or a [`FieldRejection`](crate::FieldRejection) explaining what was expected:
//! - **datetime**: Thai/English dates, Buddhist-era years, `now`/`today`
//! - **terminology**: process, flow, steel family, roof element vocabularies
//! - **dimension**: `WxHxT` cross-section grammar

pub mod datetime;
pub mod dimension;
pub mod terminology;

pub use datetime::{
    Clock, DATETIME_LAYOUTS, FixedClock, SystemClock, THAI_MONTHS, normalize_datetime,
    normalize_datetime_now,
};
pub use dimension::{DIMENSION_PATTERN, normalize_dimension};
pub use terminology::{
    FAMILY_KEYWORDS, ROOF_ELEMENT_KEYWORDS, normalize_family, normalize_flow, normalize_process,
    normalize_roof_element,
};
