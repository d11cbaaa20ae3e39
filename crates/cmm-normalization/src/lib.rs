//! Bilingual field normalization and record assembly.
//!
//! Raw candidate values arrive as free text in Thai or English. Each field has
//! a pure normalizer in [`normalization`] that either produces the canonical
//! value or a [`FieldRejection`]. The [`assembler`] runs all of them, applies
//! the process-gating rules and produces a [`CanonicalRecord`](cmm_model::CanonicalRecord).
//!
//! ```
//! use cmm_model::RawRecord;
//! use cmm_normalization::normalize_and_assemble;
//!
//! let raw = RawRecord {
//!     datetime: "2025-01-01 14:30:00".into(),
//!     process: "Stock".into(),
//!     flow: "Out".into(),
//!     family: "shs".into(),
//!     dimension: "100x100x6".into(),
//!     length: 6.0,
//!     quantity: 3,
//!     element: "-".into(),
//!     description: "-".into(),
//! };
//! let record = normalize_and_assemble(&raw).unwrap();
//! assert_eq!(record.quantity, -3);
//! ```

pub mod assembler;
pub mod error;
pub mod normalization;

pub use assembler::{assemble, normalize_and_assemble, normalize_field};
pub use error::{AssemblyError, FieldRejection};
pub use normalization::{
    Clock, FixedClock, SystemClock, normalize_datetime, normalize_datetime_now,
    normalize_dimension, normalize_family, normalize_flow, normalize_process,
    normalize_roof_element,
};
