//! Data model for construction material tracking records.
//!
//! A [`RawRecord`] carries the candidate values pulled out of a user message.
//! After normalization it becomes a [`CanonicalRecord`], the unit appended to
//! the `case_database` table. Rows read back from the table are
//! [`StoredRow`]s, which tolerate missing columns. The roof plan is read as
//! [`PlanRow`]s.

pub mod enums;
pub mod error;
pub mod field;
pub mod record;

pub use enums::{Flow, NOT_APPLICABLE, Process, RoofElement, SteelFamily};
pub use error::{ModelError, Result};
pub use field::Field;
pub use record::{
    CanonicalRecord, DATETIME_FORMAT, PLAN_TABLE, PlanRow, RECORD_TABLE, RawRecord, StoredRow,
    format_datetime, parse_datetime,
};
