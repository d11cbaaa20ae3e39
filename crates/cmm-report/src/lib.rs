//! Reporting for construction material tracking.
//!
//! - [`render_confirmation`] formats the block shown after a record is stored
//! - [`Summary`] aggregates stored rows and the roof plan into hauling, stock
//!   and usage views

pub mod confirmation;
pub mod summary;

pub use confirmation::{format_length, render_confirmation};
pub use summary::{
    CleanRow, ElementUsage, HaulingTotal, LengthUsage, StockPoint, Summary, clean_plan_dimension,
    element_usage, hauling_totals, length_usage, stock_timeline,
};
