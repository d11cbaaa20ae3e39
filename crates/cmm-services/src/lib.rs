//! External collaborators for construction material tracking.
//!
//! - [`DetectionClient`]: counts steel sections in a photo through a hosted
//!   object-detection API and returns an annotated copy of the image
//! - [`RecordStore`]: append-only record table, backed by [`SupabaseStore`]
//!   in production and [`MemoryStore`] in tests and dry runs; it also reads
//!   the roof plan table
//!
//! Both are configured from a [`ServiceConfig`] passed to their constructors.

pub mod config;
pub mod detection;
pub mod error;
pub mod store;

pub use config::{DetectionConfig, ServiceConfig, StoreConfig};
pub use detection::{BoundingBox, DetectedObject, Detection, DetectionClient, annotate};
pub use error::{ConfigError, Result, ServiceError};
pub use store::{MemoryStore, RecordStore, SupabaseStore};
