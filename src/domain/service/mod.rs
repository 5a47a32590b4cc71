//! Domain services
//!
//! Pure, synchronous decision logic. Both services depend only on their
//! arguments and are safe to call from concurrent detection pipelines.

pub mod plate_extractor;
pub mod violation_classifier;

pub use plate_extractor::extract_plate;
pub use violation_classifier::{classify, qualifies, RecordSource, SystemRecordSource};
