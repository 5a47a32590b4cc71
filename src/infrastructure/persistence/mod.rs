//! Persistence implementations
//!
//! File-based implementations of the domain repository traits.

mod file_violation_repo;

pub use file_violation_repo::FileViolationRepository;
