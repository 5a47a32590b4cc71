//! Repository trait definitions for the violation log

use crate::error::Error;
use crate::types::ViolationRecord;

/// Repository for recorded violations
pub trait ViolationRepository {
    /// Save a new violation record at the head of the log
    fn save(&self, record: &ViolationRecord) -> Result<(), Error>;

    /// Find a record by its violation id
    fn find_by_id(&self, id: &str) -> Result<Option<ViolationRecord>, Error>;

    /// All records, newest first
    fn find_all(&self) -> Result<Vec<ViolationRecord>, Error>;

    /// Transition a pending record to Sent
    fn mark_sent(&self, id: &str) -> Result<(), Error>;
}
