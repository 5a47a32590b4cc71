//! File-based violation log
//!
//! Stores violation records as a JSON array, newest first, matching the
//! order the operator-facing log displays them in.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use crate::domain::repository::ViolationRepository;
use crate::error::{Error, Result};
use crate::types::{ViolationRecord, ViolationStatus};

/// File-based implementation of `ViolationRepository`
pub struct FileViolationRepository {
    store_path: PathBuf,
    records: RefCell<Vec<ViolationRecord>>,
}

impl FileViolationRepository {
    /// Create or load the violation log
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("violations.json");

        let records = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).unwrap_or_default()
        } else {
            Vec::new()
        };

        Ok(Self {
            store_path,
            records: RefCell::new(records),
        })
    }

    /// Save the log to disk
    fn persist(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &*self.records.borrow())?;
        Ok(())
    }

    /// Number of records in the log
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl ViolationRepository for FileViolationRepository {
    fn save(&self, record: &ViolationRecord) -> std::result::Result<(), Error> {
        self.records.borrow_mut().insert(0, record.clone());
        self.persist()
    }

    fn find_by_id(&self, id: &str) -> std::result::Result<Option<ViolationRecord>, Error> {
        Ok(self
            .records
            .borrow()
            .iter()
            .find(|r| r.violation_id == id)
            .cloned())
    }

    fn find_all(&self) -> std::result::Result<Vec<ViolationRecord>, Error> {
        Ok(self.records.borrow().clone())
    }

    fn mark_sent(&self, id: &str) -> std::result::Result<(), Error> {
        {
            let mut records = self.records.borrow_mut();
            let record = records
                .iter_mut()
                .find(|r| r.violation_id == id)
                .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;

            if record.status == ViolationStatus::Sent {
                return Err(Error::AlreadySent(id.to_string()));
            }

            record.status = ViolationStatus::Sent;
        }
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SmokeSeverity;
    use tempfile::tempdir;

    fn record(id: &str, timestamp: &str) -> ViolationRecord {
        ViolationRecord {
            violation_id: id.to_string(),
            vehicle_number: "KA05MJ1234".to_string(),
            vehicle_type: "Truck".to_string(),
            vehicle_color: "Yellow".to_string(),
            smoke_severity: SmokeSeverity::High,
            smoke_score: 0.82,
            ai_confidence: 94.0,
            timestamp: timestamp.to_string(),
            penalty: "Rs. 5000".to_string(),
            image_url: "frame.jpg".to_string(),
            location: "Zone A - Main".to_string(),
            status: ViolationStatus::Pending,
            ai_reasoning: vec!["reason".to_string()],
        }
    }

    #[test]
    fn newest_record_is_first() {
        let dir = tempdir().unwrap();
        let repo = FileViolationRepository::open(dir.path().to_path_buf()).unwrap();

        repo.save(&record("VIO-OLD00001", "2024-05-20 10:30:00"))
            .unwrap();
        repo.save(&record("VIO-NEW00001", "2024-05-20 11:00:00"))
            .unwrap();

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].violation_id, "VIO-NEW00001");
        assert_eq!(all[1].violation_id, "VIO-OLD00001");
    }

    #[test]
    fn find_by_id_hits_and_misses() {
        let dir = tempdir().unwrap();
        let repo = FileViolationRepository::open(dir.path().to_path_buf()).unwrap();
        repo.save(&record("VIO-ABC12345", "2024-05-20 10:30:00"))
            .unwrap();

        assert!(repo.find_by_id("VIO-ABC12345").unwrap().is_some());
        assert!(repo.find_by_id("VIO-MISSING0").unwrap().is_none());
    }

    #[test]
    fn mark_sent_transitions_exactly_once() {
        let dir = tempdir().unwrap();
        let repo = FileViolationRepository::open(dir.path().to_path_buf()).unwrap();
        repo.save(&record("VIO-ABC12345", "2024-05-20 10:30:00"))
            .unwrap();

        repo.mark_sent("VIO-ABC12345").unwrap();
        let sent = repo.find_by_id("VIO-ABC12345").unwrap().unwrap();
        assert_eq!(sent.status, ViolationStatus::Sent);

        let err = repo.mark_sent("VIO-ABC12345").unwrap_err();
        assert!(matches!(err, Error::AlreadySent(_)));

        let err = repo.mark_sent("VIO-MISSING0").unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(_)));
    }

    #[test]
    fn log_survives_reopen() {
        let dir = tempdir().unwrap();

        {
            let repo = FileViolationRepository::open(dir.path().to_path_buf()).unwrap();
            repo.save(&record("VIO-FIRST001", "2024-05-20 10:30:00"))
                .unwrap();
            repo.save(&record("VIO-SECOND01", "2024-05-20 11:00:00"))
                .unwrap();
            repo.mark_sent("VIO-FIRST001").unwrap();
        }

        let reopened = FileViolationRepository::open(dir.path().to_path_buf()).unwrap();
        let all = reopened.find_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].violation_id, "VIO-SECOND01");
        assert_eq!(all[1].status, ViolationStatus::Sent);
    }
}
