use std::fs;
use std::path::{Path, PathBuf};

use crate::adapters::memory::InMemoryStore;
use crate::domain::model::{Reservation, ReservationId, ReservationStatus};
use crate::domain::ports::ReservationStore;
use crate::utils::error::{ReservationError, Result};

/// Durable store that keeps every reservation in one JSON document.
///
/// The whole document is rewritten on each save, via a temp file and rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    cache: InMemoryStore,
}

impl JsonFileStore {
    /// Opens `path`, treating a missing file as an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let cache = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let records: Vec<Reservation> = if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|e| ReservationError::StorageError {
                    message: format!("cannot decode {}: {}", path.display(), e),
                })?
            };
            tracing::debug!("Loaded {} reservations from {}", records.len(), path.display());
            InMemoryStore::from_records(records)
        } else {
            tracing::debug!("No store at {}, starting empty", path.display());
            InMemoryStore::new()
        };

        Ok(Self { path, cache })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec_pretty(self.cache.records())?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &data).map_err(|e| ReservationError::StorageError {
            message: format!("cannot write {}: {}", tmp.display(), e),
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| ReservationError::StorageError {
            message: format!("cannot replace {}: {}", self.path.display(), e),
        })?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }
}

impl ReservationStore for JsonFileStore {
    fn save(&mut self, reservation: Reservation) -> Result<Reservation> {
        let previous = self.cache.get(&reservation.id())?;
        self.cache.upsert(reservation.clone());

        if let Err(e) = self.flush() {
            // keep the cache in step with the file
            match previous {
                Some(old) => self.cache.upsert(old),
                None => self.cache.remove(&reservation.id()),
            }
            return Err(e);
        }

        Ok(reservation)
    }

    fn get(&self, id: &ReservationId) -> Result<Option<Reservation>> {
        self.cache.get(id)
    }

    fn list(
        &self,
        status: Option<ReservationStatus>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Reservation>> {
        Ok(self.cache.filtered(status, offset, limit))
    }

    fn all(&self) -> Result<Vec<Reservation>> {
        self.cache.all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ContactInfo, ReservationTime};
    use assert_matches::assert_matches;
    use chrono::Utc;
    use tempfile::TempDir;

    fn reservation() -> Reservation {
        let contact = ContactInfo {
            name: "Sari".to_string(),
            phone: "0812".to_string(),
            email: "sari@example.com".to_string(),
        };
        let time = ReservationTime::new(Utc::now(), 90).unwrap();
        Reservation::new("c1".to_string(), contact, time, None, Utc::now())
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("none.json")).unwrap();
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn test_save_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("reservations.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        let saved = store.save(reservation()).unwrap();
        let mut confirmed = saved.clone();
        confirmed.confirm(Utc::now()).unwrap();
        store.save(confirmed).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        let loaded = reopened.get(&saved.id()).unwrap().unwrap();
        assert_eq!(loaded.status(), ReservationStatus::Confirmed);
        assert_eq!(loaded.history().len(), 2);
        assert_eq!(reopened.all().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert_matches!(
            JsonFileStore::open(&path),
            Err(ReservationError::StorageError { .. })
        );
    }
}
