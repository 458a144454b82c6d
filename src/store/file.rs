use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{BookingStore, StoreError};
use crate::models::{Booking, BookingStatus, TestDrive, TestDriveStatus};

/// File-backed store: one pretty-printed JSON array per record kind,
/// read fully on every operation and rewritten fully on every mutation.
/// A mutex serializes the read-modify-write cycle and writes go through
/// a temp file plus rename, so a crash mid-write never truncates the
/// collection. Suited to low-concurrency single-instance deployments.
pub struct JsonFileStore {
    bookings_path: PathBuf,
    test_drives_path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(data_dir: &str) -> Result<Self, StoreError> {
        let dir = Path::new(data_dir);
        fs::create_dir_all(dir)?;

        let store = Self {
            bookings_path: dir.join("bookings.json"),
            test_drives_path: dir.join("test_drives.json"),
            lock: Mutex::new(()),
        };

        for path in [&store.bookings_path, &store.test_drives_path] {
            if !path.exists() {
                fs::write(path, "[]")?;
            }
        }
        Ok(store)
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(records)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl JsonFileStore {
    fn read_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        read_records(&self.bookings_path)
    }

    fn read_test_drives(&self) -> Result<Vec<TestDrive>, StoreError> {
        read_records(&self.test_drives_path)
    }
}

impl BookingStore for JsonFileStore {
    fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut bookings = self.read_bookings()?;
        bookings.push(booking.clone());
        write_records(&self.bookings_path, &bookings)
    }

    fn booking_by_id(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let bookings = self.read_bookings()?;
        Ok(bookings
            .into_iter()
            .find(|b| b.booking_id.eq_ignore_ascii_case(id)))
    }

    fn booking_by_email(&self, email: &str) -> Result<Option<Booking>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let bookings = self.read_bookings()?;
        Ok(bookings
            .into_iter()
            .find(|b| b.email.eq_ignore_ascii_case(email)))
    }

    fn booking_by_phone(&self, phone: &str) -> Result<Option<Booking>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let bookings = self.read_bookings()?;
        Ok(bookings.into_iter().find(|b| b.phone == phone))
    }

    fn all_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut bookings = self.read_bookings()?;
        bookings.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
        Ok(bookings)
    }

    fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut bookings = self.read_bookings()?;
        let Some(booking) = bookings
            .iter_mut()
            .find(|b| b.booking_id.eq_ignore_ascii_case(id))
        else {
            return Ok(None);
        };

        booking.status = status;
        booking.last_updated = Some(Utc::now().naive_utc());
        let updated = booking.clone();
        write_records(&self.bookings_path, &bookings)?;
        Ok(Some(updated))
    }

    fn delete_booking(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut bookings = self.read_bookings()?;
        let before = bookings.len();
        bookings.retain(|b| !b.booking_id.eq_ignore_ascii_case(id));
        if bookings.len() == before {
            return Ok(false);
        }
        write_records(&self.bookings_path, &bookings)?;
        Ok(true)
    }

    fn insert_test_drive(&self, test_drive: &TestDrive) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut test_drives = self.read_test_drives()?;
        test_drives.push(test_drive.clone());
        write_records(&self.test_drives_path, &test_drives)
    }

    fn test_drive_by_id(&self, id: &str) -> Result<Option<TestDrive>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let test_drives = self.read_test_drives()?;
        Ok(test_drives
            .into_iter()
            .find(|t| t.booking_id.eq_ignore_ascii_case(id)))
    }

    fn test_drive_by_email(&self, email: &str) -> Result<Option<TestDrive>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let test_drives = self.read_test_drives()?;
        Ok(test_drives
            .into_iter()
            .find(|t| t.email.eq_ignore_ascii_case(email)))
    }

    fn test_drive_by_phone(&self, phone: &str) -> Result<Option<TestDrive>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let test_drives = self.read_test_drives()?;
        Ok(test_drives.into_iter().find(|t| t.phone == phone))
    }

    fn all_test_drives(&self) -> Result<Vec<TestDrive>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut test_drives = self.read_test_drives()?;
        test_drives.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
        Ok(test_drives)
    }

    fn update_test_drive_status(
        &self,
        id: &str,
        status: TestDriveStatus,
        notes: Option<String>,
    ) -> Result<Option<TestDrive>, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut test_drives = self.read_test_drives()?;
        let Some(test_drive) = test_drives
            .iter_mut()
            .find(|t| t.booking_id.eq_ignore_ascii_case(id))
        else {
            return Ok(None);
        };

        test_drive.status = status;
        if notes.is_some() {
            test_drive.notes = notes;
        }
        test_drive.last_updated = Some(Utc::now().naive_utc());
        let updated = test_drive.clone();
        write_records(&self.test_drives_path, &test_drives)?;
        Ok(Some(updated))
    }

    fn delete_test_drive(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().unwrap();
        let mut test_drives = self.read_test_drives()?;
        let before = test_drives.len();
        test_drives.retain(|t| !t.booking_id.eq_ignore_ascii_case(id));
        if test_drives.len() == before {
            return Ok(false);
        }
        write_records(&self.test_drives_path, &test_drives)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn temp_store(name: &str) -> JsonFileStore {
        let dir = std::env::temp_dir().join(format!(
            "thar-booking-test-{name}-{}",
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        JsonFileStore::open(dir.to_str().unwrap()).unwrap()
    }

    fn sample_booking(id: &str) -> Booking {
        Booking {
            booking_id: id.to_string(),
            customer_name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            city: "Pune".to_string(),
            vehicle_model: "Thar LX".to_string(),
            preferred_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            test_drive: false,
            status: BookingStatus::Pending,
            booking_date: Utc::now().naive_utc(),
            last_updated: None,
        }
    }

    #[test]
    fn test_initializes_empty_documents() {
        let store = temp_store("init");
        assert!(store.all_bookings().unwrap().is_empty());
        assert!(store.all_test_drives().unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_lookup() {
        let store = temp_store("lookup");
        store.insert_booking(&sample_booking("THAR5000")).unwrap();

        assert!(store.booking_by_id("thar5000").unwrap().is_some());
        assert!(store.booking_by_email("ASHA@example.com").unwrap().is_some());
        assert!(store.booking_by_phone("9876543210").unwrap().is_some());
        assert!(store.booking_by_id("THAR5001").unwrap().is_none());
    }

    #[test]
    fn test_document_is_pretty_printed_array() {
        let store = temp_store("pretty");
        store.insert_booking(&sample_booking("THAR5002")).unwrap();

        let raw = fs::read_to_string(&store.bookings_path).unwrap();
        assert!(raw.starts_with("[\n"));
        assert!(raw.contains("\"bookingId\": \"THAR5002\""));
    }

    #[test]
    fn test_update_and_delete() {
        let store = temp_store("mutate");
        store.insert_booking(&sample_booking("THAR5003")).unwrap();

        let updated = store
            .update_booking_status("THAR5003", BookingStatus::Delivered)
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, BookingStatus::Delivered);
        assert!(updated.last_updated.is_some());

        assert!(store.delete_booking("THAR5003").unwrap());
        assert!(!store.delete_booking("THAR5003").unwrap());
    }

    #[test]
    fn test_update_missing_leaves_file_untouched() {
        let store = temp_store("missing");
        store.insert_booking(&sample_booking("THAR5004")).unwrap();

        let before = fs::read_to_string(&store.bookings_path).unwrap();
        let result = store
            .update_booking_status("THAR9999", BookingStatus::Confirmed)
            .unwrap();
        assert!(result.is_none());
        let after = fs::read_to_string(&store.bookings_path).unwrap();
        assert_eq!(before, after);
    }
}
