pub mod file;
pub mod sqlite;

pub use file::JsonFileStore;
pub use sqlite::SqliteStore;

use crate::models::{Booking, BookingStatus, TestDrive, TestDriveStatus};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Persistence contract shared by the file and table backends.
///
/// Absence of a match is `Ok(None)` / `Ok(false)`, never an error. Lookups
/// by id and email are case-insensitive; phone is exact. `all_*` return
/// records newest-first by creation time.
pub trait BookingStore: Send + Sync {
    fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError>;
    fn booking_by_id(&self, id: &str) -> Result<Option<Booking>, StoreError>;
    fn booking_by_email(&self, email: &str) -> Result<Option<Booking>, StoreError>;
    fn booking_by_phone(&self, phone: &str) -> Result<Option<Booking>, StoreError>;
    fn all_bookings(&self) -> Result<Vec<Booking>, StoreError>;
    fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StoreError>;
    fn delete_booking(&self, id: &str) -> Result<bool, StoreError>;

    fn insert_test_drive(&self, test_drive: &TestDrive) -> Result<(), StoreError>;
    fn test_drive_by_id(&self, id: &str) -> Result<Option<TestDrive>, StoreError>;
    fn test_drive_by_email(&self, email: &str) -> Result<Option<TestDrive>, StoreError>;
    fn test_drive_by_phone(&self, phone: &str) -> Result<Option<TestDrive>, StoreError>;
    fn all_test_drives(&self) -> Result<Vec<TestDrive>, StoreError>;
    fn update_test_drive_status(
        &self,
        id: &str,
        status: TestDriveStatus,
        notes: Option<String>,
    ) -> Result<Option<TestDrive>, StoreError>;
    fn delete_test_drive(&self, id: &str) -> Result<bool, StoreError>;
}
