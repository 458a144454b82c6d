use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::{BookingStore, StoreError};
use crate::models::{Booking, BookingStatus, TestDrive, TestDriveStatus};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const DATE_FORMAT: &str = "%Y-%m-%d";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS bookings (
    booking_id     TEXT PRIMARY KEY COLLATE NOCASE,
    customer_name  TEXT NOT NULL,
    email          TEXT NOT NULL COLLATE NOCASE,
    phone          TEXT NOT NULL,
    city           TEXT NOT NULL,
    vehicle_model  TEXT NOT NULL,
    preferred_date TEXT NOT NULL,
    test_drive     INTEGER NOT NULL DEFAULT 0,
    status         TEXT NOT NULL,
    booking_date   TEXT NOT NULL,
    last_updated   TEXT
);
CREATE INDEX IF NOT EXISTS idx_bookings_email ON bookings(email);
CREATE INDEX IF NOT EXISTS idx_bookings_phone ON bookings(phone);

CREATE TABLE IF NOT EXISTS test_drives (
    booking_id     TEXT PRIMARY KEY COLLATE NOCASE,
    customer_name  TEXT NOT NULL,
    email          TEXT NOT NULL COLLATE NOCASE,
    phone          TEXT NOT NULL,
    vehicle_model  TEXT NOT NULL,
    preferred_date TEXT NOT NULL,
    status         TEXT NOT NULL,
    notes          TEXT,
    booking_date   TEXT NOT NULL,
    last_updated   TEXT
);
CREATE INDEX IF NOT EXISTS idx_test_drives_email ON test_drives(email);
CREATE INDEX IF NOT EXISTS idx_test_drives_phone ON test_drives(phone);
";

/// Table-backed store. One row per record, id/email lookups rely on
/// `COLLATE NOCASE`, single-row updates are atomic under SQLite.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn format_ts(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc())
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap_or_else(|_| Utc::now().date_naive())
}

fn booking_from_row(row: &Row) -> rusqlite::Result<Booking> {
    let preferred_date: String = row.get(6)?;
    let status: String = row.get(8)?;
    let booking_date: String = row.get(9)?;
    let last_updated: Option<String> = row.get(10)?;

    Ok(Booking {
        booking_id: row.get(0)?,
        customer_name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        city: row.get(4)?,
        vehicle_model: row.get(5)?,
        preferred_date: parse_date(&preferred_date),
        test_drive: row.get::<_, i32>(7)? != 0,
        status: BookingStatus::parse(&status).unwrap_or(BookingStatus::Pending),
        booking_date: parse_ts(&booking_date),
        last_updated: last_updated.as_deref().map(parse_ts),
    })
}

fn test_drive_from_row(row: &Row) -> rusqlite::Result<TestDrive> {
    let preferred_date: String = row.get(5)?;
    let status: String = row.get(6)?;
    let booking_date: String = row.get(8)?;
    let last_updated: Option<String> = row.get(9)?;

    Ok(TestDrive {
        booking_id: row.get(0)?,
        customer_name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        vehicle_model: row.get(4)?,
        preferred_date: parse_date(&preferred_date),
        status: TestDriveStatus::parse(&status).unwrap_or(TestDriveStatus::Pending),
        notes: row.get(7)?,
        booking_date: parse_ts(&booking_date),
        last_updated: last_updated.as_deref().map(parse_ts),
    })
}

const BOOKING_COLUMNS: &str = "booking_id, customer_name, email, phone, city, vehicle_model, \
                               preferred_date, test_drive, status, booking_date, last_updated";

const TEST_DRIVE_COLUMNS: &str = "booking_id, customer_name, email, phone, vehicle_model, \
                                  preferred_date, status, notes, booking_date, last_updated";

impl SqliteStore {
    fn find_booking_where(
        &self,
        clause: &str,
        value: &str,
    ) -> Result<Option<Booking>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE {clause}");
        let result = conn.query_row(&sql, params![value], booking_from_row);
        match result {
            Ok(booking) => Ok(Some(booking)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_test_drive_where(
        &self,
        clause: &str,
        value: &str,
    ) -> Result<Option<TestDrive>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {TEST_DRIVE_COLUMNS} FROM test_drives WHERE {clause}");
        let result = conn.query_row(&sql, params![value], test_drive_from_row);
        match result {
            Ok(test_drive) => Ok(Some(test_drive)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl BookingStore for SqliteStore {
    fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO bookings (booking_id, customer_name, email, phone, city, vehicle_model,
                                   preferred_date, test_drive, status, booking_date, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                booking.booking_id,
                booking.customer_name,
                booking.email,
                booking.phone,
                booking.city,
                booking.vehicle_model,
                booking.preferred_date.format(DATE_FORMAT).to_string(),
                booking.test_drive as i32,
                booking.status.as_str(),
                format_ts(&booking.booking_date),
                booking.last_updated.as_ref().map(format_ts),
            ],
        )?;
        Ok(())
    }

    fn booking_by_id(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        self.find_booking_where("booking_id = ?1", id)
    }

    fn booking_by_email(&self, email: &str) -> Result<Option<Booking>, StoreError> {
        self.find_booking_where("email = ?1", email)
    }

    fn booking_by_phone(&self, phone: &str) -> Result<Option<Booking>, StoreError> {
        self.find_booking_where("phone = ?1", phone)
    }

    fn all_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY booking_date DESC");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], booking_from_row)?;

        let mut bookings = vec![];
        for row in rows {
            bookings.push(row?);
        }
        Ok(bookings)
    }

    fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StoreError> {
        {
            let conn = self.conn.lock().unwrap();
            let now = format_ts(&Utc::now().naive_utc());
            let count = conn.execute(
                "UPDATE bookings SET status = ?1, last_updated = ?2 WHERE booking_id = ?3",
                params![status.as_str(), now, id],
            )?;
            if count == 0 {
                return Ok(None);
            }
        }
        self.booking_by_id(id)
    }

    fn delete_booking(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let count = conn.execute("DELETE FROM bookings WHERE booking_id = ?1", params![id])?;
        Ok(count > 0)
    }

    fn insert_test_drive(&self, test_drive: &TestDrive) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO test_drives (booking_id, customer_name, email, phone, vehicle_model,
                                      preferred_date, status, notes, booking_date, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                test_drive.booking_id,
                test_drive.customer_name,
                test_drive.email,
                test_drive.phone,
                test_drive.vehicle_model,
                test_drive.preferred_date.format(DATE_FORMAT).to_string(),
                test_drive.status.as_str(),
                test_drive.notes,
                format_ts(&test_drive.booking_date),
                test_drive.last_updated.as_ref().map(format_ts),
            ],
        )?;
        Ok(())
    }

    fn test_drive_by_id(&self, id: &str) -> Result<Option<TestDrive>, StoreError> {
        self.find_test_drive_where("booking_id = ?1", id)
    }

    fn test_drive_by_email(&self, email: &str) -> Result<Option<TestDrive>, StoreError> {
        self.find_test_drive_where("email = ?1", email)
    }

    fn test_drive_by_phone(&self, phone: &str) -> Result<Option<TestDrive>, StoreError> {
        self.find_test_drive_where("phone = ?1", phone)
    }

    fn all_test_drives(&self) -> Result<Vec<TestDrive>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let sql =
            format!("SELECT {TEST_DRIVE_COLUMNS} FROM test_drives ORDER BY booking_date DESC");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], test_drive_from_row)?;

        let mut test_drives = vec![];
        for row in rows {
            test_drives.push(row?);
        }
        Ok(test_drives)
    }

    fn update_test_drive_status(
        &self,
        id: &str,
        status: TestDriveStatus,
        notes: Option<String>,
    ) -> Result<Option<TestDrive>, StoreError> {
        {
            let conn = self.conn.lock().unwrap();
            let now = format_ts(&Utc::now().naive_utc());
            let count = match &notes {
                Some(notes) => conn.execute(
                    "UPDATE test_drives SET status = ?1, notes = ?2, last_updated = ?3
                     WHERE booking_id = ?4",
                    params![status.as_str(), notes, now, id],
                )?,
                None => conn.execute(
                    "UPDATE test_drives SET status = ?1, last_updated = ?2 WHERE booking_id = ?3",
                    params![status.as_str(), now, id],
                )?,
            };
            if count == 0 {
                return Ok(None);
            }
        }
        self.test_drive_by_id(id)
    }

    fn delete_test_drive(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let count = conn.execute(
            "DELETE FROM test_drives WHERE booking_id = ?1",
            params![id],
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::open(":memory:").unwrap()
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
    fn test_insert_and_case_insensitive_lookup() {
        let store = store();
        store.insert_booking(&sample_booking("THAR1000")).unwrap();

        assert!(store.booking_by_id("thar1000").unwrap().is_some());
        assert!(store.booking_by_email("ASHA@EXAMPLE.COM").unwrap().is_some());
        assert!(store.booking_by_phone("9876543210").unwrap().is_some());
        assert!(store.booking_by_phone("987654321").unwrap().is_none());
    }

    #[test]
    fn test_update_sets_last_updated() {
        let store = store();
        store.insert_booking(&sample_booking("THAR1001")).unwrap();

        let updated = store
            .update_booking_status("THAR1001", BookingStatus::Shipped)
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, BookingStatus::Shipped);
        assert!(updated.last_updated.is_some());
        assert!(updated.last_updated.unwrap() >= updated.booking_date);
    }

    #[test]
    fn test_update_missing_returns_none() {
        let store = store();
        let result = store
            .update_booking_status("THAR9999", BookingStatus::Confirmed)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_delete() {
        let store = store();
        store.insert_booking(&sample_booking("THAR1002")).unwrap();
        assert!(store.delete_booking("THAR1002").unwrap());
        assert!(!store.delete_booking("THAR1002").unwrap());
        assert!(store.booking_by_id("THAR1002").unwrap().is_none());
    }

    #[test]
    fn test_all_bookings_newest_first() {
        let store = store();
        let mut older = sample_booking("THAR1003");
        older.booking_date = Utc::now().naive_utc() - chrono::Duration::hours(1);
        let newer = sample_booking("THAR1004");
        store.insert_booking(&older).unwrap();
        store.insert_booking(&newer).unwrap();

        let all = store.all_bookings().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].booking_id, "THAR1004");
        assert_eq!(all[1].booking_id, "THAR1003");
    }

    #[test]
    fn test_test_drive_lifecycle() {
        let store = store();
        let td = TestDrive {
            booking_id: "TD2000".to_string(),
            customer_name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            phone: "9123456780".to_string(),
            vehicle_model: "Thar AX".to_string(),
            preferred_date: Utc::now().date_naive(),
            status: TestDriveStatus::Pending,
            notes: None,
            booking_date: Utc::now().naive_utc(),
            last_updated: None,
        };
        store.insert_test_drive(&td).unwrap();

        let updated = store
            .update_test_drive_status(
                "td2000",
                TestDriveStatus::Confirmed,
                Some("bring license".to_string()),
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TestDriveStatus::Confirmed);
        assert_eq!(updated.notes.as_deref(), Some("bring license"));

        assert!(store.delete_test_drive("TD2000").unwrap());
        assert!(store.test_drive_by_id("TD2000").unwrap().is_none());
    }
}
