use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, TestDrive, TestDriveStatus};
use crate::services::ids;
use crate::store::BookingStore;

pub const BOOKING_PREFIX: &str = "THAR";
pub const TEST_DRIVE_PREFIX: &str = "TD";

pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub date: NaiveDate,
    pub variant: String,
    pub test_drive: bool,
}

pub struct NewTestDrive {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub variant: String,
    pub date: NaiveDate,
}

// ── Validation ──
//
// The original site validated only the test-drive path; the same rules
// apply to both create paths here.

fn require(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation(
            "please provide a valid email address".to_string(),
        ));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), AppError> {
    if phone.len() != 10 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "phone number must be exactly 10 digits".to_string(),
        ));
    }
    Ok(())
}

fn validate_not_past(date: NaiveDate) -> Result<(), AppError> {
    if date < Utc::now().date_naive() {
        return Err(AppError::Validation(
            "preferred date must be today or later".to_string(),
        ));
    }
    Ok(())
}

/// Generate-then-check: millisecond ids can collide within a process, so
/// the candidate is checked against the store and bumped until free.
fn fresh_booking_id(store: &dyn BookingStore) -> Result<String, AppError> {
    let mut millis = Utc::now().timestamp_millis();
    loop {
        let candidate = ids::generate_from(BOOKING_PREFIX, millis);
        if store.booking_by_id(&candidate)?.is_none() {
            return Ok(candidate);
        }
        millis += 1;
    }
}

fn fresh_test_drive_id(store: &dyn BookingStore) -> Result<String, AppError> {
    let mut millis = Utc::now().timestamp_millis();
    loop {
        let candidate = ids::generate_from(TEST_DRIVE_PREFIX, millis);
        if store.test_drive_by_id(&candidate)?.is_none() {
            return Ok(candidate);
        }
        millis += 1;
    }
}

// ── Operations ──

pub fn create_booking(store: &dyn BookingStore, input: NewBooking) -> Result<Booking, AppError> {
    let name = require(&input.name, "name")?;
    let email = require(&input.email, "email")?;
    let phone = require(&input.phone, "phone")?;
    let city = require(&input.city, "city")?;
    let variant = require(&input.variant, "variant")?;
    validate_email(&email)?;
    validate_phone(&phone)?;

    let booking = Booking {
        booking_id: fresh_booking_id(store)?,
        customer_name: name,
        email,
        phone,
        city,
        vehicle_model: format!("Thar {variant}"),
        preferred_date: input.date,
        test_drive: input.test_drive,
        status: BookingStatus::Pending,
        booking_date: Utc::now().naive_utc(),
        last_updated: None,
    };
    store.insert_booking(&booking)?;

    tracing::info!(booking_id = %booking.booking_id, "booking created");
    Ok(booking)
}

pub fn create_test_drive(
    store: &dyn BookingStore,
    input: NewTestDrive,
) -> Result<TestDrive, AppError> {
    let name = require(&input.name, "name")?;
    let email = require(&input.email, "email")?;
    let phone = require(&input.phone, "phone")?;
    let variant = require(&input.variant, "variant")?;
    validate_email(&email)?;
    validate_phone(&phone)?;
    validate_not_past(input.date)?;

    let test_drive = TestDrive {
        booking_id: fresh_test_drive_id(store)?,
        customer_name: name,
        email,
        phone,
        vehicle_model: format!("Thar {variant}"),
        preferred_date: input.date,
        status: TestDriveStatus::Pending,
        notes: None,
        booking_date: Utc::now().naive_utc(),
        last_updated: None,
    };
    store.insert_test_drive(&test_drive)?;

    tracing::info!(booking_id = %test_drive.booking_id, "test drive booked");
    Ok(test_drive)
}

/// Lookup by one of three identifying fields; when several are supplied
/// the id wins, then email, then phone.
pub fn find_booking(
    store: &dyn BookingStore,
    booking_id: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<Booking, AppError> {
    let found = if let Some(id) = booking_id.map(str::trim).filter(|s| !s.is_empty()) {
        store.booking_by_id(id)?
    } else if let Some(email) = email.map(str::trim).filter(|s| !s.is_empty()) {
        store.booking_by_email(email)?
    } else if let Some(phone) = phone.map(str::trim).filter(|s| !s.is_empty()) {
        store.booking_by_phone(phone)?
    } else {
        return Err(AppError::Validation(
            "provide a booking ID, email or phone number".to_string(),
        ));
    };

    found.ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

pub fn find_test_drive(
    store: &dyn BookingStore,
    booking_id: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<TestDrive, AppError> {
    let found = if let Some(id) = booking_id.map(str::trim).filter(|s| !s.is_empty()) {
        store.test_drive_by_id(id)?
    } else if let Some(email) = email.map(str::trim).filter(|s| !s.is_empty()) {
        store.test_drive_by_email(email)?
    } else if let Some(phone) = phone.map(str::trim).filter(|s| !s.is_empty()) {
        store.test_drive_by_phone(phone)?
    } else {
        return Err(AppError::Validation(
            "provide a booking ID, email or phone number".to_string(),
        ));
    };

    found.ok_or_else(|| AppError::NotFound("Test drive not found".to_string()))
}

pub fn update_booking_status(
    store: &dyn BookingStore,
    id: &str,
    status: &str,
) -> Result<Booking, AppError> {
    let status = BookingStatus::parse(status)
        .ok_or_else(|| AppError::Validation(format!("unknown booking status: {status}")))?;

    let updated = store
        .update_booking_status(id, status)?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    tracing::info!(booking_id = %id, status = %status, "booking status updated");
    Ok(updated)
}

pub fn update_test_drive_status(
    store: &dyn BookingStore,
    id: &str,
    status: &str,
    notes: Option<String>,
) -> Result<TestDrive, AppError> {
    let status = TestDriveStatus::parse(status)
        .ok_or_else(|| AppError::Validation(format!("unknown test drive status: {status}")))?;

    let updated = store
        .update_test_drive_status(id, status, notes)?
        .ok_or_else(|| AppError::NotFound("Test drive not found".to_string()))?;

    tracing::info!(booking_id = %id, status = %status, "test drive status updated");
    Ok(updated)
}

pub fn delete_booking(store: &dyn BookingStore, id: &str) -> Result<(), AppError> {
    if !store.delete_booking(id)? {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }
    tracing::info!(booking_id = %id, "booking deleted");
    Ok(())
}

pub fn delete_test_drive(store: &dyn BookingStore, id: &str) -> Result<(), AppError> {
    if !store.delete_test_drive(id)? {
        return Err(AppError::NotFound("Test drive not found".to_string()));
    }
    tracing::info!(booking_id = %id, "test drive deleted");
    Ok(())
}

pub fn list_bookings(store: &dyn BookingStore) -> Result<Vec<Booking>, AppError> {
    Ok(store.all_bookings()?)
}

pub fn list_test_drives(store: &dyn BookingStore) -> Result<Vec<TestDrive>, AppError> {
    Ok(store.all_test_drives()?)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_bookings: usize,
    pub total_test_drives: usize,
    pub test_drives: TestDriveCounts,
}

#[derive(Debug, Serialize)]
pub struct TestDriveCounts {
    pub pending: usize,
    pub confirmed: usize,
    pub completed: usize,
}

/// Aggregate counts recomputed from the full collections on demand.
pub fn statistics(store: &dyn BookingStore) -> Result<Statistics, AppError> {
    let bookings = store.all_bookings()?;
    let test_drives = store.all_test_drives()?;

    let mut counts = TestDriveCounts {
        pending: 0,
        confirmed: 0,
        completed: 0,
    };
    for td in &test_drives {
        match td.status {
            TestDriveStatus::Pending => counts.pending += 1,
            TestDriveStatus::Confirmed => counts.confirmed += 1,
            TestDriveStatus::Completed => counts.completed += 1,
        }
    }

    Ok(Statistics {
        total_bookings: bookings.len(),
        total_test_drives: test_drives.len(),
        test_drives: counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn store() -> SqliteStore {
        SqliteStore::open(":memory:").unwrap()
    }

    fn new_booking() -> NewBooking {
        NewBooking {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            phone: "9876543210".to_string(),
            city: "Pune".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            variant: "LX".to_string(),
            test_drive: false,
        }
    }

    fn new_test_drive(date: NaiveDate) -> NewTestDrive {
        NewTestDrive {
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            phone: "9123456780".to_string(),
            variant: "AX".to_string(),
            date,
        }
    }

    #[test]
    fn test_create_booking_defaults() {
        let store = store();
        let booking = create_booking(&store, new_booking()).unwrap();

        assert!(booking.booking_id.starts_with("THAR"));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.vehicle_model, "Thar LX");
        assert!(booking.last_updated.is_none());
    }

    #[test]
    fn test_past_date_allowed_for_purchase_booking() {
        // Only test drives require a future date.
        let store = store();
        assert!(create_booking(&store, new_booking()).is_ok());
    }

    #[test]
    fn test_create_booking_rejects_missing_fields() {
        let store = store();
        let mut input = new_booking();
        input.city = "  ".to_string();
        let err = create_booking(&store, input).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("city")));
    }

    #[test]
    fn test_create_booking_rejects_bad_email_and_phone() {
        let store = store();

        let mut input = new_booking();
        input.email = "not-an-email".to_string();
        assert!(matches!(
            create_booking(&store, input),
            Err(AppError::Validation(_))
        ));

        let mut input = new_booking();
        input.phone = "12345".to_string();
        assert!(matches!(
            create_booking(&store, input),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_find_priority_id_over_email_over_phone() {
        let store = store();
        let booking = create_booking(&store, new_booking()).unwrap();

        // id wins even when the email belongs to nobody
        let found = find_booking(
            &store,
            Some(&booking.booking_id.to_lowercase()),
            Some("stranger@example.com"),
            None,
        )
        .unwrap();
        assert_eq!(found.booking_id, booking.booking_id);

        let found = find_booking(&store, None, Some("A@X.COM"), None).unwrap();
        assert_eq!(found.booking_id, booking.booking_id);

        let found = find_booking(&store, None, None, Some("9876543210")).unwrap();
        assert_eq!(found.booking_id, booking.booking_id);
    }

    #[test]
    fn test_find_requires_an_identifier() {
        let store = store();
        let err = find_booking(&store, None, Some("  "), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_find_unknown_is_not_found() {
        let store = store();
        let err = find_booking(&store, Some("THAR0"), None, None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_update_status_rejects_unknown_value() {
        let store = store();
        let booking = create_booking(&store, new_booking()).unwrap();

        let err = update_booking_status(&store, &booking.booking_id, "Vanished").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let updated = update_booking_status(&store, &booking.booking_id, "Shipped").unwrap();
        assert_eq!(updated.status, BookingStatus::Shipped);
        assert!(updated.last_updated.is_some());
    }

    #[test]
    fn test_delete_then_lookup_not_found() {
        let store = store();
        let booking = create_booking(&store, new_booking()).unwrap();

        delete_booking(&store, &booking.booking_id).unwrap();
        assert!(matches!(
            find_booking(&store, Some(&booking.booking_id), None, None),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            find_booking(&store, None, Some("a@x.com"), None),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            delete_booking(&store, &booking.booking_id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_test_drive_date_rules() {
        let store = store();

        let yesterday = Utc::now().date_naive() - chrono::Duration::days(1);
        let err = create_test_drive(&store, new_test_drive(yesterday)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let today = Utc::now().date_naive();
        let td = create_test_drive(&store, new_test_drive(today)).unwrap();
        assert!(td.booking_id.starts_with("TD"));
        assert_eq!(td.status, TestDriveStatus::Pending);
        assert_eq!(td.vehicle_model, "Thar AX");
    }

    #[test]
    fn test_booking_ids_unique_within_a_burst() {
        let store = store();
        let mut ids = std::collections::HashSet::new();
        for _ in 0..5 {
            let booking = create_booking(&store, new_booking()).unwrap();
            assert!(ids.insert(booking.booking_id));
        }
    }

    #[test]
    fn test_statistics_counts() {
        let store = store();
        create_booking(&store, new_booking()).unwrap();

        let today = Utc::now().date_naive();
        let td1 = create_test_drive(&store, new_test_drive(today)).unwrap();
        let _td2 = create_test_drive(&store, new_test_drive(today)).unwrap();
        update_test_drive_status(&store, &td1.booking_id, "Completed", None).unwrap();

        let stats = statistics(&store).unwrap();
        assert_eq!(stats.total_bookings, 1);
        assert_eq!(stats.total_test_drives, 2);
        assert_eq!(stats.test_drives.pending, 1);
        assert_eq!(stats.test_drives.confirmed, 0);
        assert_eq!(stats.test_drives.completed, 1);
    }
}
