use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A vehicle purchase booking. Wire names are camelCase to match the
/// public API (`bookingId`, `customerName`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: String,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub vehicle_model: String,
    pub preferred_date: NaiveDate,
    pub test_drive: bool,
    pub status: BookingStatus,
    pub booking_date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    #[serde(rename = "Under Review")]
    UnderReview,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Shipped => "Shipped",
            BookingStatus::Delivered => "Delivered",
            BookingStatus::UnderReview => "Under Review",
        }
    }

    /// Strict parse; unrecognized values are rejected at the service
    /// boundary instead of being stored verbatim.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(BookingStatus::Pending),
            "Confirmed" => Some(BookingStatus::Confirmed),
            "Shipped" => Some(BookingStatus::Shipped),
            "Delivered" => Some(BookingStatus::Delivered),
            "Under Review" => Some(BookingStatus::UnderReview),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
