use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A test-drive request. Structurally close to a purchase booking but
/// tracked as its own record kind with its own status lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDrive {
    pub booking_id: String,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub vehicle_model: String,
    pub preferred_date: NaiveDate,
    pub status: TestDriveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub booking_date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TestDriveStatus {
    Pending,
    Confirmed,
    Completed,
}

impl TestDriveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestDriveStatus::Pending => "Pending",
            TestDriveStatus::Confirmed => "Confirmed",
            TestDriveStatus::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(TestDriveStatus::Pending),
            "Confirmed" => Some(TestDriveStatus::Confirmed),
            "Completed" => Some(TestDriveStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestDriveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in ["Pending", "Confirmed", "Completed"] {
            assert_eq!(TestDriveStatus::parse(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_booking_only_statuses_rejected() {
        assert!(TestDriveStatus::parse("Shipped").is_none());
        assert!(TestDriveStatus::parse("Under Review").is_none());
    }
}
