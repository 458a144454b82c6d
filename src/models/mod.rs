pub mod booking;
pub mod test_drive;

pub use booking::{Booking, BookingStatus};
pub use test_drive::{TestDrive, TestDriveStatus};
