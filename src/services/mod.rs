pub mod bookings;
pub mod ids;
pub mod mailer;
pub mod tracker;
