pub mod resend;

use async_trait::async_trait;

use crate::models::{Booking, TestDrive};

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()>;
}

/// Used when no mail API key is configured.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> anyhow::Result<()> {
        tracing::info!(to, subject, "email notifications disabled, skipping send");
        Ok(())
    }
}

/// Best-effort confirmation on booking creation. A failed send is logged
/// and never fails the parent request.
pub async fn send_booking_confirmation(mailer: &dyn Mailer, booking: &Booking) {
    let subject = format!("Your Thar Booking Confirmation - {}", booking.booking_id);
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
           <h2>Your Thar Booking is Confirmed!</h2>\
           <p><strong>Booking ID:</strong> {}</p>\
           <p><strong>Name:</strong> {}</p>\
           <p><strong>Vehicle:</strong> {}</p>\
           <p><strong>Status:</strong> {}</p>\
           <p>Track your order any time with your booking ID.</p>\
         </div>",
        booking.booking_id, booking.customer_name, booking.vehicle_model, booking.status,
    );

    if let Err(e) = mailer.send(&booking.email, &subject, &html).await {
        tracing::warn!(booking_id = %booking.booking_id, error = %e, "confirmation email failed");
    }
}

pub async fn send_test_drive_confirmation(mailer: &dyn Mailer, test_drive: &TestDrive) {
    let subject = format!(
        "Your Thar Test Drive Request - {}",
        test_drive.booking_id
    );
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
           <h2>Test Drive Request Received</h2>\
           <p><strong>Booking ID:</strong> {}</p>\
           <p><strong>Name:</strong> {}</p>\
           <p><strong>Vehicle:</strong> {}</p>\
           <p><strong>Preferred Date:</strong> {}</p>\
           <p>We will contact you soon to confirm your slot.</p>\
         </div>",
        test_drive.booking_id,
        test_drive.customer_name,
        test_drive.vehicle_model,
        test_drive.preferred_date,
    );

    if let Err(e) = mailer.send(&test_drive.email, &subject, &html).await {
        tracing::warn!(booking_id = %test_drive.booking_id, error = %e, "confirmation email failed");
    }
}
