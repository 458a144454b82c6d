use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::booking::CheckRequest;
use crate::services::{bookings, mailer, tracker};
use crate::state::AppState;

// POST /api/book-test-drive
#[derive(Deserialize)]
pub struct BookTestDriveRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub variant: String,
    pub date: NaiveDate,
}

pub async fn book_test_drive(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BookTestDriveRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let test_drive = bookings::create_test_drive(
        state.store.as_ref(),
        bookings::NewTestDrive {
            name: body.name,
            email: body.email,
            phone: body.phone,
            variant: body.variant,
            date: body.date,
        },
    )?;

    mailer::send_test_drive_confirmation(state.mailer.as_ref(), &test_drive).await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Test drive booked successfully",
            "bookingId": test_drive.booking_id,
            "booking": test_drive,
        })),
    ))
}

// POST /api/test-drive/check
pub async fn check_test_drive(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let test_drive = bookings::find_test_drive(
        state.store.as_ref(),
        body.booking_id.as_deref(),
        body.email.as_deref(),
        body.phone.as_deref(),
    )?;

    let progress = tracker::test_drive_progress(test_drive.status.as_str());

    Ok(Json(serde_json::json!({
        "success": true,
        "booking": test_drive,
        "progress": progress,
    })))
}
