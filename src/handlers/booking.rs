use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::{bookings, mailer, tracker};
use crate::state::AppState;

// POST /api/booking/create
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub date: NaiveDate,
    pub variant: String,
    #[serde(default)]
    pub test_drive: bool,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let booking = bookings::create_booking(
        state.store.as_ref(),
        bookings::NewBooking {
            name: body.name,
            email: body.email,
            phone: body.phone,
            city: body.city,
            date: body.date,
            variant: body.variant,
            test_drive: body.test_drive,
        },
    )?;

    mailer::send_booking_confirmation(state.mailer.as_ref(), &booking).await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Booking created successfully",
            "bookingId": booking.booking_id,
            "booking": booking,
        })),
    ))
}

// POST /api/booking/check
#[derive(Deserialize)]
pub struct CheckRequest {
    #[serde(rename = "bookingId")]
    pub booking_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub async fn check_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let booking = bookings::find_booking(
        state.store.as_ref(),
        body.booking_id.as_deref(),
        body.email.as_deref(),
        body.phone.as_deref(),
    )?;

    let progress = tracker::booking_progress(booking.status.as_str());

    Ok(Json(serde_json::json!({
        "success": true,
        "booking": booking,
        "progress": progress,
    })))
}

// GET /api/booking/all
pub async fn all_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let bookings = bookings::list_bookings(state.store.as_ref())?;
    Ok(Json(serde_json::json!({
        "success": true,
        "bookings": bookings,
    })))
}
