use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::bookings;
use crate::state::AppState;

/// Admin routes require `Authorization: Bearer <ADMIN_TOKEN>`. The check
/// happens server-side; there is no client-side gating.
fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/bookings
pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let bookings = bookings::list_bookings(state.store.as_ref())?;
    Ok(Json(serde_json::json!({
        "success": true,
        "bookings": bookings,
    })))
}

// PUT /api/admin/update-status/:booking_id
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let booking = bookings::update_booking_status(state.store.as_ref(), &booking_id, &body.status)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Status updated successfully",
        "booking": booking,
    })))
}

// DELETE /api/admin/delete-booking/:booking_id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    bookings::delete_booking(state.store.as_ref(), &booking_id)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Booking deleted successfully",
    })))
}

// GET /api/admin/test-drives
pub async fn get_test_drives(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let test_drives = bookings::list_test_drives(state.store.as_ref())?;
    Ok(Json(serde_json::json!({
        "success": true,
        "testDrives": test_drives,
    })))
}

// PUT /api/admin/test-drive/update-status/:booking_id
#[derive(Deserialize)]
pub struct UpdateTestDriveStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

pub async fn update_test_drive_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
    Json(body): Json<UpdateTestDriveStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let test_drive = bookings::update_test_drive_status(
        state.store.as_ref(),
        &booking_id,
        &body.status,
        body.notes,
    )?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Status updated successfully",
        "booking": test_drive,
    })))
}

// DELETE /api/admin/test-drive/delete/:booking_id
pub async fn delete_test_drive(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    bookings::delete_test_drive(state.store.as_ref(), &booking_id)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Test drive deleted successfully",
    })))
}

// GET /api/admin/statistics
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let statistics = bookings::statistics(state.store.as_ref())?;
    Ok(Json(serde_json::json!({
        "success": true,
        "statistics": statistics,
    })))
}
