use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;
use strum::IntoEnumIterator;
use utoipa::ToSchema;

use crate::config::EmptyResultPolicy;
use crate::error::{ApiError, ReportError};
use crate::model::attendance::{AttendanceUpdate, DATE_FORMAT, NewAttendance};
use crate::models::{ApiResponse, ReportResponse};
use crate::state::AppState;
use crate::store::{RecordFilter, RecordOrder};
use crate::utils::attendance_stats::{
    GroupField, StatusSummary, analyze_by_group, filter_by_keyword,
};

const RECORD_NOT_FOUND: &str = "Attendance record not found";

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FindRequest {
    /// Substring matched against status, date (YYYY-MM-DD) and time (HH:MM:SS)
    #[schema(example = "2024-01")]
    pub keyword: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AnalysisRequest {
    #[schema(example = "2024-01-01", format = "date")]
    pub start_date: Option<String>,
    #[schema(example = "2024-01-31", format = "date")]
    pub end_date: Option<String>,
    /// One of id, user_id, date, time, status
    #[schema(example = "status")]
    pub group_by: Option<String>,
}

/// Validated analysis input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub group_by: GroupField,
}

impl AnalysisRequest {
    pub fn validate(&self) -> Result<AnalysisParams, ApiError> {
        let (Some(start), Some(end), Some(group_by)) = (
            present(&self.start_date),
            present(&self.end_date),
            present(&self.group_by),
        ) else {
            return Err(ApiError::validation(
                "start_date, end_date, and group_by are required",
            ));
        };

        let parse_date = |name: &str, raw: &str| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                ApiError::validation(format!("{} must be a date in YYYY-MM-DD format", name))
            })
        };

        let group_by = GroupField::from_str(group_by).map_err(|_| {
            let allowed: Vec<&'static str> = GroupField::iter().map(<&'static str>::from).collect();
            ApiError::validation(format!("group_by must be one of: {}", allowed.join(", ")))
        })?;

        Ok(AnalysisParams {
            start_date: parse_date("start_date", start)?,
            end_date: parse_date("end_date", end)?,
            group_by,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/* =========================
History for a single user
========================= */
#[utoipa::path(
    get,
    path = "/api/attendance/history/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User whose attendance history to fetch")
    ),
    responses(
        (status = 200, description = "History, newest date first", body = Object, example = json!({
            "success": true,
            "data": [{"id": 3, "user_id": 42, "date": "2024-01-03", "time": "08:00:00", "status": "hadir"}],
            "message": "Attendance history fetched successfully"
        })),
        (status = 404, description = "User has no records", body = Object, example = json!({
            "success": false,
            "message": "No attendance records found for this user"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_history(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let records = state
        .store
        .find_all(RecordFilter::for_user(user_id), RecordOrder::DateDesc)
        .await
        .map_err(|e| state.store_failure(e, "Failed to fetch attendance history"))?;

    if records.is_empty() && state.empty_history_policy == EmptyResultPolicy::NotFound {
        return Err(ApiError::not_found(
            "No attendance records found for this user",
        ));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        records,
        "Attendance history fetched successfully",
    )))
}

/* =========================
List every record
========================= */
#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "All records, possibly empty", body = Object, example = json!({
            "success": true,
            "data": [],
            "message": "All attendance records have been loaded"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let records = state
        .store
        .find_all(RecordFilter::all(), RecordOrder::Insertion)
        .await
        .map_err(|e| state.store_failure(e, "Failed to fetch attendance list"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        records,
        "All attendance records have been loaded",
    )))
}

/* =========================
Keyword search
========================= */
#[utoipa::path(
    post,
    path = "/api/attendance/find",
    request_body(
        content = FindRequest,
        description = "Keyword to search for",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Matching records", body = Object, example = json!({
            "success": true,
            "data": [{"id": 1, "user_id": 42, "date": "2024-01-01", "time": "08:00:00", "status": "hadir"}],
            "message": "Attendance records have been filtered"
        })),
        (status = 400, description = "Malformed body"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn find_attendance(
    state: web::Data<AppState>,
    payload: web::Json<FindRequest>,
) -> Result<HttpResponse, ApiError> {
    let keyword = payload.into_inner().keyword.unwrap_or_default();

    // store has no cross-type substring search, so scan and filter here
    let records = state
        .store
        .find_all(RecordFilter::all(), RecordOrder::Insertion)
        .await
        .map_err(|e| state.store_failure(e, "Failed to search attendance"))?;

    let matched = filter_by_keyword(records, &keyword);
    tracing::debug!(keyword = %keyword, matched = matched.len(), "Attendance search");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        matched,
        "Attendance records have been filtered",
    )))
}

/* =========================
Create
========================= */
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body(
        content = NewAttendance,
        description = "Attendance record to add",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Record created", body = Object, example = json!({
            "success": true,
            "data": {"id": 1, "user_id": 42, "date": "2024-01-01", "time": "08:00:00", "status": "hadir"},
            "message": "New attendance record has been added"
        })),
        (status = 400, description = "Missing field or invalid status"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    state: web::Data<AppState>,
    payload: web::Json<NewAttendance>,
) -> Result<HttpResponse, ApiError> {
    let record = state
        .store
        .insert(payload.into_inner())
        .await
        .map_err(|e| state.store_failure(e, "Failed to add attendance record"))?;

    tracing::info!(id = record.id, user_id = record.user_id, "Attendance record added");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        record,
        "New attendance record has been added",
    )))
}

/* =========================
Update
========================= */
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(
        ("id" = u64, Path, description = "Attendance record id")
    ),
    request_body = AttendanceUpdate,
    responses(
        (status = 200, description = "Record updated", body = Object, example = json!({
            "success": true,
            "message": "Attendance record has been updated"
        })),
        (status = 404, description = "Record not found", body = Object, example = json!({
            "success": false,
            "message": "Attendance record not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<AttendanceUpdate>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let affected = state
        .store
        .update(id, payload.into_inner())
        .await
        .map_err(|e| state.store_failure(e, "Failed to update attendance record"))?;

    if affected == 0 {
        return Err(ApiError::not_found(RECORD_NOT_FOUND));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::done("Attendance record has been updated")))
}

/* =========================
Delete
========================= */
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id" = u64, Path, description = "Attendance record id")
    ),
    responses(
        (status = 200, description = "Record deleted", body = Object, example = json!({
            "success": true,
            "message": "Attendance record has been deleted"
        })),
        (status = 404, description = "Record not found", body = Object, example = json!({
            "success": false,
            "message": "Attendance record not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let affected = state
        .store
        .delete(id)
        .await
        .map_err(|e| state.store_failure(e, "Failed to delete attendance record"))?;

    if affected == 0 {
        return Err(ApiError::not_found(RECORD_NOT_FOUND));
    }

    tracing::info!(id, "Attendance record deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::done("Attendance record has been deleted")))
}

/* =========================
Global status summary
========================= */
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    responses(
        (status = 200, description = "Count per status over every record", body = Object, example = json!({
            "success": true,
            "data": {"hadir": 120, "izin": 4, "sakit": 3, "alpha": 1},
            "message": "Attendance summary successfully fetched"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_summary(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let records = state
        .store
        .find_all(RecordFilter::all(), RecordOrder::Insertion)
        .await
        .map_err(|e| state.store_failure(e, "Failed to fetch attendance summary"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        StatusSummary::tally(&records),
        "Attendance summary successfully fetched",
    )))
}

/* =========================
Grouped range analysis
========================= */
#[utoipa::path(
    post,
    path = "/api/attendance/analysis",
    request_body(
        content = AnalysisRequest,
        description = "Inclusive date range and grouping field",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Per-group attendance rates", body = Object, example = json!({
            "status": "success",
            "data": [{
                "group": "hadir",
                "total_users": 2,
                "total_attendance": {"hadir": 2, "izin": 0, "sakit": 0, "alpha": 0},
                "total": 2,
                "attendance_rate": {
                    "hadir_percentage": 100.0,
                    "izin_percentage": 0.0,
                    "sakit_percentage": 0.0,
                    "alpha_percentage": 0.0
                }
            }],
            "message": "Attendance analysis successfully fetched"
        })),
        (status = 400, description = "Missing or invalid input", body = Object, example = json!({
            "status": "error",
            "message": "start_date, end_date, and group_by are required"
        })),
        (status = 404, description = "No records in range", body = Object, example = json!({
            "status": "error",
            "message": "No attendance records found for the given criteria"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_analysis(
    state: web::Data<AppState>,
    payload: web::Json<AnalysisRequest>,
) -> Result<HttpResponse, ReportError> {
    let params = payload.validate()?;

    let records = state
        .store
        .find_all(
            RecordFilter::between(params.start_date, params.end_date),
            RecordOrder::Insertion,
        )
        .await
        .map_err(|e| state.store_failure(e, "Failed to fetch attendance analysis"))?;

    if records.is_empty() {
        return Err(ApiError::not_found("No attendance records found for the given criteria").into());
    }

    let groups = analyze_by_group(&records, params.group_by);
    tracing::debug!(
        records = records.len(),
        groups = groups.len(),
        group_by = params.group_by.as_ref(),
        "Attendance analysis"
    );

    Ok(HttpResponse::Ok().json(ReportResponse::ok(
        groups,
        "Attendance analysis successfully fetched",
    )))
}
