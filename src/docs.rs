use crate::api::attendance::{AnalysisRequest, FindRequest};
use crate::model::attendance::{
    AttendanceRecord, AttendanceStatus, AttendanceUpdate, NewAttendance,
};
use crate::utils::attendance_stats::{AttendanceRate, GroupSummary, StatusSummary};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "0.1.0",
        description = r#"
## Attendance Recording Service

Records attendance events for employees or students and reports on them.

### 🔹 Key Features
- **Attendance Records**
  - Add, update, delete and list attendance records
  - Per-user history, newest date first
  - Keyword search over status, date and time
- **Reporting**
  - Global count per status
  - Per-group attendance rates over a date range

### 🏷️ Status values
`hadir` (present), `izin` (excused leave), `sakit` (sick), `alpha` (unexcused absence).

### 📦 Response Format
- Record, search and summary endpoints: `{success, data?, message}`
- Analysis endpoint: `{status: "success" | "error", data?, message}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::list_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,
        crate::api::attendance::attendance_history,
        crate::api::attendance::find_attendance,
        crate::api::attendance::attendance_summary,
        crate::api::attendance::attendance_analysis
    ),
    components(
        schemas(
            AttendanceRecord,
            AttendanceStatus,
            NewAttendance,
            AttendanceUpdate,
            FindRequest,
            AnalysisRequest,
            StatusSummary,
            AttendanceRate,
            GroupSummary
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance recording and reporting APIs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_attendance_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/attendance",
            "/api/attendance/{id}",
            "/api/attendance/history/{user_id}",
            "/api/attendance/find",
            "/api/attendance/summary",
            "/api/attendance/analysis",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected} in {paths:?}"
            );
        }
    }
}
