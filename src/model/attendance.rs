use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::store::StoreError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Attendance status. Closed set; anything else is rejected at the boundary.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    /// present
    Hadir,
    /// excused leave
    Izin,
    /// sick
    Sakit,
    /// unexcused absence
    Alpha,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "user_id": 42,
        "date": "2024-01-01",
        "time": "08:00:00",
        "status": "hadir",
        "created_at": "2024-01-01T08:00:05Z",
        "updated_at": "2024-01-01T08:00:05Z"
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 42)]
    pub user_id: u64,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "08:00:00", value_type = String, format = "time")]
    pub time: NaiveTime,

    pub status: AttendanceStatus,

    #[schema(example = "2024-01-01T08:00:05Z", format = "date-time", value_type = String, nullable = true)]
    pub created_at: Option<DateTime<Utc>>,

    #[schema(example = "2024-01-01T08:00:05Z", format = "date-time", value_type = String, nullable = true)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    /// `YYYY-MM-DD`, the rendering keyword search matches against.
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// `HH:MM:SS`, the rendering keyword search matches against.
    pub fn time_string(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }
}

/// Raw row as stored in `attendance_records`.
#[derive(Debug, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: u64,
    pub user_id: u64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = AttendanceStatus::from_str(&row.status)
            .map_err(|_| StoreError::InvalidStatus(row.status.clone()))?;

        Ok(AttendanceRecord {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            time: row.time,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Fields accepted on insert.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewAttendance {
    #[schema(example = 42)]
    #[serde(alias = "id_user")]
    pub user_id: u64,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "08:00:00", value_type = String, format = "time")]
    pub time: NaiveTime,

    #[schema(example = "hadir")]
    pub status: AttendanceStatus,
}

/// Full replacement of the mutable fields. `user_id` is fixed after creation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AttendanceUpdate {
    #[schema(example = "2024-01-02", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "07:55:00", value_type = String, format = "time")]
    pub time: NaiveTime,

    #[schema(example = "izin")]
    pub status: AttendanceStatus,
}
