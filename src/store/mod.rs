//! Persistence boundary for attendance records.
//!
//! Handlers only talk to [`AttendanceStore`]; the MySQL adapter is used by the
//! server and the in-memory one by tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::Display;

use crate::model::attendance::{AttendanceRecord, AttendanceUpdate, NewAttendance};

pub mod memory;
pub mod mysql;

pub use memory::MemoryAttendanceStore;
pub use mysql::MySqlAttendanceStore;

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "{}", _0)]
    Database(sqlx::Error),

    #[display(fmt = "invalid attendance status '{}' in store", _0)]
    InvalidStatus(String),

    #[display(fmt = "attendance store lock poisoned")]
    Poisoned,
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

/// Which records `find_all` returns. Empty filter means every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub user_id: Option<u64>,
    /// Inclusive on both ends.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: u64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            date_range: Some((start, end)),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if let Some(user_id) = self.user_id {
            if record.user_id != user_id {
                return false;
            }
        }
        match self.date_range {
            Some((start, end)) => start <= record.date && record.date <= end,
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordOrder {
    /// Store order (ascending id).
    #[default]
    Insertion,
    /// Newest date first.
    DateDesc,
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Inserts a record and returns it with its assigned id.
    async fn insert(&self, record: NewAttendance) -> Result<AttendanceRecord, StoreError>;

    /// Replaces date, time and status. Returns the number of rows matched.
    async fn update(&self, id: u64, changes: AttendanceUpdate) -> Result<u64, StoreError>;

    /// Returns the number of rows removed.
    async fn delete(&self, id: u64) -> Result<u64, StoreError>;

    async fn find_all(
        &self,
        filter: RecordFilter,
        order: RecordOrder,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;
}
