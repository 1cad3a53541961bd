use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::{AttendanceStore, RecordFilter, RecordOrder, StoreError};
use crate::model::attendance::{AttendanceRecord, AttendanceUpdate, NewAttendance};

#[derive(Default)]
struct Inner {
    last_id: u64,
    records: BTreeMap<u64, AttendanceRecord>,
}

/// Process-local store with the same contract as the MySQL adapter.
/// Ids start at 1 and are never handed out twice.
#[derive(Default)]
pub struct MemoryAttendanceStore {
    inner: RwLock<Inner>,
}

impl MemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated by inserting `records` in order.
    pub fn with_records(records: impl IntoIterator<Item = NewAttendance>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.write().unwrap_or_else(|e| e.into_inner());
            for record in records {
                insert_locked(&mut inner, record);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn insert_locked(inner: &mut Inner, record: NewAttendance) -> AttendanceRecord {
    inner.last_id += 1;
    let now = Utc::now();
    let stored = AttendanceRecord {
        id: inner.last_id,
        user_id: record.user_id,
        date: record.date,
        time: record.time,
        status: record.status,
        created_at: Some(now),
        updated_at: Some(now),
    };
    inner.records.insert(stored.id, stored.clone());
    stored
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    async fn insert(&self, record: NewAttendance) -> Result<AttendanceRecord, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(insert_locked(&mut inner, record))
    }

    async fn update(&self, id: u64, changes: AttendanceUpdate) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        match inner.records.get_mut(&id) {
            Some(record) => {
                record.date = changes.date;
                record.time = changes.time;
                record.status = changes.status;
                record.updated_at = Some(Utc::now());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: u64) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.records.remove(&id).map_or(0, |_| 1))
    }

    async fn find_all(
        &self,
        filter: RecordFilter,
        order: RecordOrder,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut records: Vec<AttendanceRecord> = inner
            .records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        if order == RecordOrder::DateDesc {
            // stable sort keeps ascending id within a date
            records.sort_by(|a, b| b.date.cmp(&a.date));
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;
    use chrono::{NaiveDate, NaiveTime};

    fn new_record(user_id: u64, day: u32, status: AttendanceStatus) -> NewAttendance {
        NewAttendance {
            user_id,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            status,
        }
    }

    #[actix_web::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryAttendanceStore::new();
        let first = store
            .insert(new_record(1, 1, AttendanceStatus::Hadir))
            .await
            .unwrap();
        assert_eq!(store.delete(first.id).await.unwrap(), 1);

        let second = store
            .insert(new_record(1, 2, AttendanceStatus::Izin))
            .await
            .unwrap();
        assert!(second.id > first.id);
        assert_eq!(store.delete(first.id).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn update_reports_affected_rows() {
        let store = MemoryAttendanceStore::with_records([new_record(1, 1, AttendanceStatus::Hadir)]);
        let changes = AttendanceUpdate {
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            status: AttendanceStatus::Sakit,
        };

        assert_eq!(store.update(1, changes.clone()).await.unwrap(), 1);
        assert_eq!(store.update(99, changes).await.unwrap(), 0);

        let all = store.find_all(RecordFilter::all(), RecordOrder::Insertion).await.unwrap();
        assert_eq!(all[0].status, AttendanceStatus::Sakit);
        assert_eq!(all[0].user_id, 1);
    }

    #[actix_web::test]
    async fn find_all_applies_filter_and_order() {
        let store = MemoryAttendanceStore::with_records([
            new_record(1, 3, AttendanceStatus::Hadir),
            new_record(2, 5, AttendanceStatus::Alpha),
            new_record(1, 9, AttendanceStatus::Izin),
            new_record(1, 5, AttendanceStatus::Sakit),
        ]);

        let history = store
            .find_all(RecordFilter::for_user(1), RecordOrder::DateDesc)
            .await
            .unwrap();
        let days: Vec<u32> = history.iter().map(|r| chrono::Datelike::day(&r.date)).collect();
        assert_eq!(days, vec![9, 5, 3]);

        let range = store
            .find_all(
                RecordFilter::between(
                    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
                ),
                RecordOrder::Insertion,
            )
            .await
            .unwrap();
        let ids: Vec<u64> = range.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }
}
