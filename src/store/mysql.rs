use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use super::{AttendanceStore, RecordFilter, RecordOrder, StoreError};
use crate::model::attendance::{
    AttendanceRecord, AttendanceRow, AttendanceUpdate, NewAttendance,
};

// status is an ENUM column; cast so it decodes as a plain string
const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, date, time, CAST(status AS CHAR) AS status, created_at, updated_at
    FROM attendance_records
"#;

#[derive(Clone)]
pub struct MySqlAttendanceStore {
    pool: MySqlPool,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: u64) -> Result<AttendanceRecord, StoreError> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        AttendanceRecord::try_from(row)
    }
}

/// Rows with a status outside the known set are dropped, not fatal.
fn records_from_rows(rows: Vec<AttendanceRow>) -> Vec<AttendanceRecord> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match AttendanceRecord::try_from(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(id, error = %e, "Skipping attendance row with unknown status");
                    None
                }
            }
        })
        .collect()
}

fn push_filter(query: &mut QueryBuilder<'_, MySql>, filter: RecordFilter) {
    query.push(" WHERE 1=1");

    if let Some(user_id) = filter.user_id {
        query.push(" AND user_id = ").push_bind(user_id);
    }

    if let Some((start, end)) = filter.date_range {
        query
            .push(" AND date BETWEEN ")
            .push_bind(start)
            .push(" AND ")
            .push_bind(end);
    }
}

fn order_clause(order: RecordOrder) -> &'static str {
    match order {
        RecordOrder::Insertion => " ORDER BY id ASC",
        RecordOrder::DateDesc => " ORDER BY date DESC, id ASC",
    }
}

#[async_trait]
impl AttendanceStore for MySqlAttendanceStore {
    async fn insert(&self, record: NewAttendance) -> Result<AttendanceRecord, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_records (user_id, date, time, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.user_id)
        .bind(record.date)
        .bind(record.time)
        .bind(record.status.as_ref())
        .execute(&self.pool)
        .await?;

        self.fetch_by_id(result.last_insert_id()).await
    }

    async fn update(&self, id: u64, changes: AttendanceUpdate) -> Result<u64, StoreError> {
        // sqlx connects with CLIENT_FOUND_ROWS, so unchanged rows still count
        let result = sqlx::query(
            r#"
            UPDATE attendance_records
            SET date = ?, time = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.date)
        .bind(changes.time)
        .bind(changes.status.as_ref())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: u64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM attendance_records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_all(
        &self,
        filter: RecordFilter,
        order: RecordOrder,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut query = QueryBuilder::<MySql>::new(SELECT_COLUMNS);
        push_filter(&mut query, filter);
        query.push(order_clause(order));

        let rows = query
            .build_query_as::<AttendanceRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records_from_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;
    use chrono::{NaiveDate, NaiveTime};

    fn row(id: u64, status: &str) -> AttendanceRow {
        AttendanceRow {
            id,
            user_id: 4,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            status: status.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn rows_with_unknown_status_are_skipped() {
        let rows = vec![
            row(1, "hadir"),
            row(2, ""),
            row(3, "cuti"),
            row(4, "alpha"),
        ];

        let records = records_from_rows(rows);

        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(records[0].status, AttendanceStatus::Hadir);
        assert_eq!(records[1].status, AttendanceStatus::Alpha);
    }

    #[test]
    fn builds_filtered_select() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let filter = RecordFilter {
            user_id: Some(9),
            date_range: Some((start, end)),
        };

        let mut query = QueryBuilder::<MySql>::new(SELECT_COLUMNS);
        push_filter(&mut query, filter);
        query.push(order_clause(RecordOrder::DateDesc));
        let sql = query.sql();

        assert!(sql.contains("WHERE 1=1 AND user_id = ? AND date BETWEEN ? AND ?"));
        assert!(sql.trim_end().ends_with("ORDER BY date DESC, id ASC"));
    }

    #[test]
    fn unfiltered_select_has_no_bind_params() {
        let mut query = QueryBuilder::<MySql>::new(SELECT_COLUMNS);
        push_filter(&mut query, RecordFilter::all());
        query.push(order_clause(RecordOrder::Insertion));

        assert!(!query.sql().contains('?'));
        assert!(query.sql().ends_with("ORDER BY id ASC"));
    }
}
