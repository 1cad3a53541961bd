use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};
use strum_macros::{AsRefStr, EnumIter, EnumString, IntoStaticStr};
use utoipa::ToSchema;

use crate::model::attendance::{AttendanceRecord, AttendanceStatus, DATE_FORMAT, TIME_FORMAT};

/* =========================
Keyword search
========================= */

/// Case-sensitive substring match against status, date and time renderings.
pub fn matches_keyword(record: &AttendanceRecord, keyword: &str) -> bool {
    record.status.as_ref().contains(keyword)
        || record.date_string().contains(keyword)
        || record.time_string().contains(keyword)
}

/// Keeps every record the keyword matches. An empty keyword keeps everything.
pub fn filter_by_keyword(records: Vec<AttendanceRecord>, keyword: &str) -> Vec<AttendanceRecord> {
    if keyword.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| matches_keyword(r, keyword))
        .collect()
}

/* =========================
Status tally
========================= */

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusSummary {
    #[schema(example = 120)]
    pub hadir: u64,
    #[schema(example = 4)]
    pub izin: u64,
    #[schema(example = 3)]
    pub sakit: u64,
    #[schema(example = 1)]
    pub alpha: u64,
}

impl StatusSummary {
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.count(record.status);
        }
        summary
    }

    pub fn count(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Hadir => self.hadir += 1,
            AttendanceStatus::Izin => self.izin += 1,
            AttendanceStatus::Sakit => self.sakit += 1,
            AttendanceStatus::Alpha => self.alpha += 1,
        }
    }

    pub fn get(&self, status: AttendanceStatus) -> u64 {
        match status {
            AttendanceStatus::Hadir => self.hadir,
            AttendanceStatus::Izin => self.izin,
            AttendanceStatus::Sakit => self.sakit,
            AttendanceStatus::Alpha => self.alpha,
        }
    }

    pub fn total(&self) -> u64 {
        self.hadir + self.izin + self.sakit + self.alpha
    }
}

/* =========================
Grouped range analysis
========================= */

/// Fields a range analysis may be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum GroupField {
    Id,
    #[strum(to_string = "user_id", serialize = "id_user", serialize = "userId")]
    UserId,
    Date,
    Time,
    Status,
}

impl GroupField {
    pub fn key_of(self, record: &AttendanceRecord) -> GroupKey {
        match self {
            GroupField::Id => GroupKey::Id(record.id),
            GroupField::UserId => GroupKey::UserId(record.user_id),
            GroupField::Date => GroupKey::Date(record.date),
            GroupField::Time => GroupKey::Time(record.time),
            GroupField::Status => GroupKey::Status(record.status),
        }
    }
}

/// Value of the grouped field. Ids serialize as numbers, the rest as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Id(u64),
    UserId(u64),
    Date(NaiveDate),
    Time(NaiveTime),
    Status(AttendanceStatus),
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupKey::Id(v) | GroupKey::UserId(v) => serializer.serialize_u64(*v),
            GroupKey::Date(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
            GroupKey::Time(t) => serializer.collect_str(&t.format(TIME_FORMAT)),
            GroupKey::Status(s) => serializer.serialize_str(s.as_ref()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct AttendanceRate {
    #[schema(example = 75.0)]
    pub hadir_percentage: f64,
    #[schema(example = 12.5)]
    pub izin_percentage: f64,
    #[schema(example = 12.5)]
    pub sakit_percentage: f64,
    #[schema(example = 0.0)]
    pub alpha_percentage: f64,
}

impl AttendanceRate {
    /// Unrounded `count / total * 100`. NaN for an empty tally.
    pub fn from_summary(summary: &StatusSummary) -> Self {
        let total = summary.total() as f64;
        let pct = |count: u64| (count as f64 / total) * 100.0;

        Self {
            hadir_percentage: pct(summary.hadir),
            izin_percentage: pct(summary.izin),
            sakit_percentage: pct(summary.sakit),
            alpha_percentage: pct(summary.alpha),
        }
    }

    pub fn sum(&self) -> f64 {
        self.hadir_percentage + self.izin_percentage + self.sakit_percentage + self.alpha_percentage
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GroupSummary {
    #[schema(value_type = Object, example = "hadir")]
    pub group: GroupKey,
    /// Records that fell into the group.
    #[schema(example = 8)]
    pub total_users: u64,
    pub total_attendance: StatusSummary,
    #[schema(example = 8)]
    pub total: u64,
    pub attendance_rate: AttendanceRate,
}

/// Partitions `records` by `field` and computes per-group rates. Groups come
/// out in the order their key first appears in `records`.
pub fn analyze_by_group(records: &[AttendanceRecord], field: GroupField) -> Vec<GroupSummary> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: HashMap<GroupKey, (u64, StatusSummary)> = HashMap::new();

    for record in records {
        let key = field.key_of(record);
        let entry = groups.entry(key).or_insert_with(|| {
            order.push(key);
            (0, StatusSummary::default())
        });
        entry.0 += 1;
        entry.1.count(record.status);
    }

    order
        .into_iter()
        .filter_map(|key| groups.remove(&key).map(|group| (key, group)))
        .map(|(key, (total_users, tally))| GroupSummary {
            group: key,
            total_users,
            total_attendance: tally,
            total: tally.total(),
            attendance_rate: AttendanceRate::from_summary(&tally),
        })
        .collect()
}
