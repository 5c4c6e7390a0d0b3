use chrono::{NaiveTime, TimeDelta};

use super::model::{
    DailyRecord, DailyRow, DailyTable, DayType, HourlyRecord, HourlyRow, HourlyTable, Labels,
};

// ---------------------------------------------------------------------------
// Categorical enrichment: raw codes → labels, day type and timestamp
// ---------------------------------------------------------------------------

/// Attach labels to every daily record. The input slice is left untouched.
pub fn enrich_daily(records: &[DailyRecord]) -> DailyTable {
    records.iter().map(enrich_daily_record).collect()
}

/// Attach labels, day type and timestamp to every hourly record.
pub fn enrich_hourly(records: &[HourlyRecord]) -> HourlyTable {
    records.iter().map(enrich_hourly_record).collect()
}

pub fn enrich_daily_record(record: &DailyRecord) -> DailyRow {
    DailyRow {
        labels: Labels::from_codes(record.season, record.weather, record.year),
        record: record.clone(),
    }
}

pub fn enrich_hourly_record(record: &HourlyRecord) -> HourlyRow {
    let datetime =
        record.date.and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(record.hour));
    HourlyRow {
        labels: Labels::from_codes(record.season, record.weather, record.year),
        day_type: DayType::from_weekday(record.weekday),
        datetime,
        record: record.clone(),
    }
}
