//! Aggregation engine: pure functions turning a flat list of records into
//! the daily time-slot table and the trailing 7-day rollup. Nothing here
//! is persisted; everything is recomputed from the record list per fetch.

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::db::DbConnection;
use crate::domain::baby_service::parse_iso_date;
use crate::domain::models::record::RecordEntry;
use crate::domain::DomainError;
use crate::storage::{BabyRepository, RecordRepository};
use shared::{DailyRow, DailySheet, DailyTotals, DaySummary, Evaluation, RecordType, WeeklySummary};

/// Fixed conversion: one minute of direct nursing counts as 5 ml.
pub const BREAST_ML_PER_MINUTE: f64 = 5.0;

/// Recommended daily intake band, ml per kg of body weight per day.
pub const RECOMMENDED_MIN_ML_PER_KG: f64 = 120.0;
pub const RECOMMENDED_MAX_ML_PER_KG: f64 = 160.0;

const WEEK_DAYS: i64 = 7;

/// Build the daily table for one date: one row per distinct time among
/// the day's tracked entries, plus a totals row.
pub fn daily_sheet(records: &[RecordEntry], date: NaiveDate) -> DailySheet {
    let day_records: Vec<&RecordEntry> = records
        .iter()
        .filter(|r| r.date == date && r.record_type.has_time())
        .collect();

    // Distinct times ascending; a missing time sorts first as "".
    let mut times: Vec<String> = day_records
        .iter()
        .map(|r| r.time.clone().unwrap_or_default())
        .collect();
    times.sort();
    times.dedup();

    let rows: Vec<DailyRow> = times
        .iter()
        .map(|time| DailyRow {
            time: time.clone(),
            feeding: slot_value(&day_records, time, RecordType::Feeding),
            breastmilk: slot_value(&day_records, time, RecordType::Breastmilk),
            breastmilk_ml: slot_value(&day_records, time, RecordType::BreastmilkMl),
            urine: slot_value(&day_records, time, RecordType::Urine),
            poop: slot_value(&day_records, time, RecordType::Poop),
        })
        .collect();

    let totals = DailyTotals {
        feeding: column_sum(&rows, |r| r.feeding),
        breastmilk: column_sum(&rows, |r| r.breastmilk),
        breastmilk_ml: column_sum(&rows, |r| r.breastmilk_ml),
        urine: column_sum(&rows, |r| r.urine),
        poop: column_sum(&rows, |r| r.poop),
    };

    DailySheet {
        date: date.format("%Y-%m-%d").to_string(),
        rows,
        totals,
    }
}

/// The single value at `(time, record_type)`, or `None` when the slot is
/// empty. The store overwrites by identity key, so duplicates never reach
/// this lookup.
fn slot_value(day_records: &[&RecordEntry], time: &str, record_type: RecordType) -> Option<f64> {
    day_records
        .iter()
        .find(|r| r.record_type == record_type && r.time.as_deref().unwrap_or("") == time)
        .map(|r| r.value)
}

fn column_sum(rows: &[DailyRow], cell: impl Fn(&DailyRow) -> Option<f64>) -> f64 {
    rows.iter().filter_map(cell).sum()
}

/// Roll records up into the trailing 7-day window `[end - 6, end]`,
/// oldest day first. Always exactly 7 rows, however many records exist.
pub fn weekly_summary(records: &[RecordEntry], end_date: NaiveDate) -> WeeklySummary {
    let days = (0..WEEK_DAYS)
        .map(|i| {
            let date = end_date - Duration::days(WEEK_DAYS - 1 - i);
            summarize_day(records, date)
        })
        .collect();

    WeeklySummary {
        end_date: end_date.format("%Y-%m-%d").to_string(),
        days,
    }
}

fn summarize_day(records: &[RecordEntry], date: NaiveDate) -> DaySummary {
    let day_records: Vec<&RecordEntry> = records.iter().filter(|r| r.date == date).collect();

    let sum_of = |ty: RecordType| -> f64 {
        day_records
            .iter()
            .filter(|r| r.record_type == ty)
            .map(|r| r.value)
            .sum()
    };
    // Each diaper entry counts as one event, whatever its value
    let count_of = |ty: RecordType| -> u32 {
        day_records.iter().filter(|r| r.record_type == ty).count() as u32
    };

    let feeding_total = sum_of(RecordType::Feeding);
    let breast_direct_total = sum_of(RecordType::Breastmilk);
    let breast_extracted_total = sum_of(RecordType::BreastmilkMl);
    let breast_to_ml = breast_direct_total * BREAST_ML_PER_MINUTE;
    let total_feeding_ml = feeding_total + breast_extracted_total + breast_to_ml;

    let weight = day_records
        .iter()
        .find(|r| r.record_type == RecordType::Weight)
        .map(|r| r.value);

    let recommended_min = weight.map(|w| (w * RECOMMENDED_MIN_ML_PER_KG).round() as i64);
    let recommended_max = weight.map(|w| (w * RECOMMENDED_MAX_ML_PER_KG).round() as i64);

    // Boundaries are inclusive on the adequate side
    let evaluation = match (recommended_min, recommended_max) {
        (Some(min), Some(max)) => Some(if total_feeding_ml < min as f64 {
            Evaluation::Insufficient
        } else if total_feeding_ml > max as f64 {
            Evaluation::Excessive
        } else {
            Evaluation::Adequate
        }),
        _ => None,
    };

    DaySummary {
        date: date.format("%Y-%m-%d").to_string(),
        feeding_total,
        breast_direct_total,
        breast_extracted_total,
        breast_to_ml,
        total_feeding_ml,
        urine_count: count_of(RecordType::Urine),
        poop_count: count_of(RecordType::Poop),
        weight,
        recommended_min,
        recommended_max,
        evaluation,
    }
}

/// Service tying the aggregation functions to the record store: fetch the
/// window from the repository, then compute.
#[derive(Clone)]
pub struct SummaryService {
    records: RecordRepository,
    babies: BabyRepository,
}

impl SummaryService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            records: RecordRepository::new(db.clone()),
            babies: BabyRepository::new(db),
        }
    }

    /// Daily table for one date.
    pub async fn daily(&self, baby_number: &str, date: &str) -> Result<DailySheet> {
        self.ensure_baby(baby_number).await?;
        let date = parse_iso_date(date)?;

        let records = self.records.list_range(baby_number, date, date).await?;
        info!("Daily sheet for {} on {}: {} records", baby_number, date, records.len());
        Ok(daily_sheet(&records, date))
    }

    /// Trailing 7-day rollup ending at `end_date`.
    pub async fn weekly(&self, baby_number: &str, end_date: &str) -> Result<WeeklySummary> {
        self.ensure_baby(baby_number).await?;
        let end = parse_iso_date(end_date)?;
        let start = end - Duration::days(WEEK_DAYS - 1);

        let records = self.records.list_range(baby_number, start, end).await?;
        info!(
            "Weekly summary for {} ending {}: {} records",
            baby_number, end, records.len()
        );
        Ok(weekly_summary(&records, end))
    }

    async fn ensure_baby(&self, baby_number: &str) -> Result<()> {
        if self.babies.get_baby(baby_number).await?.is_none() {
            return Err(DomainError::BabyNotFound(baby_number.to_string()).into());
        }
        Ok(())
    }
}
