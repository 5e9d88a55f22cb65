use anyhow::Result;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::db::DbConnection;
use crate::domain::baby_service::parse_iso_date;
use crate::domain::models::record::RecordEntry;
use crate::domain::DomainError;
use crate::storage::{BabyRepository, RecordRepository};
use shared::{DeleteSlotResponse, RecordType, SaveRecordRequest, SaveRecordResponse};

/// Service for writing care records: upserts by identity key, tombstone
/// deletes, and the slot-wide delete used by the daily table.
#[derive(Clone)]
pub struct RecordService {
    records: RecordRepository,
    babies: BabyRepository,
}

impl RecordService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            records: RecordRepository::new(db.clone()),
            babies: BabyRepository::new(db),
        }
    }

    /// Upsert one record, optionally co-writing the day's weight sample.
    ///
    /// The two writes are issued sequentially and independently; a crash
    /// between them leaves the first persisted and the second not.
    pub async fn save_record(
        &self,
        baby_number: &str,
        request: SaveRecordRequest,
    ) -> Result<SaveRecordResponse> {
        info!(
            "Saving record for {}: {} {} = {}",
            baby_number, request.date, request.record_type, request.value
        );

        self.ensure_baby(baby_number).await?;
        let entry = build_entry(&request)?;
        let record_id = self.records.upsert_record(baby_number, &entry).await?;

        let weight_record_id = match request.weight {
            Some(weight) => {
                let weight_entry = RecordEntry {
                    date: entry.date,
                    time: None,
                    record_type: RecordType::Weight,
                    value: weight,
                };
                Some(self.records.upsert_record(baby_number, &weight_entry).await?)
            }
            None => None,
        };

        Ok(SaveRecordResponse { record_id, weight_record_id })
    }

    /// Tombstone a single record by document id.
    pub async fn delete_record(&self, baby_number: &str, record_id: &str) -> Result<()> {
        info!("Deleting record {} for {}", record_id, baby_number);

        self.ensure_baby(baby_number).await?;
        if !self.records.tombstone(baby_number, record_id).await? {
            return Err(DomainError::RecordNotFound(record_id.to_string()).into());
        }
        Ok(())
    }

    /// Tombstone every tracked type at one time slot. Each sub-delete is
    /// independent; a failed one is logged and skipped, leaving whatever
    /// the earlier writes produced.
    pub async fn delete_slot(
        &self,
        baby_number: &str,
        date: &str,
        time: &str,
    ) -> Result<DeleteSlotResponse> {
        info!("Deleting slot {} {} for {}", date, time, baby_number);

        self.ensure_baby(baby_number).await?;
        let date = parse_iso_date(date)?;
        validate_time(time)?;

        let mut tombstoned = 0;
        for record_type in RecordType::TRACKED {
            let record_id = RecordEntry::make_document_id(date, Some(time), record_type);
            match self.records.tombstone(baby_number, &record_id).await {
                Ok(true) => tombstoned += 1,
                Ok(false) => {}
                Err(e) => warn!("Failed to tombstone {}: {:?}", record_id, e),
            }
        }

        Ok(DeleteSlotResponse { tombstoned })
    }

    async fn ensure_baby(&self, baby_number: &str) -> Result<()> {
        if self.babies.get_baby(baby_number).await?.is_none() {
            return Err(DomainError::BabyNotFound(baby_number.to_string()).into());
        }
        Ok(())
    }
}

fn build_entry(request: &SaveRecordRequest) -> Result<RecordEntry> {
    let date = parse_iso_date(&request.date)?;

    let time = if request.record_type.has_time() {
        let time = request
            .time
            .as_deref()
            .ok_or_else(|| DomainError::InvalidInput(format!(
                "time is required for {} records",
                request.record_type
            )))?;
        validate_time(time)?;
        Some(time.to_string())
    } else {
        // Weight is keyed per day; any provided time is dropped
        None
    };

    Ok(RecordEntry {
        date,
        time,
        record_type: request.record_type,
        value: request.value,
    })
}

fn validate_time(time: &str) -> Result<()> {
    let valid = time.is_ascii()
        && time.len() == 5
        && time.as_bytes()[2] == b':'
        && time[..2].parse::<u32>().map(|h| h < 24).unwrap_or(false)
        && time[3..].parse::<u32>().map(|m| m < 60).unwrap_or(false);
    if !valid {
        return Err(DomainError::InvalidInput(format!("invalid time: {}", time)).into());
    }
    Ok(())
}
