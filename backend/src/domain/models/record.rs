use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::RecordType;

/// A single care record. The identity key is `(date, time, record_type)`;
/// weight records carry no time and use a fixed per-day key, so at most
/// one weight sample exists per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub date: NaiveDate,
    /// HH:MM; `None` only for weight records
    pub time: Option<String>,
    pub record_type: RecordType,
    pub value: f64,
}

impl RecordEntry {
    /// The document id under `babies/{baby}/records`. A later write with
    /// the same id fully overwrites the earlier one.
    pub fn document_id(&self) -> String {
        Self::make_document_id(self.date, self.time.as_deref(), self.record_type)
    }

    pub fn make_document_id(date: NaiveDate, time: Option<&str>, record_type: RecordType) -> String {
        let date = date.format("%Y-%m-%d");
        if record_type == RecordType::Weight {
            format!("{}-weight", date)
        } else {
            format!("{}-{}-{}", date, time.unwrap_or(""), record_type.as_str())
        }
    }
}
