use serde::{Deserialize, Serialize};
use std::fmt;

/// Baby gender as recorded at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// The canonical record vocabulary.
///
/// `Feeding` is formula in ml, `Breastmilk` is direct nursing in minutes,
/// `BreastmilkMl` is extracted breastmilk in ml, `Urine`/`Poop` are diaper
/// events, `Weight` is a once-per-day sample in kg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Feeding,
    Breastmilk,
    BreastmilkMl,
    Urine,
    Poop,
    Weight,
}

impl RecordType {
    /// The five types that appear in daily time-slot rows.
    /// Weight is excluded: it is keyed per day, not per time.
    pub const TRACKED: [RecordType; 5] = [
        RecordType::Feeding,
        RecordType::Breastmilk,
        RecordType::BreastmilkMl,
        RecordType::Urine,
        RecordType::Poop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Feeding => "feeding",
            RecordType::Breastmilk => "breastmilk",
            RecordType::BreastmilkMl => "breastmilk_ml",
            RecordType::Urine => "urine",
            RecordType::Poop => "poop",
            RecordType::Weight => "weight",
        }
    }

    pub fn parse(s: &str) -> Option<RecordType> {
        match s {
            "feeding" => Some(RecordType::Feeding),
            "breastmilk" => Some(RecordType::Breastmilk),
            "breastmilk_ml" => Some(RecordType::BreastmilkMl),
            "urine" => Some(RecordType::Urine),
            "poop" => Some(RecordType::Poop),
            "weight" => Some(RecordType::Weight),
            _ => None,
        }
    }

    /// Whether the identity key of this type includes a time-of-day.
    pub fn has_time(&self) -> bool {
        !matches!(self, RecordType::Weight)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Baby profile as returned by the API.
/// `baby_number` is the document id, format `YYYYMMDD-NN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabyProfile {
    pub baby_number: String,
    pub name: String,
    /// ISO date (YYYY-MM-DD)
    pub birthdate: String,
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterBabyRequest {
    pub name: String,
    /// ISO date (YYYY-MM-DD)
    pub birthdate: String,
    pub gender: Gender,
}

/// Profile detail with the derived age in days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabyDetailResponse {
    pub profile: BabyProfile,
    pub days_since_birth: i64,
}

/// Upsert one record. The identity key `(date, time, record_type)` decides
/// which document is written; a second save with the same key overwrites.
///
/// `weight` optionally co-writes the day's weight document as a separate,
/// independent write (mirroring the combined entry form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecordRequest {
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    /// HH:MM, required for every type except weight
    pub time: Option<String>,
    pub record_type: RecordType,
    pub value: f64,
    /// Optional weight (kg) saved alongside the record
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecordResponse {
    pub record_id: String,
    pub weight_record_id: Option<String>,
}

/// Result of tombstoning every tracked type at one time slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteSlotResponse {
    pub tombstoned: u32,
}

/// One time slot of the daily table. A `None` cell means no record exists
/// at that slot, which is distinct from a recorded zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
    pub time: String,
    pub feeding: Option<f64>,
    pub breastmilk: Option<f64>,
    pub breastmilk_ml: Option<f64>,
    pub urine: Option<f64>,
    pub poop: Option<f64>,
}

/// Column sums across the day; empty cells count as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub feeding: f64,
    pub breastmilk: f64,
    pub breastmilk_ml: f64,
    pub urine: f64,
    pub poop: f64,
}

/// The daily table: one row per distinct time plus a totals row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySheet {
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    pub rows: Vec<DailyRow>,
    pub totals: DailyTotals,
}

/// Verdict comparing total intake against the weight-based recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    Insufficient,
    Adequate,
    Excessive,
}

/// Per-day rollup within the weekly window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    /// Formula intake (ml)
    pub feeding_total: f64,
    /// Direct nursing (minutes)
    pub breast_direct_total: f64,
    /// Extracted breastmilk (ml)
    pub breast_extracted_total: f64,
    /// Direct nursing converted to ml (5 ml per minute)
    pub breast_to_ml: f64,
    /// feeding + extracted + converted (ml)
    pub total_feeding_ml: f64,
    pub urine_count: u32,
    pub poop_count: u32,
    /// The day's weight sample (kg), if recorded
    pub weight: Option<f64>,
    pub recommended_min: Option<i64>,
    pub recommended_max: Option<i64>,
    pub evaluation: Option<Evaluation>,
}

/// Seven-day rollup: one `DaySummary` per calendar day in the trailing
/// window `[end_date - 6, end_date]`, oldest first. Always 7 rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// ISO date (YYYY-MM-DD) of the last day in the window
    pub end_date: String,
    pub days: Vec<DaySummary>,
}

/// How a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Confirmation,
    Info,
}

/// Locale-independent advisory output. Display text is looked up in the
/// localization catalog from the code plus parameters; the engine never
/// emits prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum AdvisoryMessage {
    LowAverageIntake { avg_ml: i64 },
    AdequateAverageIntake { avg_ml: i64 },
    HighVariability { range_ml: i64 },
    StableIntake { range_ml: i64 },
    WeightDecreased { from_kg: f64, to_kg: f64 },
    WeightUnchanged,
    WeightIncreased { delta_kg: f64 },
    ConstipationRisk { zero_days: u32 },
    RegularStools,
    IrregularStools,
}

impl AdvisoryMessage {
    pub fn code(&self) -> &'static str {
        match self {
            AdvisoryMessage::LowAverageIntake { .. } => "low_average_intake",
            AdvisoryMessage::AdequateAverageIntake { .. } => "adequate_average_intake",
            AdvisoryMessage::HighVariability { .. } => "high_variability",
            AdvisoryMessage::StableIntake { .. } => "stable_intake",
            AdvisoryMessage::WeightDecreased { .. } => "weight_decreased",
            AdvisoryMessage::WeightUnchanged => "weight_unchanged",
            AdvisoryMessage::WeightIncreased { .. } => "weight_increased",
            AdvisoryMessage::ConstipationRisk { .. } => "constipation_risk",
            AdvisoryMessage::RegularStools => "regular_stools",
            AdvisoryMessage::IrregularStools => "irregular_stools",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AdvisoryMessage::LowAverageIntake { .. }
            | AdvisoryMessage::HighVariability { .. }
            | AdvisoryMessage::WeightDecreased { .. }
            | AdvisoryMessage::ConstipationRisk { .. } => Severity::Warning,
            AdvisoryMessage::AdequateAverageIntake { .. }
            | AdvisoryMessage::StableIntake { .. }
            | AdvisoryMessage::WeightIncreased { .. }
            | AdvisoryMessage::RegularStools => Severity::Confirmation,
            AdvisoryMessage::WeightUnchanged | AdvisoryMessage::IrregularStools => Severity::Info,
        }
    }
}

/// One advisory message with its localized display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedAdvisory {
    #[serde(flatten)]
    pub message: AdvisoryMessage,
    pub severity: Severity,
    pub text: String,
}

/// Response of the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// ISO date (YYYY-MM-DD) of the last day of the analyzed window
    pub end_date: String,
    pub locale: String,
    pub messages: Vec<LocalizedAdvisory>,
}
