//! Advisory rule engine: fixed-order threshold rules over the weekly
//! rollup. The engine emits locale-independent message codes; prose lives
//! in the localization catalog.

use anyhow::Result;
use tracing::info;

use crate::db::DbConnection;
use crate::domain::localization::{localize, Locale};
use crate::domain::summary::SummaryService;
use shared::{AdvisoryMessage, AnalysisResponse, DaySummary, LocalizedAdvisory};

/// Below this average daily intake (ml) the low-intake warning fires.
pub const AVG_INTAKE_WARNING_ML: i64 = 400;

/// Above this day-to-day spread (ml) the variability warning fires.
pub const VARIABILITY_WARNING_ML: f64 = 200.0;

const WEEK_DAYS: f64 = 7.0;

/// Evaluate the rules in fixed order; message order is rule order.
///
/// Rules 1 and 2 always contribute one message each. Rule 3 contributes
/// only when both the first and last day carry a weight sample. Rule 4
/// contributes one message whenever the week has any days at all.
pub fn generate_advisory(days: &[DaySummary]) -> Vec<AdvisoryMessage> {
    let mut messages = Vec::new();

    // Rule 1: average daily intake across the week
    let total: f64 = days.iter().map(|d| d.total_feeding_ml).sum();
    let avg_ml = (total / WEEK_DAYS).round() as i64;
    if avg_ml < AVG_INTAKE_WARNING_ML {
        messages.push(AdvisoryMessage::LowAverageIntake { avg_ml });
    } else {
        messages.push(AdvisoryMessage::AdequateAverageIntake { avg_ml });
    }

    // Rule 2: spread between the highest and lowest day.
    // Extracted milk is excluded here; only formula plus converted
    // nursing counts, matching the weekly total-intake column.
    let daily_intake = |d: &DaySummary| d.feeding_total + d.breast_to_ml;
    let max = days.iter().map(daily_intake).fold(f64::MIN, f64::max);
    let min = days.iter().map(daily_intake).fold(f64::MAX, f64::min);
    let range = if days.is_empty() { 0.0 } else { max - min };
    let range_ml = range.round() as i64;
    if range > VARIABILITY_WARNING_ML {
        messages.push(AdvisoryMessage::HighVariability { range_ml });
    } else {
        messages.push(AdvisoryMessage::StableIntake { range_ml });
    }

    // Rule 3: weight trend, first day vs last day
    if let (Some(first), Some(last)) = (
        days.first().and_then(|d| d.weight),
        days.last().and_then(|d| d.weight),
    ) {
        let delta = last - first;
        if delta < 0.0 {
            messages.push(AdvisoryMessage::WeightDecreased { from_kg: first, to_kg: last });
        } else if delta == 0.0 {
            messages.push(AdvisoryMessage::WeightUnchanged);
        } else {
            messages.push(AdvisoryMessage::WeightIncreased { delta_kg: delta });
        }
    }

    // Rule 4: stool regularity
    if !days.is_empty() {
        let zero_days = days.iter().filter(|d| d.poop_count == 0).count() as u32;
        if zero_days >= 3 {
            messages.push(AdvisoryMessage::ConstipationRisk { zero_days });
        } else if zero_days == 0 {
            messages.push(AdvisoryMessage::RegularStools);
        } else {
            messages.push(AdvisoryMessage::IrregularStools);
        }
    }

    messages
}

/// Service layering localization on top of the rule engine: fetch the
/// weekly rollup, run the rules, attach display text.
#[derive(Clone)]
pub struct AdvisoryService {
    summary: SummaryService,
}

impl AdvisoryService {
    pub fn new(db: DbConnection) -> Self {
        Self { summary: SummaryService::new(db) }
    }

    pub async fn analyze(
        &self,
        baby_number: &str,
        end_date: &str,
        locale: Locale,
    ) -> Result<AnalysisResponse> {
        let week = self.summary.weekly(baby_number, end_date).await?;
        let messages = generate_advisory(&week.days);
        info!(
            "Analysis for {} ending {}: {} messages",
            baby_number, week.end_date, messages.len()
        );

        Ok(AnalysisResponse {
            end_date: week.end_date,
            locale: locale.as_str().to_string(),
            messages: messages
                .into_iter()
                .map(|message| LocalizedAdvisory {
                    severity: message.severity(),
                    text: localize(&message, locale),
                    message,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str) -> DaySummary {
        DaySummary {
            date: date.to_string(),
            feeding_total: 0.0,
            breast_direct_total: 0.0,
            breast_extracted_total: 0.0,
            breast_to_ml: 0.0,
            total_feeding_ml: 0.0,
            urine_count: 0,
            poop_count: 0,
            weight: None,
            recommended_min: None,
            recommended_max: None,
            evaluation: None,
        }
    }

    fn week_with_feeding(daily_ml: [f64; 7]) -> Vec<DaySummary> {
        daily_ml
            .iter()
            .enumerate()
            .map(|(i, &ml)| {
                let mut d = day(&format!("2025-08-{:02}", 14 + i));
                d.feeding_total = ml;
                d.total_feeding_ml = ml;
                d.poop_count = 1;
                d
            })
            .collect()
    }

    #[test]
    fn test_empty_week_gets_low_and_stable_only() {
        let messages = generate_advisory(&[]);
        assert_eq!(
            messages,
            vec![
                AdvisoryMessage::LowAverageIntake { avg_ml: 0 },
                AdvisoryMessage::StableIntake { range_ml: 0 },
            ]
        );
    }

    #[test]
    fn test_average_intake_threshold() {
        // 399 avg warns, 400 avg confirms
        let low = week_with_feeding([399.0; 7]);
        assert!(matches!(
            generate_advisory(&low)[0],
            AdvisoryMessage::LowAverageIntake { avg_ml: 399 }
        ));

        let ok = week_with_feeding([400.0; 7]);
        assert!(matches!(
            generate_advisory(&ok)[0],
            AdvisoryMessage::AdequateAverageIntake { avg_ml: 400 }
        ));
    }

    #[test]
    fn test_average_includes_extracted_milk() {
        // 300 formula + 150 extracted per day pushes the average past 400
        let mut days = week_with_feeding([300.0; 7]);
        for d in &mut days {
            d.breast_extracted_total = 150.0;
            d.total_feeding_ml = 450.0;
        }
        assert!(matches!(
            generate_advisory(&days)[0],
            AdvisoryMessage::AdequateAverageIntake { avg_ml: 450 }
        ));
    }

    #[test]
    fn test_variability_threshold_is_exclusive_at_200() {
        let exactly = week_with_feeding([500.0, 500.0, 500.0, 500.0, 500.0, 300.0, 500.0]);
        assert!(matches!(
            generate_advisory(&exactly)[1],
            AdvisoryMessage::StableIntake { range_ml: 200 }
        ));

        let above = week_with_feeding([500.0, 500.0, 500.0, 500.0, 500.0, 299.0, 500.0]);
        assert!(matches!(
            generate_advisory(&above)[1],
            AdvisoryMessage::HighVariability { range_ml: 201 }
        ));
    }

    #[test]
    fn test_weight_trend_needs_both_samples() {
        let mut days = week_with_feeding([500.0; 7]);
        days[6].weight = Some(5.2);
        let messages = generate_advisory(&days);
        assert!(!messages
            .iter()
            .any(|m| m.code().starts_with("weight")));
    }

    #[test]
    fn test_weight_decreased_carries_both_values() {
        let mut days = week_with_feeding([500.0; 7]);
        days[0].weight = Some(5.4);
        days[6].weight = Some(5.1);
        let messages = generate_advisory(&days);
        assert!(messages.contains(&AdvisoryMessage::WeightDecreased {
            from_kg: 5.4,
            to_kg: 5.1
        }));
    }

    #[test]
    fn test_weight_unchanged_and_increased() {
        let mut days = week_with_feeding([500.0; 7]);
        days[0].weight = Some(5.0);
        days[6].weight = Some(5.0);
        assert!(generate_advisory(&days).contains(&AdvisoryMessage::WeightUnchanged));

        days[6].weight = Some(5.25);
        let messages = generate_advisory(&days);
        let increased = messages
            .iter()
            .find_map(|m| match m {
                AdvisoryMessage::WeightIncreased { delta_kg } => Some(*delta_kg),
                _ => None,
            })
            .unwrap();
        assert!((increased - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_stool_regularity_scenarios() {
        let with_poop = |counts: [u32; 7]| {
            let mut days = week_with_feeding([500.0; 7]);
            for (d, c) in days.iter_mut().zip(counts) {
                d.poop_count = c;
            }
            generate_advisory(&days)
        };

        // Three zero-days warn
        let messages = with_poop([1, 1, 0, 1, 1, 0, 0]);
        assert!(messages.contains(&AdvisoryMessage::ConstipationRisk { zero_days: 3 }));

        // Every day covered confirms
        let messages = with_poop([1, 1, 1, 1, 1, 1, 1]);
        assert!(messages.contains(&AdvisoryMessage::RegularStools));

        // Two zero-days is irregular, not a warning
        let messages = with_poop([1, 0, 1, 1, 1, 1, 0]);
        assert!(messages.contains(&AdvisoryMessage::IrregularStools));
        assert!(!messages.iter().any(|m| m.code() == "constipation_risk"));
    }

    #[test]
    fn test_message_order_is_rule_order() {
        let mut days = week_with_feeding([500.0; 7]);
        days[0].weight = Some(5.0);
        days[6].weight = Some(5.3);

        let codes: Vec<&str> = generate_advisory(&days).iter().map(|m| m.code()).collect();
        assert_eq!(
            codes,
            vec![
                "adequate_average_intake",
                "stable_intake",
                "weight_increased",
                "regular_stools",
            ]
        );
    }

    mod service {
        use super::*;
        use shared::{Gender, RecordType, RegisterBabyRequest, SaveRecordRequest, Severity};

        const BABY: &str = "20250309-01";

        async fn setup() -> (AdvisoryService, crate::domain::record_service::RecordService) {
            let db = DbConnection::init_test().await.expect("Failed to init test DB");
            let baby_service = crate::domain::baby_service::BabyService::new(db.clone());
            baby_service
                .register(RegisterBabyRequest {
                    name: "Jun".to_string(),
                    birthdate: "2025-03-09".to_string(),
                    gender: Gender::Male,
                })
                .await
                .unwrap();
            (
                AdvisoryService::new(db.clone()),
                crate::domain::record_service::RecordService::new(db),
            )
        }

        #[tokio::test]
        async fn test_analyze_localizes_messages() {
            let (advisory, records) = setup().await;
            records
                .save_record(
                    BABY,
                    SaveRecordRequest {
                        date: "2025-08-20".to_string(),
                        time: Some("09:00".to_string()),
                        record_type: RecordType::Feeding,
                        value: 120.0,
                        weight: None,
                    },
                )
                .await
                .unwrap();

            let analysis = advisory.analyze(BABY, "2025-08-20", Locale::En).await.unwrap();
            assert_eq!(analysis.locale, "en");
            assert_eq!(analysis.end_date, "2025-08-20");
            assert!(!analysis.messages.is_empty());
            assert_eq!(analysis.messages[0].severity, Severity::Warning);
            assert!(analysis.messages[0].text.contains("17"), "avg of 120/7 rounds to 17");
        }
    }
}
