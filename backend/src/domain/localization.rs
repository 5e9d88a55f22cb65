//! Display-text catalog for advisory messages. Three locales, Korean
//! fallback, mirroring the app's translation setup. The rule engine only
//! emits codes and parameters; this is the one place prose is written.

use shared::AdvisoryMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    En,
    Ko,
    Vi,
}

impl Locale {
    pub const FALLBACK: Locale = Locale::Ko;

    /// Parse a locale tag, falling back to the default for anything
    /// unknown or absent.
    pub fn parse_or_fallback(tag: Option<&str>) -> Locale {
        match tag {
            Some("en") => Locale::En,
            Some("ko") => Locale::Ko,
            Some("vi") => Locale::Vi,
            _ => Locale::FALLBACK,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ko => "ko",
            Locale::Vi => "vi",
        }
    }
}

/// Render one advisory message in the given locale.
pub fn localize(message: &AdvisoryMessage, locale: Locale) -> String {
    use AdvisoryMessage::*;
    match locale {
        Locale::En => match message {
            LowAverageIntake { avg_ml } => format!(
                "Average daily intake is low ({} ml). Check that the baby is feeding enough.",
                avg_ml
            ),
            AdequateAverageIntake { avg_ml } => {
                format!("Average daily intake is adequate ({} ml).", avg_ml)
            }
            HighVariability { range_ml } => format!(
                "Daily intake varies a lot ({} ml between the highest and lowest day).",
                range_ml
            ),
            StableIntake { range_ml } => {
                format!("Daily intake is stable ({} ml spread).", range_ml)
            }
            WeightDecreased { from_kg, to_kg } => {
                format!("Weight decreased ({}kg to {}kg).", from_kg, to_kg)
            }
            WeightUnchanged => "No weight change this week.".to_string(),
            WeightIncreased { delta_kg } => format!("Weight increased (+{:.2}kg).", delta_kg),
            ConstipationRisk { zero_days } => format!(
                "{} of the last 7 days had no stool. Watch for constipation.",
                zero_days
            ),
            RegularStools => "Stools are regular, one or more every day.".to_string(),
            IrregularStools => "The stool pattern is irregular this week.".to_string(),
        },
        Locale::Ko => match message {
            LowAverageIntake { avg_ml } => format!(
                "하루 평균 수유량이 적어요 ({}ml). 충분히 먹고 있는지 확인해주세요.",
                avg_ml
            ),
            AdequateAverageIntake { avg_ml } => {
                format!("하루 평균 수유량이 적정 수준입니다 ({}ml).", avg_ml)
            }
            HighVariability { range_ml } => {
                format!("하루 수유량 편차가 커요 (최대-최소 {}ml).", range_ml)
            }
            StableIntake { range_ml } => format!("수유량이 안정적입니다 ({}ml 차이).", range_ml),
            WeightDecreased { from_kg, to_kg } => {
                format!("체중이 감소했어요 ({}kg → {}kg).", from_kg, to_kg)
            }
            WeightUnchanged => "이번 주 동안 체중 변화가 없었습니다.".to_string(),
            WeightIncreased { delta_kg } => format!("체중이 증가했어요! (+{:.2}kg)", delta_kg),
            ConstipationRisk { zero_days } => format!(
                "최근 7일 중 {}일은 대변이 없었어요. 변비 여부를 확인해주세요.",
                zero_days
            ),
            RegularStools => "배변이 매일 규칙적으로 있었습니다.".to_string(),
            IrregularStools => "이번 주 배변 패턴이 불규칙합니다.".to_string(),
        },
        Locale::Vi => match message {
            LowAverageIntake { avg_ml } => format!(
                "Lượng sữa trung bình mỗi ngày còn thấp ({}ml). Hãy kiểm tra bé có bú đủ không.",
                avg_ml
            ),
            AdequateAverageIntake { avg_ml } => {
                format!("Lượng sữa trung bình mỗi ngày ở mức phù hợp ({}ml).", avg_ml)
            }
            HighVariability { range_ml } => format!(
                "Lượng sữa giữa các ngày chênh lệch nhiều ({}ml).",
                range_ml
            ),
            StableIntake { range_ml } => {
                format!("Lượng sữa hằng ngày ổn định (chênh lệch {}ml).", range_ml)
            }
            WeightDecreased { from_kg, to_kg } => {
                format!("Cân nặng giảm ({}kg → {}kg).", from_kg, to_kg)
            }
            WeightUnchanged => "Cân nặng không thay đổi trong tuần này.".to_string(),
            WeightIncreased { delta_kg } => format!("Cân nặng tăng (+{:.2}kg).", delta_kg),
            ConstipationRisk { zero_days } => format!(
                "{} trong 7 ngày qua bé không đi ngoài. Cần chú ý táo bón.",
                zero_days
            ),
            RegularStools => "Bé đi ngoài đều đặn mỗi ngày.".to_string(),
            IrregularStools => "Nhịp đi ngoài tuần này chưa đều.".to_string(),
        },
    }
}
