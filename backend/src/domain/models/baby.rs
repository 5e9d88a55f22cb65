use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{BabyProfile, Gender};

/// Domain model representing a registered baby.
/// The baby number doubles as the document id and is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baby {
    pub baby_number: String,
    pub name: String,
    pub birthdate: NaiveDate,
    pub gender: Gender,
}

impl Baby {
    /// Build the baby number for a birthdate and a 1-indexed sequence
    /// number: `YYYYMMDD-NN`, NN zero-padded to two digits.
    pub fn generate_number(birthdate: NaiveDate, sequence: u32) -> String {
        format!("{}-{:02}", birthdate.format("%Y%m%d"), sequence)
    }

    /// Whole days elapsed since birth as of `today`.
    pub fn days_since_birth(&self, today: NaiveDate) -> i64 {
        (today - self.birthdate).num_days()
    }

    pub fn to_dto(&self) -> BabyProfile {
        BabyProfile {
            baby_number: self.baby_number.clone(),
            name: self.name.clone(),
            birthdate: self.birthdate.format("%Y-%m-%d").to_string(),
            gender: self.gender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_number_pads_sequence() {
        let birthdate = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(Baby::generate_number(birthdate, 1), "20250309-01");
        assert_eq!(Baby::generate_number(birthdate, 12), "20250309-12");
    }

    #[test]
    fn test_days_since_birth() {
        let baby = Baby {
            baby_number: "20250301-01".to_string(),
            name: "Hana".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            gender: Gender::Female,
        };
        let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(baby.days_since_birth(today), 30);
    }
}
