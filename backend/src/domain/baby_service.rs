use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::info;

use crate::db::DbConnection;
use crate::domain::models::baby::Baby;
use crate::domain::DomainError;
use crate::storage::BabyRepository;
use shared::{BabyDetailResponse, BabyProfile, RegisterBabyRequest};

/// Service for the baby registry: registration with generated numbers,
/// lookup, and listing.
#[derive(Clone)]
pub struct BabyService {
    babies: BabyRepository,
}

impl BabyService {
    pub fn new(db: DbConnection) -> Self {
        Self { babies: BabyRepository::new(db) }
    }

    /// Register a new baby and assign its number.
    pub async fn register(&self, request: RegisterBabyRequest) -> Result<BabyProfile> {
        info!("Registering baby: name={}, birthdate={}", request.name, request.birthdate);

        if request.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("name must not be empty".to_string()).into());
        }
        let birthdate = parse_iso_date(&request.birthdate)?;

        let baby_number = self.generate_baby_number(birthdate).await?;
        let baby = Baby {
            baby_number,
            name: request.name.trim().to_string(),
            birthdate,
            gender: request.gender,
        };

        self.babies.store_baby(&baby).await?;
        info!("Registered baby {} as {}", baby.name, baby.baby_number);
        Ok(baby.to_dto())
    }

    /// Next number for a birthdate: `YYYYMMDD-NN`, NN = registrations so
    /// far with that birthdate prefix + 1, zero-padded to two digits.
    async fn generate_baby_number(&self, birthdate: NaiveDate) -> Result<String> {
        let prefix = birthdate.format("%Y%m%d").to_string();
        let existing = self.babies.count_with_prefix(&prefix).await?;
        Ok(Baby::generate_number(birthdate, existing + 1))
    }

    /// Profile plus the derived age in days.
    pub async fn get_baby(&self, baby_number: &str) -> Result<BabyDetailResponse> {
        let baby = self
            .babies
            .get_baby(baby_number)
            .await?
            .ok_or_else(|| DomainError::BabyNotFound(baby_number.to_string()))?;

        let today = Local::now().date_naive();
        Ok(BabyDetailResponse {
            days_since_birth: baby.days_since_birth(today),
            profile: baby.to_dto(),
        })
    }

    /// List all registered babies, newest number first.
    pub async fn list_babies(&self) -> Result<Vec<BabyProfile>> {
        let babies = self.babies.list_babies().await?;
        info!("Found {} babies", babies.len());
        Ok(babies.iter().map(Baby::to_dto).collect())
    }
}

pub(crate) fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidInput(format!("invalid date: {}", s)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Gender;

    async fn create_test_service() -> BabyService {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        BabyService::new(db)
    }

    fn register_request(name: &str, birthdate: &str) -> RegisterBabyRequest {
        RegisterBabyRequest {
            name: name.to_string(),
            birthdate: birthdate.to_string(),
            gender: Gender::Male,
        }
    }

    #[tokio::test]
    async fn test_register_generates_sequential_numbers() {
        let service = create_test_service().await;

        let first = service.register(register_request("Jun", "2025-03-09")).await.unwrap();
        let second = service.register(register_request("Min", "2025-03-09")).await.unwrap();
        let other_day = service.register(register_request("Sora", "2025-04-01")).await.unwrap();

        assert_eq!(first.baby_number, "20250309-01");
        assert_eq!(second.baby_number, "20250309-02");
        assert_eq!(other_day.baby_number, "20250401-01");
    }

    #[tokio::test]
    async fn test_register_rejects_empty_name() {
        let service = create_test_service().await;
        let err = service.register(register_request("   ", "2025-03-09")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_birthdate() {
        let service = create_test_service().await;
        let err = service.register(register_request("Jun", "09-03-2025")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_get_baby_reports_days_since_birth() {
        let service = create_test_service().await;
        let profile = service.register(register_request("Jun", "2025-03-09")).await.unwrap();

        let detail = service.get_baby(&profile.baby_number).await.unwrap();
        assert_eq!(detail.profile, profile);
        assert!(detail.days_since_birth >= 0);
    }

    #[tokio::test]
    async fn test_get_unknown_baby_is_not_found() {
        let service = create_test_service().await;
        let err = service.get_baby("20250309-01").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::BabyNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_babies_sorted_by_number_descending() {
        let service = create_test_service().await;
        service.register(register_request("Jun", "2025-03-09")).await.unwrap();
        service.register(register_request("Sora", "2025-04-01")).await.unwrap();

        let babies = service.list_babies().await.unwrap();
        let numbers: Vec<&str> = babies.iter().map(|b| b.baby_number.as_str()).collect();
        assert_eq!(numbers, vec!["20250401-01", "20250309-01"]);
    }
}
