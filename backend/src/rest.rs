use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use crate::domain::advisory::AdvisoryService;
use crate::domain::baby_service::BabyService;
use crate::domain::localization::Locale;
use crate::domain::record_service::RecordService;
use crate::domain::summary::SummaryService;
use crate::domain::DomainError;
use shared::{RegisterBabyRequest, SaveRecordRequest};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub baby_service: BabyService,
    pub record_service: RecordService,
    pub summary_service: SummaryService,
    pub advisory_service: AdvisoryService,
}

impl AppState {
    pub fn new(db: crate::db::DbConnection) -> Self {
        Self {
            baby_service: BabyService::new(db.clone()),
            record_service: RecordService::new(db.clone()),
            summary_service: SummaryService::new(db.clone()),
            advisory_service: AdvisoryService::new(db),
        }
    }
}

/// Map a service error to a response: typed domain errors become client
/// errors, anything else is a store failure.
fn error_response(e: anyhow::Error) -> Response {
    match e.downcast_ref::<DomainError>() {
        Some(DomainError::BabyNotFound(_)) | Some(DomainError::RecordNotFound(_)) => {
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        Some(DomainError::InvalidInput(_)) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        None => {
            tracing::error!("Store operation failed: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Store operation failed").into_response()
        }
    }
}

/// Query parameters for summary endpoints; the date defaults to today.
#[derive(Deserialize, Debug)]
pub struct DateQuery {
    pub date: Option<String>,
}

impl DateQuery {
    fn date_or_today(&self) -> String {
        self.date
            .clone()
            .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string())
    }
}

/// Query parameters for the analysis endpoint
#[derive(Deserialize, Debug)]
pub struct AnalysisQuery {
    pub date: Option<String>,
    pub locale: Option<String>,
}

/// POST /api/babies
pub async fn register_baby(
    State(state): State<AppState>,
    Json(request): Json<RegisterBabyRequest>,
) -> impl IntoResponse {
    info!("POST /api/babies - name: {}", request.name);

    match state.baby_service.register(request).await {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/babies
pub async fn list_babies(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/babies");

    match state.baby_service.list_babies().await {
        Ok(babies) => (StatusCode::OK, Json(babies)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/babies/:baby_number
pub async fn get_baby(
    State(state): State<AppState>,
    Path(baby_number): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/babies/{}", baby_number);

    match state.baby_service.get_baby(&baby_number).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/babies/:baby_number/records
pub async fn save_record(
    State(state): State<AppState>,
    Path(baby_number): Path<String>,
    Json(request): Json<SaveRecordRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/babies/{}/records - {} {}",
        baby_number, request.date, request.record_type
    );

    match state.record_service.save_record(&baby_number, request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/babies/:baby_number/records/:record_id
pub async fn delete_record(
    State(state): State<AppState>,
    Path((baby_number, record_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/babies/{}/records/{}", baby_number, record_id);

    match state.record_service.delete_record(&baby_number, &record_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/babies/:baby_number/slots/:date/:time
pub async fn delete_slot(
    State(state): State<AppState>,
    Path((baby_number, date, time)): Path<(String, String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/babies/{}/slots/{}/{}", baby_number, date, time);

    match state.record_service.delete_slot(&baby_number, &date, &time).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/babies/:baby_number/summary/daily
pub async fn daily_summary(
    State(state): State<AppState>,
    Path(baby_number): Path<String>,
    Query(query): Query<DateQuery>,
) -> impl IntoResponse {
    info!("GET /api/babies/{}/summary/daily - query: {:?}", baby_number, query);

    match state.summary_service.daily(&baby_number, &query.date_or_today()).await {
        Ok(sheet) => (StatusCode::OK, Json(sheet)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/babies/:baby_number/summary/weekly
pub async fn weekly_summary(
    State(state): State<AppState>,
    Path(baby_number): Path<String>,
    Query(query): Query<DateQuery>,
) -> impl IntoResponse {
    info!("GET /api/babies/{}/summary/weekly - query: {:?}", baby_number, query);

    match state.summary_service.weekly(&baby_number, &query.date_or_today()).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/babies/:baby_number/analysis
pub async fn analysis(
    State(state): State<AppState>,
    Path(baby_number): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> impl IntoResponse {
    info!("GET /api/babies/{}/analysis - query: {:?}", baby_number, query);

    let locale = Locale::parse_or_fallback(query.locale.as_deref());
    let date = query
        .date
        .clone()
        .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());

    match state.advisory_service.analyze(&baby_number, &date, locale).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(e),
    }
}
