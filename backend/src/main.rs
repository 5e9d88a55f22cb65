use std::net::SocketAddr;

use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

mod db;
mod domain;
mod rest;
mod storage;

use rest::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Setting up database");
    let db = db::DbConnection::init().await?;
    let state = AppState::new(db);

    // CORS setup to allow the frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/babies", post(rest::register_baby).get(rest::list_babies))
        .route("/babies/:baby_number", get(rest::get_baby))
        .route("/babies/:baby_number/records", post(rest::save_record))
        .route(
            "/babies/:baby_number/records/:record_id",
            delete(rest::delete_record),
        )
        .route(
            "/babies/:baby_number/slots/:date/:time",
            delete(rest::delete_slot),
        )
        .route("/babies/:baby_number/summary/daily", get(rest::daily_summary))
        .route("/babies/:baby_number/summary/weekly", get(rest::weekly_summary))
        .route("/babies/:baby_number/analysis", get(rest::analysis));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
