//! SQLite-backed repositories realizing the persistent record store:
//! document-style rows keyed by string ids, full-overwrite upserts, and
//! explicit tombstones instead of true removal.

pub mod baby_repository;
pub mod record_repository;

pub use baby_repository::BabyRepository;
pub use record_repository::RecordRepository;
