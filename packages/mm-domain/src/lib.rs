pub mod backfill;
pub mod plan;
pub mod scoring;
