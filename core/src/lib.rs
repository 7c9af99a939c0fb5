//! expansion-core: synthetic retail data generation and regional
//! expansion analysis.
//!
//! Pipeline: generator -> aggregate -> modeling -> insights, driven by
//! `engine::AnalysisEngine`. Output sinks live in `export`, `db` and
//! `charts`.

pub mod aggregate;
pub mod charts;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod export;
pub mod generator;
pub mod insights;
pub mod modeling;
pub mod rng;
pub mod types;
