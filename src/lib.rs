//! Weighted class averages and threshold statistics over learner score records.

pub mod averages;
pub mod config;
pub mod csv_records;
pub mod db;
pub mod error;
pub mod logging;
pub mod math;
pub mod models;
pub mod queries;
pub mod report;
pub mod source;
pub mod stats;
