//! File input and output: hourly profile CSVs and result exports.

pub mod export;
pub mod profile;
