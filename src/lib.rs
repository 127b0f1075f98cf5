//! Composite performance ratings for motorsport drivers and constructors.
//!
//! Per-event scores are built from up to five component signals, adjusted
//! for car strength, accumulated through a season and averaged across
//! history with empirical-Bayes shrinkage.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod output;
pub mod report;
pub mod scoring;
pub mod season;
pub mod simulate;
pub mod stats;
pub mod store;

pub use error::ScoreError;
