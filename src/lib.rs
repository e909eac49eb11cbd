//! Imports & Exports trade dashboard.
//!
//! Loads a sampled trade CSV, filters it by date range, shipping method and
//! payment terms, and aggregates the filtered rows into the dashboard charts.

pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod gui;
pub mod headless;
pub mod stats;
