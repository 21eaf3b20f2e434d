//! Migrant Dashboard - migrant counts by district and the exchange-rate series.
//!
//! The data pipeline (`data`, `stats`) is usable without the GUI.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod stats;
