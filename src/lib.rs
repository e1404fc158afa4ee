//! # dayplan
//!
//! A daily planner that splits each day into morning, afternoon and evening
//! blocks. An in-memory HTTP API holds the tasks; a terminal UI and a set of
//! CLI commands talk to it.
//!
//! ## Usage
//!
//! ```bash
//! # Start the API on 0.0.0.0:5000 with a sample day of tasks
//! dayplan serve
//!
//! # Open the interactive planner against it
//! dayplan
//!
//! # Or drive it from scripts
//! dayplan add "Write report" --block afternoon --priority
//! dayplan list --date 2026-10-19
//! dayplan routine 2026-10-20
//! ```
//!
//! Selecting a future day with fewer than three tasks seeds a daily routine of
//! thirteen tasks, one of them a main activity picked by weekday.

pub mod api;
pub mod calendar;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod query;
pub mod routine;
pub mod server;
pub mod state;
pub mod store;
pub mod tui;
