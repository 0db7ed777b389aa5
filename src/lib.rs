//! # Burn Pipelines API
#![forbid(unsafe_code)]

/// Models
pub mod models;

/// Pipelines
pub mod pipelines;

/// HTTP API
pub mod api;

/// YAML configuration
pub mod config;

/// Terminal visualization of predictions
pub mod visualize;

/// Utilities
pub mod utils;

/// Error macros
#[macro_use]
extern crate anyhow;
