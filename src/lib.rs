//! Multi-factor allocation of incoming support tickets to assignment groups.
//!
//! The `allocation` module holds the decision engine and its adapter seams;
//! `config`, `telemetry`, and `error` carry the process-level plumbing used
//! by the binary.

pub mod allocation;
pub mod config;
pub mod error;
pub mod telemetry;
