//! ODPT line status.
//!
//! Fetches stations, railways and live train locations for one rail
//! operator from the ODPT open-data API, saves the raw responses, and
//! renders a compact per-line view of where trains currently are.

pub mod config;
pub mod domain;
pub mod odpt;
pub mod preview;
pub mod snapshot;
pub mod store;
