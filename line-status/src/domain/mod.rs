//! Domain types for ODPT line status.
//!
//! Identifiers from the open-data feed are opaque tokens. These types only
//! guarantee they are non-blank, so a raw identifier can always be shown to
//! a user when nothing better is available.

mod operator;
mod railway;
mod station;

pub use operator::{InvalidOperatorId, OperatorId};
pub use railway::{InvalidRailwayId, RailwayId};
pub use station::{InvalidStationId, StationId};
