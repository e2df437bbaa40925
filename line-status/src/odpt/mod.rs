//! ODPT (Open Data Public Transportation) API client.
//!
//! Fetches stations, railways and live train locations for one operator
//! from the ODPT v4 REST API.
//!
//! Key characteristics of the feed:
//! - Records are JSON-LD objects keyed by prefixed names (`owl:sameAs`,
//!   `odpt:stationOrder`, ...)
//! - Any field may be missing; identifiers are opaque strings
//! - Train locations are a point-in-time snapshot with no history

mod client;
mod error;
mod types;

pub use client::{CONSUMER_KEY_PARAM, OdptClient, OdptConfig};
pub use error::OdptError;
pub use types::{LocalizedText, Railway, Station, StationOrder, Train, decode_records};
