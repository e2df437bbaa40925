//! Line status preview.
//!
//! Turns a snapshot of railways and live train locations into a compact
//! text view of one line: its stations in order, each marked with how many
//! trains are currently there.
//!
//! Everything here is pure and synchronous. Missing or malformed data never
//! produces an error; it degrades to fallback labels, zero counts, or a
//! notice that the line is unknown.

mod occupancy;
mod order;
mod render;


pub use occupancy::Occupancy;
pub use order::{StationEntry, StationOrderIndex};
pub use render::{
    DEFAULT_LANG, LinePreview, LinePreviewer, Marker, Stop, build_line_preview,
    missing_line_message, render_line_preview,
};
