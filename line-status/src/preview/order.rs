//! Station order index: railway → stations in line order.
//!
//! ODPT railways carry their stations as `odpt:stationOrder` entries with an
//! `odpt:index` ordinal. The feed does not promise any particular array
//! order, so the index sorts each line by ordinal.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{RailwayId, StationId};
use crate::odpt::{Railway, StationOrder};

/// A station's position on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationEntry {
    /// `None` for entries the feed lists by title only; no train can be
    /// attributed to those.
    pub station: Option<StationId>,
    /// Display label: Japanese title, else English, else the raw id.
    pub title: String,
    /// Ordinal from `odpt:index`; 0 when the feed omits it.
    pub index: i64,
}

impl StationEntry {
    /// Build an entry from a station order record.
    ///
    /// Returns `None` if the record has neither a title nor a station
    /// identifier.
    pub fn from_order(order: &StationOrder) -> Option<Self> {
        let station = order.station.clone();

        let title = order
            .station_title
            .as_ref()
            .and_then(|t| t.ja().or_else(|| t.en()))
            .or_else(|| station.as_ref().map(StationId::as_str))?
            .to_string();

        Some(StationEntry {
            station,
            title,
            // Missing ordinals sort to the front of the line.
            index: order.index.unwrap_or(0),
        })
    }
}

/// Ordered station lists for every railway in a snapshot.
#[derive(Debug, Clone, Default)]
pub struct StationOrderIndex {
    lines: HashMap<RailwayId, Vec<StationEntry>>,
}

impl StationOrderIndex {
    /// Build the index from a railway collection.
    ///
    /// Railways without an identifier are skipped, as are order entries with
    /// neither a station nor a title. A railway with no order entries maps to
    /// an empty list. If a railway id appears more than once, the last
    /// record's order is kept.
    pub fn build(railways: &[Railway]) -> Self {
        let mut lines: HashMap<RailwayId, Vec<StationEntry>> = HashMap::new();

        for railway in railways {
            let Some(id) = &railway.same_as else {
                debug!("skipping railway record without owl:sameAs");
                continue;
            };

            let order = railway.station_order();
            let mut entries: Vec<StationEntry> =
                order.iter().filter_map(StationEntry::from_order).collect();

            if entries.len() < order.len() {
                debug!(
                    railway = %id,
                    dropped = order.len() - entries.len(),
                    "dropped station order entries without station or title"
                );
            }

            // Stable: equal ordinals keep feed order.
            entries.sort_by_key(|e| e.index);
            if lines.insert(id.clone(), entries).is_some() {
                debug!(railway = %id, "duplicate railway record replaces station order");
            }
        }

        Self { lines }
    }

    /// Stations of a line in order, if the line is known.
    pub fn get(&self, railway: &RailwayId) -> Option<&[StationEntry]> {
        self.lines.get(railway).map(Vec::as_slice)
    }

    /// Stations of a line in order; unknown lines yield an empty slice.
    pub fn stations(&self, railway: &RailwayId) -> &[StationEntry] {
        self.get(railway).unwrap_or(&[])
    }

    /// Number of indexed railways.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
