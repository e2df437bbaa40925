//! A point-in-time snapshot of one operator's data.
//!
//! The three collections are fetched one after another, saved verbatim,
//! and only then decoded. Previews always work from a complete snapshot.

use chrono::{DateTime, FixedOffset};
use tracing::info;

use crate::odpt::{OdptClient, OdptError, Railway, Station, Train, decode_records};
use crate::store::{SnapshotKind, SnapshotStore, StoreError};

/// Raw API responses, exactly as received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSnapshot {
    pub stations: serde_json::Value,
    pub railways: serde_json::Value,
    pub trains: serde_json::Value,
}

impl RawSnapshot {
    /// Fetch stations, railways and trains, in that order.
    ///
    /// Fails on the first error; nothing is retried.
    pub async fn fetch(client: &OdptClient) -> Result<Self, OdptError> {
        let stations = client.fetch_stations().await?;
        let railways = client.fetch_railways().await?;
        let trains = client.fetch_trains().await?;

        Ok(Self {
            stations,
            railways,
            trains,
        })
    }

    /// Load a previously saved snapshot.
    pub fn load(store: &SnapshotStore) -> Result<Self, StoreError> {
        Ok(Self {
            stations: store.load(SnapshotKind::Stations)?,
            railways: store.load(SnapshotKind::Railways)?,
            trains: store.load(SnapshotKind::Trains)?,
        })
    }

    /// Save all three collections.
    pub fn save(&self, store: &SnapshotStore) -> Result<(), StoreError> {
        for kind in SnapshotKind::ALL {
            store.save(kind, self.get(kind))?;
        }
        Ok(())
    }

    pub fn get(&self, kind: SnapshotKind) -> &serde_json::Value {
        match kind {
            SnapshotKind::Stations => &self.stations,
            SnapshotKind::Railways => &self.railways,
            SnapshotKind::Trains => &self.trains,
        }
    }

    /// Decode into typed records, skipping any that do not decode.
    pub fn decode(&self) -> Snapshot {
        let snapshot = Snapshot {
            stations: decode_records(&self.stations),
            railways: decode_records(&self.railways),
            trains: decode_records(&self.trains),
        };

        info!(
            stations = snapshot.stations.len(),
            railways = snapshot.railways.len(),
            trains = snapshot.trains.len(),
            "decoded snapshot"
        );

        snapshot
    }
}

/// Decoded snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub stations: Vec<Station>,
    pub railways: Vec<Railway>,
    pub trains: Vec<Train>,
}

impl Snapshot {
    /// Most recent train observation time, if any train carries one.
    pub fn observed_at(&self) -> Option<DateTime<FixedOffset>> {
        self.trains.iter().filter_map(Train::observed_at).max()
    }
}
