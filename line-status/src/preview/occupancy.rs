//! Per-station train counts for one line.

use std::collections::HashMap;

use crate::domain::{RailwayId, StationId};
use crate::odpt::Train;

/// Number of live trains attributed to each station of a line.
///
/// A train counts towards its `fromStation`, or its `toStation` when it has
/// no `fromStation`. Trains with neither, or on another line, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    counts: HashMap<StationId, usize>,
}

impl Occupancy {
    /// Count the trains on `railway`.
    pub fn tally(railway: &RailwayId, trains: &[Train]) -> Self {
        let mut counts: HashMap<StationId, usize> = HashMap::new();

        for train in trains {
            if train.railway.as_ref() != Some(railway) {
                continue;
            }
            if let Some(station) = train.attributed_station() {
                *counts.entry(station.clone()).or_default() += 1;
            }
        }

        Self { counts }
    }

    /// Trains attributed to a station; 0 if none.
    pub fn count(&self, station: &StationId) -> usize {
        self.counts.get(station).copied().unwrap_or(0)
    }

    /// Total trains counted on the line.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn trains() -> impl Strategy<Value = Vec<Train>> {
        let placement = (
            0u8..3,
            proptest::option::of(0u8..5),
            proptest::option::of(0u8..5),
        );
        proptest::collection::vec(placement, 0..40).prop_map(|raw| {
            raw.into_iter()
                .map(|(r, from, to)| Train {
                    railway: Some(RailwayId::parse(&format!("odpt.Railway:R{r}")).unwrap()),
                    from_station: from
                        .map(|s| StationId::parse(&format!("odpt.Station:S{s}")).unwrap()),
                    to_station: to.map(|s| StationId::parse(&format!("odpt.Station:S{s}")).unwrap()),
                    ..Default::default()
                })
                .collect()
        })
    }

    proptest! {
        /// The total equals the number of placeable trains on the line
        #[test]
        fn total_matches_placeable_trains(trains in trains()) {
            let line = RailwayId::parse("odpt.Railway:R0").unwrap();
            let expected = trains
                .iter()
                .filter(|t| t.railway.as_ref() == Some(&line))
                .filter(|t| t.from_station.is_some() || t.to_station.is_some())
                .count();

            prop_assert_eq!(Occupancy::tally(&line, &trains).total(), expected);
        }
    }
}
