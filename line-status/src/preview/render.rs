//! Line preview rendering.
//!
//! Produces a two-line text summary of a railway:
//!
//! ```text
//! 山手線
//! 🚃大崎 - ・五反田 - 🚃x2目黒 - ・恵比寿
//! ```
//!
//! Stations appear in line order. The marker before each name shows how
//! many live trains are attributed to it.

use std::fmt;

use crate::domain::{RailwayId, StationId};
use crate::odpt::{Railway, Train};

use super::occupancy::Occupancy;
use super::order::StationOrderIndex;

/// Language used for line titles when the caller has no preference.
pub const DEFAULT_LANG: &str = "ja";

/// Separator between stations in the rendered body.
const SEPARATOR: &str = " - ";

/// Occupancy marker shown before a station name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// No train at the station.
    Empty,
    /// Exactly one train.
    Single,
    /// Two or more trains; carries the exact count.
    Multiple(usize),
}

impl Marker {
    pub fn for_count(count: usize) -> Self {
        match count {
            0 => Marker::Empty,
            1 => Marker::Single,
            n => Marker::Multiple(n),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Empty => f.write_str("・"),
            Marker::Single => f.write_str("🚃"),
            Marker::Multiple(n) => write!(f, "🚃x{n}"),
        }
    }
}

/// One station in a preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    /// `None` for stops listed by title only.
    pub station: Option<StationId>,
    pub name: String,
    pub trains: usize,
}

impl Stop {
    pub fn marker(&self) -> Marker {
        Marker::for_count(self.trains)
    }
}

/// Structured preview of one line. `Display` gives the text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePreview {
    pub railway: RailwayId,
    pub title: String,
    pub stops: Vec<Stop>,
}

impl LinePreview {
    /// Total trains shown across all stops.
    pub fn train_count(&self) -> usize {
        self.stops.iter().map(|s| s.trains).sum()
    }
}

impl fmt::Display for LinePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for (i, stop) in self.stops.iter().enumerate() {
            if i > 0 {
                f.write_str(SEPARATOR)?;
            }
            write!(f, "{}{}", stop.marker(), stop.name)?;
        }
        Ok(())
    }
}

/// Builds previews for any line of one railway snapshot.
///
/// The station order index is built once and reused, so rendering several
/// lines from the same snapshot does not re-sort every railway per line.
#[derive(Debug, Clone)]
pub struct LinePreviewer<'a> {
    railways: &'a [Railway],
    index: StationOrderIndex,
}

impl<'a> LinePreviewer<'a> {
    pub fn new(railways: &'a [Railway]) -> Self {
        Self {
            railways,
            index: StationOrderIndex::build(railways),
        }
    }

    /// Build the structured preview, or `None` if the railway is not in
    /// the snapshot.
    ///
    /// The title comes from the first record with this id; the stations come
    /// from the order index.
    pub fn build(&self, railway: &RailwayId, trains: &[Train], lang: &str) -> Option<LinePreview> {
        let record = self
            .railways
            .iter()
            .find(|r| r.same_as.as_ref() == Some(railway))?;

        let title = record
            .display_title(lang)
            .unwrap_or(railway.as_str())
            .to_string();

        let occupancy = Occupancy::tally(railway, trains);

        let stops = self
            .index
            .stations(railway)
            .iter()
            .map(|entry| Stop {
                station: entry.station.clone(),
                name: entry.title.clone(),
                trains: entry
                    .station
                    .as_ref()
                    .map_or(0, |station| occupancy.count(station)),
            })
            .collect();

        Some(LinePreview {
            railway: railway.clone(),
            title,
            stops,
        })
    }

    /// Render the preview text, or a short notice if the railway is unknown.
    pub fn render(&self, railway: &RailwayId, trains: &[Train], lang: &str) -> String {
        match self.build(railway, trains, lang) {
            Some(preview) => preview.to_string(),
            None => missing_line_message(railway),
        }
    }
}

/// Build the structured preview for one line.
pub fn build_line_preview(
    railway: &RailwayId,
    railways: &[Railway],
    trains: &[Train],
    lang: &str,
) -> Option<LinePreview> {
    LinePreviewer::new(railways).build(railway, trains, lang)
}

/// Render the preview text for one line.
///
/// Never fails: an unknown railway yields a notice naming it.
pub fn render_line_preview(
    railway: &RailwayId,
    railways: &[Railway],
    trains: &[Train],
    lang: &str,
) -> String {
    LinePreviewer::new(railways).render(railway, trains, lang)
}

/// Notice shown when a railway is not in the snapshot.
pub fn missing_line_message(railway: &RailwayId) -> String {
    format!("[{railway}] の路線情報がありません")
}
