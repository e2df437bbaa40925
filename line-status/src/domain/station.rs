//! Station identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// An opaque ODPT station identifier, e.g. `odpt.Station:JR-East.Yamanote.Tokyo`.
///
/// The token is never interpreted; the only guarantee is that it is not
/// blank, so it can always serve as a last-resort display label.
///
/// # Examples
///
/// ```
/// use line_status::domain::StationId;
///
/// let tokyo = StationId::parse("odpt.Station:JR-East.Yamanote.Tokyo").unwrap();
/// assert_eq!(tokyo.as_str(), "odpt.Station:JR-East.Yamanote.Tokyo");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    /// Parse a station identifier, rejecting blank input.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        Self::try_from(s.to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationId {
    type Error = InvalidStationId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.trim().is_empty() {
            return Err(InvalidStationId {
                reason: "must not be blank",
            });
        }
        Ok(StationId(s))
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert!(StationId::parse("odpt.Station:JR-East.Yamanote.Tokyo").is_ok());
        assert!(StationId::parse("x").is_ok());
    }

    #[test]
    fn reject_blank() {
        assert!(StationId::parse("").is_err());
        assert!(StationId::parse(" ").is_err());
        assert!(StationId::parse("\t\n").is_err());
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::parse("odpt.Station:A").unwrap();
        assert_eq!(format!("{}", id), "odpt.Station:A");
        assert_eq!(format!("{:?}", id), "StationId(odpt.Station:A)");
    }

    #[test]
    fn deserialize_rejects_blank() {
        let ok: Result<StationId, _> = serde_json::from_str("\"odpt.Station:A\"");
        assert_eq!(ok.unwrap().as_str(), "odpt.Station:A");

        let blank: Result<StationId, _> = serde_json::from_str("\"\"");
        assert!(blank.is_err());
    }
}
