//! Railway (line) identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid railway identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid railway id: {reason}")]
pub struct InvalidRailwayId {
    reason: &'static str,
}

/// An opaque ODPT railway identifier, e.g. `odpt.Railway:JR-East.Yamanote`.
///
/// # Examples
///
/// ```
/// use line_status::domain::RailwayId;
///
/// let yamanote = RailwayId::parse("odpt.Railway:JR-East.Yamanote").unwrap();
/// assert_eq!(yamanote.to_string(), "odpt.Railway:JR-East.Yamanote");
///
/// assert!(RailwayId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RailwayId(String);

impl RailwayId {
    /// Parse a railway identifier, rejecting blank input.
    pub fn parse(s: &str) -> Result<Self, InvalidRailwayId> {
        Self::try_from(s.to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RailwayId {
    type Error = InvalidRailwayId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.trim().is_empty() {
            return Err(InvalidRailwayId {
                reason: "must not be blank",
            });
        }
        Ok(RailwayId(s))
    }
}

impl From<RailwayId> for String {
    fn from(id: RailwayId) -> Self {
        id.0
    }
}

impl fmt::Debug for RailwayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RailwayId({})", self.0)
    }
}

impl fmt::Display for RailwayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
