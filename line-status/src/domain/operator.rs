//! Rail operator identifier type.

use std::fmt;

/// Error returned when parsing an invalid operator identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid operator id: {reason}")]
pub struct InvalidOperatorId {
    reason: &'static str,
}

/// An ODPT operator identifier, e.g. `odpt.Operator:JR-East`.
///
/// # Examples
///
/// ```
/// use line_status::domain::OperatorId;
///
/// let op = OperatorId::parse("odpt.Operator:JR-East").unwrap();
/// assert_eq!(op.slug(), "jreast");
///
/// assert!(OperatorId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OperatorId(String);

impl OperatorId {
    /// Parse an operator identifier, rejecting blank input.
    pub fn parse(s: &str) -> Result<Self, InvalidOperatorId> {
        let s = s.trim();
        if s.is_empty() {
            return Err(InvalidOperatorId {
                reason: "must not be blank",
            });
        }
        Ok(OperatorId(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The operator name without the `odpt.Operator:` prefix.
    pub fn name(&self) -> &str {
        self.0.rsplit(':').next().unwrap_or(&self.0)
    }

    /// A filesystem-safe short name: the operator name lowercased with
    /// everything but ASCII letters and digits removed.
    ///
    /// Falls back to `"odpt"` if nothing survives.
    pub fn slug(&self) -> String {
        let slug: String = self
            .name()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if slug.is_empty() {
            "odpt".to_string()
        } else {
            slug
        }
    }
}

impl Default for OperatorId {
    fn default() -> Self {
        OperatorId("odpt.Operator:JR-East".to_string())
    }
}

impl fmt::Debug for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperatorId({})", self.0)
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
