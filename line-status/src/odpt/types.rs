//! ODPT API response DTOs.
//!
//! These types map to the JSON-LD records returned by the ODPT v4 API.
//! Every field is optional: open-data feeds routinely omit fields, and an
//! identifier that is present but blank is treated the same as a missing one.
//! A field holding a value of the wrong type decodes as absent rather than
//! rejecting the whole record.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{RailwayId, StationId};

/// A language-tagged text value, e.g. `{"ja": "東京", "en": "Tokyo"}`.
///
/// Entries whose value is not a string are dropped on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(lang, text)| match text {
                Value::String(text) => Some((lang, text)),
                _ => None,
            })
            .collect())
    }
}

impl LocalizedText {
    /// Text for the given language tag, ignoring empty strings.
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0
            .get(lang)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Japanese text.
    pub fn ja(&self) -> Option<&str> {
        self.get("ja")
    }

    /// English text.
    pub fn en(&self) -> Option<&str> {
        self.get("en")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedText {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        LocalizedText(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// `odpt:Station` record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Station {
    #[serde(rename = "owl:sameAs", default, deserialize_with = "blank_as_none")]
    pub same_as: Option<StationId>,

    #[serde(rename = "dc:title", default, deserialize_with = "lenient")]
    pub title: Option<String>,

    #[serde(rename = "odpt:stationTitle", default, deserialize_with = "lenient")]
    pub station_title: Option<LocalizedText>,

    #[serde(rename = "odpt:stationCode", default, deserialize_with = "lenient")]
    pub station_code: Option<String>,

    #[serde(rename = "odpt:railway", default, deserialize_with = "blank_as_none")]
    pub railway: Option<RailwayId>,

    #[serde(rename = "odpt:operator", default, deserialize_with = "lenient")]
    pub operator: Option<String>,

    #[serde(rename = "geo:lat", default, deserialize_with = "lenient")]
    pub lat: Option<f64>,

    #[serde(rename = "geo:long", default, deserialize_with = "lenient")]
    pub long: Option<f64>,
}

impl Station {
    /// Best available name: requested language, then Japanese, then English,
    /// then `dc:title`, then the raw identifier.
    pub fn display_name(&self, lang: &str) -> Option<&str> {
        let titles = self.station_title.as_ref();
        titles
            .and_then(|t| t.get(lang).or_else(|| t.ja()).or_else(|| t.en()))
            .or_else(|| self.title.as_deref().filter(|s| !s.is_empty()))
            .or_else(|| self.same_as.as_ref().map(StationId::as_str))
    }
}

/// `odpt:Railway` record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Railway {
    #[serde(rename = "owl:sameAs", default, deserialize_with = "blank_as_none")]
    pub same_as: Option<RailwayId>,

    #[serde(rename = "dc:title", default, deserialize_with = "lenient")]
    pub title: Option<String>,

    #[serde(rename = "odpt:railwayTitle", default, deserialize_with = "lenient")]
    pub railway_title: Option<LocalizedText>,

    #[serde(rename = "odpt:operator", default, deserialize_with = "lenient")]
    pub operator: Option<String>,

    #[serde(rename = "odpt:lineCode", default, deserialize_with = "lenient")]
    pub line_code: Option<String>,

    /// Entries that are not objects are skipped individually.
    #[serde(rename = "odpt:stationOrder", default, deserialize_with = "lenient_list")]
    pub station_order: Option<Vec<StationOrder>>,
}

impl Railway {
    /// Station order entries, empty if the record has none.
    pub fn station_order(&self) -> &[StationOrder] {
        self.station_order.as_deref().unwrap_or(&[])
    }

    /// Line title: requested language, then `dc:title`, then the raw identifier.
    ///
    /// Returns `None` only if the record has no identifier either.
    pub fn display_title(&self, lang: &str) -> Option<&str> {
        self.railway_title
            .as_ref()
            .and_then(|t| t.get(lang))
            .or_else(|| self.title.as_deref().filter(|s| !s.is_empty()))
            .or_else(|| self.same_as.as_ref().map(RailwayId::as_str))
    }
}

/// One entry of a railway's `odpt:stationOrder` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationOrder {
    #[serde(rename = "odpt:station", default, deserialize_with = "blank_as_none")]
    pub station: Option<StationId>,

    #[serde(rename = "odpt:stationTitle", default, deserialize_with = "lenient")]
    pub station_title: Option<LocalizedText>,

    /// Ordinal; integral floats such as `2.0` are accepted.
    #[serde(rename = "odpt:index", default, deserialize_with = "ordinal")]
    pub index: Option<i64>,
}

/// `odpt:Train` record: a live train location observation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Train {
    #[serde(rename = "owl:sameAs", default, deserialize_with = "lenient")]
    pub same_as: Option<String>,

    /// Observation time (ISO 8601).
    #[serde(rename = "dc:date", default, deserialize_with = "lenient")]
    pub date: Option<String>,

    #[serde(rename = "odpt:railway", default, deserialize_with = "blank_as_none")]
    pub railway: Option<RailwayId>,

    #[serde(rename = "odpt:trainNumber", default, deserialize_with = "lenient")]
    pub train_number: Option<String>,

    #[serde(rename = "odpt:trainType", default, deserialize_with = "lenient")]
    pub train_type: Option<String>,

    /// Station the train is at, or most recently departed.
    #[serde(rename = "odpt:fromStation", default, deserialize_with = "blank_as_none")]
    pub from_station: Option<StationId>,

    /// Station the train is heading to, when between stations.
    #[serde(rename = "odpt:toStation", default, deserialize_with = "blank_as_none")]
    pub to_station: Option<StationId>,

    #[serde(rename = "odpt:railDirection", default, deserialize_with = "lenient")]
    pub rail_direction: Option<String>,

    /// Delay in seconds.
    #[serde(rename = "odpt:delay", default, deserialize_with = "lenient")]
    pub delay: Option<i64>,

    #[serde(rename = "odpt:carComposition", default, deserialize_with = "lenient")]
    pub car_composition: Option<u32>,
}

impl Train {
    /// The station this observation counts towards: `fromStation` if set,
    /// otherwise `toStation`.
    pub fn attributed_station(&self) -> Option<&StationId> {
        self.from_station.as_ref().or(self.to_station.as_ref())
    }

    /// Parsed observation time, if `dc:date` is present and well formed.
    pub fn observed_at(&self) -> Option<DateTime<FixedOffset>> {
        self.date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
    }
}

/// Decode a raw API response into records, one element at a time.
///
/// Elements that do not decode as `T` are logged and skipped. A response
/// that is not a JSON array decodes to an empty collection.
pub fn decode_records<T: DeserializeOwned>(raw: &serde_json::Value) -> Vec<T> {
    let Some(items) = raw.as_array() else {
        warn!(kind = json_kind(raw), "expected a JSON array of records");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match T::deserialize(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index = i, error = %e, "skipping undecodable record");
                None
            }
        })
        .collect()
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Deserialize an optional identifier. Blank strings and non-string values
/// become `None`.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<String>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(T::try_from(s).ok()),
        _ => Ok(None),
    }
}

/// Deserialize an optional field, mapping a value of the wrong shape to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| T::deserialize(v).ok()))
}

/// Deserialize an optional list, skipping elements that do not decode.
/// Anything other than an array becomes `None`.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(Value::Array(items)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect();
    if decoded.len() < total {
        debug!(skipped = total - decoded.len(), "skipping undecodable list entries");
    }
    Ok(Some(decoded))
}

/// Deserialize an integer ordinal. Integral floats are accepted; fractional
/// numbers and non-numbers become `None`.
fn ordinal<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Number(n)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    Ok(n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    }))
}
