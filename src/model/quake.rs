use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::timeline::{SelectedRange, TimeBounds};

/// Lowest magnitude the threshold slider goes down to.
pub const MIN_MAGNITUDE: f64 = 3.0;
/// Slider ceiling when no data is loaded.
pub const EMPTY_MAX_MAGNITUDE: f64 = 5.8;

/// Timestamp format used by the catalogue feed.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quake {
    #[serde(rename = "Date-time", with = "timestamp_serde")]
    pub time: NaiveDateTime,
    #[serde(rename = "Latitude", deserialize_with = "flexible_f64::deserialize")]
    pub latitude: f64,
    #[serde(rename = "Longitude", deserialize_with = "flexible_f64::deserialize")]
    pub longitude: f64,
    /// Depth in kilometres.
    #[serde(rename = "Depth", deserialize_with = "flexible_f64::deserialize")]
    pub depth: f64,
    /// Mean moment magnitude.
    #[serde(rename = "Mw_mean", deserialize_with = "flexible_f64::deserialize")]
    pub magnitude: f64,
}

impl Quake {
    pub fn date(&self) -> NaiveDate {
        self.time.date()
    }
}

/// Try the timestamp formats seen in catalogue exports.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
    ] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// The consumer side of the time window: keeps the latest selected range
/// and magnitude threshold, and picks matching records.
#[derive(Debug, Clone)]
pub struct QuakeFilter {
    pub range: SelectedRange,
    pub min_magnitude: f64,
}

impl QuakeFilter {
    pub fn new(bounds: &TimeBounds, min_magnitude: f64) -> Self {
        Self {
            range: SelectedRange::full(bounds),
            min_magnitude,
        }
    }

    pub fn matches(&self, quake: &Quake) -> bool {
        quake.magnitude.is_finite()
            && quake.magnitude >= self.min_magnitude
            && self.range.contains(quake.date())
    }

    pub fn apply<'a>(&self, quakes: &'a [Quake]) -> Vec<&'a Quake> {
        quakes.iter().filter(|q| self.matches(q)).collect()
    }
}

/// Upper end of the magnitude slider for a data set.
pub fn max_magnitude(quakes: &[Quake]) -> f64 {
    quakes
        .iter()
        .map(|q| q.magnitude)
        .filter(|m| m.is_finite())
        .fold(None, |acc: Option<f64>, m| Some(acc.map_or(m, |a| a.max(m))))
        .map_or(EMPTY_MAX_MAGNITUDE, |m| m.max(MIN_MAGNITUDE))
}

/// A deterministic demo catalogue covering the whole span, roughly one
/// event every two and a half days around the Reykjanes peninsula.
pub fn sample_catalogue(bounds: &TimeBounds) -> Vec<Quake> {
    let mut quakes = Vec::new();
    let mut i: i64 = 0;
    let mut date = bounds.epoch;
    while date <= bounds.now {
        let hour = (i * 7 % 24) as u32;
        let minute = (i * 13 % 60) as u32;
        if let Some(time) = date.and_hms_opt(hour, minute, 0) {
            quakes.push(Quake {
                time,
                latitude: 63.85 + (i * 17 % 30) as f64 / 100.0,
                longitude: -22.7 + (i * 23 % 80) as f64 / 100.0,
                depth: 2.0 + (i * 11 % 90) as f64 / 10.0,
                magnitude: 3.0 + (i * 37 % 29) as f64 / 10.0,
            });
        }
        i += 1;
        date += chrono::Duration::days(if i % 2 == 0 { 3 } else { 2 });
    }
    quakes
}

mod timestamp_serde {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(super::TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_timestamp(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp '{s}'")))
    }
}

/// Numbers that may arrive as JSON numbers or numeric strings.
mod flexible_f64 {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s
                .trim()
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("not a number: '{s}'"))),
        }
    }
}
