//! Clock arithmetic for the exam day.
//!
//! Every time of day and every span is an [`Hour`], stored as whole minutes
//! and written on the wire as a number of hours (`9`, `12.5`).

use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MINUTES_PER_HOUR: u16 = 60;
const MINUTES_PER_DAY: u16 = 24 * MINUTES_PER_HOUR;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeError {
    #[error("hour value {0} is not a finite number within 0..=24")]
    OutOfRange(f64),
    #[error("hour value {0} is not a whole number of minutes")]
    FractionalMinute(f64),
    #[error("malformed label {0:?}")]
    Label(String),
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Hour(u16);

impl Hour {
    pub const fn from_minutes(minutes: u16) -> Self {
        Self(minutes)
    }

    pub const fn whole(hours: u16) -> Self {
        Self(hours * MINUTES_PER_HOUR)
    }

    pub fn from_hours(hours: f64) -> Result<Self, TimeError> {
        if !hours.is_finite() || hours < 0.0 || hours > 24.0 {
            return Err(TimeError::OutOfRange(hours));
        }
        let minutes = hours * f64::from(MINUTES_PER_HOUR);
        let rounded = minutes.round();
        if (minutes - rounded).abs() > 1e-6 {
            return Err(TimeError::FractionalMinute(hours));
        }
        Ok(Self(rounded as u16))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn as_hours(self) -> f64 {
        f64::from(self.0) / f64::from(MINUTES_PER_HOUR)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn plus(self, span: Hour) -> Hour {
        Hour(self.0.saturating_add(span.0).min(MINUTES_PER_DAY))
    }

    pub fn saturating_sub(self, other: Hour) -> Hour {
        Hour(self.0.saturating_sub(other.0))
    }
}

/// Whole hours print as integers; anything else prints the shortest decimal
/// (`12.5`). Slot labels are built from this, so it must stay stable.
impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % MINUTES_PER_HOUR == 0 {
            write!(f, "{}", self.0 / MINUTES_PER_HOUR)
        } else {
            write!(f, "{}", self.as_hours())
        }
    }
}

impl Serialize for Hour {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if self.0 % MINUTES_PER_HOUR == 0 {
            s.serialize_u16(self.0 / MINUTES_PER_HOUR)
        } else {
            s.serialize_f64(self.as_hours())
        }
    }
}

impl<'de> Deserialize<'de> for Hour {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let hours = f64::deserialize(d)?;
        Hour::from_hours(hours).map_err(de::Error::custom)
    }
}

impl JsonSchema for Hour {
    fn schema_name() -> String {
        "Hour".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        f64::json_schema(gen)
    }
}

fn parse_clock(s: &str) -> Result<Hour, TimeError> {
    let hours = s
        .trim()
        .strip_suffix(":00")
        .ok_or_else(|| TimeError::Label(s.to_string()))?;
    let hours: f64 = hours
        .parse()
        .map_err(|_| TimeError::Label(s.to_string()))?;
    Hour::from_hours(hours)
}

/// Half-open `[start, end)` interval. Wire form is the pair `[start, end]`.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct HourRange(pub Hour, pub Hour);

impl HourRange {
    pub fn new(start: Hour, end: Hour) -> Self {
        Self(start, end)
    }

    pub fn whole(start: u16, end: u16) -> Self {
        Self(Hour::whole(start), Hour::whole(end))
    }

    pub fn start(&self) -> Hour {
        self.0
    }

    pub fn end(&self) -> Hour {
        self.1
    }

    pub fn is_empty(&self) -> bool {
        self.0 >= self.1
    }

    pub fn covers(&self, other: &HourRange) -> bool {
        self.0 <= other.0 && self.1 >= other.1
    }

    pub fn overlaps(&self, other: &HourRange) -> bool {
        self.0 < other.1 && other.0 < self.1
    }

    /// Splits the range into consecutive one-hour pieces. A remainder shorter
    /// than an hour becomes a final, shorter piece.
    pub fn hourly(&self) -> Vec<HourRange> {
        let step = Hour::from_minutes(MINUTES_PER_HOUR);
        let mut out = Vec::new();
        let mut cur = self.0;
        while cur < self.1 {
            let next = cur.plus(step).min(self.1);
            out.push(HourRange(cur, next));
            cur = next;
        }
        out
    }
}

impl fmt::Display for HourRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:00-{}:00", self.0, self.1)
    }
}

impl FromStr for HourRange {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| TimeError::Label(s.to_string()))?;
        let range = HourRange(parse_clock(start)?, parse_clock(end)?);
        if range.is_empty() {
            return Err(TimeError::Label(s.to_string()));
        }
        Ok(range)
    }
}
