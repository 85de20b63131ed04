//! Normalizes the requested time window.
//!
//! Instants without an offset are wall-clock times in the server's local
//! timezone. Instants with an offset keep it, so the day sent upstream is
//! always the calendar day the caller wrote.

use std::fmt;

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike};

pub const DEFAULT_FROM_HOUR: u32 = 8;
pub const DEFAULT_TO_HOUR: u32 = 20;

/// A point in time truncated to the minute
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeInstant(DateTime<FixedOffset>);

impl TimeInstant {
    /// Parse an ISO-8601 date-time, with or without an offset, or a bare
    /// date (midnight).
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let datetime = match parse_with_offset(raw) {
            Some(datetime) => datetime,
            None => {
                let naive =
                    parse_naive(raw).ok_or_else(|| anyhow!("Invalid ISO-8601 date-time: {:?}", raw))?;
                localize(naive)?
            }
        };
        Self::truncated(datetime)
    }

    /// Today's date at `hour`:00 local time
    pub fn today_at(hour: u32) -> Result<Self> {
        let naive = Local::now()
            .date_naive()
            .and_hms_opt(hour, 0, 0)
            .ok_or_else(|| anyhow!("Invalid hour: {}", hour))?;
        Self::truncated(localize(naive)?)
    }

    fn truncated(datetime: DateTime<FixedOffset>) -> Result<Self> {
        let truncated = datetime
            .with_second(0)
            .and_then(|dt| dt.with_nanosecond(0))
            .ok_or_else(|| anyhow!("Unable to truncate {} to the minute", datetime))?;
        Ok(Self(truncated))
    }

    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Calendar date in the instant's own offset
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    pub fn as_datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

impl fmt::Display for TimeInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// Seconds are optional and the offset may be `Z`, `+hh:mm` or `+hhmm`
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
];

fn parse_with_offset(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime);
    }
    let normalized = match raw.strip_suffix(['Z', 'z']) {
        Some(stripped) => format!("{}+00:00", stripped),
        None => raw.to_string(),
    };
    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&normalized, format).ok())
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    raw.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").ok())
        .or_else(|| {
            raw.parse::<NaiveDate>()
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn localize(naive: NaiveDateTime) -> Result<DateTime<FixedOffset>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|datetime| datetime.fixed_offset())
        .ok_or_else(|| anyhow!("{} does not exist in the local timezone", naive))
}

/// Cache identity of a range: the upstream day plus both instants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RangeKey {
    pub day: NaiveDate,
    pub from_ms: i64,
    pub to_ms: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRange {
    pub from: TimeInstant,
    pub to: TimeInstant,
}

impl TimeRange {
    pub fn new(from: TimeInstant, to: TimeInstant) -> Self {
        Self { from, to }
    }

    /// Build a range from optional query parameters. Missing bounds
    /// default to today 08:00 and 20:00.
    pub fn from_params(datefrom: Option<&str>, dateto: Option<&str>) -> Result<Self> {
        let from = match datefrom {
            Some(raw) => TimeInstant::parse(raw)?,
            None => TimeInstant::today_at(DEFAULT_FROM_HOUR)?,
        };
        let to = match dateto {
            Some(raw) => TimeInstant::parse(raw)?,
            None => TimeInstant::today_at(DEFAULT_TO_HOUR)?,
        };
        Ok(Self::new(from, to))
    }

    /// The portal is day-granular so only the day of `from` is queried
    pub fn date(&self) -> NaiveDate {
        self.from.date()
    }

    pub fn cache_key(&self) -> RangeKey {
        RangeKey {
            day: self.date(),
            from_ms: self.from.epoch_millis(),
            to_ms: self.to.epoch_millis(),
        }
    }

    pub fn ensure_ordered(&self) -> Result<()> {
        if self.from.epoch_millis() > self.to.epoch_millis() {
            bail!("Range starts at {} after it ends at {}", self.from, self.to);
        }
        Ok(())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}
