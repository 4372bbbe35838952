use std::str::FromStr;

use chrono::{NaiveTime, Timelike as _};
use fractic_server_error::ServerError;

use crate::errors::InvalidClockTime;

/// Local time of day in `HH:MM` form. Seconds are accepted on input but
/// dropped.
#[derive(Debug)]
pub(crate) struct ClockTimeModel(NaiveTime);

impl FromStr for ClockTimeModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let t = NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|e| InvalidClockTime::with_debug(s, &e))?;
        Ok(ClockTimeModel(truncate_to_minute(t)))
    }
}

impl From<NaiveTime> for ClockTimeModel {
    fn from(t: NaiveTime) -> Self {
        ClockTimeModel(truncate_to_minute(t))
    }
}

impl Into<NaiveTime> for ClockTimeModel {
    fn into(self) -> NaiveTime {
        self.0
    }
}

impl std::fmt::Display for ClockTimeModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}
