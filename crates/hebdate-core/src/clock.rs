//! Time sources.
//!
//! The lookup key and the upstream request both depend on the *local* date of
//! the deployment, which is not necessarily the server's UTC date. A [`Clock`]
//! pairs an instant with the configured [`Timezone`] so "today" is resolved in
//! one place and tests can pin it.

use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Timezone used to resolve the local calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timezone {
    /// The host's local timezone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
    /// A fixed offset from UTC, e.g. `+02:00`.
    Fixed(FixedOffset),
    /// An IANA zone such as `Asia/Jerusalem`; follows daylight saving.
    Named(Tz),
}

impl Timezone {
    /// Calendar date of `instant` in this timezone.
    #[must_use]
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Local => instant.with_timezone(&Local).date_naive(),
            Self::Utc => instant.date_naive(),
            Self::Fixed(offset) => instant.with_timezone(offset).date_naive(),
            Self::Named(tz) => instant.with_timezone(tz).date_naive(),
        }
    }
}

impl FromStr for Timezone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return Ok(Self::Utc);
        }
        if let Some(offset) = parse_offset(trimmed) {
            return Ok(Self::Fixed(offset));
        }
        trimmed.parse::<Tz>().map(Self::Named).map_err(|_| {
            Error::Config(format!(
                "Invalid timezone '{s}': expected 'local', 'UTC', an IANA name like 'Asia/Jerusalem' or an offset like '+02:00'"
            ))
        })
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Utc => f.write_str("UTC"),
            Self::Fixed(offset) => write!(f, "{offset}"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl Serialize for Timezone {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `+HH`.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Source of the current instant and the deployment's local date.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Timezone the local date is resolved in.
    fn timezone(&self) -> Timezone;

    /// Today's date in [`Clock::timezone`].
    fn today(&self) -> NaiveDate {
        self.timezone().local_date(self.now())
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    timezone: Timezone,
}

impl SystemClock {
    /// Create a clock resolving dates in `timezone`.
    #[must_use]
    pub const fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn timezone(&self) -> Timezone {
        self.timezone
    }
}

/// Manually driven clock for tests and reproducible runs.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
    timezone: Timezone,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>, timezone: Timezone) -> Self {
        Self {
            now: RwLock::new(now),
            timezone,
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut guard = self.now.write().unwrap_or_else(PoisonError::into_inner);
        *guard += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn timezone(&self) -> Timezone {
        self.timezone
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_timezones() {
        assert_eq!("local".parse::<Timezone>().unwrap(), Timezone::Local);
        assert_eq!("UTC".parse::<Timezone>().unwrap(), Timezone::Utc);
        assert_eq!("utc".parse::<Timezone>().unwrap(), Timezone::Utc);
        assert_eq!(
            "+02:00".parse::<Timezone>().unwrap(),
            Timezone::Fixed(FixedOffset::east_opt(7200).unwrap())
        );
        assert_eq!(
            "-05:30".parse::<Timezone>().unwrap(),
            Timezone::Fixed(FixedOffset::west_opt(5 * 3600 + 1800).unwrap())
        );
        assert_eq!(
            "+0330".parse::<Timezone>().unwrap(),
            Timezone::Fixed(FixedOffset::east_opt(3 * 3600 + 1800).unwrap())
        );
    }

    #[test]
    fn test_parse_invalid_timezones() {
        for raw in ["Mars/Olympus", "Asia/Nowhere", "+25:00", "+02:75", "02:00", "", "+2"] {
            let err = raw.parse::<Timezone>().unwrap_err();
            assert_eq!(err.category(), "config", "input {raw:?}");
        }
    }

    #[test]
    fn test_display_round_trips() {
        for raw in ["local", "UTC", "+02:00", "-05:30", "Asia/Jerusalem", "America/New_York"] {
            let tz: Timezone = raw.parse().unwrap();
            assert_eq!(tz.to_string().parse::<Timezone>().unwrap(), tz);
        }
    }

    #[test]
    fn test_local_date_crosses_midnight_ahead_of_utc() {
        let clock = FixedClock::new(at(2024, 12, 31, 23, 30), "+02:00".parse().unwrap());
        assert_eq!(
            clock.today(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_local_date_behind_utc() {
        let clock = FixedClock::new(at(2025, 1, 1, 3, 0), "-05:00".parse().unwrap());
        assert_eq!(
            clock.today(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_parse_named_zone() {
        assert_eq!(
            "Asia/Jerusalem".parse::<Timezone>().unwrap(),
            Timezone::Named(Tz::Asia__Jerusalem)
        );
        assert_eq!(
            " Europe/London ".parse::<Timezone>().unwrap().to_string(),
            "Europe/London"
        );
    }

    #[test]
    fn test_named_zone_follows_daylight_saving() {
        let jerusalem: Timezone = "Asia/Jerusalem".parse().unwrap();
        let fixed: Timezone = "+02:00".parse().unwrap();

        // Summer, UTC+3: already the 2nd locally.
        let summer = at(2025, 7, 1, 21, 30);
        assert_eq!(jerusalem.local_date(summer), NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());
        assert_eq!(fixed.local_date(summer), NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());

        // Winter, UTC+2: still the 1st.
        let winter = at(2025, 1, 1, 21, 30);
        assert_eq!(jerusalem.local_date(winter), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_named_zone_across_spring_forward() {
        // New York moves from UTC-5 to UTC-4 at 07:00Z on 2025-03-09.
        let clock = FixedClock::new(at(2025, 3, 10, 3, 30), "America/New_York".parse().unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());

        clock.advance(TimeDelta::minutes(30));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());

        // Same instant a week before the switch is still the previous day at UTC-5.
        clock.set(at(2025, 3, 3, 4, 30));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }

    #[test]
    fn test_fixed_clock_advance() {
        let clock = FixedClock::new(at(2025, 1, 1, 12, 0), Timezone::Utc);
        clock.advance(TimeDelta::hours(24));
        assert_eq!(clock.now(), at(2025, 1, 2, 12, 0));
        clock.set(at(2030, 6, 1, 0, 0));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2030, 6, 1).unwrap());
    }
}
