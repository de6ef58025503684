//! Offset resolution: UTC, fixed offsets, the ambient local zone, and named
//! zones with per-instant offset rules.
//!
//! A [`Zone`] maps instants to UTC offsets in minutes. Named zones hold an
//! injectable resolver function; [`Zone::named`] wires one up from the
//! bundled chrono-tz database, and [`Zone::with_resolver`] accepts any
//! caller-supplied rule. Unresolvable names fail here, at configuration time,
//! never during later arithmetic.

use std::fmt;
use std::sync::Arc;

use chrono::{Offset, TimeZone};

use crate::Error;

/// Per-instant offset rule for a named zone: takes an instant in epoch
/// milliseconds and returns the UTC offset in minutes at that instant.
pub type ZoneResolver = Arc<dyn Fn(i64) -> i32 + Send + Sync>;

/// How a value resolves instants to UTC offsets.
#[derive(Clone)]
pub enum Zone {
    /// The host system's local offset, re-evaluated per instant (so DST in
    /// the local zone is honored).
    Local,
    /// UTC. Constant zero offset.
    Utc,
    /// A fixed offset in minutes east of UTC, independent of instant.
    Fixed(i32),
    /// A named zone whose offset varies by instant.
    Named {
        /// The zone designation, kept for diagnostics and equality.
        name: Arc<str>,
        /// The offset rule for this zone.
        resolver: ZoneResolver,
    },
}

impl Zone {
    /// Resolves the UTC offset, in minutes, for `instant`.
    pub fn resolve(&self, instant: i64) -> i32 {
        match self {
            Self::Local => local_offset_minutes(instant),
            Self::Utc => 0,
            Self::Fixed(minutes) => *minutes,
            Self::Named { resolver, .. } => resolver(instant),
        }
    }

    /// Builds a [`Zone`] from a designation string.
    ///
    /// Fixed-offset forms (`"+09:00"`, `"-0800"`, `"+9"`, `"Z"`, `"UTC"`,
    /// `"GMT-5"`) become [`Zone::Fixed`]; anything else is treated as an IANA
    /// zone name and resolved through the bundled chrono-tz database.
    pub fn from_designation(designation: &str) -> Result<Self, Error> {
        if let Some(minutes) = parse_offset_minutes(designation) {
            return Ok(Self::Fixed(minutes));
        }

        // a sign prefix means an offset was intended; don't try a name lookup
        if matches!(designation.trim().as_bytes().first(), Some(b'+' | b'-')) {
            return Err(Error::InvalidOffset(designation.to_owned()));
        }

        Self::named(designation)
    }

    /// Resolves an IANA zone name (e.g. `"America/Los_Angeles"`) through the
    /// bundled chrono-tz database.
    pub fn named(name: &str) -> Result<Self, Error> {
        let tz = name
            .parse::<chrono_tz::Tz>()
            .map_err(|_| Error::UnknownTimeZone(name.to_owned()))?;

        Ok(Self::Named {
            name: Arc::from(name),
            resolver: Arc::new(move |instant| tz_offset_minutes(tz, instant)),
        })
    }

    /// Builds a named zone from a caller-supplied offset rule, bypassing the
    /// bundled database entirely.
    pub fn with_resolver(name: impl Into<Arc<str>>, resolver: ZoneResolver) -> Self {
        Self::Named {
            name: name.into(),
            resolver,
        }
    }
}

impl fmt::Debug for Zone {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Local => formatter.write_str("Local"),
            Self::Utc => formatter.write_str("Utc"),
            Self::Fixed(minutes) => formatter.debug_tuple("Fixed").field(minutes).finish(),
            Self::Named { name, .. } => formatter.debug_tuple("Named").field(name).finish(),
        }
    }
}

impl PartialEq for Zone {
    /// Named zones compare by name; the resolver function is opaque.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Local, Self::Local) | (Self::Utc, Self::Utc) => true,
            (Self::Fixed(a), Self::Fixed(b)) => a == b,
            (Self::Named { name: a, .. }, Self::Named { name: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for Zone {}

fn local_offset_minutes(instant: i64) -> i32 {
    let utc = chrono::DateTime::from_timestamp_millis(instant)
        .unwrap_or_default()
        .naive_utc();

    chrono::Local
        .offset_from_utc_datetime(&utc)
        .fix()
        .local_minus_utc()
        / 60
}

fn tz_offset_minutes(tz: chrono_tz::Tz, instant: i64) -> i32 {
    let utc = chrono::DateTime::from_timestamp_millis(instant)
        .unwrap_or_default()
        .naive_utc();

    tz.offset_from_utc_datetime(&utc).fix().local_minus_utc() / 60
}

/// Parses a fixed-offset designation into minutes east of UTC. Returns
/// [`None`] for strings that are not an offset form (likely zone names).
///
/// Accepted forms: `Z`, `UTC`, `GMT`, and a sign followed by `H`, `HH`,
/// `HMM`, `HHMM` or `HH:MM` (optionally prefixed with `UTC`/`GMT`, as in
/// `GMT-5`).
pub(crate) fn parse_offset_minutes(s: &str) -> Option<i32> {
    let trimmed = s.trim();

    let stripped = trimmed
        .strip_prefix("GMT")
        .or_else(|| trimmed.strip_prefix("UTC"))
        .unwrap_or(trimmed);

    match stripped {
        "" | "Z" | "z" => return Some(0),
        _ => {}
    }

    let (sign, digits) = match stripped.as_bytes()[0] {
        b'+' => (1, &stripped[1..]),
        b'-' => (-1, &stripped[1..]),
        _ => return None,
    };

    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) if m.len() == 2 => (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?),
        Some(_) => return None,
        None => match digits.len() {
            1 | 2 => (digits.parse::<i32>().ok()?, 0),
            3 | 4 => {
                let split = digits.len() - 2;
                (
                    digits[..split].parse::<i32>().ok()?,
                    digits[split..].parse::<i32>().ok()?,
                )
            }
            _ => return None,
        },
    };

    if !(0..60).contains(&minutes) || !(0..=24).contains(&hours) {
        return None;
    }

    Some(sign * (hours * 60 + minutes))
}
