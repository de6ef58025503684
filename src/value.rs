//! The immutable [`WallTime`] value and its public operation surface.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::fields::Fields;
use crate::locale::Locale;
use crate::tz::{Zone, ZoneResolver};
use crate::unit::Unit;
use crate::{Error, INVALID_MILLIS, calc, parse, strftime};

/// Rendered in place of fields when the instant is the invalid sentinel.
const INVALID_PLACEHOLDER: &str = "Invalid Date";

/// An immutable, timezone-aware point in time.
///
/// A value owns one absolute instant (epoch milliseconds), one offset
/// resolution strategy ([`Zone`]) and a shared reference to a [`Locale`]
/// table. Every operation that "changes" a value returns a new one; an
/// existing value is never observably mutated.
///
/// ```
/// use walltime::{Unit, WallTime};
///
/// let dt = WallTime::from_millis(0).utc();
///
/// assert_eq!(dt.to_iso(), "1970-01-01T00:00:00.000+00:00");
/// assert_eq!(dt.next(Unit::Day).format("%Y-%m-%d"), "1970-01-02");
/// ```
#[derive(Clone)]
pub struct WallTime {
    instant: i64,
    zone: Zone,
    locale: Arc<Locale>,
}

/// Constructors.
impl WallTime {
    /// The current system time, in the ambient local zone.
    pub fn now() -> Self {
        Self::from_millis(chrono::Utc::now().timestamp_millis())
    }

    /// A value for the given epoch milliseconds, in the ambient local zone.
    pub fn from_millis(instant: i64) -> Self {
        Self {
            instant,
            zone: Zone::Local,
            locale: Locale::base(),
        }
    }

    /// Parses a datetime string, in the ambient local zone.
    ///
    /// Strings matching `YYYY[-/MM[-/DD[ THH:MM[:SS[.sss]]]]]` are read as
    /// local wall time with missing components defaulting to the start of
    /// that component; anything else goes through best-effort parsing with no
    /// correctness guarantee. Parsing never fails: a string nothing
    /// understands yields an invalid value (see [`WallTime::is_valid`]) that
    /// propagates through every operation and formats as a placeholder.
    pub fn parse(s: &str) -> Self {
        Self::from_millis(parse::parse_instant(s))
    }

    /// Converts from any chrono [`DateTime`](chrono::DateTime), keeping the
    /// ambient local zone for field resolution.
    pub fn from_datetime<Tz>(datetime: chrono::DateTime<Tz>) -> Self
    where
        Tz: chrono::TimeZone,
    {
        Self::from_millis(datetime.timestamp_millis())
    }
}

/// Arithmetic.
impl WallTime {
    /// Adds `amount` of `unit`, offset-aware for calendar units.
    /// `add(0, _)` returns a value equal to `self`.
    pub fn add(&self, amount: i64, unit: Unit) -> Self {
        if !self.is_valid() {
            return self.clone();
        }

        self.with_instant(calc::add(self.instant, amount, unit, &self.zone))
    }

    /// Snaps back to the start of `unit` (weeks start on Sunday).
    pub fn start_of(&self, unit: Unit) -> Self {
        if !self.is_valid() {
            return self.clone();
        }

        self.with_instant(calc::start_of(self.instant, unit, &self.zone))
    }

    /// Snaps forward to the last millisecond of `unit`.
    pub fn end_of(&self, unit: Unit) -> Self {
        if !self.is_valid() {
            return self.clone();
        }

        self.with_instant(calc::end_of(self.instant, unit, &self.zone))
    }

    /// Shorthand for `add(1, unit)`.
    pub fn next(&self, unit: Unit) -> Self {
        self.add(1, unit)
    }

    /// Shorthand for `add(-1, unit)`.
    pub fn prev(&self, unit: Unit) -> Self {
        self.add(-1, unit)
    }
}

/// Zone and locale configuration.
impl WallTime {
    /// The same instant, observed in UTC.
    pub fn utc(&self) -> Self {
        self.with_zone(Zone::Utc)
    }

    /// The same instant, observed under `designation`: a fixed-offset form
    /// (`"+09:00"`, `"-0800"`, `"Z"`) or an IANA zone name resolved through
    /// the bundled database. Unresolvable designations fail here, never
    /// during later arithmetic.
    pub fn timezone(&self, designation: &str) -> Result<Self, Error> {
        Ok(self.with_zone(Zone::from_designation(designation)?))
    }

    /// The same instant at a fixed offset in minutes east of UTC.
    pub fn timezone_minutes(&self, minutes: i32) -> Self {
        self.with_zone(Zone::Fixed(minutes))
    }

    /// The same instant under a caller-supplied named-zone offset rule.
    pub fn with_resolver(&self, name: impl Into<Arc<str>>, resolver: ZoneResolver) -> Self {
        self.with_zone(Zone::with_resolver(name, resolver))
    }

    /// The same instant, observed under the given [`Zone`].
    pub fn with_zone(&self, zone: Zone) -> Self {
        Self {
            instant: self.instant,
            zone,
            locale: Arc::clone(&self.locale),
        }
    }

    /// The same instant, formatting through the given [`Locale`] table.
    pub fn locale(&self, locale: Arc<Locale>) -> Self {
        Self {
            instant: self.instant,
            zone: self.zone.clone(),
            locale,
        }
    }

    fn with_instant(&self, instant: i64) -> Self {
        Self {
            instant,
            zone: self.zone.clone(),
            locale: Arc::clone(&self.locale),
        }
    }
}

/// Output.
impl WallTime {
    /// Expands a `strftime`-style pattern against this value's wall-clock
    /// fields. The zone's offset is resolved once for the whole render.
    /// Invalid values yield a fixed placeholder.
    pub fn format(&self, pattern: &str) -> String {
        if !self.is_valid() {
            return INVALID_PLACEHOLDER.to_owned();
        }

        let offset = self.zone.resolve(self.instant);
        let fields = Fields::from_instant(self.instant, offset);

        strftime::render(pattern, &fields, offset, &self.locale)
    }

    /// Alias for [`WallTime::format`].
    pub fn text(&self, pattern: &str) -> String {
        self.format(pattern)
    }

    /// ISO-8601 text with milliseconds and the resolved offset.
    pub fn to_iso(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%S.%L%:z")
    }

    /// The absolute instant, in epoch milliseconds.
    pub const fn as_millis(&self) -> i64 {
        self.instant
    }

    /// Whether this value holds a real instant. Only best-effort parsing of
    /// a malformed string produces an invalid value.
    pub const fn is_valid(&self) -> bool {
        self.instant != INVALID_MILLIS
    }

    /// The wall-clock fields under this value's zone, or [`None`] for an
    /// invalid value.
    pub fn fields(&self) -> Option<Fields> {
        self.is_valid()
            .then(|| Fields::from_instant(self.instant, self.zone.resolve(self.instant)))
    }

    /// Converts to a chrono [`DateTime`](chrono::DateTime) carrying the
    /// offset resolved at this instant. [`None`] for invalid values or
    /// instants outside chrono's range.
    pub fn to_datetime(&self) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        if !self.is_valid() {
            return None;
        }

        let offset = chrono::FixedOffset::east_opt(self.zone.resolve(self.instant) * 60)?;

        chrono::DateTime::from_timestamp_millis(self.instant)
            .map(|datetime| datetime.with_timezone(&offset))
    }
}

impl fmt::Debug for WallTime {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter
            .debug_struct("WallTime")
            .field("instant", &self.instant)
            .field("zone", &self.zone)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(&self.to_iso())
    }
}

impl PartialEq for WallTime {
    /// Values compare by instant and zone; the locale table only affects
    /// formatting output.
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant && self.zone == other.zone
    }
}

impl Eq for WallTime {}

impl PartialOrd for WallTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WallTime {
    /// Ordering is by absolute instant, regardless of zone.
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl Hash for WallTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i64(self.instant);
    }
}

impl FromStr for WallTime {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for WallTime {
    /// Serializes as the ISO-8601 text form.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}
