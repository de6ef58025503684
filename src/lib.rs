#![deny(clippy::suspicious, clippy::complexity, clippy::perf, clippy::style)]
#![deny(missing_docs)]
//! Immutable, timezone-aware date/time values with calendar arithmetic and
//! `strftime`-style formatting.
//!
//! The central type is [`WallTime`]: an absolute instant (milliseconds since
//! the unix epoch) paired with an offset-resolution strategy ([`Zone`]) and a
//! shared [`Locale`] table. Every operation returns a new value; nothing is
//! mutated in place.
//!
//! ```
//! use walltime::{Unit, WallTime};
//!
//! let dt = WallTime::parse("2023-04-05T06:07:08.090Z").utc();
//!
//! assert_eq!(dt.format("%Y/%m/%d %H:%M:%S.%L"), "2023/04/05 06:07:08.090");
//! assert_eq!(dt.add(1, Unit::Day).format("%Y-%m-%d"), "2023-04-06");
//! assert_eq!(dt.start_of(Unit::Month).format("%Y-%m-%d %H:%M"), "2023-04-01 00:00");
//! ```
//!
//! Arithmetic on calendar units (days and larger) is wall-clock relative: the
//! instant is decomposed at the zone's offset, the fields are shifted, and the
//! result is recomposed with the offset re-resolved at the landing instant so
//! that crossing a DST boundary preserves the local time where the zone's
//! rules allow it. Sub-day units are pure millisecond shifts and are immune to
//! DST by construction.

pub mod calc;
pub mod error;
pub mod fields;
pub mod locale;
mod parse;
pub mod strftime;
pub mod tz;
mod unit;
mod value;

pub use crate::error::Error;
pub use crate::fields::{Fields, RawFields};
pub use crate::locale::{Locale, Spec};
pub use crate::tz::{Zone, ZoneResolver};
pub use crate::unit::{Unit, UnknownUnit};
pub use crate::value::WallTime;

/// Sentinel for an instant produced by a failed best-effort parse. Every
/// operation propagates it instead of erroring; formatting renders a fixed
/// placeholder.
pub(crate) const INVALID_MILLIS: i64 = i64::MIN;

/// Conversion constants between units of time.
pub(crate) mod conv {
    /// Number of milliseconds per second.
    pub(crate) const MILLIS_PER_SECOND: i64 = 1_000;

    /// Number of milliseconds per minute.
    pub(crate) const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;

    /// Number of milliseconds per hour.
    pub(crate) const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

    /// Number of milliseconds per day.
    pub(crate) const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
}
