//! [`Unit`] definition + alias normalization.

use std::fmt;
use std::str::FromStr;

use crate::conv;

/// A clock or calendar unit accepted by the arithmetic operations.
///
/// The sub-day variants ([`Millisecond`] through [`Hour`]) have a fixed
/// millisecond size and shift the absolute instant directly. [`Day`] and
/// larger are calendar units, applied to wall-clock fields.
///
/// [`Millisecond`]: Unit::Millisecond
/// [`Hour`]: Unit::Hour
/// [`Day`]: Unit::Day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // the variant names say it all.
pub enum Unit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    /// Returns a `&'static` [`str`] with the name of the unit for formatting.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Millisecond => "millisecond",
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// The fixed millisecond size of this unit, for the absolute units.
    /// Calendar units ([`Unit::Day`] and larger) have no fixed size and
    /// return [`None`].
    pub const fn fixed_millis(&self) -> Option<i64> {
        match self {
            Self::Millisecond => Some(1),
            Self::Second => Some(conv::MILLIS_PER_SECOND),
            Self::Minute => Some(conv::MILLIS_PER_MINUTE),
            Self::Hour => Some(conv::MILLIS_PER_HOUR),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

/// Error for a string that is not a recognized unit alias.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a recognized unit")]
pub struct UnknownUnit(pub String);

impl FromStr for Unit {
    type Err = UnknownUnit;

    /// Normalizes long and short unit aliases to the canonical variant.
    ///
    /// Aliases are case-sensitive: `"m"` is a minute, `"M"` is a month.
    ///
    /// ```
    /// # use walltime::Unit;
    /// assert_eq!("s".parse::<Unit>().unwrap(), Unit::Second);
    /// assert_eq!("seconds".parse::<Unit>().unwrap(), Unit::Second);
    /// assert_eq!("M".parse::<Unit>().unwrap(), Unit::Month);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" | "millisecond" | "milliseconds" => Ok(Self::Millisecond),
            "s" | "sec" | "second" | "seconds" => Ok(Self::Second),
            "m" | "minute" | "minutes" => Ok(Self::Minute),
            "h" | "hour" | "hours" => Ok(Self::Hour),
            "d" | "date" | "day" | "days" => Ok(Self::Day),
            "w" | "week" | "weeks" => Ok(Self::Week),
            "M" | "month" | "months" => Ok(Self::Month),
            "y" | "year" | "years" => Ok(Self::Year),
            other => Err(UnknownUnit(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_normalization() {
        for alias in ["s", "sec", "second", "seconds"] {
            assert_eq!(alias.parse::<Unit>(), Ok(Unit::Second));
        }

        // case matters for the short forms
        assert_eq!("m".parse::<Unit>(), Ok(Unit::Minute));
        assert_eq!("M".parse::<Unit>(), Ok(Unit::Month));

        assert!("lightyear".parse::<Unit>().is_err());
    }

    #[test]
    fn test_fixed_millis() {
        assert_eq!(Unit::Hour.fixed_millis(), Some(3_600_000));
        assert_eq!(Unit::Day.fixed_millis(), None);
    }
}
