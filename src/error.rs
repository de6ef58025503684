//! Errors raised at configuration boundaries.
//!
//! Arithmetic and formatting never fail. The only fallible operations are the
//! ones that set a timezone designation or normalize a unit alias, and both
//! fail eagerly at the point of configuration rather than during later math.

/// Error types that can be encountered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A named timezone could not be resolved to an offset rule.
    #[error("unknown timezone: '{0}'")]
    UnknownTimeZone(String),
    /// A fixed-offset designation was not a recognized offset form.
    #[error("invalid utc offset: '{0}'")]
    InvalidOffset(String),
    /// A unit alias did not normalize to a known [`Unit`](crate::Unit).
    #[error(transparent)]
    UnknownUnit(#[from] crate::unit::UnknownUnit),
}
