//! Constrained datetime-string parsing with a best-effort fallback.
//!
//! The constrained grammar is `YYYY[-/MM[-/DD[ THH:MM[:SS[.sss]]]]]`, with
//! `-` or `/` as the date separator (consistently one or the other) and a
//! space or `T` between date and time. Missing components default to the
//! start of that component, and the result is interpreted as local wall time.
//! Anything outside the grammar falls through to chrono's parsers with no
//! correctness guarantee; strings neither understands yield the
//! invalid-instant sentinel rather than an error.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::INVALID_MILLIS;
use crate::fields::{RawFields, instant_from_raw};
use crate::tz::Zone;

/// Only log about falling back to loose parsing once, otherwise we spam.
static LOGGED_FALLBACK: AtomicBool = AtomicBool::new(false);

/// Parses a datetime string into epoch milliseconds, or [`INVALID_MILLIS`].
pub(crate) fn parse_instant(s: &str) -> i64 {
    let trimmed = s.trim();

    match parse_constrained(trimmed) {
        Some(raw) => local_instant(raw),
        None => fallback(trimmed),
    }
}

fn parse_constrained(s: &str) -> Option<RawFields> {
    let bytes = s.as_bytes();
    let mut pos = 0;

    let mut raw = RawFields {
        year: take_digits(bytes, &mut pos, 4, 4)?,
        month: 1,
        day: 1,
        ..Default::default()
    };

    if pos == bytes.len() {
        return Some(raw);
    }

    // whichever date separator appears first is required throughout
    let sep = bytes[pos];
    if sep != b'-' && sep != b'/' {
        return None;
    }
    pos += 1;

    raw.month = take_digits(bytes, &mut pos, 1, 2)?;
    if pos == bytes.len() {
        return Some(raw);
    }

    if bytes[pos] != sep {
        return None;
    }
    pos += 1;

    raw.day = take_digits(bytes, &mut pos, 1, 2)?;
    if pos == bytes.len() {
        return Some(raw);
    }

    match bytes[pos] {
        b' ' | b'T' => pos += 1,
        _ => return None,
    }

    raw.hour = take_digits(bytes, &mut pos, 1, 2)?;
    if pos == bytes.len() || bytes[pos] != b':' {
        return None;
    }
    pos += 1;

    raw.minute = take_digits(bytes, &mut pos, 1, 2)?;
    if pos == bytes.len() {
        return Some(raw);
    }

    if bytes[pos] != b':' {
        return None;
    }
    pos += 1;

    raw.second = take_digits(bytes, &mut pos, 1, 2)?;
    if pos == bytes.len() {
        return Some(raw);
    }

    if bytes[pos] != b'.' {
        return None;
    }
    pos += 1;

    let start = pos;
    let digits = take_digits(bytes, &mut pos, 1, 3)?;
    // ".09" means 90 milliseconds, not 9
    raw.millisecond = digits * 10_i64.pow(3 - (pos - start) as u32);

    (pos == bytes.len()).then_some(raw)
}

fn take_digits(bytes: &[u8], pos: &mut usize, min: usize, max: usize) -> Option<i64> {
    let mut value: i64 = 0;
    let mut len = 0;

    while len < max
        && let Some(digit) = bytes.get(*pos + len).filter(|b| b.is_ascii_digit())
    {
        value = value * 10 + (digit - b'0') as i64;
        len += 1;
    }

    if len < min {
        return None;
    }

    *pos += len;
    Some(value)
}

/// Interprets raw fields as local wall time. The local offset depends on the
/// instant being built, so resolve against a UTC guess first and settle with
/// one re-resolution, mirroring the calendar arithmetic.
fn local_instant(raw: RawFields) -> i64 {
    let guess = instant_from_raw(raw, 0);
    let offset = Zone::Local.resolve(guess);

    let candidate = instant_from_raw(raw, offset);
    let landed = Zone::Local.resolve(candidate);

    if landed == offset {
        candidate
    } else {
        instant_from_raw(raw, landed)
    }
}

fn fallback(s: &str) -> i64 {
    if !LOGGED_FALLBACK.swap(true, Ordering::Relaxed) {
        tracing::warn!(message = "date string fell back to loose parsing", date_str = %s);
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return dt.timestamp_millis();
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc2822(s) {
        return dt.timestamp_millis();
    }

    // common near-misses of the constrained grammar that carry an explicit
    // UTC offset (chrono's %z accepts both '-0700' and '-07:00')
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f %z",
        "%Y/%m/%d %H:%M:%S%.f%z",
        "%Y/%m/%d %H:%M:%S%.f %z",
    ];

    for format in FORMATS {
        if let Ok(dt) = chrono::DateTime::parse_from_str(s, format) {
            return dt.timestamp_millis();
        }
    }

    INVALID_MILLIS
}
