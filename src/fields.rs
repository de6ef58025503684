//! Wall-clock decomposition of an instant under a UTC offset, and the inverse.
//!
//! The decomposition uses proleptic Gregorian rules implemented as pure
//! integer math over a day count, so an instant paired with an offset always
//! maps to exactly one set of fields and back. No calendar tables, no platform
//! date types.

use num_integer::Integer;

use crate::conv;

/// Calendar fields of an instant as observed at a fixed UTC offset.
///
/// Always derived from an `(instant, offset)` pair via
/// [`Fields::from_instant`], never stored as independent state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    /// Proleptic Gregorian year.
    pub year: i32,
    /// Month of the year, `1..=12`.
    pub month: u8,
    /// Day of the month, `1..=31`.
    pub day: u8,
    /// Hour of the day, `0..=23`.
    pub hour: u8,
    /// Minute of the hour, `0..=59`.
    pub minute: u8,
    /// Second of the minute, `0..=59`.
    pub second: u8,
    /// Millisecond of the second, `0..=999`.
    pub millisecond: u16,
    /// Day of the week, `0..=6` with `0` = Sunday.
    pub weekday: u8,
}

impl Fields {
    /// Decomposes an instant into the calendar fields observed at
    /// `offset_minutes` east of UTC.
    pub fn from_instant(instant: i64, offset_minutes: i32) -> Self {
        let shifted = instant + offset_minutes as i64 * conv::MILLIS_PER_MINUTE;

        let (days, ms_of_day) = shifted.div_mod_floor(&conv::MILLIS_PER_DAY);
        let (year, month, day) = civil_from_days(days);

        let (hour, rem) = ms_of_day.div_mod_floor(&conv::MILLIS_PER_HOUR);
        let (minute, rem) = rem.div_mod_floor(&conv::MILLIS_PER_MINUTE);
        let (second, millisecond) = rem.div_mod_floor(&conv::MILLIS_PER_SECOND);

        Self {
            year,
            month,
            day,
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
            millisecond: millisecond as u16,
            // the epoch day (1970-01-01) was a Thursday
            weekday: (days + 4).rem_euclid(7) as u8,
        }
    }

    /// The hour on a 12-hour clock, `1..=12`.
    pub const fn hour12(&self) -> u8 {
        (self.hour + 11) % 12 + 1
    }

    /// Ordinal day of the year, `1..=366`.
    pub fn day_of_year(&self) -> u16 {
        let first = days_to_month_start(self.year as i64, 1);
        let this = days_to_month_start(self.year as i64, self.month) + self.day as i64 - 1;
        (this - first + 1) as u16
    }

    /// Widens into a [`RawFields`] for feeding back through
    /// [`instant_from_raw`] after adjustment.
    pub const fn into_raw(self) -> RawFields {
        RawFields {
            year: self.year as i64,
            month: self.month as i64,
            day: self.day as i64,
            hour: self.hour as i64,
            minute: self.minute as i64,
            second: self.second as i64,
            millisecond: self.millisecond as i64,
        }
    }
}

/// Possibly out-of-range calendar components. Recomposing with
/// [`instant_from_raw`] normalizes by rollover: `day = 32` rolls into the next
/// month, `month = 0` into the previous year, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)] // same components as `Fields`, minus the weekday.
pub struct RawFields {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    pub millisecond: i64,
}

/// Recomposes calendar components into an absolute instant, treating the
/// components as wall-clock time at `offset_minutes` east of UTC.
///
/// Out-of-range components never reject; they roll over into the adjacent
/// unit. Months normalize first so day arithmetic sees a concrete month.
pub fn instant_from_raw(raw: RawFields, offset_minutes: i32) -> i64 {
    let (year_carry, month0) = (raw.month - 1).div_mod_floor(&12);
    let year = raw.year + year_carry;

    let days = days_to_month_start(year, (month0 + 1) as u8) + raw.day - 1;

    let wall = days * conv::MILLIS_PER_DAY
        + raw.hour * conv::MILLIS_PER_HOUR
        + raw.minute * conv::MILLIS_PER_MINUTE
        + raw.second * conv::MILLIS_PER_SECOND
        + raw.millisecond;

    wall - offset_minutes as i64 * conv::MILLIS_PER_MINUTE
}

/// Whether `year` is a Gregorian leap year.
pub const fn is_leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` (`1..=12`) of `year`.
pub const fn days_in_month(year: i64, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

/// Days from the epoch to the first of `month` (`1..=12`) in `year`.
/// Adapted from Howard Hinnant's `days_from_civil`.
fn days_to_month_start(year: i64, month: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    // months shifted so March = 0, pushing the leap day to the end
    let mp = (month as i64 + 9) % 12;
    let doy = (153 * mp + 2) / 5;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;

    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_to_month_start`] + day offset: epoch day count to
/// `(year, month, day)`. Adapted from Howard Hinnant's `civil_from_days`.
fn civil_from_days(days: i64) -> (i32, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };

    (year as i32, month, day)
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn test_epoch_decomposition() {
        let epoch = Fields::from_instant(0, 0);

        assert_eq!(epoch.year, 1970);
        assert_eq!(epoch.month, 1);
        assert_eq!(epoch.day, 1);
        assert_eq!((epoch.hour, epoch.minute, epoch.second, epoch.millisecond), (0, 0, 0, 0));
        // 1970-01-01 was a Thursday
        assert_eq!(epoch.weekday, 4);
    }

    #[test]
    fn test_offset_shifts_fields() {
        // 2022-03-13T10:00:01Z at -07:00 reads 03:00:01 the same day
        let f = Fields::from_instant(1_647_165_601_000, -7 * 60);

        assert_eq!((f.year, f.month, f.day), (2022, 3, 13));
        assert_eq!((f.hour, f.minute, f.second), (3, 0, 1));
        assert_eq!(f.weekday, 0); // a Sunday
    }

    #[test]
    fn test_negative_instants() {
        // one millisecond before the epoch
        let f = Fields::from_instant(-1, 0);

        assert_eq!((f.year, f.month, f.day), (1969, 12, 31));
        assert_eq!((f.hour, f.minute, f.second, f.millisecond), (23, 59, 59, 999));
        assert_eq!(f.weekday, 3);
    }

    #[test]
    fn test_rollover_normalization() {
        // day 32 of January rolls into February
        let rolled = instant_from_raw(
            RawFields {
                year: 2021,
                month: 1,
                day: 32,
                ..Default::default()
            },
            0,
        );
        let expected = instant_from_raw(
            RawFields {
                year: 2021,
                month: 2,
                day: 1,
                ..Default::default()
            },
            0,
        );
        assert_eq!(rolled, expected);

        // month 0 rolls back into December of the previous year
        let rolled = instant_from_raw(
            RawFields {
                year: 2021,
                month: 0,
                day: 1,
                ..Default::default()
            },
            0,
        );
        let f = Fields::from_instant(rolled, 0);
        assert_eq!((f.year, f.month, f.day), (2020, 12, 1));

        // negative hours roll back across the day boundary
        let rolled = instant_from_raw(
            RawFields {
                year: 2021,
                month: 6,
                day: 10,
                hour: -1,
                ..Default::default()
            },
            0,
        );
        let f = Fields::from_instant(rolled, 0);
        assert_eq!((f.day, f.hour), (9, 23));
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));

        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
    }

    #[test]
    fn test_day_of_year() {
        let jan_1 = Fields::from_instant(instant_from_raw(
            RawFields { year: 2023, month: 1, day: 1, ..Default::default() },
            0,
        ), 0);
        assert_eq!(jan_1.day_of_year(), 1);

        let dec_31 = Fields::from_instant(instant_from_raw(
            RawFields { year: 2024, month: 12, day: 31, ..Default::default() },
            0,
        ), 0);
        assert_eq!(dec_31.day_of_year(), 366);
    }

    #[test]
    fn test_matches_time_crate() {
        let mut rng = rand::thread_rng();

        for _ in 0..500 {
            let instant: i64 = rng.gen_range(-2_000_000_000_000..4_000_000_000_000);
            let offset: i32 = rng.gen_range(-14 * 60..=14 * 60);

            let ours = Fields::from_instant(instant, offset);

            let theirs = time::OffsetDateTime::from_unix_timestamp_nanos(instant as i128 * 1_000_000)
                .unwrap()
                .to_offset(time::UtcOffset::from_whole_seconds(offset * 60).unwrap());

            assert_eq!(ours.year, theirs.year());
            assert_eq!(ours.month, theirs.month() as u8);
            assert_eq!(ours.day, theirs.day());
            assert_eq!(ours.hour, theirs.hour());
            assert_eq!(ours.minute, theirs.minute());
            assert_eq!(ours.second, theirs.second());
            assert_eq!(ours.weekday, theirs.weekday().number_days_from_sunday());
        }
    }
}
