//! Unit arithmetic over an `(instant, zone)` pair.
//!
//! Sub-day units are absolute-time shifts: multiply by the unit's fixed
//! millisecond size and add. Calendar units (day and larger) go through the
//! wall-clock fields: decompose at the offset resolved for the starting
//! instant, shift the fields, recompose, then re-resolve the offset at the
//! landing instant and recompose once more. The second pass is what keeps the
//! local time stable when the operation crosses a DST boundary.

use num_integer::Integer;

use crate::fields::{self, Fields, RawFields};
use crate::tz::Zone;
use crate::unit::Unit;

/// Adds `amount` of `unit` to `instant`, resolving offsets through `zone`.
/// `amount == 0` is an identity short-circuit.
pub fn add(instant: i64, amount: i64, unit: Unit, zone: &Zone) -> i64 {
    if amount == 0 {
        return instant;
    }

    if let Some(size) = unit.fixed_millis() {
        return instant + amount * size;
    }

    let offset = zone.resolve(instant);
    let mut raw = Fields::from_instant(instant, offset).into_raw();

    match unit {
        Unit::Day => raw.day += amount,
        Unit::Week => raw.day += amount * 7,
        Unit::Month => shift_months(&mut raw, amount),
        Unit::Year => shift_months(&mut raw, amount * 12),
        _ => unreachable!("absolute units are handled above"),
    }

    recompose(raw, offset, zone)
}

/// Snaps `instant` back to the start of `unit`: every smaller field is
/// zeroed, and a week rolls back to Sunday.
pub fn start_of(instant: i64, unit: Unit, zone: &Zone) -> i64 {
    let offset = zone.resolve(instant);
    let decomposed = Fields::from_instant(instant, offset);
    let mut raw = decomposed.into_raw();

    match unit {
        Unit::Millisecond => return instant,
        Unit::Second => raw.millisecond = 0,
        Unit::Minute => {
            raw.second = 0;
            raw.millisecond = 0;
        }
        Unit::Hour => {
            raw.minute = 0;
            raw.second = 0;
            raw.millisecond = 0;
        }
        Unit::Day => zero_time(&mut raw),
        Unit::Week => {
            zero_time(&mut raw);
            raw.day -= decomposed.weekday as i64;
        }
        Unit::Month => {
            zero_time(&mut raw);
            raw.day = 1;
        }
        Unit::Year => {
            zero_time(&mut raw);
            raw.day = 1;
            raw.month = 1;
        }
    }

    recompose(raw, offset, zone)
}

/// Snaps `instant` forward to the end of `unit`: the last representable
/// millisecond before the next unit starts. Derived compositionally as
/// `start_of + 1 unit - 1 ms`, so the relation holds across DST by
/// construction.
pub fn end_of(instant: i64, unit: Unit, zone: &Zone) -> i64 {
    let start = start_of(instant, unit, zone);
    add(start, 1, unit, zone) - 1
}

/// Moves `raw` by whole months, preserving the day-of-month unless the target
/// month is shorter, in which case the day clamps to the month's last day.
fn shift_months(raw: &mut RawFields, months: i64) {
    let total = raw.year * 12 + (raw.month - 1) + months;
    let (year, month0) = total.div_mod_floor(&12);

    raw.year = year;
    raw.month = month0 + 1;

    let max = fields::days_in_month(raw.year, raw.month as u8) as i64;
    if raw.day > max {
        raw.day = max;
    }
}

fn zero_time(raw: &mut RawFields) {
    raw.hour = 0;
    raw.minute = 0;
    raw.second = 0;
    raw.millisecond = 0;
}

/// Recomposes raw fields, re-resolving the zone's offset at the landing
/// instant. When the landing offset differs from the starting one (a DST
/// boundary was crossed), the fields are recomposed once more under the
/// landing offset so the wall-clock reading is preserved.
fn recompose(raw: RawFields, offset: i32, zone: &Zone) -> i64 {
    let candidate = fields::instant_from_raw(raw, offset);
    let landed = zone.resolve(candidate);

    if landed == offset {
        candidate
    } else {
        fields::instant_from_raw(raw, landed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conv;
    use crate::fields::instant_from_raw;

    fn utc_instant(year: i64, month: i64, day: i64, hour: i64, minute: i64, second: i64) -> i64 {
        instant_from_raw(
            RawFields {
                year,
                month,
                day,
                hour,
                minute,
                second,
                millisecond: 0,
            },
            0,
        )
    }

    #[test]
    fn test_absolute_units_ignore_offsets() {
        let instant = utc_instant(2022, 3, 13, 9, 30, 0);

        for zone in [Zone::Utc, Zone::Fixed(-420), Zone::named("America/Los_Angeles").unwrap()] {
            assert_eq!(add(instant, 90, Unit::Second, &zone), instant + 90_000);
            assert_eq!(add(instant, -3, Unit::Minute, &zone), instant - 180_000);
            assert_eq!(
                add(instant, 5, Unit::Hour, &zone),
                instant + 5 * conv::MILLIS_PER_HOUR
            );
        }
    }

    #[test]
    fn test_month_clamps_short_target() {
        let zone = Zone::Utc;

        // Jan 31 + 1 month lands on the last day of February, never March
        let jan_31 = utc_instant(2023, 1, 31, 12, 0, 0);
        let fields = Fields::from_instant(add(jan_31, 1, Unit::Month, &zone), 0);
        assert_eq!((fields.year, fields.month, fields.day), (2023, 2, 28));
        assert_eq!(fields.hour, 12);

        // leap year keeps the 29th
        let jan_31 = utc_instant(2024, 1, 31, 12, 0, 0);
        let fields = Fields::from_instant(add(jan_31, 1, Unit::Month, &zone), 0);
        assert_eq!((fields.year, fields.month, fields.day), (2024, 2, 29));

        // the day is preserved when it fits
        let jan_28 = utc_instant(2023, 1, 28, 12, 0, 0);
        let fields = Fields::from_instant(add(jan_28, 1, Unit::Month, &zone), 0);
        assert_eq!((fields.year, fields.month, fields.day), (2023, 2, 28));
    }

    #[test]
    fn test_year_arithmetic_clamps_leap_day() {
        let zone = Zone::Utc;

        let leap_day = utc_instant(2024, 2, 29, 6, 0, 0);
        let fields = Fields::from_instant(add(leap_day, 1, Unit::Year, &zone), 0);
        assert_eq!((fields.year, fields.month, fields.day), (2025, 2, 28));
    }

    #[test]
    fn test_month_arithmetic_crosses_years() {
        let zone = Zone::Utc;

        let nov = utc_instant(2022, 11, 15, 0, 0, 0);
        let fields = Fields::from_instant(add(nov, 3, Unit::Month, &zone), 0);
        assert_eq!((fields.year, fields.month, fields.day), (2023, 2, 15));

        let feb = utc_instant(2022, 2, 15, 0, 0, 0);
        let fields = Fields::from_instant(add(feb, -14, Unit::Month, &zone), 0);
        assert_eq!((fields.year, fields.month, fields.day), (2020, 12, 15));
    }

    #[test]
    fn test_start_of_units() {
        let zone = Zone::Fixed(-420);
        let instant = utc_instant(2022, 3, 13, 10, 0, 1); // 03:00:01 at -07:00

        let day = Fields::from_instant(start_of(instant, Unit::Day, &zone), -420);
        assert_eq!((day.year, day.month, day.day), (2022, 3, 13));
        assert_eq!((day.hour, day.minute, day.second, day.millisecond), (0, 0, 0, 0));

        let month = Fields::from_instant(start_of(instant, Unit::Month, &zone), -420);
        assert_eq!((month.month, month.day, month.hour), (3, 1, 0));

        let year = Fields::from_instant(start_of(instant, Unit::Year, &zone), -420);
        assert_eq!((year.month, year.day), (1, 1));
    }

    #[test]
    fn test_start_of_week_rolls_back_to_sunday() {
        let zone = Zone::Utc;

        // 2023-04-05 is a Wednesday; the week began Sunday the 2nd
        let wed = utc_instant(2023, 4, 5, 6, 7, 8);
        let fields = Fields::from_instant(start_of(wed, Unit::Week, &zone), 0);
        assert_eq!((fields.month, fields.day, fields.weekday), (4, 2, 0));
        assert_eq!(fields.hour, 0);

        // a Sunday is already the start of its week
        let sun = utc_instant(2023, 4, 2, 6, 0, 0);
        assert_eq!(start_of(sun, Unit::Week, &zone), utc_instant(2023, 4, 2, 0, 0, 0));
    }

    #[test]
    fn test_end_of_month() {
        let zone = Zone::Utc;

        let instant = utc_instant(2022, 3, 13, 10, 0, 1);
        let fields = Fields::from_instant(end_of(instant, Unit::Month, &zone), 0);

        assert_eq!((fields.month, fields.day), (3, 31));
        assert_eq!(
            (fields.hour, fields.minute, fields.second, fields.millisecond),
            (23, 59, 59, 999)
        );
    }

    #[test]
    fn test_day_add_preserves_wall_clock_across_dst() {
        let zone = Zone::named("America/Los_Angeles").unwrap();

        // 03:00:01 PDT, one second past the spring-forward transition
        let instant = utc_instant(2022, 3, 13, 10, 0, 1);

        let back_one_day = add(instant, -1, Unit::Day, &zone);
        let fields = Fields::from_instant(back_one_day, zone.resolve(back_one_day));
        assert_eq!((fields.month, fields.day), (3, 12));
        // local hour preserved even though the offset changed to -08:00
        assert_eq!((fields.hour, fields.minute, fields.second), (3, 0, 1));
        assert_eq!(zone.resolve(back_one_day), -480);
    }

    #[test]
    fn test_start_of_day_resolves_offset_at_midnight() {
        // the concrete scenario: 2022-03-13T03:00:01 at -07:00
        let instant = utc_instant(2022, 3, 13, 10, 0, 1);

        // fixed offset: midnight stays at -07:00
        let fixed = Zone::Fixed(-420);
        assert_eq!(
            start_of(instant, Unit::Day, &fixed),
            utc_instant(2022, 3, 13, 7, 0, 0)
        );

        // named zone: local midnight was still on standard time (-08:00)
        let named = Zone::named("America/Los_Angeles").unwrap();
        assert_eq!(
            start_of(instant, Unit::Day, &named),
            utc_instant(2022, 3, 13, 8, 0, 0)
        );
    }
}
