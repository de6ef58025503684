//! `strftime`-style pattern rendering.
//!
//! A token is a `%` sigil, an optional flag, and a selector letter. The `-`
//! flag suppresses zero padding on numeric fields; the `:` flag puts a
//! separator in the `%z` UTC-offset field. The active [`Locale`] table is
//! consulted before the built-in renderers, so locales can shadow any token;
//! pattern-valued entries are expanded recursively. Tokens known to neither
//! the table nor the built-ins are emitted literally, flag included.

use crate::fields::{self, Fields};
use crate::locale::{Locale, Spec};

/// Expands `pattern` against the given fields and resolved offset, consulting
/// `locale` before the built-in renderers.
///
/// The offset must be the one the fields were decomposed with; it is held
/// fixed for the whole render so a pattern never mixes two offsets.
pub fn render(pattern: &str, fields: &Fields, offset_minutes: i32, locale: &Locale) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    render_into(&mut out, pattern, fields, offset_minutes, locale);
    out
}

fn render_into(out: &mut String, pattern: &str, fields: &Fields, offset: i32, locale: &Locale) {
    let mut chars = pattern.chars();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }

        let Some(next) = chars.next() else {
            // trailing lone sigil
            out.push('%');
            break;
        };

        let (flag, letter) = match next {
            '-' | ':' => match chars.next() {
                Some(letter) => (Some(next), letter),
                None => {
                    out.push('%');
                    out.push(next);
                    break;
                }
            },
            letter => (None, letter),
        };

        // locale entries shadow the built-ins
        let mut token_buf = [0_u8; 3];
        if let Some(token) = encode_token(&mut token_buf, flag, letter)
            && let Some(spec) = locale.get(token)
        {
            match spec {
                Spec::Render(render) => out.push_str(&render(fields, offset)),
                Spec::Pattern(expansion) => {
                    render_into(out, expansion, fields, offset, locale);
                }
            }
            continue;
        }

        if !builtin(out, flag, letter, fields, offset) {
            out.push('%');
            if let Some(flag) = flag {
                out.push(flag);
            }
            out.push(letter);
        }
    }
}

/// Writes the token as a `&str` key (`"%a"`, `"%-d"`). Non-ASCII selectors
/// can't match any table entry and return [`None`].
fn encode_token<'a>(buf: &'a mut [u8; 3], flag: Option<char>, letter: char) -> Option<&'a str> {
    if !letter.is_ascii() {
        return None;
    }

    buf[0] = b'%';
    let len = match flag {
        Some(flag) => {
            buf[1] = flag as u8;
            buf[2] = letter as u8;
            3
        }
        None => {
            buf[1] = letter as u8;
            2
        }
    };

    // SAFETY: only ascii bytes are written above.
    Some(unsafe { std::str::from_utf8_unchecked(&buf[..len]) })
}

/// Renders the locale-independent tokens. Returns `false` for selectors that
/// have no built-in meaning so the caller can emit them literally.
fn builtin(out: &mut String, flag: Option<char>, letter: char, f: &Fields, offset: i32) -> bool {
    // `:` only modifies %z; `-` means "no zero padding" everywhere else
    if flag == Some(':') && letter != 'z' {
        return false;
    }

    let width = |padded: usize| if flag == Some('-') { 0 } else { padded };

    match letter {
        '%' if flag.is_none() => out.push('%'),
        'Y' => push_int(out, f.year as i64, width(4)),
        'y' => push_int(out, f.year.rem_euclid(100) as i64, width(2)),
        'm' => push_int(out, f.month as i64, width(2)),
        'd' => push_int(out, f.day as i64, width(2)),
        'e' => push_space_padded(out, f.day as i64, width(2)),
        'H' => push_int(out, f.hour as i64, width(2)),
        'I' => push_int(out, f.hour12() as i64, width(2)),
        'M' => push_int(out, f.minute as i64, width(2)),
        'S' => push_int(out, f.second as i64, width(2)),
        'L' => push_int(out, f.millisecond as i64, width(3)),
        'j' => push_int(out, f.day_of_year() as i64, width(3)),
        'u' if flag.is_none() => {
            // ISO weekday, Monday = 1 .. Sunday = 7
            let iso = if f.weekday == 0 { 7 } else { f.weekday };
            push_int(out, iso as i64, 0);
        }
        's' if flag.is_none() => {
            let instant = fields::instant_from_raw(f.into_raw(), offset);
            push_int(out, instant.div_euclid(1000), 0);
        }
        'z' => push_offset(out, offset, flag),
        _ => return false,
    }

    true
}

/// Writes `value` zero padded to `width` digits (sign excluded).
/// Digit rendering goes through [`itoa`] rather than `format!`.
fn push_int(out: &mut String, value: i64, width: usize) {
    let mut buf = itoa::Buffer::new();

    if value < 0 {
        out.push('-');
    }

    let digits = buf.format(value.abs());
    for _ in digits.len()..width {
        out.push('0');
    }
    out.push_str(digits);
}

fn push_space_padded(out: &mut String, value: i64, width: usize) {
    let mut buf = itoa::Buffer::new();

    let digits = buf.format(value);
    for _ in digits.len()..width {
        out.push(' ');
    }
    out.push_str(digits);
}

/// Writes a signed UTC offset: `+HHMM` bare, `+HH:MM` with the `:` flag, and
/// `+HH` with the `-` flag.
fn push_offset(out: &mut String, offset_minutes: i32, flag: Option<char>) {
    out.push(if offset_minutes < 0 { '-' } else { '+' });

    let hours = (offset_minutes.abs() / 60) as i64;
    let minutes = (offset_minutes.abs() % 60) as i64;

    push_int(out, hours, 2);

    match flag {
        Some('-') => {}
        Some(_) => {
            out.push(':');
            push_int(out, minutes, 2);
        }
        None => push_int(out, minutes, 2),
    }
}
