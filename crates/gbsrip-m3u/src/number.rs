//! Numeric field parsers: track numbers, timestamps and loop counts.
//!
//! All parsers work on the longest valid prefix of a field and report how
//! many bytes they consumed. A field that yields nothing is `None`.

/// Parses a signed integer prefix in the given radix.
///
/// A leading `-` negates the result and counts as consumed even when no
/// digits follow it. Overflow saturates instead of wrapping.
fn parse_radix(buf: &[u8], radix: u32) -> (i32, usize) {
    let mut value: i32 = 0;
    let mut sign = 1;
    let mut consumed = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if i == 0 && byte == b'-' {
            sign = -1;
            consumed = 1;
            continue;
        }
        let Some(digit) = char::from(byte).to_digit(radix) else {
            break;
        };
        value = value
            .saturating_mul(radix as i32)
            .saturating_add(sign * digit as i32);
        consumed = i + 1;
    }

    (value, consumed)
}

/// Parses a signed decimal prefix, returning `(value, bytes_consumed)`.
pub(crate) fn parse_decimal(buf: &[u8]) -> (i32, usize) {
    parse_radix(buf, 10)
}

/// Parses a track number: decimal, or hexadecimal when prefixed with `$`.
pub(crate) fn parse_track(field: &[u8]) -> Option<i32> {
    let (value, consumed) = match field.strip_prefix(b"$") {
        Some(hex) => parse_radix(hex, 16),
        None => parse_decimal(field),
    };
    (consumed > 0).then_some(value)
}

/// Parses a `[[HH:]MM:]SS[.mmm]` timestamp into milliseconds.
///
/// Every `:` carries the accumulated value into the next base-60 unit. The
/// fractional part is read as decimal seconds with millisecond precision, so
/// `.5` is 500 ms and digits after the third are ignored.
pub(crate) fn parse_timestamp(field: &[u8]) -> Option<i32> {
    let mut seconds: i32 = 0;
    let mut millis: i32 = 0;
    let mut pos = 0;

    while pos < field.len() {
        match field[pos] {
            b':' => {
                seconds = seconds.saturating_mul(60);
                pos += 1;
            }
            b'.' => {
                pos += 1;
                let (fraction, consumed) = parse_fraction(&field[pos..]);
                millis = fraction;
                pos += consumed;
                break;
            }
            _ => {
                let (value, consumed) = parse_decimal(&field[pos..]);
                if consumed == 0 {
                    break;
                }
                seconds = seconds.saturating_add(value);
                pos += consumed;
            }
        }
    }

    (pos > 0).then(|| seconds.saturating_mul(1000).saturating_add(millis))
}

/// Reads up to three fractional digits as milliseconds.
fn parse_fraction(buf: &[u8]) -> (i32, usize) {
    let digits = buf.iter().take_while(|b| b.is_ascii_digit()).count();
    let mut millis = 0;
    let mut scale = 100;
    for &digit in &buf[..digits.min(3)] {
        millis += i32::from(digit - b'0') * scale;
        scale /= 10;
    }
    (millis, digits)
}

/// Parses the loop-count field.
pub(crate) fn parse_loop_count(field: &[u8]) -> Option<i32> {
    let (value, consumed) = parse_decimal(field);
    (consumed > 0).then_some(value)
}
