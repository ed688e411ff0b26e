//! ISO-8601 timestamp parsing shared by the query parameters and the
//! dataset's `event_start` column.
//!
//! Accepted shapes:
//! - `YYYY-MM-DD`
//! - `YYYY-MM-DD[T| ]HH[:MM[:SS[.fraction]]]`
//! - either of the above followed by `Z`, `±HH`, `±HHMM` or `±HH:MM`
//!
//! The parsed value keeps the wall-clock reading and the offset apart so
//! callers can pick the interpretation they need. Years run from 0001 to
//! 9999 and leap seconds (`:60`) are rejected.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Timelike, Utc,
};
use thiserror::Error;

// ---

/// The input was not an ISO-8601 datetime.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid ISO-8601 datetime: {0:?}")]
pub struct InvalidDatetime(pub String);

/// A parsed ISO-8601 datetime: wall-clock reading plus the offset, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoDateTime {
    // ---
    naive: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl IsoDateTime {
    // ---
    /// The wall-clock reading as supplied, offset ignored.
    pub fn naive(&self) -> NaiveDateTime {
        self.naive
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// The wall-clock reading tagged as UTC. Any supplied offset is
    /// discarded, not converted.
    pub fn as_utc_tagged(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.naive)
    }

    /// The instant this value denotes, with a missing offset taken as UTC.
    pub fn to_fixed_offset(&self) -> DateTime<FixedOffset> {
        // ---
        let offset = self.offset.unwrap_or_else(utc_offset);
        DateTime::from_naive_utc_and_offset(self.naive - offset, offset)
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Parse an ISO-8601 date or datetime string.
pub fn parse_iso_datetime(input: &str) -> Result<IsoDateTime, InvalidDatetime> {
    // ---
    let invalid = || InvalidDatetime(input.to_string());

    if input.len() < 10 || !input.is_char_boundary(10) {
        return Err(invalid());
    }
    let (date_part, rest) = input.split_at(10);
    if !date_part.as_bytes()[..4].iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| invalid())?;
    if date.year() < 1 {
        return Err(invalid());
    }

    if rest.is_empty() {
        return Ok(IsoDateTime {
            naive: date.and_time(NaiveTime::MIN),
            offset: None,
        });
    }

    let time_and_offset = rest
        .strip_prefix('T')
        .or_else(|| rest.strip_prefix(' '))
        .ok_or_else(invalid)?;

    let (time_part, offset) = split_offset(time_and_offset).ok_or_else(invalid)?;
    let time = parse_time(time_part).ok_or_else(invalid)?;

    Ok(IsoDateTime {
        naive: date.and_time(time),
        offset,
    })
}

/// Split `HH:MM...[offset]` into the time text and the parsed offset.
fn split_offset(text: &str) -> Option<(&str, Option<FixedOffset>)> {
    // ---
    if let Some(time) = text.strip_suffix('Z') {
        return Some((time, Some(utc_offset())));
    }

    match text.find(['+', '-']) {
        Some(pos) => {
            let (time, offset) = text.split_at(pos);
            Some((time, Some(parse_offset(offset)?)))
        }
        None => Some((text, None)),
    }
}

/// Parse `±HH`, `±HHMM` or `±HH:MM`.
fn parse_offset(text: &str) -> Option<FixedOffset> {
    // ---
    if !text.is_ascii() {
        return None;
    }
    let (sign, digits) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };

    let (hours, minutes) = match digits.len() {
        2 => (digits, "00"),
        4 => digits.split_at(2),
        5 if digits.as_bytes()[2] == b':' => (&digits[..2], &digits[3..]),
        _ => return None,
    };

    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    // ---
    let format = match text.len() {
        // chrono will not build a time from the hour alone
        2 if text.bytes().all(|b| b.is_ascii_digit()) => {
            return NaiveTime::from_hms_opt(text.parse().ok()?, 0, 0);
        }
        5 => "%H:%M",
        8 => "%H:%M:%S",
        10..=18 if text.as_bytes()[8] == b'.' => "%H:%M:%S%.f",
        _ => return None,
    };
    let time = NaiveTime::parse_from_str(text, format).ok()?;

    // chrono encodes a `:60` leap second as nanoseconds past one second
    if time.nanosecond() >= 1_000_000_000 {
        return None;
    }
    Some(time)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn parses_fractional_seconds_without_offset() {
        // ---
        let parsed = parse_iso_datetime("2020-11-01T00:00:00.0000").unwrap();
        assert_eq!(parsed.offset(), None);
        assert_eq!(parsed.naive().date(), NaiveDate::from_ymd_opt(2020, 11, 1).unwrap());
        assert_eq!(parsed.naive().hour(), 0);
    }

    #[test]
    fn parses_date_only() {
        // ---
        let parsed = parse_iso_datetime("2021-02-28").unwrap();
        assert_eq!(parsed.naive().day(), 28);
        assert_eq!(parsed.naive().time(), NaiveTime::MIN);
    }

    #[test]
    fn parses_hour_only_time() {
        // ---
        let parsed = parse_iso_datetime("2020-11-01T10").unwrap();
        assert_eq!(parsed.naive().hour(), 10);
        assert_eq!(parsed.naive().minute(), 0);
        assert_eq!(parsed.offset(), None);

        let with_offset = parse_iso_datetime("2020-11-01 07+02:00").unwrap();
        assert_eq!(with_offset.naive().hour(), 7);
        assert_eq!(with_offset.offset(), FixedOffset::east_opt(2 * 3600));
    }

    #[test]
    fn parses_calendar_bounds() {
        // ---
        assert_eq!(parse_iso_datetime("0001-01-01").unwrap().naive().year(), 1);
        assert_eq!(parse_iso_datetime("9999-12-31T23:59:59.999999").unwrap().naive().year(), 9999);
        assert_eq!(parse_iso_datetime("2020-11-01T10:00:59").unwrap().naive().second(), 59);
    }

    #[test]
    fn parses_space_separator_and_short_offset() {
        // ---
        // Shape used by the dataset's event_start column
        let parsed = parse_iso_datetime("2020-11-01 00:00:00+00").unwrap();
        assert_eq!(parsed.offset(), Some(utc_offset()));
        assert_eq!(
            parsed.to_fixed_offset().with_timezone(&Utc),
            Utc.with_ymd_and_hms(2020, 11, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn parses_zulu_and_long_offsets() {
        // ---
        let zulu = parse_iso_datetime("2020-11-01T12:30Z").unwrap();
        assert_eq!(zulu.offset(), Some(utc_offset()));
        assert_eq!(zulu.naive().minute(), 30);

        let plus = parse_iso_datetime("2020-11-01T12:00:00+05:30").unwrap();
        assert_eq!(plus.offset(), FixedOffset::east_opt(5 * 3600 + 30 * 60));

        let minus = parse_iso_datetime("2020-11-01T12:00:00-0200").unwrap();
        assert_eq!(minus.offset(), FixedOffset::west_opt(2 * 3600));
    }

    #[test]
    fn utc_tagging_discards_offset() {
        // ---
        let parsed = parse_iso_datetime("2020-11-01T10:00:00+02:00").unwrap();
        assert_eq!(
            parsed.as_utc_tagged(),
            Utc.with_ymd_and_hms(2020, 11, 1, 10, 0, 0).unwrap()
        );
        // The instant itself is two hours earlier
        assert_eq!(
            parsed.to_fixed_offset().with_timezone(&Utc),
            Utc.with_ymd_and_hms(2020, 11, 1, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        // ---
        for bad in [
            "not-a-date",
            "",
            "2020-13-01",
            "2020-11-01X00:00",
            "2020-11-01T25:00",
            "2020-11-01T00:00:00+1",
            "2020-11-01T00:00:00+24:00",
            "2020-11-01T",
            "2020/11/01",
            "2020-11-01T1",
            "2020-11-01T1a",
            "2020-11-01T24",
            "2020-11-01T10:00:60",
            "2020-11-01T10:00:60.5",
            "0000-01-01",
            "+020-11-01",
        ] {
            assert_eq!(
                parse_iso_datetime(bad),
                Err(InvalidDatetime(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }
}
