use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use std::ops::RangeInclusive;
use winnow::token::take_while;
use winnow::Parser;

use super::{expect, ErrorKind, Failure};

// Names are matched literally, whatever the host locale. A full name comes
// before its short form so the longer match wins.
const WEEKDAYS: [(&str, Weekday); 14] = [
    ("Monday", Weekday::Mon),
    ("Mon", Weekday::Mon),
    ("Tuesday", Weekday::Tue),
    ("Tue", Weekday::Tue),
    ("Wednesday", Weekday::Wed),
    ("Wed", Weekday::Wed),
    ("Thursday", Weekday::Thu),
    ("Thu", Weekday::Thu),
    ("Friday", Weekday::Fri),
    ("Fri", Weekday::Fri),
    ("Saturday", Weekday::Sat),
    ("Sat", Weekday::Sat),
    ("Sunday", Weekday::Sun),
    ("Sun", Weekday::Sun),
];

const MONTHS: [(&str, u32); 23] = [
    ("January", 1),
    ("Jan", 1),
    ("February", 2),
    ("Feb", 2),
    ("March", 3),
    ("Mar", 3),
    ("April", 4),
    ("Apr", 4),
    ("May", 5),
    ("June", 6),
    ("Jun", 6),
    ("July", 7),
    ("Jul", 7),
    ("August", 8),
    ("Aug", 8),
    ("September", 9),
    ("Sep", 9),
    ("October", 10),
    ("Oct", 10),
    ("November", 11),
    ("Nov", 11),
    ("December", 12),
    ("Dec", 12),
];

/// Parses `Thursday, 19 April 2018 10:44:34` into a naive timestamp.
///
/// Weekday and month may also be abbreviated (`Thu, 19 Apr 2018 ...`). The
/// weekday has to agree with the calendar date.
pub(super) fn date(input: &mut &str) -> Result<NaiveDateTime, Failure> {
    let start = *input;

    let weekday = lookup(input, &WEEKDAYS)?;
    expect(input, ", ", ErrorKind::InvalidDate)?;
    let day = number(input, 1..=2)?;
    expect(input, ' ', ErrorKind::InvalidDate)?;
    let month = lookup(input, &MONTHS)?;
    expect(input, ' ', ErrorKind::InvalidDate)?;
    let year = number(input, 4..=4)?;
    expect(input, ' ', ErrorKind::InvalidDate)?;
    let hour = number(input, 2..=2)?;
    expect(input, ':', ErrorKind::InvalidDate)?;
    let minute = number(input, 2..=2)?;
    expect(input, ':', ErrorKind::InvalidDate)?;
    let second = number(input, 2..=2)?;

    let invalid = || Failure::at(ErrorKind::InvalidDate, start);
    let date = NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)?;
    if date.weekday() != weekday {
        return Err(invalid());
    }
    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)?;

    Ok(date.and_time(time))
}

fn lookup<T: Copy>(input: &mut &str, table: &[(&str, T)]) -> Result<T, Failure> {
    let Some(&(name, value)) = table.iter().find(|entry| input.starts_with(entry.0)) else {
        return Err(Failure::at(ErrorKind::InvalidDate, input));
    };
    *input = &input[name.len()..];
    Ok(value)
}

fn number(input: &mut &str, width: RangeInclusive<usize>) -> Result<u32, Failure> {
    expect(
        input,
        take_while(width, |c: char| c.is_ascii_digit()).try_map(str::parse::<u32>),
        ErrorKind::InvalidDate,
    )
}
