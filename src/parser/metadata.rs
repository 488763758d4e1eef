use winnow::ascii::digit1;
use winnow::combinator::{alt, cut_err, opt, preceded};
use winnow::token::take_till;
use winnow::{ModalResult, Parser};

use super::{date, expect, ErrorKind, Failure};
use crate::models::{ClippingKind, Location, Metadata, Page};

/// Which position the metadata line opens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Page,
    Location,
}

/// Parses the metadata line, e.g.
/// `- Your Highlight on page 266 | location 4071-4072 | Added on Thursday, 19 April 2018 10:44:34`
/// or `- Your Note at location 153-154 | Added on ...`.
pub(super) fn metadata(input: &mut &str) -> Result<Metadata, Failure> {
    const MALFORMED: ErrorKind = ErrorKind::MalformedMetadataLine;

    expect(input, "- ", MALFORMED)?;
    let (kind, anchor) = expect(
        input,
        alt((
            "Your Highlight on page ".value((ClippingKind::Highlight, Anchor::Page)),
            "Your Note on page ".value((ClippingKind::Note, Anchor::Page)),
            "Your Highlight at location ".value((ClippingKind::Highlight, Anchor::Location)),
            "Your Note at location ".value((ClippingKind::Note, Anchor::Location)),
        )),
        MALFORMED,
    )?;

    let page = match anchor {
        Anchor::Page => {
            let number = expect(input, integer, MALFORMED)?;
            expect(input, " | location ", MALFORMED)?;
            Some(Page { number })
        }
        Anchor::Location => None,
    };
    let location = location(input)?;

    expect(input, " | Added on ", MALFORMED)?;
    let date = date::date(input)?;

    let trailing = expect(input, take_till(0.., ['\r', '\n']), MALFORMED)?;
    if !trailing.trim().is_empty() {
        return Err(Failure::at(MALFORMED, trailing).followed_by(input));
    }

    Ok(Metadata {
        kind,
        page,
        location,
        date,
    })
}

/// `4071` or `4071-4072`.
pub(super) fn location(input: &mut &str) -> Result<Location, Failure> {
    let start = expect(input, integer, ErrorKind::InvalidLocation)?;
    let end = expect(
        input,
        opt(preceded('-', cut_err(integer))),
        ErrorKind::InvalidLocation,
    )?;

    if end.is_some_and(|end| end < start) {
        return Err(Failure::at(ErrorKind::InvalidLocation, input));
    }

    Ok(Location { start, end })
}

/// Decimal digits, leading zeros allowed.
fn integer(input: &mut &str) -> ModalResult<u32> {
    digit1.try_map(str::parse::<u32>).parse_next(input)
}
