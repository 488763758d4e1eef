//! Grammar for the `My Clippings.txt` file written by Kindle devices.
//!
//! A clippings file is a run of records, each closed by a separator line:
//!
//! ```text
//! The Final Empire: 1 (MISTBORN) (Sanderson, Brandon)
//! - Your Highlight on page 266 | location 4071-4072 | Added on Thursday, 19 April 2018 10:44:34
//!
//! Highlighted text
//! ==========
//! ```
//!
//! Every grammar takes `&mut &str` and advances it past what it consumed. Any
//! failure aborts the whole parse; there is no partial result.

use std::fmt;
use winnow::error::ContextError;
use winnow::token::{take_until, take_while};
use winnow::Parser;

use crate::models::{Book, Highlight, Location, Metadata};

mod date;
mod metadata;
mod title;

pub const SEPARATOR: &str = "==========";

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedTitleLine,
    MissingAuthor,
    InvalidLocation,
    InvalidDate,
    MalformedMetadataLine,
    UnexpectedTrailingInput,
    UnexpectedEndOfInput,
    InvalidEncoding,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedTitleLine => write!(f, "malformed title line"),
            ErrorKind::MissingAuthor => {
                write!(f, "title line has no parenthesised author")
            }
            ErrorKind::InvalidLocation => write!(f, "invalid location"),
            ErrorKind::InvalidDate => write!(f, "invalid date"),
            ErrorKind::MalformedMetadataLine => write!(f, "malformed metadata line"),
            ErrorKind::UnexpectedTrailingInput => {
                write!(f, "unexpected input after separator")
            }
            ErrorKind::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
            ErrorKind::InvalidEncoding => write!(f, "input is not valid UTF-8"),
        }
    }
}

/// Terminal parse failure. `offset` is a byte offset into the buffer handed to
/// the entry point; `record` is the zero-based index of the record being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub offset: usize,
    pub record: Option<usize>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.offset)?;
        if let Some(record) = self.record {
            write!(f, " (record {})", record + 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Failure raised inside a grammar, positioned by the input left unread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Failure {
    kind: ErrorKind,
    remaining: usize,
}

impl Failure {
    fn at(kind: ErrorKind, input: &str) -> Self {
        Failure {
            kind,
            remaining: input.len(),
        }
    }

    /// Re-anchors a failure raised on a line slice onto the enclosing input.
    fn followed_by(self, rest: &str) -> Self {
        Failure {
            kind: self.kind,
            remaining: self.remaining + rest.len(),
        }
    }

    fn locate(self, source: &str, record: Option<usize>) -> ParseError {
        ParseError {
            kind: self.kind,
            offset: source.len().saturating_sub(self.remaining),
            record,
        }
    }
}

/// Runs a token-level parser, reporting any failure as `kind`.
fn expect<'s, O, P>(input: &mut &'s str, mut parser: P, kind: ErrorKind) -> Result<O, Failure>
where
    P: Parser<&'s str, O, ContextError>,
{
    match parser.parse_next(input) {
        Ok(output) => Ok(output),
        Err(_) => Err(Failure::at(kind, input)),
    }
}

/// One or more `\r`/`\n`.
fn line_breaks(input: &mut &str, kind: ErrorKind) -> Result<(), Failure> {
    if input.is_empty() {
        return Err(Failure::at(ErrorKind::UnexpectedEndOfInput, input));
    }
    expect(input, take_while(1.., ['\r', '\n']), kind)?;
    Ok(())
}

/// Everything up to the next separator, trimmed. May be empty.
fn content(input: &mut &str) -> Result<String, Failure> {
    let text = expect(
        input,
        take_until(0.., SEPARATOR),
        ErrorKind::UnexpectedEndOfInput,
    )?;
    Ok(text.trim().to_string())
}

fn highlight(input: &mut &str) -> Result<Highlight, Failure> {
    let book = title::book(input)?;
    line_breaks(input, ErrorKind::MalformedTitleLine)?;
    if input.is_empty() {
        return Err(Failure::at(ErrorKind::UnexpectedEndOfInput, input));
    }
    let metadata = metadata::metadata(input)?;
    line_breaks(input, ErrorKind::MalformedMetadataLine)?;
    let text = content(input)?;

    Ok(Highlight {
        book,
        metadata,
        text,
    })
}

fn is_terminator(input: &str) -> bool {
    input
        .strip_prefix(SEPARATOR)
        .is_some_and(|rest| rest.trim().is_empty())
}

/// Parses a whole clippings document into its records, in file order.
///
/// The last record must be followed by the separator line; a document holding
/// only that line has no records. A leading byte order mark is skipped.
pub fn parse_clippings(source: &str) -> Result<Vec<Highlight>, ParseError> {
    let mut input = source.strip_prefix(BYTE_ORDER_MARK).unwrap_or(source).trim_start();
    let mut highlights = Vec::new();

    if is_terminator(input) {
        return Ok(highlights);
    }
    if input.is_empty() {
        return Err(Failure::at(ErrorKind::UnexpectedEndOfInput, input).locate(source, None));
    }

    loop {
        let index = highlights.len();
        let record = highlight(&mut input).map_err(|e| e.locate(source, Some(index)))?;
        tracing::trace!(record = index, title = %record.book.title, "parsed record");
        highlights.push(record);

        // content stops in front of the separator
        expect(&mut input, SEPARATOR, ErrorKind::UnexpectedEndOfInput)
            .map_err(|e| e.locate(source, Some(index)))?;
        if input.trim().is_empty() {
            break;
        }
        expect(
            &mut input,
            take_while(1.., ['\r', '\n']),
            ErrorKind::UnexpectedTrailingInput,
        )
        .map_err(|e| e.locate(source, Some(index)))?;
    }

    tracing::debug!(records = highlights.len(), "parsed clippings");
    Ok(highlights)
}

/// Validates `bytes` as UTF-8 and parses the result with [`parse_clippings`].
/// Offsets stay relative to `bytes`.
pub fn parse_clippings_bytes(bytes: &[u8]) -> Result<Vec<Highlight>, ParseError> {
    let source = std::str::from_utf8(bytes).map_err(|e| ParseError {
        kind: ErrorKind::InvalidEncoding,
        offset: e.valid_up_to(),
        record: None,
    })?;

    parse_clippings(source)
}

fn complete<T>(
    source: &str,
    grammar: fn(&mut &str) -> Result<T, Failure>,
    trailing: ErrorKind,
) -> Result<T, ParseError> {
    let mut input = source;
    let value = grammar(&mut input).map_err(|e| e.locate(source, None))?;
    if !input.trim().is_empty() {
        return Err(Failure::at(trailing, input).locate(source, None));
    }
    Ok(value)
}

/// Parses a book line such as `Tress of the Emerald Sea (Brandon Sanderson)`.
pub fn parse_book(line: &str) -> Result<Book, ParseError> {
    complete(line, title::book, ErrorKind::MalformedTitleLine)
}

/// Parses a metadata line starting with `- Your Highlight` or `- Your Note`.
pub fn parse_metadata(line: &str) -> Result<Metadata, ParseError> {
    complete(line, metadata::metadata, ErrorKind::MalformedMetadataLine)
}

/// Parses `4071` or `4071-4072`.
pub fn parse_location(text: &str) -> Result<Location, ParseError> {
    complete(text, metadata::location, ErrorKind::InvalidLocation)
}

/// Parses `Thursday, 19 April 2018 10:44:34`.
pub fn parse_date(text: &str) -> Result<chrono::NaiveDateTime, ParseError> {
    complete(text, date::date, ErrorKind::InvalidDate)
}
