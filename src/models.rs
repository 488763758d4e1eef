use chrono::NaiveDateTime;
use std::fmt;

use crate::parser::SEPARATOR;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
}

/// Reader position range. `end`, when present, is never before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub start: u32,
    pub end: Option<u32>,
}

/// Whether the device recorded the entry as a highlight or as a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClippingKind {
    Highlight,
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub kind: ClippingKind,
    pub page: Option<Page>,
    pub location: Location,
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub book: Book,
    pub metadata: Metadata,
    pub text: String,
}

impl ClippingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClippingKind::Highlight => "Highlight",
            ClippingKind::Note => "Note",
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.author)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}-{}", self.start, end),
            None => write!(f, "{}", self.start),
        }
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page {
            Some(page) => write!(
                f,
                "- Your {} on page {} | location {}",
                self.kind.as_str(),
                page.number,
                self.location
            )?,
            None => write!(
                f,
                "- Your {} at location {}",
                self.kind.as_str(),
                self.location
            )?,
        }
        write!(f, " | Added on {}", self.date.format("%A, %-d %B %Y %H:%M:%S"))
    }
}

/// Renders one record the way the device writes it, without the separator.
impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n\n{}\n", self.book, self.metadata, self.text)
    }
}

/// Renders a whole clippings document, each record followed by the separator line.
pub fn render_clippings(highlights: &[Highlight]) -> String {
    let mut out = String::new();
    for highlight in highlights {
        out.push_str(&highlight.to_string());
        out.push_str(SEPARATOR);
        out.push('\n');
    }
    if highlights.is_empty() {
        out.push_str(SEPARATOR);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 4, 19)
            .unwrap()
            .and_hms_opt(10, 44, 34)
            .unwrap()
    }

    #[test]
    fn test_render_metadata_with_page() {
        let metadata = Metadata {
            kind: ClippingKind::Highlight,
            page: Some(Page { number: 266 }),
            location: Location {
                start: 4071,
                end: Some(4072),
            },
            date: datetime(),
        };

        assert_eq!(
            metadata.to_string(),
            "- Your Highlight on page 266 | location 4071-4072 | Added on Thursday, 19 April 2018 10:44:34"
        );
    }

    #[test]
    fn test_render_note_at_location() {
        let metadata = Metadata {
            kind: ClippingKind::Note,
            page: None,
            location: Location {
                start: 153,
                end: None,
            },
            date: NaiveDate::from_ymd_opt(2023, 1, 5)
                .unwrap()
                .and_hms_opt(7, 3, 9)
                .unwrap(),
        };

        assert_eq!(
            metadata.to_string(),
            "- Your Note at location 153 | Added on Thursday, 5 January 2023 07:03:09"
        );
    }

    #[test]
    fn test_render_highlight_record() {
        let highlight = Highlight {
            book: Book {
                title: "Tress of the Emerald Sea".to_string(),
                author: "Brandon Sanderson".to_string(),
            },
            metadata: Metadata {
                kind: ClippingKind::Highlight,
                page: None,
                location: Location {
                    start: 153,
                    end: Some(154),
                },
                date: datetime(),
            },
            text: "Some text".to_string(),
        };

        assert_eq!(
            highlight.to_string(),
            "Tress of the Emerald Sea (Brandon Sanderson)\n\
             - Your Highlight at location 153-154 | Added on Thursday, 19 April 2018 10:44:34\n\
             \n\
             Some text\n"
        );
    }

    #[test]
    fn test_render_empty_document_is_terminator() {
        assert_eq!(render_clippings(&[]), "==========\n");
    }
}
