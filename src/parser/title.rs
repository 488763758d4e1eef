use winnow::ascii::space0;
use winnow::combinator::{delimited, preceded, repeat};
use winnow::token::{take_till, take_until};
use winnow::{ModalResult, Parser};

use super::{expect, ErrorKind, Failure, BYTE_ORDER_MARK};
use crate::models::Book;

/// Parses the book line.
///
/// The author is the last parenthesised group. Groups before it belong to the
/// title, so `The Final Empire: 1 (MISTBORN) (Sanderson, Brandon)` keeps
/// `(MISTBORN)` in the title. A title whose own last parenthetical is not
/// followed by an author group is misread; devices always append the author.
pub(super) fn book(input: &mut &str) -> Result<Book, Failure> {
    let mut line = expect(
        input,
        take_till(0.., ['\r', '\n']),
        ErrorKind::MalformedTitleLine,
    )?;
    let rest = *input;
    line = line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line);

    let prefix = expect(&mut line, take_until(0.., '('), ErrorKind::MissingAuthor)
        .map_err(|e| e.followed_by(rest))?;

    let groups: Vec<&str> = expect(
        &mut line,
        repeat(1.., preceded(space0, parenthesized)),
        ErrorKind::MalformedTitleLine,
    )
    .map_err(|e| e.followed_by(rest))?;

    if !line.trim().is_empty() {
        return Err(Failure::at(ErrorKind::MalformedTitleLine, line).followed_by(rest));
    }

    let Some((author, subtitles)) = groups.split_last() else {
        return Err(Failure::at(ErrorKind::MissingAuthor, line).followed_by(rest));
    };

    let mut title = prefix.to_string();
    title.push_str(
        &subtitles
            .iter()
            .map(|group| format!("({})", group))
            .collect::<Vec<_>>()
            .join(" "),
    );

    Ok(Book {
        title: title.trim().to_string(),
        author: author.trim().to_string(),
    })
}

/// `(something)` -> `something`
fn parenthesized<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    delimited('(', take_till(0.., ')'), ')').parse_next(input)
}
