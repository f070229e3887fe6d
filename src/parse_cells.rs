use tracing::trace;

use crate::parse_util;
use crate::pattern::PatternItem;
use crate::pattern::PatternParseError;

const NAME: &[u8] = b"!Name:";

const AUTHOR: &[u8] = b"!Author:";

/// Parse the Plaintext file format. `.` is a dead cell, `O` a live one.
///
/// Blank lines become empty rows once the first row has been read. A pattern must carry a
/// `!Name:` line.
///
/// See: https://conwaylife.com/wiki/Plaintext
pub fn read_cells(bytes: &[u8]) -> Result<PatternItem, PatternParseError> {
    let mut lines: Vec<&[u8]> = parse_util::lines(bytes).collect();

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    let mut title: Option<String> = None;
    let mut author = String::new();
    let mut comment: Option<String> = None;
    let mut rows: Vec<String> = Vec::new();

    for line in lines {
        if line.is_empty() {
            if !rows.is_empty() {
                rows.push(String::new());
            }

            continue;
        }

        if let Some(name) = line.strip_prefix(NAME) {
            title = Some(text(name));
        } else if let Some(a) = line.strip_prefix(AUTHOR) {
            author = text(a);
        } else if let Some(c) = line.strip_prefix(b"!") {
            let c = text(c);

            if comment.is_none() && !c.is_empty() {
                comment = Some(c);
            }
        } else if parse_util::is_made_of(b".O", line) {
            rows.push(line.iter().map(|&b| if b == b'O' { 'o' } else { ' ' }).collect());
        } else {
            trace!("Skipping Plaintext line {:?}", String::from_utf8_lossy(line));
        }
    }

    let Some(title) = title.filter(|t| !t.is_empty()) else {
        return Err(PatternParseError::MissingTitle);
    };

    if rows.is_empty() {
        return Err(PatternParseError::NoRows);
    }

    let mut item = PatternItem::new(title, rows);
    item.author = author;
    item.comment = comment.unwrap_or_default();

    Ok(item)
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(parse_util::trim(bytes)).into_owned()
}
