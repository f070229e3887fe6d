use std::iter;

use thiserror::Error;
use tracing::trace;
use tracing::warn;

use crate::parse_util;
use crate::parse_util::ConvertError;
use crate::pattern;
use crate::pattern::PatternItem;
use crate::pattern::PatternParseError;

/// Title given to patterns without a `#N` line.
pub const UNTITLED: &str = "Untitled";

/// Largest number of cells in a row, and of rows, a pattern may decode to.
pub const MAX_EXTENT: usize = 1 << 16;

/// Parse the RLE file format into pattern rows.
///
/// Lines that are neither comments, the header nor part of the encoding are skipped.
///
/// See: https://conwaylife.com/wiki/Run_Length_Encoded
pub fn read_rle(bytes: &[u8]) -> Result<PatternItem, PatternParseError> {
    let mut title: Option<String> = None;
    let mut author: Option<String> = None;
    let mut comments: Vec<String> = Vec::new();
    let mut header: Option<RleHeaderLine> = None;

    let mut encoding = Vec::new();

    for line in parse_util::lines(bytes) {
        match line {
            [] => {}

            [b'#', rest @ ..] => match read_line_comment(rest) {
                RleCommentLine::Comment { text } => {
                    if !text.is_empty() {
                        comments.push(text);
                    }
                }
                RleCommentLine::Name { name } => {
                    if title.is_some() {
                        warn!("RLE file name already defined. Using latest");
                    }

                    title = Some(name);
                }
                RleCommentLine::Author { author: a } => {
                    if author.is_some() {
                        warn!("RLE author already defined. Using latest");
                    }

                    author = Some(a);
                }
                RleCommentLine::Other => {}
            },

            [b'x', ..] => match read_line_header(line) {
                Ok(h) => {
                    if header.is_some() {
                        warn!("RLE header already defined. Using latest");
                    }

                    header = Some(h);
                }
                Err(e) => warn!("Skipping RLE header line: {e}"),
            },

            [b, ..] if b.is_ascii_digit() || b" bo$!".contains(b) => {
                encoding.extend(line.iter().filter(|&&b| b != b' '));
            }

            _ => trace!("Skipping RLE line {:?}", String::from_utf8_lossy(line)),
        }
    }

    let rows = read_encoding(&encoding)?;

    if rows.is_empty() {
        return Err(PatternParseError::NoRows);
    }

    let mut item = PatternItem::new(title.unwrap_or_else(|| UNTITLED.to_string()), rows);
    item.author = author.unwrap_or_default();
    item.comment = comments.join("\n");

    if let Some(header) = header {
        if let Some(rule) = header.rule {
            item.rule = rule.to_ascii_uppercase();
        }

        if (header.x, header.y) != (item.width(), item.height()) {
            warn!(
                "RLE header announces {}x{} cells, decoded {}x{}",
                header.x,
                header.y,
                item.width(),
                item.height()
            );
        }
    }

    Ok(item)
}

enum RleCommentLine {
    Comment { text: String },
    Name { name: String },
    Author { author: String },
    Other,
}

/// Parse a comment line, past its `#`.
fn read_line_comment(bytes: &[u8]) -> RleCommentLine {
    let (Some(b), bytes) = parse_util::take_1(bytes) else {
        return RleCommentLine::Other;
    };

    let text = String::from_utf8_lossy(parse_util::trim(bytes)).into_owned();

    match b {
        b'C' | b'c' => RleCommentLine::Comment { text },
        b'N' => RleCommentLine::Name { name: text },
        b'O' => RleCommentLine::Author { author: text },
        _ => RleCommentLine::Other,
    }
}

#[derive(Debug, PartialEq, Eq)]
struct RleHeaderLine {
    x: usize,
    y: usize,
    rule: Option<String>,
}

#[derive(Debug, Error)]
pub enum RleHeaderLineError {
    #[error("Expected 'key = value', found \"{field}\"")]
    MalformedField { field: String },

    #[error("Missing '{key}' field")]
    MissingField { key: char },

    #[error("Failed to parse '{key}': {source}")]
    Size {
        key: char,
        #[source]
        source: ConvertError,
    },
}

/// Parse `x = W, y = H, rule = R`. Unknown fields are ignored.
fn read_line_header(bytes: &[u8]) -> Result<RleHeaderLine, RleHeaderLineError> {
    let mut x = None;
    let mut y = None;
    let mut rule = None;

    for field in bytes.split(|&b| b == b',') {
        let Some((key, value)) = parse_util::split_once(b'=', field) else {
            return Err(RleHeaderLineError::MalformedField {
                field: String::from_utf8_lossy(parse_util::trim(field)).into_owned(),
            });
        };

        let value = parse_util::trim(value);

        match parse_util::trim(key) {
            b"x" => {
                let n = parse_util::convert(value)
                    .map_err(|source| RleHeaderLineError::Size { key: 'x', source })?;
                x = Some(n);
            }
            b"y" => {
                let n = parse_util::convert(value)
                    .map_err(|source| RleHeaderLineError::Size { key: 'y', source })?;
                y = Some(n);
            }
            b"rule" => rule = Some(String::from_utf8_lossy(value).into_owned()),
            _ => {}
        }
    }

    let Some(x) = x else {
        return Err(RleHeaderLineError::MissingField { key: 'x' });
    };

    let Some(y) = y else {
        return Err(RleHeaderLineError::MissingField { key: 'y' });
    };

    Ok(RleHeaderLine { x, y, rule })
}

#[derive(Debug, Error)]
pub enum RleEncodingError {
    #[error("Failed to convert run length: {0}")]
    RunLength(#[from] ConvertError),

    #[error("Unrecognized byte: 0x{got:0X}")]
    UnrecognizedByte { got: u8 },

    #[error("Run of {run} takes the pattern past {} cells", MAX_EXTENT)]
    RunTooLong { run: usize },
}

/// Expand the run-length encoded cells into rows.
///
/// `$` closes the current row, and a count `n` adds `n - 1` blank rows after it. `!` closes the
/// last row and stops. A run count of 0 emits nothing. Rows, and the row count, are bounded by
/// [`MAX_EXTENT`].
fn read_encoding(mut bytes: &[u8]) -> Result<Vec<String>, RleEncodingError> {
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut rep: Option<usize> = None;

    loop {
        let token = bytes;

        let (Some(b), rest) = parse_util::take_1(bytes) else {
            warn!("RLE encoding is not terminated by '!'");

            if !row.is_empty() {
                rows.push(row);
            }

            break;
        };
        bytes = rest;

        match b {
            // End of input
            b'!' => {
                rows.push(row);

                break;
            }

            // Dead or live cells
            b'b' | b'o' => {
                let n = rep.take().unwrap_or(1);

                if row.len().saturating_add(n) > MAX_EXTENT {
                    return Err(RleEncodingError::RunTooLong { run: n });
                }

                let c = if b == b'o' { pattern::ALIVE } else { pattern::DEAD };
                row.extend(iter::repeat_n(c, n));
            }

            // End of line
            b'$' => {
                let n = rep.take().unwrap_or(1);

                if rows.len().saturating_add(n) > MAX_EXTENT {
                    return Err(RleEncodingError::RunTooLong { run: n });
                }

                rows.push(std::mem::take(&mut row));
                rows.extend(iter::repeat_n(String::new(), n.saturating_sub(1)));
            }

            n if n.is_ascii_digit() => {
                let (digits, rest) = parse_util::take_while_fn(|b| b.is_ascii_digit(), token);
                bytes = rest;

                rep = Some(parse_util::convert(digits)?);
            }

            b => return Err(RleEncodingError::UnrecognizedByte { got: b }),
        }
    }

    Ok(rows)
}
