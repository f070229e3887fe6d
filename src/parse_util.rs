use std::str::FromStr;
use std::str::Utf8Error;

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of input, expected '{exp}'")]
    UnexpectedEof { exp: char },

    #[error("Expected '{exp}', but got '{got}'")]
    UnexpectedToken { exp: char, got: char },
}

/// Iterator over the lines of a byte slice.
///
/// A linebreak is any of
/// * `\n`
/// * `\r`
/// * `\r\n`
///
/// Linebreaks are not part of the yielded lines. Like [`str::split`], a trailing linebreak yields
/// one final empty line.
pub struct Lines<'a> {
    bytes: Option<&'a [u8]>,
}

pub fn lines(bytes: &[u8]) -> Lines<'_> {
    Lines { bytes: Some(bytes) }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.bytes?;

        let Some(i) = bytes.iter().position(|&b| b == b'\n' || b == b'\r') else {
            self.bytes = None;

            return Some(bytes);
        };

        let (line, rest) = bytes.split_at(i);

        let rest = match rest {
            [b'\r', b'\n', rest @ ..] => rest,
            [_, rest @ ..] => rest,
            [] => unreachable!("position found a linebreak"),
        };

        self.bytes = Some(rest);

        Some(line)
    }
}

/// Consumes the slice until a non-ascii whitespace character is reached.
pub fn take_ws(bytes: &[u8]) -> &[u8] {
    let i = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());

    &bytes[i..]
}

/// Strips ascii whitespace from both ends of the slice.
pub fn trim(bytes: &[u8]) -> &[u8] {
    let bytes = take_ws(bytes);
    let j = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |j| j + 1);

    &bytes[..j]
}

/// Takes the next character from the slice. If none is found, the slice is left as-is.
pub const fn take_1(bytes: &[u8]) -> (Option<u8>, &[u8]) {
    let [b, bytes @ ..] = bytes else {
        return (None, bytes);
    };

    (Some(*b), bytes)
}

/// Like `take_1`, but doesn't consume the token
pub fn peek_1(bytes: &[u8]) -> Option<u8> {
    let [b, _bytes @ ..] = bytes else { return None };

    Some(*b)
}

/// Expects the next character in `bytes` to be `b`, ignoring ascii case.
pub fn expect_ignore_case(b: u8, bytes: &[u8]) -> ParseResult<&[u8]> {
    let (Some(a), bytes) = take_1(bytes) else {
        return Err(ParseError::UnexpectedEof { exp: b as char });
    };

    if !a.eq_ignore_ascii_case(&b) {
        return Err(ParseError::UnexpectedToken {
            exp: b as char,
            got: a as char,
        });
    }

    Ok(bytes)
}

/// Advance the slice while `P` is satisfied. The first byte failing `P` is not consumed.
pub fn take_while_fn<P>(p: P, bytes: &[u8]) -> (&[u8], &[u8])
where
    P: Fn(u8) -> bool,
{
    let i = bytes.iter().position(|&b| !p(b)).unwrap_or(bytes.len());

    bytes.split_at(i)
}

/// Split `bytes` around the first occurrence of `b`, which is consumed.
///
/// Returns `None` if `b` never occurs.
pub fn split_once(b: u8, bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let i = bytes.iter().position(|&a| a == b)?;
    let (head, tail) = bytes.split_at(i);

    Some((head, &tail[1..]))
}

/// Checks whether every byte of `bytes` is one of `set`. Vacuously true for an empty slice.
pub fn is_made_of(set: &[u8], bytes: &[u8]) -> bool {
    bytes.iter().all(|b| set.contains(b))
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Error parsing bytes from UTF-8: {0}")]
    InvalidUTF8(#[from] Utf8Error),

    #[error("Failed to convert \"{str}\"")]
    ParseError { str: String },
}

/// Converts `&[u8]` to `T` if `T: FromStr`.
pub fn convert<T: FromStr>(bytes: &[u8]) -> Result<T, ConvertError> {
    let str = std::str::from_utf8(bytes)?;

    let Ok(res) = str.parse::<T>() else {
        return Err(ConvertError::ParseError {
            str: str.to_string(),
        });
    };

    Ok(res)
}
