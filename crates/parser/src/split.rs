//! Top-level splitting and stripping of spans.
//!
//! These utilities are the cornerstone of parsing: every higher-level
//! parse function works by splitting whole spans on separators that are
//! only honored at the top level of the bracket/string tower.
//!
//! Example: splitting `[a,b],[c,d]` on `,` yields `[a,b]` and `[c,d]`.

use crate::error::{ErrorKind, ParseError, Result};
use crate::span::Span;
use crate::traverse::{is_whole, Status, Traverser};

/// Trims ASCII whitespace off both ends.
#[must_use]
pub fn strip_spaces(s: &Span) -> Span {
    let bytes = s.bytes();
    let mut left = 0;
    while left < bytes.len() && bytes[left].is_ascii_whitespace() {
        left += 1;
    }
    let mut right = bytes.len();
    while right > left && bytes[right - 1].is_ascii_whitespace() {
        right -= 1;
    }
    s.slice(left..right)
}

/// Trims whitespace, then iteratively peels a single outer `( … )` as
/// long as the interior is whole. Idempotent.
#[must_use]
pub fn strip(s: &Span) -> Span {
    let mut s = s.clone();
    loop {
        s = strip_spaces(&s);
        let inner = s.slice(1..s.len().saturating_sub(1));
        if s.len() >= 2
            && s.byte_at(0) == Some(b'(')
            && s.byte_at(s.len() - 1) == Some(b')')
            && is_whole(&inner)
        {
            s = inner;
        } else {
            return s;
        }
    }
}

/// Splits a span on a separator, honoring matches only at the top level
/// of the bracket/string tower.
///
/// Special cases:
/// - `|` never splits when adjacent to another `|`, so `||` stays
///   atomic;
/// - an all-alphanumeric separator only splits at word boundaries.
///
/// Parts are returned unstripped.
pub fn split_raw(s: &Span, separator: &str) -> Result<Vec<Span>> {
    let sep = separator.as_bytes();
    if sep.is_empty() {
        return Ok(vec![s.clone()]);
    }
    let sep_alphanumeric = sep.iter().all(u8::is_ascii_alphanumeric);
    let bytes = s.bytes();

    let mut parts = Vec::new();
    let mut part_start = 0;
    let mut traverser = Traverser::new(s);
    while let Some(step) = traverser.next() {
        match step.status {
            Status::Ok => {}
            Status::Unmatched => {
                return Err(ParseError::new(
                    ErrorKind::UnmatchedBracket,
                    s.slice(step.idx..step.idx + 1),
                ))
            }
            Status::EolInString => {
                return Err(ParseError::new(
                    ErrorKind::EolInString,
                    s.slice(step.idx..step.idx),
                ))
            }
        }
        if !step.at_top_level() {
            continue;
        }
        let idx = step.idx;
        if !bytes[idx..].starts_with(sep) {
            continue;
        }
        if separator == "|" {
            let next_is_pipe = bytes.get(idx + 1) == Some(&b'|');
            let prev_is_pipe = idx > 0 && bytes[idx - 1] == b'|';
            if next_is_pipe || prev_is_pipe {
                continue;
            }
        }
        if sep_alphanumeric {
            let flanked_left = idx > 0 && bytes[idx - 1].is_ascii_alphanumeric();
            let flanked_right = bytes
                .get(idx + sep.len())
                .is_some_and(u8::is_ascii_alphanumeric);
            if flanked_left || flanked_right {
                continue;
            }
        }
        parts.push(s.slice(part_start..idx));
        // Step over the rest of the separator.
        for _ in 1..sep.len() {
            traverser.next();
        }
        part_start = idx + sep.len();
    }
    parts.push(s.slice(part_start..s.len()));
    Ok(parts)
}

/// [`split_raw`], then each part is stripped.
pub fn split(s: &Span, separator: &str) -> Result<Vec<Span>> {
    Ok(split_raw(s, separator)?.iter().map(strip).collect())
}

/// Splits in exactly two parts, or fails naming the separator.
pub fn split_in_two(s: &Span, separator: &str) -> Result<(Span, Span)> {
    match <[Span; 2]>::try_from(split(s, separator)?) {
        Ok([first, second]) => Ok((first, second)),
        Err(_) => Err(ParseError::new(
            ErrorKind::SplitNotInTwo {
                separator: separator.to_string(),
            },
            s.clone(),
        )),
    }
}

/// Splits in one or two parts: returns the single part, or the pair.
pub fn split_in_one_or_two(s: &Span, separator: &str) -> Result<(Span, Option<Span>)> {
    let mut parts = split(s, separator)?;
    match parts.len() {
        1 => Ok((parts.remove(0), None)),
        2 => {
            let second = parts.remove(1);
            Ok((parts.remove(0), Some(second)))
        }
        _ => Err(ParseError::new(
            ErrorKind::SplitNotInOneOrTwo {
                separator: separator.to_string(),
            },
            s.clone(),
        )),
    }
}

/// Splits every span in the list, flattening the result.
pub fn split_many(spans: &[Span], separator: &str) -> Result<Vec<Span>> {
    let mut result = Vec::new();
    for s in spans {
        result.extend(split(s, separator)?);
    }
    Ok(result)
}

/// Splits on whitespace at the top level, dropping empty chunks.
pub fn split_on_whitespace(s: &Span) -> Result<Vec<Span>> {
    let mut chunks = vec![s.clone()];
    for separator in [" ", "\n", "\t"] {
        chunks = split_many(&chunks, separator)?;
    }
    Ok(chunks.into_iter().filter(|c| !c.is_empty()).collect())
}
