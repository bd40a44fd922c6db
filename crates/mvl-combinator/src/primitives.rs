//! Leaf parsers that inspect the input directly.

use crate::{Failure, ParseResult, Parser};
use ::regex::Regex;

/// Match one exact character.
pub fn character(expected: char) -> impl Parser<char> {
    move |input: &[char], index: usize| match input.get(index) {
        Some(&head) if head == expected => Ok((head, index + 1)),
        _ => Err(Failure::new(format!("\"{expected}\""), index)),
    }
}

/// Match an exact string.
pub fn string(expected: &'static str) -> impl Parser<&'static str> {
    move |input: &[char], index: usize| match starts_with(input, index, expected) {
        Some(next) => Ok((expected, next)),
        None => Err(Failure::new(format!("\"{expected}\""), index)),
    }
}

/// Match one character against a pattern.
///
/// The pattern should be anchored (`^…$`) so it can only match the single
/// character under the cursor.
pub fn regex(pattern: &'static Regex) -> impl Parser<char> {
    move |input: &[char], index: usize| {
        let mut buf = [0u8; 4];
        match input.get(index) {
            Some(&head) if pattern.is_match(head.encode_utf8(&mut buf)) => Ok((head, index + 1)),
            _ => Err(Failure::new(format!("/{}/", pattern.as_str()), index)),
        }
    }
}

/// Match any single character.
pub fn any(input: &[char], index: usize) -> ParseResult<char> {
    match input.get(index) {
        Some(&head) => Ok((head, index + 1)),
        None => Err(Failure::new("any", index)),
    }
}

/// Match one character, provided the input at the cursor does not start with
/// any of the given strings.
pub fn not(excluded: &'static [&'static str]) -> impl Parser<char> {
    move |input: &[char], index: usize| {
        let Some(&head) = input.get(index) else {
            let list: Vec<String> = excluded.iter().map(|s| format!("{s:?}")).collect();
            return Err(Failure::new(format!("not {}", list.join(", ")), index));
        };

        for prefix in excluded {
            if starts_with(input, index, prefix).is_some() {
                return Err(Failure::new(format!("not \"{prefix}\""), index));
            }
        }

        Ok((head, index + 1))
    }
}

/// Succeed only at the very end of the input.
pub fn eof(input: &[char], index: usize) -> ParseResult<()> {
    if index == input.len() {
        Ok(((), index))
    } else {
        Err(Failure::new("EOF", index))
    }
}

/// Index after `expected` if the input at `index` starts with it.
fn starts_with(input: &[char], index: usize, expected: &str) -> Option<usize> {
    let mut next = index;
    for c in expected.chars() {
        if input.get(next) != Some(&c) {
            return None;
        }
        next += 1;
    }
    Some(next)
}
