//! Generic building blocks for rules of the form `(start, end) -> ParseResult<T>`.

use log::trace;

use super::error::{ParseError, ParseResult};
use crate::scanner::Scanner;

/// A grammar rule over a half-open character range.
pub type Rule<'a, T> = &'a dyn Fn(usize, usize) -> ParseResult<T>;

/// Ordered alternation: the first rule that matches `[start, end)` wins.
///
/// When every rule fails the error names `parser` and carries each branch's
/// failure in order.
pub fn first_of<T>(parser: &'static str, start: usize, end: usize, rules: &[Rule<'_, T>]) -> ParseResult<T> {
    let mut alternatives = Vec::with_capacity(rules.len());
    for rule in rules {
        match rule(start, end) {
            Ok(result) => return Ok(result),
            Err(error) => alternatives.push(error),
        }
    }
    Err(ParseError::exhausted(parser, start, alternatives))
}

/// Parse `left` over one range and `right` over another; both must match.
pub fn both<A, B>(
    (left_start, left_end): (usize, usize),
    left: impl FnOnce(usize, usize) -> ParseResult<A>,
    (right_start, right_end): (usize, usize),
    right: impl FnOnce(usize, usize) -> ParseResult<B>,
) -> ParseResult<(A, B)> {
    let left = left(left_start, left_end)?;
    let right = right(right_start, right_end)?;
    Ok((left, right))
}

/// Try each candidate delimiter position left to right and return the
/// first split where `[start, position)` matches `left` and
/// `[position + delimiter_len, end)` matches `right`.
pub fn split_search<L, R>(
    (start, end): (usize, usize),
    candidates: &[usize],
    delimiter_len: usize,
    left: impl Fn(usize, usize) -> ParseResult<L>,
    right: impl Fn(usize, usize) -> ParseResult<R>,
) -> Option<(L, R)> {
    candidates.iter().find_map(|&position| {
        both(
            (start, position),
            &left,
            (position + delimiter_len, end),
            &right,
        )
        .ok()
    })
}

/// `open entry *("," entry) close`
///
/// The separator after the first entry must be unique: when more than one
/// comma leaves a valid first entry before it, the input is rejected as an
/// ambiguous separation rather than resolved by guessing. Later entries are
/// matched greedily, skipping commas that do not end a valid entry.
pub fn multi_select<T>(
    scanner: &Scanner,
    (start, end): (usize, usize),
    (open, close): (char, char),
    entry: impl Fn(usize, usize) -> ParseResult<T>,
) -> ParseResult<Vec<T>> {
    if start >= end {
        return Err(ParseError::new("multi-select", "Empty range", start));
    }
    let (start, end) = scanner.trim(start, end);

    if scanner.first(start, end) != Some(open) {
        return Err(ParseError::new("multi-select", format!("Expected '{open}'"), start));
    }
    if end - start < 2 || scanner.last(start, end) != Some(close) {
        return Err(ParseError::new("multi-select", format!("Expected '{close}'"), end - 1));
    }

    let inner_start = start + 1;
    let inner_end = end - 1;
    let commas = scanner.find_all(inner_start, inner_end, ",");

    if commas.is_empty() {
        return entry(inner_start, inner_end).map(|single| vec![single]);
    }

    let mut first_entries: Vec<(usize, T)> = commas
        .iter()
        .filter_map(|&comma| entry(inner_start, comma).ok().map(|value| (comma, value)))
        .collect();

    if first_entries.len() > 1 {
        trace!(
            "{} candidate separators after first entry at {inner_start}",
            first_entries.len()
        );
        return Err(ParseError::new("multi-select", "Ambiguous separation", start));
    }
    let Some((first_comma, first)) = first_entries.pop() else {
        return Err(ParseError::new("multi-select", "Invalid value", inner_start));
    };

    let mut entries = vec![first];
    let mut entry_start = first_comma + 1;
    for &comma in commas.iter().filter(|&&comma| comma > first_comma) {
        if let Ok(value) = entry(entry_start, comma) {
            entries.push(value);
            entry_start = comma + 1;
        }
    }

    match entry(entry_start, inner_end) {
        Ok(last) => {
            entries.push(last);
            Ok(entries)
        }
        Err(_) => Err(ParseError::new("multi-select", "Ambiguous separation", start)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(scanner: &Scanner) -> impl Fn(usize, usize) -> ParseResult<String> + '_ {
        move |start, end| {
            let (start, end) = scanner.trim(start, end);
            let text = scanner.text(start, end);
            if !text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic()) {
                Ok(text)
            } else {
                Err(ParseError::new("letters", "Expected letters", start))
            }
        }
    }

    #[test]
    fn test_first_of_returns_first_success() {
        let rules: [Rule<'_, u8>; 3] = [
            &|start, _| Err(ParseError::new("a", "no", start)),
            &|_, _| Ok(1),
            &|_, _| Ok(2),
        ];
        assert_eq!(first_of("digit", 0, 1, &rules), Ok(1));
    }

    #[test]
    fn test_first_of_keeps_every_failure() {
        let rules: [Rule<'_, u8>; 2] = [
            &|start, _| Err(ParseError::new("a", "first", start)),
            &|start, _| Err(ParseError::new("b", "second", start + 1)),
        ];
        let error = first_of("digit", 4, 6, &rules).unwrap_err();
        assert_eq!(error.parser, "digit");
        assert_eq!(error.position, 4);
        let branches: Vec<_> = error.alternatives.iter().map(|e| (e.parser, e.position)).collect();
        assert_eq!(branches, vec![("a", 4), ("b", 5)]);
    }

    #[test]
    fn test_split_search_prefers_leftmost() {
        let scanner = Scanner::new("a-b-c");
        let dashes = scanner.find_all(0, 5, "-");
        let any = |start: usize, end: usize| -> ParseResult<String> { Ok(scanner.text(start, end)) };
        let (left, right) = split_search((0, 5), &dashes, 1, any, any).unwrap();
        assert_eq!((left.as_str(), right.as_str()), ("a", "b-c"));
    }

    #[test]
    fn test_split_search_skips_failing_sides() {
        let scanner = Scanner::new("a-b-c");
        let dashes = scanner.find_all(0, 5, "-");
        let any = |start: usize, end: usize| -> ParseResult<String> { Ok(scanner.text(start, end)) };
        let (left, right) = split_search((0, 5), &dashes, 1, any, letters(&scanner)).unwrap();
        assert_eq!((left.as_str(), right.as_str()), ("a-b", "c"));
    }

    #[test]
    fn test_multi_select_entries() {
        let scanner = Scanner::new("[a, b ,c]");
        let entries = multi_select(&scanner, (0, 9), ('[', ']'), letters(&scanner)).unwrap();
        assert_eq!(entries, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_multi_select_single_entry() {
        let scanner = Scanner::new(" [ abc ] ");
        let entries = multi_select(&scanner, (0, 9), ('[', ']'), letters(&scanner)).unwrap();
        assert_eq!(entries, vec!["abc"]);
    }

    #[test]
    fn test_multi_select_rejects_ambiguous_first_separator() {
        let scanner = Scanner::new("[a,b,c]");
        let anything = |start: usize, end: usize| -> ParseResult<String> {
            if start < end {
                Ok(scanner.text(start, end))
            } else {
                Err(ParseError::new("anything", "Empty", start))
            }
        };
        let error = multi_select(&scanner, (0, 7), ('[', ']'), anything).unwrap_err();
        assert_eq!(error.message, "Ambiguous separation");
        assert_eq!(error.position, 0);
    }

    #[test]
    fn test_multi_select_invalid_first_entry() {
        let scanner = Scanner::new("[1,b]");
        let error = multi_select(&scanner, (0, 5), ('[', ']'), letters(&scanner)).unwrap_err();
        assert_eq!(error.message, "Invalid value");
        assert_eq!(error.position, 1);
    }

    #[test]
    fn test_multi_select_invalid_last_entry() {
        let scanner = Scanner::new("[a,b,1]");
        let error = multi_select(&scanner, (0, 7), ('[', ']'), letters(&scanner)).unwrap_err();
        assert_eq!(error.message, "Ambiguous separation");
    }

    #[test]
    fn test_multi_select_requires_delimiters() {
        let scanner = Scanner::new("{a}");
        let error = multi_select(&scanner, (0, 3), ('[', ']'), letters(&scanner)).unwrap_err();
        assert_eq!(error.message, "Expected '['");
        let error = multi_select(&scanner, (1, 3), ('a', ']'), letters(&scanner)).unwrap_err();
        assert_eq!(error.message, "Expected ']'");
        assert_eq!(error.position, 2);
    }
}
