//! Character-level primitives shared by every grammar rule.
//!
//! All positions are offsets into the input's `char`s, and every range is
//! half-open: `[start, end)`.

/// Read-only view of an expression's characters.
pub struct Scanner {
    input: Vec<char>,
}

impl Scanner {
    pub fn new(input: &str) -> Self {
        Scanner {
            input: input.chars().collect(),
        }
    }

    /// Number of characters in the input.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Character at `position`, or `None` past the end.
    pub fn char_at(&self, position: usize) -> Option<char> {
        self.input.get(position).copied()
    }

    /// First character of a non-empty range.
    pub fn first(&self, start: usize, end: usize) -> Option<char> {
        if start < end { self.char_at(start) } else { None }
    }

    /// Last character of a non-empty range.
    pub fn last(&self, start: usize, end: usize) -> Option<char> {
        if start < end { self.char_at(end - 1) } else { None }
    }

    /// The characters of a range, clamped to the input.
    pub fn slice(&self, start: usize, end: usize) -> &[char] {
        let end = end.min(self.input.len());
        if start >= end {
            return &[];
        }
        &self.input[start..end]
    }

    pub fn text(&self, start: usize, end: usize) -> String {
        self.slice(start, end).iter().collect()
    }

    /// Every start offset of `literal` that lies fully inside `[start, end)`,
    /// left to right. Scanning resumes one character after each match, so
    /// overlapping occurrences are all reported.
    pub fn find_all(&self, start: usize, end: usize, literal: &str) -> Vec<usize> {
        let needle: Vec<char> = literal.chars().collect();
        let end = end.min(self.input.len());
        let mut positions = Vec::new();

        if needle.is_empty() || start >= end || end - start < needle.len() {
            return positions;
        }

        for position in start..=(end - needle.len()) {
            if self.input[position..position + needle.len()] == needle[..] {
                positions.push(position);
            }
        }
        positions
    }

    /// First occurrence of `ch` inside `[start, end)`.
    pub fn find_char(&self, start: usize, end: usize, ch: char) -> Option<usize> {
        (start..end.min(self.input.len())).find(|&i| self.input[i] == ch)
    }

    /// Move `start` right past ASCII spaces, never past `end - 1`.
    pub fn trim_left_whitespace(&self, start: usize, end: usize) -> usize {
        let mut start = start;
        while start + 1 < end && self.char_at(start) == Some(' ') {
            start += 1;
        }
        start
    }

    /// Move `end` left past ASCII spaces, never before `start + 1`.
    pub fn trim_right_whitespace(&self, start: usize, end: usize) -> usize {
        let mut end = end;
        while start + 1 < end && self.char_at(end - 1) == Some(' ') {
            end -= 1;
        }
        end
    }

    pub fn trim(&self, start: usize, end: usize) -> (usize, usize) {
        let start = self.trim_left_whitespace(start, end);
        let end = self.trim_right_whitespace(start, end);
        (start, end)
    }
}

/// `[A-Za-z_]`
pub fn is_unquoted_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// `[A-Za-z0-9_]`
pub fn is_unquoted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// unescaped-char = %x20-21 / %x23-5B / %x5D-10FFFF
pub fn is_unescaped_char(c: char) -> bool {
    let c = c as u32;
    (0x20..=0x21).contains(&c) || (0x23..=0x5B).contains(&c) || c >= 0x5D
}

/// raw-string-char = %x20-26 / %x28-5B / %x5D-10FFFF
pub fn is_raw_string_char(c: char) -> bool {
    let c = c as u32;
    (0x20..=0x26).contains(&c) || (0x28..=0x5B).contains(&c) || c >= 0x5D
}

#[test]
fn test_find_all_reports_overlapping_matches() {
    let scanner = Scanner::new("a|||b");
    assert_eq!(scanner.find_all(0, 5, "||"), vec![1, 2]);
    assert_eq!(scanner.find_all(0, 5, "|"), vec![1, 2, 3]);
}

#[test]
fn test_find_all_respects_range() {
    let scanner = Scanner::new("a.b.c.d");
    assert_eq!(scanner.find_all(0, 7, "."), vec![1, 3, 5]);
    assert_eq!(scanner.find_all(2, 5, "."), vec![3]);
    assert_eq!(scanner.find_all(4, 4, "."), Vec::<usize>::new());
    // a match must fit entirely inside the range
    assert_eq!(Scanner::new("a&&").find_all(0, 2, "&&"), Vec::<usize>::new());
}

#[test]
fn test_trim_only_spaces() {
    let scanner = Scanner::new("  foo \t ");
    assert_eq!(scanner.trim_left_whitespace(0, 8), 2);
    assert_eq!(scanner.trim_right_whitespace(2, 8), 7);
}

#[test]
fn test_trim_never_empties_range() {
    let scanner = Scanner::new("    ");
    let (start, end) = scanner.trim(0, 4);
    assert_eq!(end - start, 1);
}

#[test]
fn test_raw_string_bands() {
    assert!(is_raw_string_char(' '));
    assert!(is_raw_string_char('&'));
    assert!(!is_raw_string_char('\''));
    assert!(is_raw_string_char('('));
    assert!(is_raw_string_char('['));
    assert!(!is_raw_string_char('\\'));
    assert!(is_raw_string_char(']'));
    assert!(is_raw_string_char('é'));
    assert!(!is_raw_string_char('\n'));
}

#[test]
fn test_unescaped_char_bands() {
    assert!(is_unescaped_char('!'));
    assert!(!is_unescaped_char('"'));
    assert!(is_unescaped_char('\''));
    assert!(!is_unescaped_char('\\'));
    assert!(!is_unescaped_char('\t'));
}
