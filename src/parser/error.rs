use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// A grammar rule that did not match its assigned range.
///
/// Alternation keeps the failure of every branch it tried in `alternatives`,
/// so the full search can be reported with [`ParseError::diagnostic`] while
/// `Display` stays a one-line message for callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unable to parse input at character {position}: {message}")]
pub struct ParseError {
    /// Name of the rule that failed, e.g. `"sub-expression"`
    pub parser: &'static str,
    pub message: String,
    /// Character offset into the input
    pub position: usize,
    pub alternatives: Vec<ParseError>,
}

impl ParseError {
    pub fn new(parser: &'static str, message: impl Into<String>, position: usize) -> Self {
        ParseError {
            parser,
            message: message.into(),
            position,
            alternatives: Vec::new(),
        }
    }

    /// Failure of an alternation whose every branch failed.
    pub fn exhausted(parser: &'static str, position: usize, alternatives: Vec<ParseError>) -> Self {
        ParseError {
            parser,
            message: format!("Unable to parse {parser}"),
            position,
            alternatives,
        }
    }

    /// This error followed by every nested branch failure, depth first.
    pub fn causes(&self) -> Box<dyn Iterator<Item = &ParseError> + '_> {
        Box::new(std::iter::once(self).chain(self.alternatives.iter().flat_map(|e| e.causes())))
    }

    /// Multi-line rendering of the whole failure tree, one
    /// `Not a <parser> at <position>:` entry per rule, indented by nesting level.
    pub fn diagnostic(&self) -> String {
        let mut out = String::new();
        self.write_diagnostic(&mut out, 0);
        out
    }

    fn write_diagnostic(&self, out: &mut String, level: usize) {
        let indent = "  ".repeat(level);
        out.push_str(&format!("{indent}Not a {} at {}:\n", self.parser, self.position));
        out.push_str(&format!("{indent}  {}\n", self.message));
        for alternative in &self.alternatives {
            alternative.write_diagnostic(out, level + 1);
        }
    }
}

#[test]
fn test_display_is_single_line() {
    let error = ParseError::exhausted(
        "identifier",
        3,
        vec![ParseError::new("unquoted-string", "Invalid character", 4)],
    );
    assert_eq!(
        error.to_string(),
        "Unable to parse input at character 3: Unable to parse identifier"
    );
}

#[test]
fn test_diagnostic_lists_every_branch() {
    let error = ParseError::exhausted(
        "identifier",
        0,
        vec![
            ParseError::new("unquoted-string", "Unquoted identifiers must start with [A-Za-z_]", 0),
            ParseError::new("quoted-string", "Expected '\"'", 0),
        ],
    );
    let diagnostic = error.diagnostic();
    assert!(diagnostic.starts_with("Not a identifier at 0:\n"));
    assert!(diagnostic.contains("  Not a unquoted-string at 0:\n"));
    assert!(diagnostic.contains("  Not a quoted-string at 0:\n"));
    assert_eq!(error.causes().count(), 3);
}
