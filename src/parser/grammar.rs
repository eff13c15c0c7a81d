//! The expression grammar.
//!
//! Every rule takes a half-open character range, trims spaces from both ends
//! and either matches the whole range or fails. Ambiguity is resolved by
//! trying candidate split points left to right; there is no tokenizer and no
//! precedence table.

use std::cell::Cell;

use super::ParserOptions;
use super::combinators::{first_of, multi_select, split_search};
use super::error::{ParseError, ParseResult};
use crate::ast::{
    AndExpression, BracketContents, BracketSpecifier, Comparator, ComparatorExpression, Expression,
    FunctionArg, FunctionExpression, IndexExpression, KeyValueExpression, Literal, MultiSelectHash,
    MultiSelectList, NotExpression, OrExpression, ParenExpression, PipeExpression, SliceExpression,
    SubExpression, SubExpressionRight,
};
use crate::scanner::{Scanner, is_raw_string_char, is_unescaped_char, is_unquoted_char, is_unquoted_start};

pub(crate) struct Grammar<'s> {
    scanner: &'s Scanner,
    options: &'s ParserOptions,
    depth: Cell<usize>,
}

/// Releases one level of nesting when dropped.
struct DepthGuard<'g> {
    depth: &'g Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}

impl<'s> Grammar<'s> {
    pub fn new(scanner: &'s Scanner, options: &'s ParserOptions) -> Self {
        Grammar {
            scanner,
            options,
            depth: Cell::new(0),
        }
    }

    fn enter(&self, position: usize) -> ParseResult<DepthGuard<'_>> {
        let depth = self.depth.get() + 1;
        if depth > self.options.max_depth {
            return Err(ParseError::new(
                "expression",
                format!("Maximum nesting depth of {} exceeded", self.options.max_depth),
                position,
            ));
        }
        self.depth.set(depth);
        Ok(DepthGuard { depth: &self.depth })
    }

    /// Trimmed bounds of a non-empty range.
    fn span(&self, parser: &'static str, start: usize, end: usize) -> ParseResult<(usize, usize)> {
        if start >= end {
            return Err(ParseError::new(parser, "Empty range", start));
        }
        Ok(self.scanner.trim(start, end))
    }

    fn char_at(&self, position: usize) -> Option<char> {
        self.scanner.char_at(position)
    }

    /// expression = sub-expression / index-expression / comparator-expression
    ///            / or-expression / identifier / and-expression / not-expression
    ///            / paren-expression / "*" / multi-select-list / multi-select-hash
    ///            / literal / function-expression / pipe-expression / raw-string
    ///            / current-node
    pub fn expression(&self, start: usize, end: usize) -> ParseResult<Expression> {
        let (start, end) = self.span("expression", start, end)?;
        let _depth = self.enter(start)?;

        first_of(
            "expression",
            start,
            end,
            &[
                &|s, e| self.sub_expression(s, e).map(Expression::SubExpression),
                &|s, e| self.index_expression(s, e).map(Expression::IndexExpression),
                &|s, e| self.comparator_expression(s, e).map(Expression::ComparatorExpression),
                &|s, e| self.or_expression(s, e).map(Expression::OrExpression),
                &|s, e| self.identifier(s, e).map(Expression::Identifier),
                &|s, e| self.and_expression(s, e).map(Expression::AndExpression),
                &|s, e| self.not_expression(s, e).map(Expression::NotExpression),
                &|s, e| self.paren_expression(s, e).map(Expression::ParenExpression),
                &|s, e| self.star_expression(s, e).map(|_| Expression::StarExpression),
                &|s, e| self.multi_select_list(s, e).map(Expression::MultiSelectList),
                &|s, e| self.multi_select_hash(s, e).map(Expression::MultiSelectHash),
                &|s, e| self.literal(s, e).map(Expression::Literal),
                &|s, e| self.function_expression(s, e).map(Expression::FunctionExpression),
                &|s, e| self.pipe_expression(s, e).map(Expression::PipeExpression),
                &|s, e| self.raw_string(s, e).map(Expression::RawString),
                &|s, e| self.current_node(s, e).map(|_| Expression::CurrentNode),
            ],
        )
    }

    /// sub-expression = expression "." ( identifier / multi-select-list
    ///                / multi-select-hash / function-expression / "*" )
    fn sub_expression(&self, start: usize, end: usize) -> ParseResult<SubExpression> {
        let (start, end) = self.span("sub-expression", start, end)?;
        let dots = self.scanner.find_all(start + 1, end - 1, ".");

        split_search(
            (start, end),
            &dots,
            1,
            |s, e| self.expression(s, e),
            |s, e| self.sub_expression_right(s, e),
        )
        .map(|(left, right)| SubExpression::new(left, right))
        .ok_or_else(|| ParseError::new("sub-expression", "Invalid sub-expression", start))
    }

    fn sub_expression_right(&self, start: usize, end: usize) -> ParseResult<SubExpressionRight> {
        first_of(
            "sub-expression-right",
            start,
            end,
            &[
                &|s, e| self.identifier(s, e).map(SubExpressionRight::Identifier),
                &|s, e| self.multi_select_list(s, e).map(SubExpressionRight::MultiSelectList),
                &|s, e| self.multi_select_hash(s, e).map(SubExpressionRight::MultiSelectHash),
                &|s, e| self.function_expression(s, e).map(SubExpressionRight::FunctionExpression),
                &|s, e| self.star_expression(s, e).map(|_| SubExpressionRight::StarExpression),
            ],
        )
    }

    /// pipe-expression = expression "|" expression
    fn pipe_expression(&self, start: usize, end: usize) -> ParseResult<PipeExpression> {
        self.binary("pipe-expression", start, end, "|")
            .map(|(left, right)| PipeExpression::new(left, right))
    }

    /// or-expression = expression "||" expression
    fn or_expression(&self, start: usize, end: usize) -> ParseResult<OrExpression> {
        self.binary("or-expression", start, end, "||")
            .map(|(left, right)| OrExpression::new(left, right))
    }

    /// and-expression = expression "&&" expression
    fn and_expression(&self, start: usize, end: usize) -> ParseResult<AndExpression> {
        self.binary("and-expression", start, end, "&&")
            .map(|(left, right)| AndExpression::new(left, right))
    }

    fn binary(
        &self,
        parser: &'static str,
        start: usize,
        end: usize,
        delimiter: &str,
    ) -> ParseResult<(Expression, Expression)> {
        let (start, end) = self.span(parser, start, end)?;
        let positions = self.scanner.find_all(start + 1, end - 1, delimiter);

        split_search(
            (start, end),
            &positions,
            delimiter.len(),
            |s, e| self.expression(s, e),
            |s, e| self.expression(s, e),
        )
        .ok_or_else(|| ParseError::new(parser, "Invalid binary-expression", start))
    }

    /// not-expression = "!" expression
    fn not_expression(&self, start: usize, end: usize) -> ParseResult<NotExpression> {
        let (start, end) = self.span("not-expression", start, end)?;
        if self.char_at(start) != Some('!') {
            return Err(ParseError::new("not-expression", "Expected '!'", start));
        }
        self.expression(start + 1, end).map(NotExpression::new)
    }

    /// paren-expression = "(" expression ")"
    fn paren_expression(&self, start: usize, end: usize) -> ParseResult<ParenExpression> {
        let (start, end) = self.span("paren-expression", start, end)?;
        if self.char_at(start) != Some('(') {
            return Err(ParseError::new("paren-expression", "Expected '('", start));
        }
        if end - start < 2 || self.char_at(end - 1) != Some(')') {
            return Err(ParseError::new("paren-expression", "Expected ')'", end - 1));
        }
        self.expression(start + 1, end - 1).map(ParenExpression::new)
    }

    /// index-expression = expression bracket-specifier / bracket-specifier
    fn index_expression(&self, start: usize, end: usize) -> ParseResult<IndexExpression> {
        let (start, end) = self.span("index-expression", start, end)?;
        first_of(
            "index-expression",
            start,
            end,
            &[
                &|s, e| self.index_expression_with_lhs(s, e),
                &|s, e| self.bracket_specifier(s, e).map(|bracket| IndexExpression::new(None, bracket)),
            ],
        )
    }

    fn index_expression_with_lhs(&self, start: usize, end: usize) -> ParseResult<IndexExpression> {
        let (start, end) = self.span("index-expression with lhs-expression", start, end)?;
        let brackets = self.scanner.find_all(start + 1, end - 1, "[");

        split_search(
            (start, end),
            &brackets,
            0,
            |s, e| self.expression(s, e),
            |s, e| self.bracket_specifier(s, e),
        )
        .map(|(left, bracket)| IndexExpression::new(Some(left), bracket))
        .ok_or_else(|| {
            ParseError::new(
                "index-expression with lhs-expression",
                "Invalid index-expression with lhs-expression",
                start,
            )
        })
    }

    /// bracket-specifier = "[" ( number / "*" / slice-expression ) "]" / "[]"
    ///                   / "[?" expression "]"
    fn bracket_specifier(&self, start: usize, end: usize) -> ParseResult<BracketSpecifier> {
        let (start, end) = self.span("bracket-specifier", start, end)?;
        if self.char_at(start) != Some('[') {
            return Err(ParseError::new("bracket-specifier", "Expected '['", start));
        }
        if end - start < 2 || self.char_at(end - 1) != Some(']') {
            return Err(ParseError::new("bracket-specifier", "Expected ']'", end - 1));
        }

        if end - start == 2 {
            return Ok(BracketSpecifier::WithoutContents);
        }

        if self.char_at(start + 1) == Some('?') {
            return self.expression(start + 2, end - 1).map(BracketSpecifier::filter);
        }

        first_of(
            "bracket-specifier-content",
            start + 1,
            end - 1,
            &[
                &|s, e| self.number(s, e).map(BracketContents::Number),
                &|s, e| self.star_expression(s, e).map(|_| BracketContents::StarExpression),
                &|s, e| self.slice_expression(s, e).map(BracketContents::SliceExpression),
            ],
        )
        .map(BracketSpecifier::WithContents)
    }

    /// comparator-expression = expression comparator expression
    fn comparator_expression(&self, start: usize, end: usize) -> ParseResult<ComparatorExpression> {
        let (start, end) = self.span("comparator-expression", start, end)?;

        Comparator::ALL
            .into_iter()
            .find_map(|comparator| {
                let symbol = comparator.symbol();
                let positions = self.scanner.find_all(start, end, symbol);
                split_search(
                    (start, end),
                    &positions,
                    symbol.len(),
                    |s, e| self.expression(s, e),
                    |s, e| self.expression(s, e),
                )
                .map(|(left, right)| ComparatorExpression::new(left, comparator, right))
            })
            .ok_or_else(|| ParseError::new("comparator-expression", "Invalid comparator expression", start))
    }

    /// slice-expression = [number] ":" [number] [ ":" [number] ]
    fn slice_expression(&self, start: usize, end: usize) -> ParseResult<SliceExpression> {
        let (start, end) = self.span("slice-expression", start, end)?;

        let Some(first_colon) = self.scanner.find_char(start, end, ':') else {
            return Err(ParseError::new("slice-expression", "Expected slice expression", start));
        };
        let second_colon = self.scanner.find_char(first_colon + 1, end, ':');
        let second_end = second_colon.unwrap_or(end);
        let third_start = second_colon.map_or(end, |colon| colon + 1);

        Ok(SliceExpression::new(
            self.slice_bound(start, first_colon)?,
            self.slice_bound(first_colon + 1, second_end)?,
            self.slice_bound(third_start, end)?,
        ))
    }

    /// An omitted bound is `None`, never zero.
    fn slice_bound(&self, start: usize, end: usize) -> ParseResult<Option<i64>> {
        if self.scanner.slice(start, end).iter().all(|&c| c == ' ') {
            return Ok(None);
        }
        self.number(start, end).map(Some)
    }

    /// function-expression = unquoted-string ( no-args / one-or-more-args )
    fn function_expression(&self, start: usize, end: usize) -> ParseResult<FunctionExpression> {
        let (start, end) = self.span("function-expression", start, end)?;

        let paren = match self.scanner.find_char(start, end, '(') {
            Some(paren) if paren > start => paren,
            _ => return Err(ParseError::new("function-expression", "Expected function", start)),
        };

        let name = self.unquoted_string(start, paren).map_err(|e| {
            ParseError::new(
                "function-expression",
                format!("Expected valid function name ({})", e.message),
                start,
            )
        })?;

        first_of(
            "function-arguments",
            paren,
            end,
            &[&|s, e| self.no_args(s, e), &|s, e| self.one_or_more_args(s, e)],
        )
        .map(|args| FunctionExpression::new(name, args))
    }

    /// no-args = "(" ")"
    fn no_args(&self, start: usize, end: usize) -> ParseResult<Vec<FunctionArg>> {
        let (start, end) = self.span("no-args", start, end)?;
        if self.char_at(start) != Some('(') {
            return Err(ParseError::new("no-args", "Expected '('", start));
        }

        let close = self.scanner.trim_left_whitespace(start + 1, end);
        if close >= end || self.char_at(close) != Some(')') {
            return Err(ParseError::new("no-args", "Expected ')'", close));
        }
        if close + 1 != end {
            return Err(ParseError::new("no-args", "Unexpected character", close + 1));
        }
        Ok(Vec::new())
    }

    /// one-or-more-args = "(" function-arg *( "," function-arg ) ")"
    fn one_or_more_args(&self, start: usize, end: usize) -> ParseResult<Vec<FunctionArg>> {
        multi_select(self.scanner, (start, end), ('(', ')'), |s, e| self.function_arg(s, e))
    }

    /// function-arg = expression / expression-type
    fn function_arg(&self, start: usize, end: usize) -> ParseResult<FunctionArg> {
        first_of(
            "function-arg",
            start,
            end,
            &[
                &|s, e| self.expression(s, e).map(FunctionArg::Expression),
                &|s, e| self.expression_type(s, e).map(FunctionArg::ExpressionType),
            ],
        )
    }

    /// expression-type = "&" expression
    fn expression_type(&self, start: usize, end: usize) -> ParseResult<Expression> {
        let (start, end) = self.span("expression-type", start, end)?;
        if self.char_at(start) != Some('&') {
            return Err(ParseError::new("expression-type", "Expected '&'", start));
        }
        self.expression(start + 1, end)
    }

    /// multi-select-list = "[" expression *( "," expression ) "]"
    fn multi_select_list(&self, start: usize, end: usize) -> ParseResult<MultiSelectList> {
        multi_select(self.scanner, (start, end), ('[', ']'), |s, e| self.expression(s, e))
            .map(MultiSelectList::new)
    }

    /// multi-select-hash = "{" keyval-expr *( "," keyval-expr ) "}"
    fn multi_select_hash(&self, start: usize, end: usize) -> ParseResult<MultiSelectHash> {
        multi_select(self.scanner, (start, end), ('{', '}'), |s, e| self.key_value_expression(s, e))
            .map(MultiSelectHash::new)
    }

    /// keyval-expr = identifier ":" expression
    fn key_value_expression(&self, start: usize, end: usize) -> ParseResult<KeyValueExpression> {
        let (start, end) = self.span("keyval-expr", start, end)?;
        let colons = self.scanner.find_all(start + 1, end - 1, ":");

        split_search(
            (start, end),
            &colons,
            1,
            |s, e| self.identifier(s, e),
            |s, e| self.expression(s, e),
        )
        .map(|(key, value)| KeyValueExpression::new(key, value))
        .ok_or_else(|| ParseError::new("keyval-expr", "Invalid keyval-expr", start))
    }

    /// literal = "`" json-value "`"
    fn literal(&self, start: usize, end: usize) -> ParseResult<Literal> {
        let (start, end) = self.span("literal", start, end)?;
        if end - start < 2 {
            return Err(ParseError::new("literal", "Invalid bounds", start));
        }
        if self.char_at(start) != Some('`') {
            return Err(ParseError::new("literal", "Expected '`'", start));
        }
        if self.char_at(end - 1) != Some('`') {
            return Err(ParseError::new("literal", "Expected '`'", end - 1));
        }

        let body = self.scanner.slice(start + 1, end - 1);
        let mut json = String::with_capacity(body.len());
        for (i, &c) in body.iter().enumerate() {
            if c != '`' {
                json.push(c);
                continue;
            }

            // a backtick is escaped by an odd run of backslashes
            let escapes = body[..i].iter().rev().take_while(|&&b| b == '\\').count();
            if escapes % 2 == 0 {
                return Err(ParseError::new("literal", "Unescaped '`'", start));
            }
            json.pop();
            json.push('`');
        }

        serde_json::from_str(&json)
            .map(Literal::new)
            .map_err(|e| ParseError::new("literal", format!("Invalid JSON: {e}"), start))
    }

    /// number = ["-"] 1*digit
    fn number(&self, start: usize, end: usize) -> ParseResult<i64> {
        let (start, end) = self.span("number", start, end)?;
        let digits_start = if self.char_at(start) == Some('-') { start + 1 } else { start };
        let digits = self.scanner.slice(digits_start, end);

        if digits.is_empty() || !digits.iter().all(char::is_ascii_digit) {
            return Err(ParseError::new("number", "Expected number", start));
        }
        self.scanner
            .text(start, end)
            .parse::<i64>()
            .map_err(|_| ParseError::new("number", "Number out of range", start))
    }

    /// identifier = unquoted-string / quoted-string
    pub fn identifier(&self, start: usize, end: usize) -> ParseResult<String> {
        first_of(
            "identifier",
            start,
            end,
            &[&|s, e| self.unquoted_string(s, e), &|s, e| self.quoted_string(s, e)],
        )
    }

    /// unquoted-string = (%x41-5A / %x61-7A / %x5F) *(%x30-39 / %x41-5A / %x5F / %x61-7A)
    fn unquoted_string(&self, start: usize, end: usize) -> ParseResult<String> {
        let (start, end) = self.span("unquoted-string", start, end)?;

        if !self.char_at(start).is_some_and(is_unquoted_start) {
            return Err(ParseError::new(
                "unquoted-string",
                "Unquoted identifiers must start with [A-Za-z_]",
                start,
            ));
        }
        if let Some(offset) = self.scanner.slice(start, end).iter().position(|&c| !is_unquoted_char(c)) {
            return Err(ParseError::new(
                "unquoted-string",
                "Invalid character in unquoted identifier",
                start + offset,
            ));
        }
        Ok(self.scanner.text(start, end))
    }

    /// quoted-string = quote 1*(unescaped-char / escaped-char) quote
    fn quoted_string(&self, start: usize, end: usize) -> ParseResult<String> {
        let (start, end) = self.span("quoted-string", start, end)?;
        if self.char_at(start) != Some('"') {
            return Err(ParseError::new("quoted-string", "Expected '\"'", start));
        }
        if end - start < 3 || self.char_at(end - 1) != Some('"') {
            return Err(ParseError::new("quoted-string", "Expected '\"'", end - 1));
        }

        let body = self.scanner.slice(start + 1, end - 1);
        let mut result = String::with_capacity(body.len());
        let mut i = 0;
        while i < body.len() {
            let position = start + 1 + i;
            let c = body[i];
            if c != '\\' {
                if !is_unescaped_char(c) {
                    return Err(ParseError::new("quoted-string", "Invalid character in quoted identifier", position));
                }
                result.push(c);
                i += 1;
                continue;
            }

            let decoded = match body.get(i + 1) {
                Some('"') => '"',
                Some('\\') => '\\',
                Some('/') => '/',
                Some('b') => '\u{8}',
                Some('f') => '\u{c}',
                Some('n') => '\n',
                Some('r') => '\r',
                Some('t') => '\t',
                Some('u') => {
                    let hex = body.get(i + 2..i + 6).filter(|h| h.iter().all(char::is_ascii_hexdigit));
                    let Some(hex) = hex else {
                        return Err(ParseError::new("quoted-string", "Invalid unicode escape", position));
                    };
                    // kept verbatim; unicode escapes are validated, not decoded
                    result.push_str("\\u");
                    result.extend(hex);
                    i += 6;
                    continue;
                }
                _ => return Err(ParseError::new("quoted-string", "Invalid escape sequence", position)),
            };
            result.push(decoded);
            i += 2;
        }
        Ok(result)
    }

    /// raw-string = "'" *raw-string-char "'"
    fn raw_string(&self, start: usize, end: usize) -> ParseResult<String> {
        let (start, end) = self.span("raw-string", start, end)?;
        if end - start < 2 {
            return Err(ParseError::new("raw-string", "Invalid length", start));
        }
        if self.char_at(start) != Some('\'') {
            return Err(ParseError::new("raw-string", "Expected \"'\"", start));
        }
        if self.char_at(end - 1) != Some('\'') {
            return Err(ParseError::new("raw-string", "Expected \"'\"", end - 1));
        }

        let body = self.scanner.slice(start + 1, end - 1);
        let mut result = String::with_capacity(body.len());
        let mut i = 0;
        while i < body.len() {
            let position = start + 1 + i;
            match (body[i], body.get(i + 1).copied()) {
                ('\\', Some(escaped @ ('\'' | '\\'))) => {
                    result.push(escaped);
                    i += 2;
                }
                ('\\', Some(preserved)) if is_raw_string_char(preserved) => {
                    result.push('\\');
                    result.push(preserved);
                    i += 2;
                }
                ('\\', _) => {
                    return Err(ParseError::new("raw-string", "Invalid escape in raw string", position));
                }
                (c, _) if is_raw_string_char(c) => {
                    result.push(c);
                    i += 1;
                }
                _ => {
                    return Err(ParseError::new("raw-string", "Invalid character in raw string", position));
                }
            }
        }
        Ok(result)
    }

    /// "*"
    fn star_expression(&self, start: usize, end: usize) -> ParseResult<()> {
        self.expect_token("star-expression", start, end, '*')
    }

    /// current-node = "@"
    fn current_node(&self, start: usize, end: usize) -> ParseResult<()> {
        self.expect_token("current-node", start, end, '@')
    }

    fn expect_token(&self, parser: &'static str, start: usize, end: usize, token: char) -> ParseResult<()> {
        let (start, end) = self.span(parser, start, end)?;
        if self.char_at(start) != Some(token) {
            return Err(ParseError::new(parser, format!("Expected '{token}'"), start));
        }
        if end - start != 1 {
            return Err(ParseError::new(parser, "Unexpected character", start + 1));
        }
        Ok(())
    }
}
