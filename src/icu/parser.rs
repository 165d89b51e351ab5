//! ICU message template parser
//!
//! Turns template strings such as `My name is {name}` into a list of
//! [`MessageElement`]s. Supported syntax:
//!
//! - simple arguments `{name}`
//! - formatted arguments `{n, number}`, `{d, date, short}`, `{t, time}`
//! - `{x, select, a {...} other {...}}`
//! - `{n, plural, offset:1 =0 {...} one {...} other {...}}` and `selectordinal`
//! - `#` inside plural branches
//! - rich text tags `<b>...</b>`
//! - apostrophe quoting: `''` is a literal quote, `'{...}'` quotes syntax

use super::ast::{MessageElement, PluralType};
use crate::error::{ParseError, ParseErrorKind};
use std::collections::BTreeMap;

/// Deepest nesting of tags and select/plural branches accepted
///
/// Compiled catalogs must stay readable by `serde_json`, whose default
/// recursion limit is 128.
pub const MAX_NESTING_DEPTH: usize = 24;

/// Parse a message template
pub fn parse(message: &str) -> Result<Vec<MessageElement>, ParseError> {
    let mut parser = Parser::new(message);
    parser.parse_message(&Context::root())
}

/// Where in the template the parser currently is
#[derive(Debug, Clone)]
struct Context {
    /// Directly inside a plural branch, so `#` is a pound element
    in_plural: bool,
    /// Offset of the enclosing `{` when inside a select/plural branch
    option_start: Option<usize>,
    /// Enclosing tag name and the offset of its `<`
    tag: Option<(String, usize)>,
}

impl Context {
    fn root() -> Self {
        Self {
            in_plural: false,
            option_start: None,
            tag: None,
        }
    }

    fn option_body(in_plural: bool, start: usize) -> Self {
        Self {
            in_plural,
            option_start: Some(start),
            tag: None,
        }
    }

    fn tag_body(&self, name: String, start: usize) -> Self {
        Self {
            in_plural: self.in_plural,
            option_start: self.option_start,
            tag: Some((name, start)),
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.pos)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn parse_message(&mut self, ctx: &Context) -> Result<Vec<MessageElement>, ParseError> {
        if self.depth > MAX_NESTING_DEPTH {
            return Err(self.error(ParseErrorKind::TooDeep(MAX_NESTING_DEPTH)));
        }
        self.depth += 1;
        let result = self.parse_elements(ctx);
        self.depth -= 1;
        result
    }

    fn parse_elements(&mut self, ctx: &Context) -> Result<Vec<MessageElement>, ParseError> {
        let mut elements = Vec::new();
        let mut literal = String::new();

        loop {
            let Some(c) = self.peek() else {
                if let Some((name, start)) = &ctx.tag {
                    return Err(ParseError::new(
                        ParseErrorKind::UnclosedTag(name.clone()),
                        *start,
                    ));
                }
                if let Some(start) = ctx.option_start {
                    return Err(ParseError::new(ParseErrorKind::UnclosedArgument, start));
                }
                break;
            };

            match c {
                '{' => {
                    flush_literal(&mut literal, &mut elements);
                    elements.push(self.parse_argument()?);
                }
                '}' => {
                    if let Some((name, start)) = &ctx.tag {
                        return Err(ParseError::new(
                            ParseErrorKind::UnclosedTag(name.clone()),
                            *start,
                        ));
                    }
                    if ctx.option_start.is_some() {
                        break;
                    }
                    return Err(self.error(ParseErrorKind::UnmatchedBrace));
                }
                '#' if ctx.in_plural => {
                    flush_literal(&mut literal, &mut elements);
                    self.bump();
                    elements.push(MessageElement::Pound);
                }
                '<' => {
                    if let Some(name) = self.closing_tag_name() {
                        match &ctx.tag {
                            Some((open, _)) if *open == name => {
                                // `</` + name + `>`
                                self.pos += name.len() + 3;
                                break;
                            }
                            _ => return Err(self.error(ParseErrorKind::UnmatchedClosingTag(name))),
                        }
                    }
                    match self.try_parse_tag(ctx)? {
                        Some(Tag::Element(element)) => {
                            flush_literal(&mut literal, &mut elements);
                            elements.push(element);
                        }
                        Some(Tag::SelfClosing(text)) => literal.push_str(&text),
                        None => {
                            self.bump();
                            literal.push('<');
                        }
                    }
                }
                '\'' => self.parse_apostrophe(ctx, &mut literal),
                _ => {
                    self.bump();
                    literal.push(c);
                }
            }
        }

        flush_literal(&mut literal, &mut elements);
        Ok(elements)
    }

    fn parse_apostrophe(&mut self, ctx: &Context, literal: &mut String) {
        self.bump();
        match self.peek() {
            Some('\'') => {
                self.bump();
                literal.push('\'');
            }
            Some(c) if starts_quote(c, ctx.in_plural) => {
                // Quoted run ends at the next lone apostrophe, or at the end of input
                while let Some(c) = self.bump() {
                    if c == '\'' {
                        if self.peek() == Some('\'') {
                            self.bump();
                            literal.push('\'');
                        } else {
                            return;
                        }
                    } else {
                        literal.push(c);
                    }
                }
            }
            _ => literal.push('\''),
        }
    }

    fn parse_argument(&mut self) -> Result<MessageElement, ParseError> {
        let start = self.pos;
        self.bump();
        self.skip_whitespace();

        match self.peek() {
            None => return Err(ParseError::new(ParseErrorKind::UnclosedArgument, start)),
            Some('}') => return Err(ParseError::new(ParseErrorKind::EmptyArgument, start)),
            _ => {}
        }

        let name = self
            .take_while(|c| !c.is_whitespace() && !matches!(c, ',' | '{' | '}'))
            .to_string();
        if name.is_empty() {
            return Err(self.error(ParseErrorKind::MalformedArgument));
        }
        self.skip_whitespace();

        match self.peek() {
            None => Err(ParseError::new(ParseErrorKind::UnclosedArgument, start)),
            Some('}') => {
                self.bump();
                Ok(MessageElement::Argument(name))
            }
            Some(',') => {
                self.bump();
                self.skip_whitespace();
                let kind = self.take_while(|c| c.is_ascii_alphabetic()).to_string();
                self.skip_whitespace();
                match kind.as_str() {
                    "" => Err(self.error(ParseErrorKind::MalformedArgument)),
                    "number" | "date" | "time" => {
                        let style = self.parse_style(start)?;
                        Ok(match kind.as_str() {
                            "number" => MessageElement::Number { name, style },
                            "date" => MessageElement::Date { name, style },
                            _ => MessageElement::Time { name, style },
                        })
                    }
                    "select" => {
                        let options = self.parse_options(start, false)?;
                        Ok(MessageElement::Select { name, options })
                    }
                    "plural" | "selectordinal" => {
                        self.expect_comma()?;
                        let offset = self.parse_offset()?;
                        let options = self.parse_option_list(start, true)?;
                        let plural_type = if kind == "plural" {
                            PluralType::Cardinal
                        } else {
                            PluralType::Ordinal
                        };
                        Ok(MessageElement::Plural {
                            name,
                            options,
                            offset,
                            plural_type,
                        })
                    }
                    _ => Err(ParseError::new(
                        ParseErrorKind::InvalidArgumentType(kind),
                        start,
                    )),
                }
            }
            Some(_) => Err(self.error(ParseErrorKind::MalformedArgument)),
        }
    }

    /// Optional `, style` followed by the closing brace
    fn parse_style(&mut self, start: usize) -> Result<Option<String>, ParseError> {
        match self.peek() {
            None => Err(ParseError::new(ParseErrorKind::UnclosedArgument, start)),
            Some('}') => {
                self.bump();
                Ok(None)
            }
            Some(',') => {
                self.bump();
                let style_start = self.pos;
                let mut depth = 0usize;
                loop {
                    match self.peek() {
                        None => return Err(ParseError::new(ParseErrorKind::UnclosedArgument, start)),
                        Some('{') => depth += 1,
                        Some('}') if depth == 0 => break,
                        Some('}') => depth -= 1,
                        Some(_) => {}
                    }
                    self.bump();
                }
                let style = self.src[style_start..self.pos].trim().to_string();
                self.bump();
                if style.is_empty() {
                    return Err(ParseError::new(ParseErrorKind::MalformedArgument, style_start));
                }
                Ok(Some(style))
            }
            Some(_) => Err(self.error(ParseErrorKind::MalformedArgument)),
        }
    }

    fn expect_comma(&mut self) -> Result<(), ParseError> {
        if self.peek() != Some(',') {
            return Err(self.error(ParseErrorKind::MalformedArgument));
        }
        self.bump();
        self.skip_whitespace();
        Ok(())
    }

    fn parse_offset(&mut self) -> Result<i64, ParseError> {
        if !self.rest().starts_with("offset:") {
            return Ok(0);
        }
        self.pos += "offset:".len();
        self.skip_whitespace();
        let digits_start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        self.take_while(|c| c.is_ascii_digit());
        let offset = self.src[digits_start..self.pos]
            .parse::<i64>()
            .map_err(|_| ParseError::new(ParseErrorKind::InvalidOffset, digits_start))?;
        self.skip_whitespace();
        Ok(offset)
    }

    fn parse_options(
        &mut self,
        start: usize,
        plural: bool,
    ) -> Result<BTreeMap<String, Vec<MessageElement>>, ParseError> {
        self.expect_comma()?;
        self.parse_option_list(start, plural)
    }

    fn parse_option_list(
        &mut self,
        start: usize,
        plural: bool,
    ) -> Result<BTreeMap<String, Vec<MessageElement>>, ParseError> {
        let mut options = BTreeMap::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(ParseError::new(ParseErrorKind::UnclosedArgument, start)),
                Some('}') => {
                    self.bump();
                    break;
                }
                Some(_) => {}
            }

            let selector_start = self.pos;
            let selector = self
                .take_while(|c| !c.is_whitespace() && !matches!(c, '{' | '}'))
                .to_string();
            if selector.is_empty() || (plural && !valid_plural_selector(&selector)) {
                return Err(ParseError::new(ParseErrorKind::ExpectedSelector, selector_start));
            }
            if options.contains_key(&selector) {
                return Err(ParseError::new(
                    ParseErrorKind::DuplicateSelector(selector),
                    selector_start,
                ));
            }

            self.skip_whitespace();
            if self.peek() != Some('{') {
                return Err(self.error(ParseErrorKind::ExpectedSelectorBody));
            }
            let body_start = self.pos;
            self.bump();
            let body = self.parse_message(&Context::option_body(plural, body_start))?;
            // parse_message only stops early on the closing brace of the branch
            self.bump();
            options.insert(selector, body);
        }

        if options.is_empty() {
            return Err(ParseError::new(ParseErrorKind::ExpectedSelector, start));
        }
        if !options.contains_key("other") {
            return Err(ParseError::new(ParseErrorKind::MissingOtherClause, start));
        }
        Ok(options)
    }

    /// Name of a well-formed `</name>` at the cursor
    fn closing_tag_name(&self) -> Option<String> {
        let rest = self.rest().strip_prefix("</")?;
        let len = rest.find(|c: char| !is_tag_char(c)).unwrap_or(rest.len());
        if len == 0 || !rest[len..].starts_with('>') {
            return None;
        }
        Some(rest[..len].to_string())
    }

    fn try_parse_tag(&mut self, ctx: &Context) -> Result<Option<Tag>, ParseError> {
        let start = self.pos;
        let rest = &self.rest()[1..];
        if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Ok(None);
        }
        let len = rest.find(|c: char| !is_tag_char(c)).unwrap_or(rest.len());
        let name = rest[..len].to_string();
        let after = &rest[len..];

        if after.starts_with("/>") {
            let text = format!("<{}/>", name);
            self.pos += text.len();
            return Ok(Some(Tag::SelfClosing(text)));
        }
        if !after.starts_with('>') {
            return Ok(None);
        }

        self.pos += name.len() + 2;
        let children = self.parse_message(&ctx.tag_body(name.clone(), start))?;
        Ok(Some(Tag::Element(MessageElement::Tag { name, children })))
    }
}

enum Tag {
    Element(MessageElement),
    SelfClosing(String),
}

fn flush_literal(literal: &mut String, elements: &mut Vec<MessageElement>) {
    if !literal.is_empty() {
        elements.push(MessageElement::Literal(std::mem::take(literal)));
    }
}

fn starts_quote(c: char, in_plural: bool) -> bool {
    matches!(c, '{' | '}' | '<' | '>' | '|') || (in_plural && c == '#')
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn valid_plural_selector(selector: &str) -> bool {
    match selector.strip_prefix('=') {
        Some(number) => number.parse::<f64>().is_ok(),
        None => selector.chars().all(|c| c.is_ascii_alphabetic()),
    }
}
