//! # SvgKit CSS Parser
//!
//! A SvgKit-owned CSS parsing layer: parse stylesheets into rules and
//! declaration blocks, and parse bare declaration lists as found in `style`
//! attributes.
//!
//! This is not a full CSS parser. It handles the subset the fallback engine
//! needs: flat `selector { prop: value; }` rules, comments, `!important`,
//! and values containing `url(...)` tokens (quotes and parentheses inside a
//! value never terminate it).

use thiserror::Error;

/// Errors that can occur while parsing CSS.
#[derive(Error, Debug, Clone)]
pub enum CssParseError {
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// A parsed stylesheet.
#[derive(Debug, Default, Clone)]
pub struct ParsedStylesheet {
    pub rules: Vec<StyleRule>,
}

/// A parsed style rule.
#[derive(Debug, Clone)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    /// Look up a declaration by property name (case-insensitive).
    pub fn declaration(&self, property: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .find(|d| d.property.eq_ignore_ascii_case(property))
    }

    /// Replace the value of a declaration, if present.
    pub fn set_value(&mut self, property: &str, value: impl Into<String>) {
        if let Some(decl) = self
            .declarations
            .iter_mut()
            .find(|d| d.property.eq_ignore_ascii_case(property))
        {
            decl.value = value.into();
        }
    }
}

/// A parsed declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
        }
    }
}

/// Parse a stylesheet into rules.
///
/// At-rules (`@media`, `@supports`, ...) are skipped wholesale rather than
/// recursed into; nested rule support is not needed for SvgKit's surfaces.
pub fn parse_stylesheet(css: &str) -> Result<ParsedStylesheet, CssParseError> {
    let css = strip_comments(css);
    let mut out = ParsedStylesheet::default();

    let mut rest = css.as_str();
    loop {
        let Some(open) = find_unquoted(rest, '{') else {
            if rest.trim().is_empty() {
                break;
            }
            // Trailing garbage without a block.
            return Err(CssParseError::ParseError(format!(
                "expected '{{' after selector: {}",
                rest.trim()
            )));
        };

        let selector = rest[..open].trim().to_string();
        let body_start = open + 1;
        let close = find_block_end(&rest[body_start..])
            .ok_or(CssParseError::UnexpectedEof)?;
        let body = &rest[body_start..body_start + close];

        if !selector.starts_with('@') && !selector.is_empty() {
            let declarations = parse_declaration_list(body);
            if !declarations.is_empty() {
                out.rules.push(StyleRule {
                    selector,
                    declarations,
                });
            }
        }

        rest = &rest[body_start + close + 1..];
    }

    Ok(out)
}

/// Parse a bare declaration list, as found in `style` attributes.
///
/// Lenient: chunks without a colon are dropped. Quotes and parentheses keep
/// `;` and `:` from terminating a value, so `url(data:...)` survives intact.
pub fn parse_declaration_list(input: &str) -> Vec<Declaration> {
    let mut decls = Vec::new();

    for chunk in split_unquoted(input, ';') {
        let Some(colon) = find_value_colon(chunk) else {
            continue;
        };
        let property = chunk[..colon].trim();
        let value_raw = chunk[colon + 1..].trim();
        if property.is_empty() || value_raw.is_empty() {
            continue;
        }

        let (value, important) = strip_important(value_raw);
        decls.push(Declaration {
            property: property.to_string(),
            value: value.to_string(),
            important,
        });
    }

    decls
}

/// Serialize declarations back into `style`-attribute form.
pub fn serialize_declarations(decls: &[Declaration]) -> String {
    let mut out = String::new();
    for decl in decls {
        if !out.is_empty() {
            out.push_str("; ");
        }
        out.push_str(&decl.property);
        out.push_str(": ");
        out.push_str(&decl.value);
        if decl.important {
            out.push_str(" !important");
        }
    }
    out
}

fn strip_important(value: &str) -> (&str, bool) {
    let lower = value.to_ascii_lowercase();
    match lower.rfind("!important") {
        Some(idx) => (value[..idx].trim_end(), true),
        None => (value, false),
    }
}

/// Remove `/* ... */` comments (outside of quoted strings).
fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut chars = css.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                out.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                out.push(c);
            }
            None if c == '/' && chars.peek() == Some(&'*') => {
                chars.next();
                while let Some(cc) = chars.next() {
                    if cc == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        break;
                    }
                }
            }
            None => out.push(c),
        }
    }

    out
}

/// Find the first occurrence of `needle` outside quoted strings.
fn find_unquoted(input: &str, needle: char) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in input.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == needle => return Some(i),
            None => {}
        }
    }
    None
}

/// Find the index of the `}` closing the block that starts at index 0.
///
/// Tracks nested braces so skipped at-rule bodies stay balanced.
fn find_block_end(input: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '{' => depth += 1,
            None if c == '}' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            None => {}
        }
    }
    None
}

/// Split on `sep` outside quoted strings and parentheses.
fn split_unquoted(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut paren = 0usize;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '(' => paren += 1,
            None if c == ')' => paren = paren.saturating_sub(1),
            None if c == sep && paren == 0 => {
                parts.push(&input[start..i]);
                start = i + sep.len_utf8();
            }
            None => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Find the colon separating property from value.
///
/// Colons inside quotes or parentheses belong to the value (`url(data:...)`).
fn find_value_colon(chunk: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut paren = 0usize;
    for (i, c) in chunk.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '(' => paren += 1,
            None if c == ')' => paren = paren.saturating_sub(1),
            None if c == ':' && paren == 0 => return Some(i),
            None => {}
        }
    }
    None
}
