//! Validation of host-supplied CSS declaration lists.
//!
//! Style overrides are spliced verbatim into generated rule bodies, so they
//! must be a flat `property: value;` list. Anything that could close the rule
//! body or open a nested block is rejected before it reaches the stylesheet.

use miette::Diagnostic;

/// A single `property: value` pair from a declaration list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// Error for a style override that is not a flat declaration list.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum CssOverrideError {
    #[error("braces are not allowed in a declaration list")]
    #[diagnostic(
        code(accordion::style_override::brace),
        help("overrides must contain only declarations, e.g. `color: red; padding: 4px`")
    )]
    Brace,

    #[error("declaration `{0}` is missing a `:`")]
    #[diagnostic(code(accordion::style_override::missing_colon))]
    MissingColon(String),

    #[error("`{0}` is not a valid property name")]
    #[diagnostic(code(accordion::style_override::property))]
    InvalidProperty(String),

    #[error("property `{0}` has an empty value")]
    #[diagnostic(code(accordion::style_override::empty_value))]
    EmptyValue(String),

    #[error("unbalanced parentheses or quotes in `{0}`")]
    #[diagnostic(code(accordion::style_override::unbalanced))]
    Unbalanced(String),

    #[error("unterminated comment")]
    #[diagnostic(code(accordion::style_override::comment))]
    UnterminatedComment,
}

/// Parse a flat declaration list.
///
/// Whitespace, comments and a trailing `;` are tolerated. The returned list
/// is only used for validation, callers splice the original text.
pub fn parse_declarations(input: &str) -> Result<Vec<Declaration>, CssOverrideError> {
    let stripped = strip_comments(input)?;
    let mut out = Vec::new();

    for item in split_top_level(&stripped)? {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        if item.contains(['{', '}']) {
            return Err(CssOverrideError::Brace);
        }
        let Some((property, value)) = item.split_once(':') else {
            return Err(CssOverrideError::MissingColon(item.to_string()));
        };
        let property = property.trim();
        let value = value.trim();
        if !is_property_name(property) {
            return Err(CssOverrideError::InvalidProperty(property.to_string()));
        }
        if value.is_empty() {
            return Err(CssOverrideError::EmptyValue(property.to_string()));
        }
        out.push(Declaration {
            property: property.to_string(),
            value: value.to_string(),
        });
    }

    Ok(out)
}

/// Check whether an override is usable as-is.
pub fn validate_declarations(input: &str) -> Result<(), CssOverrideError> {
    parse_declarations(input).map(|_| ())
}

/// Replace comments with a space. `/*` inside a string or after a backslash
/// is text, not a comment.
fn strip_comments(input: &str) -> Result<String, CssOverrideError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match (quote, c) {
            (_, '\\') => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            (Some(q), c) if c == q => {
                quote = None;
                out.push(c);
            }
            (None, '"' | '\'') => {
                quote = Some(c);
                out.push(c);
            }
            (None, '/') if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = None;
                let closed = chars.by_ref().any(|c| {
                    let end = prev == Some('*') && c == '/';
                    prev = Some(c);
                    end
                });
                if !closed {
                    return Err(CssOverrideError::UnterminatedComment);
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Split on `;` outside of strings and parentheses (`url(a;b)` stays whole).
fn split_top_level(input: &str) -> Result<Vec<&str>, CssOverrideError> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| CssOverrideError::Unbalanced(input.trim().to_string()))?;
            }
            (None, ';') if depth == 0 => {
                items.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 || quote.is_some() {
        return Err(CssOverrideError::Unbalanced(input.trim().to_string()));
    }
    items.push(&input[start..]);
    Ok(items)
}

fn is_property_name(name: &str) -> bool {
    if let Some(custom) = name.strip_prefix("--") {
        return !custom.is_empty()
            && custom
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii());
    }
    let body = name.strip_prefix('-').unwrap_or(name);
    let mut chars = body.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
