//! CSS escaping for host-supplied identifiers.
//!
//! Block ids come from the host editor and end up in two places: quoted
//! attribute values (`[data-id="..."]`) and custom property names
//! (`--acc-opened-<id>`). Both are encoded so that an unusual id can
//! neither break the stylesheet nor alias another instance's rules.

/// Escape a value for use inside a double-quoted CSS string.
pub fn escape_css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            '\r' => out.push_str("\\d "),
            '\0' => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    out
}

/// Encode a fragment that is appended to an existing identifier.
///
/// ASCII letters, digits and `-` pass through. Every other character,
/// `_` included, becomes `_<hex>_`, so distinct ids always give distinct
/// fragments and the result needs no CSS escapes. The same text is then
/// valid both in stylesheet source and as a CSSOM property name.
///
/// Only the fragment is encoded, the caller owns the prefix (e.g. `--acc-opened-`),
/// so a leading digit needs no special treatment here.
pub fn encode_ident_fragment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
        } else {
            out.push_str(&format!("_{:x}_", c as u32));
        }
    }
    out
}
