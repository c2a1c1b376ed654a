//! Message templates with named placeholders
//!
//! A template like `"Dividing {A} by {B}"` is parsed once into literal text
//! and holes. Binding pairs holes with argument values; rendering substitutes
//! bound properties and leaves unbound holes in their literal form.
//!
//! Parsing is lenient and never fails: `{{` and `}}` escape literal braces,
//! a malformed or unclosed hole is kept as plain text, a leading `@` or `$`
//! sigil and a `:format` suffix are tolerated and stripped from the bound
//! name. A template whose holes are all numeric (`"{0} {1}"`) binds its
//! arguments by position index instead of appearance order.

use crate::core::value::{PropertyMap, PropertyValue};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateToken {
    /// Literal text between holes.
    Text(String),
    /// A named placeholder. `raw` keeps the original spelling (including
    /// braces and any sigil or format suffix) for literal rendering when the
    /// hole is unbound.
    Hole {
        name: String,
        index: Option<usize>,
        raw: String,
    },
}

/// A parsed message template.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageTemplate {
    raw: String,
    tokens: Vec<TemplateToken>,
}

impl MessageTemplate {
    /// Parse template text. Lenient: never fails, malformed holes become
    /// literal text.
    pub fn parse(raw: &str) -> Self {
        let mut tokens = Vec::new();
        let mut text = String::new();
        let mut i = 0;

        while i < raw.len() {
            match raw[i..].find(&['{', '}'][..]) {
                None => {
                    text.push_str(&raw[i..]);
                    break;
                }
                Some(off) => {
                    text.push_str(&raw[i..i + off]);
                    i += off;
                }
            }

            let bytes = raw.as_bytes();
            if bytes[i] == b'}' {
                // '}}' collapses to '}', a lone '}' stays literal
                text.push('}');
                i += if bytes.get(i + 1) == Some(&b'}') { 2 } else { 1 };
                continue;
            }

            if bytes.get(i + 1) == Some(&b'{') {
                text.push('{');
                i += 2;
                continue;
            }

            match find_hole_end(raw, i + 1) {
                Some(close) => match parse_hole(&raw[i + 1..close]) {
                    Some((name, index)) => {
                        if !text.is_empty() {
                            tokens.push(TemplateToken::Text(std::mem::take(&mut text)));
                        }
                        tokens.push(TemplateToken::Hole {
                            name,
                            index,
                            raw: raw[i..=close].to_string(),
                        });
                        i = close + 1;
                    }
                    None => {
                        text.push('{');
                        i += 1;
                    }
                },
                None => {
                    text.push('{');
                    i += 1;
                }
            }
        }

        if !text.is_empty() {
            tokens.push(TemplateToken::Text(text));
        }

        Self {
            raw: raw.to_string(),
            tokens,
        }
    }

    /// The original template text.
    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[inline]
    pub fn tokens(&self) -> &[TemplateToken] {
        &self.tokens
    }

    /// Names of the holes, in appearance order (duplicates included).
    pub fn hole_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            TemplateToken::Hole { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Pair holes with argument values.
    ///
    /// Arity is tolerant in both directions: surplus arguments are dropped,
    /// unmatched holes stay unbound. Distinct holes bind in order of first
    /// appearance; a repeated name consumes no extra argument. When every
    /// hole is numeric the arguments are indexed positionally instead.
    pub fn bind(&self, args: &[PropertyValue]) -> PropertyMap {
        let mut props = PropertyMap::new();
        if args.is_empty() {
            return props;
        }

        let holes: Vec<(&str, Option<usize>)> = self
            .tokens
            .iter()
            .filter_map(|t| match t {
                TemplateToken::Hole { name, index, .. } => Some((name.as_str(), *index)),
                _ => None,
            })
            .collect();
        if holes.is_empty() {
            return props;
        }

        if holes.iter().all(|(_, index)| index.is_some()) {
            for (name, index) in holes {
                if let Some(value) = index.and_then(|i| args.get(i)) {
                    props.insert(name.to_string(), value.clone());
                }
            }
        } else {
            let mut next = args.iter();
            for (name, _) in holes {
                if props.contains_key(name) {
                    continue;
                }
                match next.next() {
                    Some(value) => {
                        props.insert(name.to_string(), value.clone());
                    }
                    None => break,
                }
            }
        }

        props
    }

    /// Render the template against a property map. Unbound holes render in
    /// their original literal form. The result is sanitized (`\n`, `\r`,
    /// `\t` escaped) to prevent forged log lines.
    pub fn render(&self, props: &PropertyMap) -> String {
        let mut out = String::with_capacity(self.raw.len() + 16);
        for token in &self.tokens {
            match token {
                TemplateToken::Text(t) => out.push_str(t),
                TemplateToken::Hole { name, raw, .. } => match props.get(name) {
                    Some(value) => {
                        let _ = write!(out, "{}", value);
                    }
                    None => out.push_str(raw),
                },
            }
        }
        sanitize(&out)
    }
}

/// Escape newlines, carriage returns, and tabs so a property value cannot
/// inject fake log lines.
pub(crate) fn sanitize(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn find_hole_end(raw: &str, from: usize) -> Option<usize> {
    for (off, b) in raw.as_bytes()[from..].iter().enumerate() {
        match b {
            b'}' => return Some(from + off),
            b'{' => return None,
            _ => {}
        }
    }
    None
}

fn parse_hole(body: &str) -> Option<(String, Option<usize>)> {
    let body = body
        .strip_prefix(|c| c == '@' || c == '$')
        .unwrap_or(body);
    let name = match body.split_once(':') {
        Some((name, _format)) => name,
        None => body,
    };
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    let index = if name.chars().all(|c| c.is_ascii_digit()) {
        name.parse().ok()
    } else {
        None
    };
    Some((name.to_string(), index))
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

// Templates serialize as their raw text; the token list is an internal
// parse artifact.
impl Serialize for MessageTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for MessageTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(MessageTemplate::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind_and_render(template: &str, args: &[PropertyValue]) -> String {
        let t = MessageTemplate::parse(template);
        let props = t.bind(args);
        t.render(&props)
    }

    #[test]
    fn test_parse_extracts_holes_in_order() {
        let t = MessageTemplate::parse("Dividing {A} by {B}");
        let names: Vec<&str> = t.hole_names().collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_render_substitutes_bound_values() {
        let got = bind_and_render("Dividing {A} by {B}", &[10.into(), 0.into()]);
        assert_eq!(got, "Dividing 10 by 0");
    }

    #[test]
    fn test_surplus_arguments_are_dropped() {
        let got = bind_and_render("Hello, {Name}!", &["world".into(), 42.into()]);
        assert_eq!(got, "Hello, world!");
    }

    #[test]
    fn test_unbound_holes_render_literally() {
        let got = bind_and_render("Hello, {Name}! From {Planet}", &["world".into()]);
        assert_eq!(got, "Hello, world! From {Planet}");
    }

    #[test]
    fn test_no_arguments_renders_template_text() {
        let got = bind_and_render("Hello, {Name}!", &[]);
        assert_eq!(got, "Hello, {Name}!");
    }

    #[test]
    fn test_escaped_braces() {
        let got = bind_and_render("literal {{braces}} and {A}", &[1.into()]);
        assert_eq!(got, "literal {braces} and 1");
    }

    #[test]
    fn test_malformed_holes_stay_literal() {
        let t = MessageTemplate::parse("open { brace {A} unclosed {B");
        let names: Vec<&str> = t.hole_names().collect();
        assert_eq!(names, vec!["A"]);
        let got = t.render(&t.bind(&[7.into()]));
        assert_eq!(got, "open { brace 7 unclosed {B");
    }

    #[test]
    fn test_sigil_and_format_are_stripped_from_name() {
        let t = MessageTemplate::parse("user {@User} took {Elapsed:000} ms");
        let names: Vec<&str> = t.hole_names().collect();
        assert_eq!(names, vec!["User", "Elapsed"]);
    }

    #[test]
    fn test_unbound_sigil_hole_keeps_original_spelling() {
        let got = bind_and_render("user {@User}", &[]);
        assert_eq!(got, "user {@User}");
    }

    #[test]
    fn test_numeric_holes_bind_by_position() {
        let got = bind_and_render("{1} before {0}", &["zero".into(), "one".into()]);
        assert_eq!(got, "one before zero");
    }

    #[test]
    fn test_duplicate_holes_bind_once() {
        let t = MessageTemplate::parse("{A} and {A} and {B}");
        let props = t.bind(&[1.into(), 2.into()]);
        assert_eq!(props.get("A"), Some(&PropertyValue::Int(1)));
        assert_eq!(props.get("B"), Some(&PropertyValue::Int(2)));
        assert_eq!(t.render(&props), "1 and 1 and 2");
    }

    #[test]
    fn test_rebinding_with_different_types_is_permitted() {
        assert_eq!(
            bind_and_render("Dividing {A} by {B}", &["ten".into(), true.into()]),
            "Dividing ten by true"
        );
    }

    #[test]
    fn test_render_sanitizes_control_characters() {
        let got = bind_and_render("value: {V}", &["a\nb\tc".into()]);
        assert_eq!(got, "value: a\\nb\\tc");
    }

    #[test]
    fn test_serializes_as_raw_text() {
        let t = MessageTemplate::parse("Hello, {Name}!");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"Hello, {Name}!\"");
        let back: MessageTemplate = serde_json::from_str("\"Hello, {Name}!\"").unwrap();
        assert_eq!(back, t);
    }
}
