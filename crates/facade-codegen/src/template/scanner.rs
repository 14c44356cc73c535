//! Splits template source into text and marker tokens.
//!
//! Recognized notation:
//!
//! - `[[NAME]]`: a placeholder
//! - `/*==Key==*/`: a fragment delimiter, found in pairs
//! - `/*--*/`: delimits text that only exists in the master template
//! - `/*++` and `++*/`: delimit text that only exists in generated code
//! - `/*!!*/`: delimits a span the generator may erase
//!
//! Names are made of ASCII letters, digits and `_`. Anything that does not form a complete
//! marker is text.

use std::ops::Range;

const REAL_CODE: &str = "/*--*/";
const OPTIONAL: &str = "/*!!*/";
const GENERATED_OPEN: &str = "/*++";
const GENERATED_CLOSE: &str = "++*/";
const FRAGMENT_OPEN: &str = "/*==";
const FRAGMENT_CLOSE: &str = "==*/";
const PLACEHOLDER_OPEN: &str = "[[";
const PLACEHOLDER_CLOSE: &str = "]]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    Text,
    Placeholder(&'a str),
    Fragment(&'a str),
    RealCode,
    GeneratedOpen,
    GeneratedClose,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Byte range of the token in the scanned source.
    pub span: Range<usize>,
}

pub(crate) fn tokenize(source: &str) -> Vec<Token<'_>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut position = 0;

    while position < bytes.len() {
        // Markers start with ASCII bytes, which are always char boundaries.
        let marker = match bytes[position] {
            b'/' | b'+' | b'[' => marker_at(&source[position..]),
            _ => None,
        };

        let Some((kind, len)) = marker else {
            position += 1;
            continue;
        };

        if text_start < position {
            tokens.push(Token {
                kind: TokenKind::Text,
                span: text_start..position,
            });
        }

        tokens.push(Token {
            kind,
            span: position..position + len,
        });

        position += len;
        text_start = position;
    }

    if text_start < bytes.len() {
        tokens.push(Token {
            kind: TokenKind::Text,
            span: text_start..bytes.len(),
        });
    }

    tokens
}

fn marker_at(rest: &str) -> Option<(TokenKind<'_>, usize)> {
    if rest.starts_with(REAL_CODE) {
        return Some((TokenKind::RealCode, REAL_CODE.len()));
    }

    if rest.starts_with(OPTIONAL) {
        return Some((TokenKind::Optional, OPTIONAL.len()));
    }

    if let Some((name, len)) = named(rest, FRAGMENT_OPEN, FRAGMENT_CLOSE) {
        return Some((TokenKind::Fragment(name), len));
    }

    if rest.starts_with(GENERATED_OPEN) {
        return Some((TokenKind::GeneratedOpen, GENERATED_OPEN.len()));
    }

    if rest.starts_with(GENERATED_CLOSE) {
        return Some((TokenKind::GeneratedClose, GENERATED_CLOSE.len()));
    }

    named(rest, PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE).map(|(name, len)| (TokenKind::Placeholder(name), len))
}

fn named<'a>(rest: &'a str, open: &str, close: &str) -> Option<(&'a str, usize)> {
    let after_open = rest.strip_prefix(open)?;

    let name_len = after_open
        .bytes()
        .take_while(|byte| byte.is_ascii_alphanumeric() || *byte == b'_')
        .count();

    if name_len == 0 || !after_open[name_len..].starts_with(close) {
        return None;
    }

    Some((&after_open[..name_len], open.len() + name_len + close.len()))
}

#[cfg(test)]
mod tests {
    use super::{tokenize, TokenKind};

    fn kinds(source: &str) -> Vec<(TokenKind<'_>, &str)> {
        tokenize(source)
            .into_iter()
            .map(|token| (token.kind, &source[token.span]))
            .collect()
    }

    #[test]
    fn adjacent_markers() {
        let tokens = kinds("pub /*++[[TABLE]]++*//*--*/Template/*--*/ {");

        assert_eq!(
            tokens,
            vec![
                (TokenKind::Text, "pub "),
                (TokenKind::GeneratedOpen, "/*++"),
                (TokenKind::Placeholder("TABLE"), "[[TABLE]]"),
                (TokenKind::GeneratedClose, "++*/"),
                (TokenKind::RealCode, "/*--*/"),
                (TokenKind::Text, "Template"),
                (TokenKind::RealCode, "/*--*/"),
                (TokenKind::Text, " {"),
            ]
        );
    }

    #[test]
    fn fragment_and_optional_markers() {
        let tokens = kinds("/*==ColumnPart1==*/x/*!!*/");

        assert_eq!(
            tokens,
            vec![
                (TokenKind::Fragment("ColumnPart1"), "/*==ColumnPart1==*/"),
                (TokenKind::Text, "x"),
                (TokenKind::Optional, "/*!!*/"),
            ]
        );
    }

    #[test]
    fn malformed_markers_are_text() {
        let source = "let v = a[[0]][1]; [[not closed] /*== ==*/ [[]] /*+ +*/";
        let tokens = kinds(source);

        // `[[0]]` is a well formed placeholder, everything else is text.
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Text, "let v = a"),
                (TokenKind::Placeholder("0"), "[[0]]"),
                (TokenKind::Text, "[1]; [[not closed] /*== ==*/ [[]] /*+ +*/"),
            ]
        );
    }

    #[test]
    fn multibyte_text_is_kept_whole() {
        let tokens = kinds("注文[[名]]テーブル[[NAME]]");

        assert_eq!(
            tokens,
            vec![(TokenKind::Text, "注文[[名]]テーブル"), (TokenKind::Placeholder("NAME"), "[[NAME]]")]
        );
    }
}
