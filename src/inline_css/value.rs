//! Token-level scanning of declaration values
//!
//! Resource rewriting has to touch only the `url(...)` token and leave every
//! other byte of the value (sibling layers, positions, colours, `local()` and
//! `format()` qualifiers) exactly as written. The scanners here report byte
//! ranges into the value text; [`splice`] applies replacements by range.

use std::ops::Range;

use cssparser::{ParseError, Parser, ParserInput, Token};

/// One comma-separated entry of an `@font-face` `src` value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontSource {
    /// Byte range of the `url(...)` token, if the entry has one
    pub url: Option<Range<usize>>,
    /// Argument of a `format(...)` qualifier
    pub format: Option<String>,
    /// Entry is a `local(...)` reference
    pub local: bool,
}

/// Byte ranges of every `url(...)` token in a value, in source order.
///
/// Tokens nested inside other functions (`image-set(...)`, vendor gradients)
/// are included.
#[must_use]
pub fn url_token_ranges(value: &str) -> Vec<Range<usize>> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    let mut ranges = Vec::new();
    collect_url_tokens(&mut parser, &mut ranges);
    ranges
}

fn collect_url_tokens<'i>(input: &mut Parser<'i, '_>, ranges: &mut Vec<Range<usize>>) {
    loop {
        input.skip_whitespace();
        let start = input.position();
        let token = match input.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::UnquotedUrl(_) => {
                ranges.push(start.byte_index()..input.position().byte_index());
            }
            Token::Function(ref name) if name.eq_ignore_ascii_case("url") => {
                let _ = input.parse_nested_block(|nested| {
                    while nested.next().is_ok() {}
                    Ok::<_, ParseError<'i, ()>>(())
                });
                ranges.push(start.byte_index()..input.position().byte_index());
            }
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                let _ = input.parse_nested_block(|nested| {
                    collect_url_tokens(nested, ranges);
                    Ok::<_, ParseError<'i, ()>>(())
                });
            }
            _ => {}
        }
    }
}

/// Split an `@font-face` `src` value into its comma-separated sources
#[must_use]
pub fn font_sources(value: &str) -> Vec<FontSource> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    scan_font_sources(&mut parser)
}

fn scan_font_sources<'i>(parser: &mut Parser<'i, '_>) -> Vec<FontSource> {
    let mut sources = Vec::new();
    let mut current = FontSource::default();

    loop {
        parser.skip_whitespace();
        let start = parser.position();
        let token = match parser.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::Comma => sources.push(std::mem::take(&mut current)),
            Token::UnquotedUrl(_) => {
                if current.url.is_none() {
                    current.url = Some(start.byte_index()..parser.position().byte_index());
                }
            }
            Token::Function(ref name) if name.eq_ignore_ascii_case("url") => {
                let _ = parser.parse_nested_block(|nested| {
                    while nested.next().is_ok() {}
                    Ok::<_, ParseError<'i, ()>>(())
                });
                if current.url.is_none() {
                    current.url = Some(start.byte_index()..parser.position().byte_index());
                }
            }
            Token::Function(ref name) if name.eq_ignore_ascii_case("format") => {
                let format = parser
                    .parse_nested_block(|nested| {
                        nested
                            .expect_ident_or_string()
                            .map(|s| s.to_string())
                            .map_err(ParseError::<'i, ()>::from)
                    })
                    .ok();
                current.format = format;
            }
            Token::Function(ref name) if name.eq_ignore_ascii_case("local") => {
                current.local = true;
            }
            _ => {}
        }
    }

    if current != FontSource::default() {
        sources.push(current);
    }
    sources
}

/// Replace byte ranges of `value`. Ranges must not overlap.
#[must_use]
pub fn splice(value: &str, mut replacements: Vec<(Range<usize>, String)>) -> String {
    if replacements.is_empty() {
        return value.to_string();
    }
    replacements.sort_by_key(|(range, _)| range.start);

    let extra: usize = replacements.iter().map(|(_, text)| text.len()).sum();
    let mut out = String::with_capacity(value.len() + extra);
    let mut last = 0;
    for (range, text) in replacements {
        out.push_str(&value[last..range.start]);
        out.push_str(&text);
        last = range.end;
    }
    out.push_str(&value[last..]);
    out
}
