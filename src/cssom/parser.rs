//! Stylesheet text to rule list, built on `cssparser`
//!
//! Parsing is lenient: anything the engine does not care about is kept as raw
//! source text so it survives serialisation unchanged.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser,
};

use super::{CssRule, Declaration, DeclarationBlock, FontFaceRule, ImportRule, RuleList, StyleRule};

/// Parse stylesheet text into an ordered rule list
#[must_use]
pub fn parse_stylesheet(css: &str) -> RuleList {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rule_parser = TopLevelRuleParser;
    let mut rules = Vec::new();

    for result in StyleSheetParser::new(&mut parser, &mut rule_parser) {
        match result {
            Ok(rule) => rules.push(rule),
            Err((error, slice)) => {
                let raw = slice.trim();
                log::debug!("Keeping unparsed CSS rule verbatim ({:?}): {raw}", error.kind);
                if !raw.is_empty() {
                    rules.push(CssRule::Other(raw.to_string()));
                }
            }
        }
    }

    rules
}

/// Parse the contents of a declaration block (without braces)
#[must_use]
pub fn parse_declarations(css: &str) -> DeclarationBlock {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    collect_declarations(&mut parser)
}

fn collect_declarations(input: &mut Parser<'_, '_>) -> DeclarationBlock {
    let mut block = DeclarationBlock::new();
    let mut collector = DeclarationCollector;

    for result in RuleBodyParser::new(input, &mut collector) {
        match result {
            Ok(declaration) => block.push(declaration),
            Err((_, slice)) => log::debug!("Dropping invalid declaration: {}", slice.trim()),
        }
    }

    block
}

/// Split a trailing `!important` off a raw declaration value
fn split_important(raw: &str) -> (String, bool) {
    let trimmed = raw.trim();
    if let Some(bang) = trimmed.rfind('!')
        && trimmed[bang + 1..].trim().eq_ignore_ascii_case("important")
    {
        return (trimmed[..bang].trim_end().to_string(), true);
    }
    (trimmed.to_string(), false)
}

/// Consume every remaining token of the current block and return its source text
fn consume_remaining<'i>(input: &mut Parser<'i, '_>) -> &'i str {
    let start = input.position();
    while input.next().is_ok() {}
    input.slice_from(start)
}

struct TopLevelRuleParser;

enum AtRulePrelude {
    FontFace,
    Import(ImportRule),
    /// Raw `@name prelude` text of an at-rule the engine passes through
    Other(String),
}

impl<'i> AtRuleParser<'i> for TopLevelRuleParser {
    type Prelude = AtRulePrelude;
    type AtRule = CssRule;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();

        if name.eq_ignore_ascii_case("font-face") {
            consume_remaining(input);
            return Ok(AtRulePrelude::FontFace);
        }

        if name.eq_ignore_ascii_case("import")
            && let Ok(href) = input.try_parse(|i| {
                i.expect_url_or_string().map(|s| s.as_ref().to_string())
            })
        {
            let media = consume_remaining(input).trim().to_string();
            return Ok(AtRulePrelude::Import(ImportRule { href, media }));
        }

        consume_remaining(input);
        let prelude = input.slice_from(start).trim();
        if prelude.is_empty() {
            Ok(AtRulePrelude::Other(format!("@{name}")))
        } else {
            Ok(AtRulePrelude::Other(format!("@{name} {prelude}")))
        }
    }

    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        match prelude {
            AtRulePrelude::Import(rule) => Ok(CssRule::Import(rule)),
            AtRulePrelude::Other(text) => Ok(CssRule::Other(format!("{text};"))),
            AtRulePrelude::FontFace => Err(()),
        }
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        match prelude {
            AtRulePrelude::FontFace => Ok(CssRule::FontFace(FontFaceRule {
                style: collect_declarations(input),
            })),
            AtRulePrelude::Import(_) => Err(input.new_custom_error(())),
            AtRulePrelude::Other(_) => {
                consume_remaining(input);
                // The nested parser stops right before the closing brace
                let text = input.slice(start.position()..input.position());
                Ok(CssRule::Other(format!("{}}}", text.trim_end())))
            }
        }
    }
}

impl<'i> QualifiedRuleParser<'i> for TopLevelRuleParser {
    type Prelude = String;
    type QualifiedRule = CssRule;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(consume_remaining(input).trim().to_string())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        Ok(CssRule::Style(StyleRule {
            selector: prelude,
            style: collect_declarations(input),
        }))
    }
}

struct DeclarationCollector;

impl<'i> DeclarationParser<'i> for DeclarationCollector {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _declaration_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let (value, important) = split_important(consume_remaining(input));
        Ok(Declaration {
            name: name.to_string(),
            value,
            important,
        })
    }
}

impl<'i> AtRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for DeclarationCollector {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}
