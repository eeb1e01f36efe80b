//! CSS object model consumed by the inlining engine
//!
//! Rules are represented as a tagged enum decided once at parse time, so the
//! engine never has to probe rule objects for the fields it needs. Values are
//! kept as source text and serialised back verbatim.

pub mod parser;

pub use parser::parse_stylesheet;

/// Ordered, mutable list of parsed rules. The engine splices and rewrites it in place.
pub type RuleList = Vec<CssRule>;

/// A single top-level CSS rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssRule {
    Style(StyleRule),
    Import(ImportRule),
    FontFace(FontFaceRule),
    /// Any other rule, passed through untouched as raw source text
    Other(String),
}

impl CssRule {
    /// Serialise the rule back to CSS text
    #[must_use]
    pub fn css_text(&self) -> String {
        match self {
            CssRule::Style(rule) => rule.css_text(),
            CssRule::Import(rule) => rule.css_text(),
            CssRule::FontFace(rule) => rule.css_text(),
            CssRule::Other(text) => text.clone(),
        }
    }

    #[must_use]
    pub fn is_import(&self) -> bool {
        matches!(self, CssRule::Import(_))
    }
}

/// `selector { declarations }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub selector: String,
    pub style: DeclarationBlock,
}

impl StyleRule {
    #[must_use]
    pub fn css_text(&self) -> String {
        format!("{} {}", self.selector, self.style.block_text())
    }
}

/// `@import url("href") media;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRule {
    /// Unquoted target of the import
    pub href: String,
    /// Media query list following the target, empty when absent
    pub media: String,
}

impl ImportRule {
    #[must_use]
    pub fn css_text(&self) -> String {
        let target = crate::inline_css::css_url::format_css_url(&self.href);
        if self.media.is_empty() {
            format!("@import {target};")
        } else {
            format!("@import {target} {};", self.media)
        }
    }
}

/// `@font-face { declarations }`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontFaceRule {
    pub style: DeclarationBlock,
}

impl FontFaceRule {
    #[must_use]
    pub fn css_text(&self) -> String {
        format!("@font-face {}", self.style.block_text())
    }
}

/// A single `name: value [!important]` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            important: false,
        }
    }

    #[must_use]
    pub fn css_text(&self) -> String {
        if self.important {
            format!("{}: {} !important;", self.name, self.value)
        } else {
            format!("{}: {};", self.name, self.value)
        }
    }
}

/// Order-preserving property map of a style or font-face rule
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclarationBlock {
    declarations: Vec<Declaration>,
}

impl DeclarationBlock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration. A later declaration of the same property replaces the
    /// earlier one in its original position, as CSSOM does.
    pub fn push(&mut self, declaration: Declaration) {
        match self
            .declarations
            .iter_mut()
            .find(|d| d.name.eq_ignore_ascii_case(&declaration.name))
        {
            Some(existing) => *existing = declaration,
            None => self.declarations.push(declaration),
        }
    }

    /// Value of a property, matched ASCII case-insensitively
    #[must_use]
    pub fn get_property_value(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .map(|d| d.value.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Declaration> {
        self.declarations.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Declaration> {
        self.declarations.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// `{ a: b; c: d; }`
    #[must_use]
    pub fn block_text(&self) -> String {
        if self.declarations.is_empty() {
            return "{ }".to_string();
        }
        let body: Vec<String> = self.declarations.iter().map(Declaration::css_text).collect();
        format!("{{ {} }}", body.join(" "))
    }
}

impl<'a> IntoIterator for &'a DeclarationBlock {
    type Item = &'a Declaration;
    type IntoIter = std::slice::Iter<'a, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.declarations.iter()
    }
}

/// Serialise a whole rule list, one rule per line
#[must_use]
pub fn css_text(rules: &[CssRule]) -> String {
    rules
        .iter()
        .map(CssRule::css_text)
        .collect::<Vec<_>>()
        .join("\n")
}
