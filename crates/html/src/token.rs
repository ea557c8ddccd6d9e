//! Token records
//!
//! The flat token stream produced by the tokenizer, plus source positions.

use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A point in the (line-ending normalized) source.
///
/// Lines start at 1, columns at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// Source span of a finished token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A start tag attribute.
///
/// Duplicate names are kept; which one wins is up to the consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize),
    serde(into = "(String, String, bool)")
)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    /// Whether the value was written between quotes
    pub quoted: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>, quoted: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            quoted,
        }
    }
}

impl From<Attribute> for (String, String, bool) {
    fn from(attr: Attribute) -> Self {
        (attr.name, attr.value, attr.quoted)
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V, bool)> for Attribute {
    fn from((name, value, quoted): (N, V, bool)) -> Self {
        Self::new(name, value, quoted)
    }
}

/// Attribute list of a start tag, in source order
pub type Attributes = SmallVec<[Attribute; 4]>;

/// An HTML token
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(tag = "type"))]
pub enum Token {
    /// Character data, with references already decoded
    Chars {
        #[cfg_attr(feature = "serde", serde(rename = "chars"))]
        text: String,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        loc: Option<Location>,
    },
    /// Comment body between `<!--` and `-->`
    Comment {
        #[cfg_attr(feature = "serde", serde(rename = "chars"))]
        text: String,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        loc: Option<Location>,
    },
    /// Start tag
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    StartTag {
        #[cfg_attr(feature = "serde", serde(rename = "tagName"))]
        name: String,
        attributes: Attributes,
        self_closing: bool,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        syntax_error: Option<String>,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        loc: Option<Location>,
    },
    /// End tag
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    EndTag {
        #[cfg_attr(feature = "serde", serde(rename = "tagName"))]
        name: String,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        syntax_error: Option<String>,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        loc: Option<Location>,
    },
    /// DOCTYPE declaration
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    Doctype {
        name: String,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        public_identifier: Option<String>,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        system_identifier: Option<String>,
        #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
        loc: Option<Location>,
    },
}

impl Token {
    pub fn chars(text: impl Into<String>) -> Self {
        Token::Chars {
            text: text.into(),
            loc: None,
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Token::Comment {
            text: text.into(),
            loc: None,
        }
    }

    pub fn start_tag<A, I>(name: impl Into<String>, attributes: I, self_closing: bool) -> Self
    where
        A: Into<Attribute>,
        I: IntoIterator<Item = A>,
    {
        Token::StartTag {
            name: name.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
            self_closing,
            syntax_error: None,
            loc: None,
        }
    }

    pub fn end_tag(name: impl Into<String>) -> Self {
        Token::EndTag {
            name: name.into(),
            syntax_error: None,
            loc: None,
        }
    }

    pub fn doctype(
        name: impl Into<String>,
        public_identifier: Option<&str>,
        system_identifier: Option<&str>,
    ) -> Self {
        Token::Doctype {
            name: name.into(),
            public_identifier: public_identifier.map(str::to_owned),
            system_identifier: system_identifier.map(str::to_owned),
            loc: None,
        }
    }

    /// Source span, when location tracking was enabled
    pub fn loc(&self) -> Option<Location> {
        match self {
            Token::Chars { loc, .. }
            | Token::Comment { loc, .. }
            | Token::StartTag { loc, .. }
            | Token::EndTag { loc, .. }
            | Token::Doctype { loc, .. } => *loc,
        }
    }

    pub(crate) fn set_loc(&mut self, location: Location) {
        match self {
            Token::Chars { loc, .. }
            | Token::Comment { loc, .. }
            | Token::StartTag { loc, .. }
            | Token::EndTag { loc, .. }
            | Token::Doctype { loc, .. } => *loc = Some(location),
        }
    }

    /// Diagnostic attached to a tag token, if any
    pub fn syntax_error(&self) -> Option<&str> {
        match self {
            Token::StartTag { syntax_error, .. } | Token::EndTag { syntax_error, .. } => {
                syntax_error.as_deref()
            }
            _ => None,
        }
    }

    /// Builder-style location, mostly for writing expectations
    pub fn with_loc(mut self, start: (usize, usize), end: (usize, usize)) -> Self {
        self.set_loc(Location::new(
            Position::new(start.0, start.1),
            Position::new(end.0, end.1),
        ));
        self
    }

    /// Builder-style diagnostic. No effect on tokens that cannot carry one.
    pub fn with_syntax_error(mut self, message: impl Into<String>) -> Self {
        if let Token::StartTag { syntax_error, .. } | Token::EndTag { syntax_error, .. } = &mut self
        {
            *syntax_error = Some(message.into());
        }
        self
    }
}
