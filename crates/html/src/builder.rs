//! Token builder
//!
//! The stock [`TokenizerDelegate`]: assembles delegate events into
//! [`Token`] records, optionally stamped with source locations.

use crate::delegate::TokenizerDelegate;
use crate::token::{Attribute, Location, Position, Token};

/// Collects finished tokens in source order.
#[derive(Debug)]
pub struct TokenBuilder {
    tokens: Vec<Token>,
    current: Option<Token>,
    /// Index of the attribute being built in the current start tag
    current_attribute: Option<usize>,
    /// Where the next token starts: the end of the previous one
    start: Position,
    loc: bool,
}

impl TokenBuilder {
    pub fn new(loc: bool) -> Self {
        Self {
            tokens: Vec::new(),
            current: None,
            current_attribute: None,
            start: Position::default(),
            loc,
        }
    }

    /// Tokens finished so far
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Take the finished tokens, leaving the builder collecting anew.
    pub fn take_tokens(&mut self) -> Vec<Token> {
        std::mem::take(&mut self.tokens)
    }

    /// The token under construction, if any
    pub fn current_token(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    fn begin(&mut self, token: Token) {
        if let Some(dropped) = self.current.replace(token) {
            log::warn!("Dropping unfinished token {:?}", dropped);
        }
        self.current_attribute = None;
    }

    fn finalize(&mut self, pos: Position) {
        let Some(mut token) = self.current.take() else {
            log::warn!("Finish at {}:{} with no token in progress", pos.line, pos.column);
            return;
        };

        if self.loc {
            token.set_loc(Location::new(self.start, pos));
        }
        self.start = pos;
        self.current_attribute = None;
        self.tokens.push(token);
    }

    fn current_attribute_mut(&mut self) -> Option<&mut Attribute> {
        let index = self.current_attribute?;
        match self.current.as_mut()? {
            Token::StartTag { attributes, .. } => attributes.get_mut(index),
            _ => None,
        }
    }
}

impl Default for TokenBuilder {
    fn default() -> Self {
        Self::new(false)
    }
}

impl TokenizerDelegate for TokenBuilder {
    fn reset(&mut self) {
        self.tokens.clear();
        self.current = None;
        self.current_attribute = None;
        self.start = Position::default();
    }

    fn begin_data(&mut self) {
        self.begin(Token::chars(""));
    }

    fn append_to_data(&mut self, text: &str) {
        match &mut self.current {
            Some(Token::Chars { text: data, .. }) => data.push_str(text),
            other => log::warn!("Character data for {:?}", other),
        }
    }

    fn finish_data(&mut self, pos: Position) {
        self.finalize(pos);
    }

    fn begin_comment(&mut self) {
        self.begin(Token::comment(""));
    }

    fn append_to_comment_data(&mut self, text: &str) {
        match &mut self.current {
            Some(Token::Comment { text: data, .. }) => data.push_str(text),
            other => log::warn!("Comment data for {:?}", other),
        }
    }

    fn finish_comment(&mut self, pos: Position) {
        self.finalize(pos);
    }

    fn begin_start_tag(&mut self) {
        self.begin(Token::StartTag {
            name: String::new(),
            attributes: Default::default(),
            self_closing: false,
            syntax_error: None,
            loc: None,
        });
    }

    fn begin_end_tag(&mut self) {
        self.begin(Token::end_tag(""));
    }

    fn append_to_tag_name(&mut self, c: char) {
        match &mut self.current {
            Some(Token::StartTag { name, .. } | Token::EndTag { name, .. }) => name.push(c),
            other => log::warn!("Tag name character for {:?}", other),
        }
    }

    fn begin_attribute(&mut self) {
        match &mut self.current {
            Some(Token::StartTag { attributes, .. }) => {
                attributes.push(Attribute::default());
                self.current_attribute = Some(attributes.len() - 1);
            }
            other => log::warn!("Attribute for {:?}", other),
        }
    }

    fn append_to_attribute_name(&mut self, c: char) {
        match self.current_attribute_mut() {
            Some(attr) => attr.name.push(c),
            None => log::warn!("Attribute name character with no attribute open"),
        }
    }

    fn begin_attribute_value(&mut self, quoted: bool) {
        match self.current_attribute_mut() {
            Some(attr) => attr.quoted = quoted,
            None => log::warn!("Attribute value with no attribute open"),
        }
    }

    fn append_to_attribute_value(&mut self, text: &str) {
        match self.current_attribute_mut() {
            Some(attr) => attr.value.push_str(text),
            None => log::warn!("Attribute value text with no attribute open"),
        }
    }

    fn finish_attribute_value(&mut self) {
        self.current_attribute = None;
    }

    fn mark_tag_as_self_closing(&mut self) {
        match &mut self.current {
            Some(Token::StartTag { self_closing, .. }) => *self_closing = true,
            other => log::warn!("Self-closing flag for {:?}", other),
        }
    }

    fn finish_tag(&mut self, pos: Position) {
        self.finalize(pos);
    }

    fn report_syntax_error(&mut self, message: &str) {
        match &mut self.current {
            Some(
                Token::StartTag {
                    name, syntax_error, ..
                }
                | Token::EndTag {
                    name, syntax_error, ..
                },
            ) => {
                log::debug!("Syntax error in <{}>: {}", name, message);
                *syntax_error = Some(message.to_owned());
            }
            other => log::warn!("Syntax error for {:?}", other),
        }
    }

    fn begin_doctype(&mut self) {
        self.begin(Token::doctype("", None, None));
    }

    fn append_to_doctype_name(&mut self, c: char) {
        match &mut self.current {
            Some(Token::Doctype { name, .. }) => name.push(c),
            other => log::warn!("Doctype name character for {:?}", other),
        }
    }

    fn append_to_doctype_public_identifier(&mut self, c: char) {
        match &mut self.current {
            Some(Token::Doctype {
                public_identifier, ..
            }) => public_identifier.get_or_insert_with(String::new).push(c),
            other => log::warn!("Doctype public identifier for {:?}", other),
        }
    }

    fn append_to_doctype_system_identifier(&mut self, c: char) {
        match &mut self.current {
            Some(Token::Doctype {
                system_identifier, ..
            }) => system_identifier.get_or_insert_with(String::new).push(c),
            other => log::warn!("Doctype system identifier for {:?}", other),
        }
    }

    fn end_doctype(&mut self, pos: Position) {
        self.finalize(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_is_tracked_by_index() {
        let mut builder = TokenBuilder::new(false);
        builder.begin_start_tag();
        builder.append_to_tag_name('a');
        for (name, value) in [("x", "1"), ("y", "2")] {
            builder.begin_attribute();
            name.chars().for_each(|c| builder.append_to_attribute_name(c));
            builder.begin_attribute_value(true);
            builder.append_to_attribute_value(value);
            builder.finish_attribute_value();
        }
        builder.finish_tag(Position::new(1, 15));

        assert_eq!(
            builder.take_tokens(),
            [Token::start_tag("a", [("x", "1", true), ("y", "2", true)], false)]
        );
        assert!(builder.tokens().is_empty());
    }

    #[test]
    fn test_locations_are_contiguous() {
        let mut builder = TokenBuilder::new(true);
        builder.begin_data();
        builder.append_to_data("ab");
        builder.finish_data(Position::new(1, 2));
        builder.begin_comment();
        builder.append_to_comment_data("x\n");
        builder.finish_comment(Position::new(2, 3));

        assert_eq!(
            builder.tokens(),
            [
                Token::chars("ab").with_loc((1, 0), (1, 2)),
                Token::comment("x\n").with_loc((1, 2), (2, 3)),
            ]
        );
    }

    #[test]
    fn test_no_locations_when_disabled() {
        let mut builder = TokenBuilder::default();
        builder.begin_end_tag();
        builder.append_to_tag_name('p');
        builder.finish_tag(Position::new(1, 4));
        assert_eq!(builder.tokens()[0].loc(), None);
    }

    #[test]
    fn test_syntax_error_on_current_tag() {
        let mut builder = TokenBuilder::new(false);
        builder.begin_end_tag();
        builder.append_to_tag_name('p');
        builder.report_syntax_error("end tags cannot have attributes");
        builder.finish_tag(Position::new(1, 8));

        assert_eq!(
            builder.tokens()[0].syntax_error(),
            Some("end tags cannot have attributes")
        );
    }

    #[test]
    fn test_syntax_error_lands_on_later_tag() {
        let mut builder = TokenBuilder::new(true);
        builder.begin_data();
        builder.append_to_data("x");
        builder.finish_data(Position::new(1, 1));
        builder.begin_start_tag();
        builder.append_to_tag_name('b');
        builder.report_syntax_error("bad");
        builder.finish_tag(Position::new(1, 8));

        assert_eq!(builder.tokens()[0].syntax_error(), None);
        assert_eq!(builder.tokens()[1].syntax_error(), Some("bad"));
    }

    #[test]
    fn test_doctype_identifiers_start_absent() {
        let mut builder = TokenBuilder::new(false);
        builder.begin_doctype();
        "html".chars().for_each(|c| builder.append_to_doctype_name(c));
        builder.append_to_doctype_system_identifier('s');
        builder.end_doctype(Position::new(1, 20));

        assert_eq!(builder.tokens(), [Token::doctype("html", None, Some("s"))]);
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut builder = TokenBuilder::new(true);
        builder.begin_data();
        builder.append_to_data("x");
        builder.finish_data(Position::new(1, 1));
        builder.begin_comment();
        builder.reset();

        assert!(builder.tokens().is_empty());
        assert!(builder.current_token().is_none());
    }
}
