//! HTML tokenizing state machine
//!
//! Consumes normalized input one character at a time and reports lexical
//! units to a [`TokenizerDelegate`]. The machine never fails: malformed
//! markup turns into literal text or a diagnostic on the current token.

use std::mem;

use crate::delegate::TokenizerDelegate;
use crate::entities::EntityResolver;
use crate::token::Position;
use crate::tokenizer::Mode;

/// Tokenizer state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    BeforeData,
    Data,
    TagOpen,
    EndTagOpen,
    MarkupDeclarationOpen,
    CommentStart,
    CommentStartDash,
    Comment,
    CommentEndDash,
    CommentEnd,
    Doctype,
    BeforeDoctypeName,
    DoctypeName,
    AfterDoctypeName,
    AfterDoctypePublicKeyword,
    BeforeDoctypePublicIdentifier,
    DoctypePublicIdentifierDoubleQuoted,
    DoctypePublicIdentifierSingleQuoted,
    AfterDoctypePublicIdentifier,
    BetweenDoctypePublicAndSystemIdentifiers,
    AfterDoctypeSystemKeyword,
    BeforeDoctypeSystemIdentifier,
    DoctypeSystemIdentifierDoubleQuoted,
    DoctypeSystemIdentifierSingleQuoted,
    AfterDoctypeSystemIdentifier,
    TagName,
    EndTagName,
    AfterEndTagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
}

#[derive(Debug, Clone, Copy)]
enum DoctypeId {
    Public,
    System,
}

fn is_space(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | ' ')
}

/// `@` and `:` open tags too, for template component syntaxes.
fn is_tag_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '@' || c == ':'
}

/// Character-driven tokenizer reporting to a delegate `D`.
pub struct EventedTokenizer<'t, D> {
    state: State,
    input: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
    /// Last chunk ended in `\r`; a leading `\n` in the next one is part of it
    pending_cr: bool,

    // Tag being scanned, lowercased
    current_tag_name: String,
    current_tag_is_end: bool,

    // For raw text (script, style, title, textarea) handling
    last_start_tag: String,
    strip_newline: bool,

    // A `<` was consumed while character data was open
    data_before_tag: bool,
    tag_start: Position,

    mode: Mode,
    entities: EntityResolver<'t>,
    delegate: D,
}

impl<'t, D: TokenizerDelegate> EventedTokenizer<'t, D> {
    pub fn new(delegate: D, entities: EntityResolver<'t>, mode: Mode) -> Self {
        Self {
            state: State::BeforeData,
            input: Vec::new(),
            index: 0,
            line: 1,
            column: 0,
            pending_cr: false,

            current_tag_name: String::new(),
            current_tag_is_end: false,

            last_start_tag: String::new(),
            strip_newline: false,

            data_before_tag: false,
            tag_start: Position::default(),

            mode,
            entities,
            delegate,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Position just past the last consumed character
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    pub fn into_delegate(self) -> D {
        self.delegate
    }

    /// Return to the initial state, forgetting all input and positions.
    pub fn reset(&mut self) {
        self.transition_to(State::BeforeData);
        self.input.clear();
        self.index = 0;
        self.line = 1;
        self.column = 0;
        self.pending_cr = false;
        self.current_tag_name.clear();
        self.current_tag_is_end = false;
        self.last_start_tag.clear();
        self.strip_newline = false;
        self.data_before_tag = false;
        self.tag_start = Position::default();
        self.delegate.reset();
    }

    /// Tokenize a complete document.
    pub fn tokenize(&mut self, input: &str) {
        self.reset();
        self.tokenize_part(input);
        self.tokenize_eof();
    }

    /// Feed the next chunk of a document.
    pub fn tokenize_part(&mut self, input: &str) {
        self.preprocess_input(input);

        while self.index < self.input.len() {
            self.step();
        }

        // Handlers only look forward, so consumed input can go
        self.input.clear();
        self.index = 0;
    }

    /// Signal end of input.
    ///
    /// Open character data is finished, as is a dangling `<`, `</` or `<!`
    /// (as text). Any other unterminated construct is dropped.
    pub fn tokenize_eof(&mut self) {
        match self.state {
            State::Data => self.flush_data(),
            State::TagOpen => {
                self.markup_as_text("<");
                self.flush_data();
            }
            State::EndTagOpen => {
                self.markup_as_text("</");
                self.flush_data();
            }
            State::MarkupDeclarationOpen => {
                self.markup_as_text("<!");
                self.flush_data();
            }
            State::BeforeData => {}
            state => log::debug!("Abandoning unterminated construct in state {:?}", state),
        }
    }

    fn flush_data(&mut self) {
        self.delegate.finish_data(self.position());
        self.transition_to(State::BeforeData);
    }

    /// Append a chunk, replacing `\r\n` and lone `\r` with `\n`
    fn preprocess_input(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }

        let mut chars = chunk.chars().peekable();
        if mem::take(&mut self.pending_cr) && chars.peek() == Some(&'\n') {
            chars.next();
        }

        self.input.reserve(chunk.len());
        while let Some(c) = chars.next() {
            if c == '\r' {
                match chars.peek() {
                    Some('\n') => {
                        chars.next();
                    }
                    None => self.pending_cr = true,
                    Some(_) => {}
                }
                self.input.push('\n');
            } else {
                self.input.push(c);
            }
        }
    }

    fn transition_to(&mut self, state: State) {
        log::trace!("{:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Consume the current character
    fn consume(&mut self) {
        if let Some(&c) = self.input.get(self.index) {
            self.index += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    fn consume_n(&mut self, n: usize) {
        for _ in 0..n {
            self.consume();
        }
    }

    /// Check if the input at the current character starts with `literal` (ASCII case-insensitive)
    fn lookahead_is(&self, literal: &str) -> bool {
        let mut rest = self.input.get(self.index..).unwrap_or_default().iter();
        literal
            .chars()
            .all(|expected| rest.next().is_some_and(|c| c.eq_ignore_ascii_case(&expected)))
    }

    /// Execute one step of the state machine
    fn step(&mut self) {
        let Some(&c) = self.input.get(self.index) else {
            return;
        };

        match self.state {
            State::BeforeData => self.before_data(c),
            State::Data => self.data(c),
            State::TagOpen => self.tag_open(c),
            State::EndTagOpen => self.end_tag_open(c),
            State::MarkupDeclarationOpen => self.markup_declaration_open(),
            State::CommentStart => self.comment_start(c),
            State::CommentStartDash => self.comment_start_dash(c),
            State::Comment => self.comment(c),
            State::CommentEndDash => self.comment_end_dash(c),
            State::CommentEnd => self.comment_end(c),
            State::Doctype => self.doctype(c),
            State::BeforeDoctypeName => self.before_doctype_name(c),
            State::DoctypeName => self.doctype_name(c),
            State::AfterDoctypeName => self.after_doctype_name(c),
            State::AfterDoctypePublicKeyword => {
                self.after_doctype_keyword(c, DoctypeId::Public)
            }
            State::BeforeDoctypePublicIdentifier => {
                self.before_doctype_identifier(c, DoctypeId::Public)
            }
            State::DoctypePublicIdentifierDoubleQuoted => {
                self.doctype_identifier_quoted(c, '"', DoctypeId::Public)
            }
            State::DoctypePublicIdentifierSingleQuoted => {
                self.doctype_identifier_quoted(c, '\'', DoctypeId::Public)
            }
            State::AfterDoctypePublicIdentifier => self.after_doctype_public_identifier(c),
            State::BetweenDoctypePublicAndSystemIdentifiers => {
                self.before_doctype_identifier(c, DoctypeId::System)
            }
            State::AfterDoctypeSystemKeyword => {
                self.after_doctype_keyword(c, DoctypeId::System)
            }
            State::BeforeDoctypeSystemIdentifier => {
                self.before_doctype_identifier(c, DoctypeId::System)
            }
            State::DoctypeSystemIdentifierDoubleQuoted => {
                self.doctype_identifier_quoted(c, '"', DoctypeId::System)
            }
            State::DoctypeSystemIdentifierSingleQuoted => {
                self.doctype_identifier_quoted(c, '\'', DoctypeId::System)
            }
            State::AfterDoctypeSystemIdentifier => self.after_doctype_system_identifier(c),
            State::TagName => self.tag_name(c),
            State::EndTagName => self.end_tag_name(c),
            State::AfterEndTagName => self.after_end_tag_name(c),
            State::BeforeAttributeName => self.before_attribute_name(c),
            State::AttributeName => self.attribute_name(c),
            State::AfterAttributeName => self.after_attribute_name(c),
            State::BeforeAttributeValue => self.before_attribute_value(c),
            State::AttributeValueDoubleQuoted => self.attribute_value_quoted(c, '"'),
            State::AttributeValueSingleQuoted => self.attribute_value_quoted(c, '\''),
            State::AttributeValueUnquoted => self.attribute_value_unquoted(c),
            State::AfterAttributeValueQuoted => self.after_attribute_value_quoted(c),
            State::SelfClosingStartTag => self.self_closing_start_tag(c),
        }
    }

    // Raw text and character references

    fn raw_text_end_tag(&self) -> Option<&'static str> {
        match self.last_start_tag.as_str() {
            "script" => Some("</script>"),
            "style" => Some("</style>"),
            "title" => Some("</title>"),
            "textarea" => Some("</textarea>"),
            _ => None,
        }
    }

    /// Whether a `<` at the current character may start markup
    fn opens_markup(&self) -> bool {
        match self.raw_text_end_tag() {
            Some(end_tag) => self.lookahead_is(end_tag),
            None => true,
        }
    }

    fn decodes_references(&self) -> bool {
        !matches!(self.last_start_tag.as_str(), "script" | "style")
    }

    /// Try to consume a character reference; the `&` is already consumed.
    ///
    /// On failure nothing past the `&` is consumed.
    fn consume_char_ref(&mut self) -> Option<String> {
        let rest = self.input.get(self.index..).unwrap_or_default();
        let end = rest
            .iter()
            .position(|&c| !(c.is_ascii_alphanumeric() || c == '#'))?;
        if rest[end] != ';' {
            return None;
        }

        let reference: String = rest[..end].iter().collect();
        let decoded = self.entities.resolve(&reference)?;
        // the reference and its `;`
        self.consume_n(end + 1);
        Some(decoded.into_owned())
    }

    // Markup openers

    fn open_tag(&mut self) {
        self.tag_start = self.position();
        self.consume();
        self.transition_to(State::TagOpen);
    }

    /// The `<` really opens a tag, comment or doctype.
    fn commit_markup(&mut self) {
        if mem::take(&mut self.data_before_tag) {
            self.delegate.finish_data(self.tag_start);
        }
        self.delegate.tag_open();
    }

    /// The `<` opens nothing; keep what was consumed as character data.
    fn markup_as_text(&mut self, text: &str) {
        if !mem::take(&mut self.data_before_tag) {
            self.delegate.begin_data();
        }
        self.delegate.append_to_data(text);
        self.transition_to(State::Data);
    }

    // State implementations

    fn before_data(&mut self, c: char) {
        if mem::take(&mut self.strip_newline) && c == '\n' {
            self.consume();
        } else if c == '<' && self.opens_markup() {
            self.open_tag();
        } else {
            self.transition_to(State::Data);
            self.delegate.begin_data();
        }
    }

    fn data(&mut self, c: char) {
        match c {
            '<' if self.opens_markup() => {
                self.data_before_tag = true;
                self.open_tag();
            }
            '&' if self.decodes_references() => {
                self.consume();
                let decoded = self.consume_char_ref();
                self.delegate.append_to_data(decoded.as_deref().unwrap_or("&"));
            }
            _ => {
                self.consume();
                self.delegate.append_to_data(c.encode_utf8(&mut [0; 4]));
            }
        }
    }

    fn tag_open(&mut self, c: char) {
        match c {
            '!' => {
                self.consume();
                self.transition_to(State::MarkupDeclarationOpen);
            }
            '/' => {
                self.consume();
                self.transition_to(State::EndTagOpen);
            }
            c if is_tag_name_start(c) => {
                self.commit_markup();
                self.consume();
                self.current_tag_is_end = false;
                self.current_tag_name.clear();
                self.transition_to(State::TagName);
                self.delegate.begin_start_tag();
                self.append_to_tag_name(c);
            }
            _ => self.markup_as_text("<"),
        }
    }

    fn end_tag_open(&mut self, c: char) {
        if is_tag_name_start(c) {
            self.commit_markup();
            self.consume();
            self.current_tag_is_end = true;
            self.current_tag_name.clear();
            self.transition_to(State::EndTagName);
            self.delegate.begin_end_tag();
            self.append_to_tag_name(c);
        } else {
            self.markup_as_text("</");
        }
    }

    fn markup_declaration_open(&mut self) {
        if self.lookahead_is("--") {
            self.commit_markup();
            self.consume_n(2);
            self.transition_to(State::CommentStart);
            self.delegate.begin_comment();
        } else if self.lookahead_is("DOCTYPE") {
            self.commit_markup();
            self.consume_n(7);
            self.transition_to(State::Doctype);
            self.delegate.begin_doctype();
        } else {
            self.markup_as_text("<!");
        }
    }

    // Comments

    fn finish_comment(&mut self) {
        self.delegate.finish_comment(self.position());
        self.transition_to(State::BeforeData);
    }

    fn comment_start(&mut self, c: char) {
        self.consume();
        match c {
            '-' => self.transition_to(State::CommentStartDash),
            '>' => self.finish_comment(),
            _ => {
                self.delegate.append_to_comment_data(c.encode_utf8(&mut [0; 4]));
                self.transition_to(State::Comment);
            }
        }
    }

    fn comment_start_dash(&mut self, c: char) {
        match c {
            '-' => {
                self.consume();
                self.transition_to(State::CommentEnd);
            }
            '>' => {
                self.consume();
                self.finish_comment();
            }
            _ => {
                self.delegate.append_to_comment_data("-");
                self.transition_to(State::Comment);
            }
        }
    }

    fn comment(&mut self, c: char) {
        self.consume();
        if c == '-' {
            self.transition_to(State::CommentEndDash);
        } else {
            self.delegate.append_to_comment_data(c.encode_utf8(&mut [0; 4]));
        }
    }

    fn comment_end_dash(&mut self, c: char) {
        if c == '-' {
            self.consume();
            self.transition_to(State::CommentEnd);
        } else {
            self.delegate.append_to_comment_data("-");
            self.transition_to(State::Comment);
        }
    }

    fn comment_end(&mut self, c: char) {
        match c {
            '>' => {
                self.consume();
                self.finish_comment();
            }
            '-' => {
                self.consume();
                self.delegate.append_to_comment_data("-");
            }
            _ => {
                self.delegate.append_to_comment_data("--");
                self.transition_to(State::Comment);
            }
        }
    }

    // Doctype

    fn end_doctype(&mut self) {
        self.delegate.end_doctype(self.position());
        self.transition_to(State::BeforeData);
    }

    fn doctype(&mut self, c: char) {
        if is_space(c) {
            self.consume();
            self.transition_to(State::BeforeDoctypeName);
        } else if c == '>' {
            self.consume();
            self.end_doctype();
        } else {
            self.transition_to(State::BeforeDoctypeName);
        }
    }

    fn before_doctype_name(&mut self, c: char) {
        self.consume();
        if c == '>' {
            self.end_doctype();
        } else if !is_space(c) {
            self.transition_to(State::DoctypeName);
            self.delegate.append_to_doctype_name(c.to_ascii_lowercase());
        }
    }

    fn doctype_name(&mut self, c: char) {
        self.consume();
        if is_space(c) {
            self.transition_to(State::AfterDoctypeName);
        } else if c == '>' {
            self.end_doctype();
        } else {
            self.delegate.append_to_doctype_name(c.to_ascii_lowercase());
        }
    }

    fn after_doctype_name(&mut self, c: char) {
        if c == '>' {
            self.consume();
            self.end_doctype();
        } else if self.lookahead_is("PUBLIC") {
            self.consume_n(6);
            self.transition_to(State::AfterDoctypePublicKeyword);
        } else if self.lookahead_is("SYSTEM") {
            self.consume_n(6);
            self.transition_to(State::AfterDoctypeSystemKeyword);
        } else {
            // whitespace, or junk we skip
            self.consume();
        }
    }

    fn enter_doctype_identifier(&mut self, quote: char, id: DoctypeId) {
        let state = match (id, quote) {
            (DoctypeId::Public, '"') => State::DoctypePublicIdentifierDoubleQuoted,
            (DoctypeId::Public, _) => State::DoctypePublicIdentifierSingleQuoted,
            (DoctypeId::System, '"') => State::DoctypeSystemIdentifierDoubleQuoted,
            (DoctypeId::System, _) => State::DoctypeSystemIdentifierSingleQuoted,
        };
        self.transition_to(state);
    }

    fn after_doctype_keyword(&mut self, c: char, id: DoctypeId) {
        self.consume();
        match c {
            '"' | '\'' => self.enter_doctype_identifier(c, id),
            '>' => self.end_doctype(),
            c if is_space(c) => self.transition_to(match id {
                DoctypeId::Public => State::BeforeDoctypePublicIdentifier,
                DoctypeId::System => State::BeforeDoctypeSystemIdentifier,
            }),
            _ => {}
        }
    }

    fn before_doctype_identifier(&mut self, c: char, id: DoctypeId) {
        self.consume();
        match c {
            '"' | '\'' => self.enter_doctype_identifier(c, id),
            '>' => self.end_doctype(),
            _ => {}
        }
    }

    fn doctype_identifier_quoted(&mut self, c: char, quote: char, id: DoctypeId) {
        self.consume();
        if c == quote {
            self.transition_to(match id {
                DoctypeId::Public => State::AfterDoctypePublicIdentifier,
                DoctypeId::System => State::AfterDoctypeSystemIdentifier,
            });
        } else if c == '>' {
            self.end_doctype();
        } else {
            match id {
                DoctypeId::Public => self.delegate.append_to_doctype_public_identifier(c),
                DoctypeId::System => self.delegate.append_to_doctype_system_identifier(c),
            }
        }
    }

    fn after_doctype_public_identifier(&mut self, c: char) {
        self.consume();
        match c {
            '"' | '\'' => self.enter_doctype_identifier(c, DoctypeId::System),
            '>' => self.end_doctype(),
            c if is_space(c) => {
                self.transition_to(State::BetweenDoctypePublicAndSystemIdentifiers)
            }
            _ => {}
        }
    }

    fn after_doctype_system_identifier(&mut self, c: char) {
        self.consume();
        if c == '>' {
            self.end_doctype();
        }
    }

    // Tags

    fn append_to_tag_name(&mut self, c: char) {
        let c = c.to_ascii_lowercase();
        self.current_tag_name.push(c);
        self.delegate.append_to_tag_name(c);
    }

    fn finish_tag(&mut self) {
        self.delegate.finish_tag(self.position());

        if self.current_tag_is_end {
            self.last_start_tag.clear();
        } else {
            self.strip_newline = self.mode == Mode::Precompile
                && matches!(self.current_tag_name.as_str(), "pre" | "textarea");
            self.last_start_tag = mem::take(&mut self.current_tag_name);
        }
        self.current_tag_name.clear();
        self.transition_to(State::BeforeData);
    }

    fn tag_name(&mut self, c: char) {
        self.consume();
        match c {
            c if is_space(c) => self.transition_to(State::BeforeAttributeName),
            '/' => self.transition_to(State::SelfClosingStartTag),
            '>' => self.finish_tag(),
            _ => self.append_to_tag_name(c),
        }
    }

    fn end_tag_name(&mut self, c: char) {
        self.consume();
        match c {
            c if is_space(c) => self.transition_to(State::AfterEndTagName),
            '/' => {
                self.delegate.report_syntax_error("end tags cannot be self-closing");
                self.transition_to(State::AfterEndTagName);
            }
            '>' => self.finish_tag(),
            _ => self.append_to_tag_name(c),
        }
    }

    fn after_end_tag_name(&mut self, c: char) {
        self.consume();
        match c {
            c if is_space(c) => {}
            '>' => self.finish_tag(),
            '/' => self.delegate.report_syntax_error("end tags cannot be self-closing"),
            _ => self.delegate.report_syntax_error("end tags cannot have attributes"),
        }
    }

    // Attributes

    fn finish_valueless_attribute(&mut self) {
        self.delegate.begin_attribute_value(false);
        self.delegate.finish_attribute_value();
    }

    fn before_attribute_name(&mut self, c: char) {
        match c {
            c if is_space(c) => self.consume(),
            '/' => {
                self.consume();
                self.transition_to(State::SelfClosingStartTag);
            }
            '>' => {
                self.consume();
                self.finish_tag();
            }
            '=' => {
                self.delegate
                    .report_syntax_error("attribute name cannot start with equals sign");
                self.transition_to(State::AttributeName);
                self.delegate.begin_attribute();
                self.consume();
                self.delegate.append_to_attribute_name(c);
            }
            _ => {
                self.transition_to(State::AttributeName);
                self.delegate.begin_attribute();
            }
        }
    }

    fn attribute_name(&mut self, c: char) {
        match c {
            c if is_space(c) => {
                self.consume();
                self.transition_to(State::AfterAttributeName);
            }
            '/' => {
                self.finish_valueless_attribute();
                self.consume();
                self.transition_to(State::SelfClosingStartTag);
            }
            '=' => {
                self.consume();
                self.transition_to(State::BeforeAttributeValue);
            }
            '>' => {
                self.finish_valueless_attribute();
                self.consume();
                self.finish_tag();
            }
            '"' | '\'' | '<' => {
                self.delegate.report_syntax_error(&format!(
                    "{c} is not a valid character within attribute names"
                ));
                self.consume();
                self.delegate.append_to_attribute_name(c);
            }
            _ => {
                self.consume();
                self.delegate.append_to_attribute_name(c);
            }
        }
    }

    fn after_attribute_name(&mut self, c: char) {
        match c {
            c if is_space(c) => self.consume(),
            '/' => {
                self.finish_valueless_attribute();
                self.consume();
                self.transition_to(State::SelfClosingStartTag);
            }
            '=' => {
                self.consume();
                self.transition_to(State::BeforeAttributeValue);
            }
            '>' => {
                self.finish_valueless_attribute();
                self.consume();
                self.finish_tag();
            }
            _ => {
                self.finish_valueless_attribute();
                self.transition_to(State::AttributeName);
                self.delegate.begin_attribute();
            }
        }
    }

    fn before_attribute_value(&mut self, c: char) {
        match c {
            c if is_space(c) => self.consume(),
            '"' => {
                self.transition_to(State::AttributeValueDoubleQuoted);
                self.delegate.begin_attribute_value(true);
                self.consume();
            }
            '\'' => {
                self.transition_to(State::AttributeValueSingleQuoted);
                self.delegate.begin_attribute_value(true);
                self.consume();
            }
            '>' => {
                self.finish_valueless_attribute();
                self.consume();
                self.finish_tag();
            }
            _ => {
                self.transition_to(State::AttributeValueUnquoted);
                self.delegate.begin_attribute_value(false);
            }
        }
    }

    fn append_char_ref_to_attribute_value(&mut self) {
        let decoded = self.consume_char_ref();
        self.delegate
            .append_to_attribute_value(decoded.as_deref().unwrap_or("&"));
    }

    fn attribute_value_quoted(&mut self, c: char, quote: char) {
        self.consume();
        if c == quote {
            self.delegate.finish_attribute_value();
            self.transition_to(State::AfterAttributeValueQuoted);
        } else if c == '&' {
            self.append_char_ref_to_attribute_value();
        } else {
            self.delegate.append_to_attribute_value(c.encode_utf8(&mut [0; 4]));
        }
    }

    fn attribute_value_unquoted(&mut self, c: char) {
        match c {
            c if is_space(c) => {
                self.delegate.finish_attribute_value();
                self.consume();
                self.transition_to(State::BeforeAttributeName);
            }
            // `href=/a/b` keeps its slashes, `x=y/>` self-closes
            '/' if self.lookahead_is("/>") => {
                self.delegate.finish_attribute_value();
                self.consume();
                self.transition_to(State::SelfClosingStartTag);
            }
            '&' => {
                self.consume();
                self.append_char_ref_to_attribute_value();
            }
            '>' => {
                self.delegate.finish_attribute_value();
                self.consume();
                self.finish_tag();
            }
            _ => {
                self.consume();
                self.delegate.append_to_attribute_value(c.encode_utf8(&mut [0; 4]));
            }
        }
    }

    fn after_attribute_value_quoted(&mut self, c: char) {
        match c {
            c if is_space(c) => {
                self.consume();
                self.transition_to(State::BeforeAttributeName);
            }
            '/' => {
                self.consume();
                self.transition_to(State::SelfClosingStartTag);
            }
            '>' => {
                self.consume();
                self.finish_tag();
            }
            _ => self.transition_to(State::BeforeAttributeName),
        }
    }

    /// A `/` not followed by `>` is treated like whitespace.
    fn self_closing_start_tag(&mut self, c: char) {
        if c == '>' {
            self.consume();
            self.delegate.mark_tag_as_self_closing();
            self.finish_tag();
        } else {
            self.transition_to(State::BeforeAttributeName);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every event as a short string.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl TokenizerDelegate for Recorder {
        fn reset(&mut self) {
            self.events.push("reset".into());
        }
        fn begin_data(&mut self) {
            self.events.push("beginData".into());
        }
        fn append_to_data(&mut self, text: &str) {
            self.events.push(format!("data:{text}"));
        }
        fn finish_data(&mut self, pos: Position) {
            self.events.push(format!("finishData@{}:{}", pos.line, pos.column));
        }
        fn begin_comment(&mut self) {
            self.events.push("beginComment".into());
        }
        fn append_to_comment_data(&mut self, text: &str) {
            self.events.push(format!("comment:{text}"));
        }
        fn finish_comment(&mut self, _pos: Position) {
            self.events.push("finishComment".into());
        }
        fn tag_open(&mut self) {
            self.events.push("tagOpen".into());
        }
        fn begin_start_tag(&mut self) {
            self.events.push("beginStartTag".into());
        }
        fn begin_end_tag(&mut self) {
            self.events.push("beginEndTag".into());
        }
        fn append_to_tag_name(&mut self, c: char) {
            self.events.push(format!("tagName:{c}"));
        }
        fn begin_attribute(&mut self) {
            self.events.push("beginAttribute".into());
        }
        fn append_to_attribute_name(&mut self, c: char) {
            self.events.push(format!("attrName:{c}"));
        }
        fn begin_attribute_value(&mut self, quoted: bool) {
            self.events.push(format!("beginAttributeValue:{quoted}"));
        }
        fn append_to_attribute_value(&mut self, text: &str) {
            self.events.push(format!("attrValue:{text}"));
        }
        fn finish_attribute_value(&mut self) {
            self.events.push("finishAttributeValue".into());
        }
        fn mark_tag_as_self_closing(&mut self) {
            self.events.push("selfClosing".into());
        }
        fn finish_tag(&mut self, pos: Position) {
            self.events.push(format!("finishTag@{}:{}", pos.line, pos.column));
        }
        fn report_syntax_error(&mut self, message: &str) {
            self.events.push(format!("error:{message}"));
        }
    }

    fn events(input: &str) -> Vec<String> {
        let mut machine = EventedTokenizer::new(
            Recorder::default(),
            EntityResolver::html(),
            Mode::Precompile,
        );
        machine.tokenize(input);
        machine.into_delegate().events
    }

    #[test]
    fn test_simple_element_events() {
        assert_eq!(
            events("<a x=1>"),
            [
                "reset",
                "tagOpen",
                "beginStartTag",
                "tagName:a",
                "beginAttribute",
                "attrName:x",
                "beginAttributeValue:false",
                "attrValue:1",
                "finishAttributeValue",
                "finishTag@1:7",
            ]
        );
    }

    #[test]
    fn test_data_finishes_before_tag_open() {
        assert_eq!(
            events("hi<br/>"),
            [
                "reset",
                "beginData",
                "data:h",
                "data:i",
                "finishData@1:2",
                "tagOpen",
                "beginStartTag",
                "tagName:b",
                "tagName:r",
                "selfClosing",
                "finishTag@1:7",
            ]
        );
    }

    #[test]
    fn test_stray_less_than_stays_in_data() {
        assert_eq!(
            events("a < b"),
            ["reset", "beginData", "data:a", "data: ", "data:<", "data: ", "data:b", "finishData@1:5"]
        );
    }

    #[test]
    fn test_positions_track_newlines() {
        let mut machine =
            EventedTokenizer::new(Recorder::default(), EntityResolver::html(), Mode::Precompile);
        machine.tokenize_part("ab\ncd");
        assert_eq!(machine.position(), Position::new(2, 2));
        assert_eq!(machine.state(), State::Data);
    }

    #[test]
    fn test_carriage_return_split_across_chunks() {
        let mut machine =
            EventedTokenizer::new(Recorder::default(), EntityResolver::html(), Mode::Precompile);
        machine.tokenize_part("a\r");
        machine.tokenize_part("\nb");
        machine.tokenize_eof();
        assert_eq!(machine.position(), Position::new(2, 1));
    }

    #[test]
    fn test_reset_clears_position() {
        let mut machine =
            EventedTokenizer::new(Recorder::default(), EntityResolver::html(), Mode::Precompile);
        machine.tokenize_part("<div>\n\n");
        machine.reset();
        assert_eq!(machine.position(), Position::default());
        assert_eq!(machine.state(), State::BeforeData);
        assert_eq!(machine.delegate().events.last().map(String::as_str), Some("reset"));
    }

    #[test]
    fn test_unterminated_tag_is_abandoned() {
        let evs = events("<div class=");
        assert!(!evs.iter().any(|e| e.starts_with("finishTag")));
    }

    #[test]
    fn test_char_ref_failure_consumes_only_ampersand() {
        assert_eq!(
            events("&x;&amp;"),
            ["reset", "beginData", "data:&", "data:x", "data:;", "data:&", "finishData@1:8"]
        );
    }
}
