//! HTML5 Tokenizer
//!
//! Converts HTML text into a flat list of tokens by driving an
//! [`EventedTokenizer`] with a [`TokenBuilder`].

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::builder::TokenBuilder;
use crate::entities::EntityResolver;
use crate::error::HtmlError;
use crate::evented::EventedTokenizer;
use crate::token::Token;

/// What the token stream is for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase", try_from = "String")
)]
pub enum Mode {
    /// Compiling templates: a newline right after `<pre>` or `<textarea>` is dropped
    #[default]
    Precompile,
    /// Rewriting source: every character is kept
    Codemod,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Precompile => "precompile",
            Mode::Codemod => "codemod",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = HtmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "precompile" => Ok(Mode::Precompile),
            "codemod" => Ok(Mode::Codemod),
            other => Err(HtmlError::UnsupportedMode(other.to_owned())),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = HtmlError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Tokenizer configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TokenizerOptions {
    /// Attach source locations to tokens
    pub loc: bool,
    pub mode: Mode,
}

impl TokenizerOptions {
    pub fn with_loc(mut self, loc: bool) -> Self {
        self.loc = loc;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}

/// HTML5 tokenizer producing [`Token`] records
pub struct Tokenizer<'t> {
    machine: EventedTokenizer<'t, TokenBuilder>,
}

impl<'t> Tokenizer<'t> {
    pub fn new(entities: EntityResolver<'t>, options: TokenizerOptions) -> Self {
        let builder = TokenBuilder::new(options.loc);
        Self {
            machine: EventedTokenizer::new(builder, entities, options.mode),
        }
    }

    /// Tokenize a complete document.
    pub fn tokenize(&mut self, input: &str) -> Vec<Token> {
        self.machine.tokenize(input);
        self.machine.delegate_mut().take_tokens()
    }

    /// Feed a chunk, returning the tokens it finished.
    pub fn tokenize_part(&mut self, input: &str) -> Vec<Token> {
        self.machine.tokenize_part(input);
        self.machine.delegate_mut().take_tokens()
    }

    /// End the input, returning trailing character data if any was open.
    pub fn tokenize_eof(&mut self) -> Option<Token> {
        self.machine.tokenize_eof();
        self.machine.delegate_mut().take_tokens().pop()
    }

    pub fn reset(&mut self) {
        self.machine.reset();
    }
}

impl Default for Tokenizer<'static> {
    fn default() -> Self {
        Self::new(EntityResolver::html(), TokenizerOptions::default())
    }
}

/// Tokenize `input` with the full HTML entity table.
pub fn tokenize(input: &str, options: TokenizerOptions) -> Vec<Token> {
    let tokens = Tokenizer::new(EntityResolver::html(), options).tokenize(input);
    log::debug!(
        "Tokenized {} bytes into {} tokens ({})",
        input.len(),
        tokens.len(),
        options.mode
    );
    tokens
}
