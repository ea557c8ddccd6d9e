//! Tessel HTML Tokenizer
//!
//! Template-oriented HTML tokenizer: a streaming state machine reporting to
//! a delegate, plus a stock delegate that builds a flat token list.
//!
//! ```
//! use tessel_html::{tokenize, Token, TokenizerOptions};
//!
//! let tokens = tokenize("<p>a &amp; b</p>", TokenizerOptions::default());
//! assert_eq!(tokens[1], Token::chars("a & b"));
//! ```

mod builder;
mod delegate;
mod entities;
mod error;
mod evented;
mod named_references;
mod token;
mod tokenizer;

pub use builder::TokenBuilder;
pub use delegate::TokenizerDelegate;
pub use entities::{decode_numeric, named_references, EntityResolver, NamedReferenceTable};
pub use error::{HtmlError, HtmlResult};
pub use evented::{EventedTokenizer, State};
pub use token::{Attribute, Attributes, Location, Position, Token};
pub use tokenizer::{tokenize, Mode, Tokenizer, TokenizerOptions};
