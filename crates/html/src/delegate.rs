//! Tokenizer delegate contract
//!
//! [`EventedTokenizer`](crate::EventedTokenizer) reports what it recognizes
//! through these callbacks and builds nothing itself. [`TokenBuilder`](crate::TokenBuilder)
//! is the stock implementation; tree builders can implement this directly.

use crate::token::Position;

/// Receiver of lexical events.
///
/// The machine keeps at most one construct open at a time, so calls arrive
/// as `begin_*`, any number of `append_*`, then one finishing call. Finishing
/// calls carry the machine position just past the construct.
pub trait TokenizerDelegate {
    /// The machine was reset; drop any partial state.
    fn reset(&mut self);

    fn begin_data(&mut self);
    fn append_to_data(&mut self, text: &str);
    fn finish_data(&mut self, pos: Position);

    fn begin_comment(&mut self);
    fn append_to_comment_data(&mut self, text: &str);
    fn finish_comment(&mut self, pos: Position);

    /// A `<` that may open a tag was consumed. Notification only.
    fn tag_open(&mut self) {}

    fn begin_start_tag(&mut self);
    fn begin_end_tag(&mut self);
    fn append_to_tag_name(&mut self, c: char);

    fn begin_attribute(&mut self);
    fn append_to_attribute_name(&mut self, c: char);
    fn begin_attribute_value(&mut self, quoted: bool);
    fn append_to_attribute_value(&mut self, text: &str);
    /// The value (possibly empty) is complete, quoted or not.
    fn finish_attribute_value(&mut self);

    fn mark_tag_as_self_closing(&mut self);
    fn finish_tag(&mut self, pos: Position);

    /// Attach an advisory diagnostic to the construct in progress.
    fn report_syntax_error(&mut self, message: &str);

    // Doctype support is optional.

    fn begin_doctype(&mut self) {}
    fn append_to_doctype_name(&mut self, _c: char) {}
    fn append_to_doctype_public_identifier(&mut self, _c: char) {}
    fn append_to_doctype_system_identifier(&mut self, _c: char) {}
    fn end_doctype(&mut self, _pos: Position) {}
}
