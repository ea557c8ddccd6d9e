//! Integration tests driving the state machine with custom delegates.

use tessel_html::{
    EntityResolver, EventedTokenizer, Mode, NamedReferenceTable, Position, State, Token,
    TokenBuilder, TokenizerDelegate,
};

/// Records events and leaves every doctype hook at its default.
#[derive(Default)]
struct MissingDoctypeDelegate {
    steps: Vec<String>,
}

impl MissingDoctypeDelegate {
    fn step(&mut self, name: &str) {
        self.steps.push(name.to_owned());
    }

    fn step_with(&mut self, name: &str, arg: impl std::fmt::Display) {
        self.steps.push(format!("{name} {arg}"));
    }
}

impl TokenizerDelegate for MissingDoctypeDelegate {
    fn reset(&mut self) {
        self.step("reset");
    }
    fn begin_data(&mut self) {
        self.step("beginData");
    }
    fn append_to_data(&mut self, text: &str) {
        self.step_with("appendToData", text);
    }
    fn finish_data(&mut self, _pos: Position) {
        self.step("finishData");
    }
    fn tag_open(&mut self) {
        self.step("tagOpen");
    }
    fn begin_comment(&mut self) {
        self.step("beginComment");
    }
    fn append_to_comment_data(&mut self, text: &str) {
        self.step_with("appendToCommentData", text);
    }
    fn finish_comment(&mut self, _pos: Position) {
        self.step("finishComment");
    }
    fn begin_start_tag(&mut self) {
        self.step("beginStartTag");
    }
    fn begin_end_tag(&mut self) {
        self.step("beginEndTag");
    }
    fn append_to_tag_name(&mut self, c: char) {
        self.step_with("appendToTagName", c);
    }
    fn begin_attribute(&mut self) {
        self.step("beginAttribute");
    }
    fn append_to_attribute_name(&mut self, c: char) {
        self.step_with("appendToAttributeName", c);
    }
    fn begin_attribute_value(&mut self, quoted: bool) {
        self.step_with("beginAttributeValue", quoted);
    }
    fn append_to_attribute_value(&mut self, text: &str) {
        self.step_with("appendToAttributeValue", text);
    }
    fn finish_attribute_value(&mut self) {
        self.step("finishAttributeValue");
    }
    fn mark_tag_as_self_closing(&mut self) {
        self.step("markTagAsSelfClosing");
    }
    fn finish_tag(&mut self, _pos: Position) {
        self.step("finishTag");
    }
    fn report_syntax_error(&mut self, message: &str) {
        self.step_with("reportSyntaxError", message);
    }
}

fn comment_steps(text: &str) -> Vec<String> {
    let mut steps = vec!["tagOpen".to_owned(), "beginComment".to_owned()];
    steps.extend(text.chars().map(|c| format!("appendToCommentData {c}")));
    steps.push("finishComment".to_owned());
    steps
}

fn newline_data_steps() -> Vec<String> {
    ["beginData", "appendToData \n", "finishData"]
        .map(str::to_owned)
        .to_vec()
}

#[test]
fn test_delegate_without_doctype_methods() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut machine = EventedTokenizer::new(
        MissingDoctypeDelegate::default(),
        EntityResolver::html(),
        Mode::Precompile,
    );
    machine.tokenize(
        "\n<!-- comment here --><!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">\n<!-- comment here -->",
    );

    let mut expected = vec!["reset".to_owned()];
    expected.extend(newline_data_steps());
    expected.extend(comment_steps(" comment here "));
    expected.push("tagOpen".to_owned());
    expected.extend(newline_data_steps());
    expected.extend(comment_steps(" comment here "));

    assert_eq!(machine.delegate().steps, expected);
    assert_eq!(machine.state(), State::BeforeData);
}

#[test]
fn test_attribute_event_order() {
    let mut machine = EventedTokenizer::new(
        MissingDoctypeDelegate::default(),
        EntityResolver::html(),
        Mode::Codemod,
    );
    machine.tokenize("<i a='&lt;' b/>");

    assert_eq!(
        machine.into_delegate().steps,
        [
            "reset",
            "tagOpen",
            "beginStartTag",
            "appendToTagName i",
            "beginAttribute",
            "appendToAttributeName a",
            "beginAttributeValue true",
            "appendToAttributeValue <",
            "finishAttributeValue",
            "beginAttribute",
            "appendToAttributeName b",
            "beginAttributeValue false",
            "finishAttributeValue",
            "markTagAsSelfClosing",
            "finishTag",
        ]
    );
}

#[test]
fn test_custom_reference_table() {
    let mut table = NamedReferenceTable::default();
    table.insert("hello", "world");

    let mut machine =
        EventedTokenizer::new(TokenBuilder::new(false), EntityResolver::new(&table), Mode::Precompile);
    machine.tokenize("&hello; &amp; &#65;");

    assert_eq!(
        machine.delegate_mut().take_tokens(),
        [Token::chars("world &amp; A")]
    );
}

#[test]
fn test_machine_reports_position() {
    let mut machine =
        EventedTokenizer::new(TokenBuilder::new(true), EntityResolver::html(), Mode::Precompile);
    machine.tokenize_part("<p>\r\nab");
    assert_eq!(machine.position(), Position::new(2, 2));
    assert_eq!(machine.state(), State::Data);
    assert_eq!(machine.mode(), Mode::Precompile);

    machine.tokenize_eof();
    assert_eq!(
        machine.delegate().tokens(),
        [
            Token::start_tag("p", Vec::<(&str, &str, bool)>::new(), false).with_loc((1, 0), (1, 3)),
            Token::chars("\nab").with_loc((1, 3), (2, 2)),
        ]
    );
}
