//! Integration tests for the token-list tokenizer.

use tessel_html::{tokenize, Mode, Token, Tokenizer, TokenizerOptions};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tokens(input: &str) -> Vec<Token> {
    init();
    tokenize(input, TokenizerOptions::default())
}

fn tokens_with_loc(input: &str) -> Vec<Token> {
    init();
    tokenize(input, TokenizerOptions::default().with_loc(true))
}

fn codemod_tokens(input: &str) -> Vec<Token> {
    init();
    tokenize(input, TokenizerOptions::default().with_mode(Mode::Codemod))
}

fn start_tag(name: &str, attributes: &[(&str, &str, bool)]) -> Token {
    Token::start_tag(name, attributes.iter().copied(), false)
}

fn self_closing_tag(name: &str, attributes: &[(&str, &str, bool)]) -> Token {
    Token::start_tag(name, attributes.iter().copied(), true)
}

fn html_doctype(public: Option<&str>, system: Option<&str>) -> Token {
    Token::doctype("html", public, system)
}

// Doctype

#[test]
fn test_doctype_with_identifiers() {
    assert_eq!(
        tokens(r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#),
        [html_doctype(
            Some("-//W3C//DTD HTML 4.01//EN"),
            Some("http://www.w3.org/TR/html4/strict.dtd")
        )]
    );
}

#[test]
fn test_doctype_is_included_in_tokens() {
    assert_eq!(
        tokens("<!DOCTYPE html><html><body></body></html>"),
        [
            html_doctype(None, None),
            start_tag("html", &[]),
            start_tag("body", &[]),
            Token::end_tag("body"),
            Token::end_tag("html"),
        ]
    );
}

#[test]
fn test_doctype_after_comment() {
    assert_eq!(
        tokens("<!-- comment --><!DOCTYPE html>"),
        [Token::comment(" comment "), html_doctype(None, None)]
    );
    assert_eq!(
        tokens("<!-- comment --><!DOCTYPE html PUBLIC >"),
        [Token::comment(" comment "), html_doctype(None, None)]
    );
}

#[test]
fn test_doctype_system_only() {
    assert_eq!(
        tokens("<!doctype html system 'about:legacy-compat'>"),
        [html_doctype(None, Some("about:legacy-compat"))]
    );
}

#[test]
fn test_malformed_doctype_finishes_on_gt() {
    assert_eq!(
        tokens(r#"<!DOCTYPE html PUBLIC "unterminated>x"#),
        [html_doctype(Some("unterminated"), None), Token::chars("x")]
    );
    assert_eq!(tokens("<!DOCTYPE>"), [Token::doctype("", None, None)]);
}

// Tags and attributes

#[test]
fn test_simple_content() {
    assert_eq!(tokens("hello"), [Token::chars("hello")]);
}

#[test]
fn test_empty_input() {
    assert!(tokens("").is_empty());
}

#[test]
fn test_simple_tag() {
    assert_eq!(tokens("<div>"), [start_tag("div", &[])]);
    assert_eq!(tokens("<div   \t\n>"), [start_tag("div", &[])]);
}

#[test]
fn test_simple_closing_tag() {
    assert_eq!(tokens("</div>"), [Token::end_tag("div")]);
    assert_eq!(tokens("</div   \t\n>"), [Token::end_tag("div")]);
}

#[test]
fn test_hyphenated_tags() {
    assert_eq!(
        tokens("<x-foo></x-foo>"),
        [start_tag("x-foo", &[]), Token::end_tag("x-foo")]
    );
}

#[test]
fn test_quoted_attributes() {
    assert_eq!(tokens("<div id='foo'>"), [start_tag("div", &[("id", "foo", true)])]);
    assert_eq!(tokens(r#"<div id="foo">"#), [start_tag("div", &[("id", "foo", true)])]);
    assert_eq!(tokens(r#"<div id="">"#), [start_tag("div", &[("id", "", true)])]);
}

#[test]
fn test_unquoted_attribute() {
    assert_eq!(tokens("<div id=foo>"), [start_tag("div", &[("id", "foo", false)])]);
}

#[test]
fn test_unquoted_value_keeps_slashes() {
    assert_eq!(
        tokens("<a href=/a/b>"),
        [start_tag("a", &[("href", "/a/b", false)])]
    );
}

#[test]
fn test_empty_unquoted_value() {
    assert_eq!(tokens("<a b=>"), [start_tag("a", &[("b", "", false)])]);
}

#[test]
fn test_valueless_attributes() {
    assert_eq!(
        tokens("<div foo bar>"),
        [start_tag("div", &[("foo", "", false), ("bar", "", false)])]
    );
}

#[test]
fn test_missing_attribute_name() {
    assert_eq!(
        tokens("<div =foo>"),
        [start_tag("div", &[("=foo", "", false)])
            .with_syntax_error("attribute name cannot start with equals sign")]
    );
}

#[test]
fn test_invalid_character_in_attribute_name() {
    assert_eq!(
        tokens(r#"<div ">"#),
        [start_tag("div", &[("\"", "", false)])
            .with_syntax_error("\" is not a valid character within attribute names")]
    );
}

#[test]
fn test_less_than_in_attribute_name() {
    assert_eq!(
        tokens("<div a<b>"),
        [start_tag("div", &[("a<b", "", false)])
            .with_syntax_error("< is not a valid character within attribute names")]
    );
}

#[test]
fn test_last_syntax_error_wins() {
    let result = tokens("<div =a '>");
    assert_eq!(
        result[0].syntax_error(),
        Some("' is not a valid character within attribute names")
    );
}

#[test]
fn test_multiple_attributes() {
    assert_eq!(
        tokens(r#"<div id=foo class="bar baz" href='bat'>"#),
        [start_tag(
            "div",
            &[("id", "foo", false), ("class", "bar baz", true), ("href", "bat", true)]
        )]
    );
}

#[test]
fn test_duplicate_attributes_are_kept() {
    assert_eq!(
        tokens("<a x=1 x=2>"),
        [start_tag("a", &[("x", "1", false), ("x", "2", false)])]
    );
}

#[test]
fn test_attribute_name_keeps_case() {
    assert_eq!(
        tokens(r#"<svg viewBox="0 0 0 0">"#),
        [start_tag("svg", &[("viewBox", "0 0 0 0", true)])]
    );
}

#[test]
fn test_tag_name_is_lowercased() {
    assert_eq!(tokens("<linearGradient>"), [start_tag("lineargradient", &[])]);
    assert_eq!(
        tokens("<DIV></Div>"),
        [start_tag("div", &[]), Token::end_tag("div")]
    );
}

#[test]
fn test_self_closing_tags() {
    assert_eq!(tokens("<img />"), [self_closing_tag("img", &[])]);
    assert_eq!(tokens("<br/>"), [self_closing_tag("br", &[])]);
    assert_eq!(
        tokens("<input disabled />"),
        [self_closing_tag("input", &[("disabled", "", false)])]
    );
    assert_eq!(
        tokens("<input disabled/>"),
        [self_closing_tag("input", &[("disabled", "", false)])]
    );
    assert_eq!(
        tokens("<input data-foo=bar/>"),
        [self_closing_tag("input", &[("data-foo", "bar", false)])]
    );
}

#[test]
fn test_slash_in_the_middle_of_a_tag() {
    assert_eq!(
        tokens(r#"<img / src="foo.png">"#),
        [start_tag("img", &[("src", "foo.png", true)])]
    );
}

#[test]
fn test_element_with_content() {
    assert_eq!(
        tokens("<div id='foo' class='{{bar}} baz'>Some content</div>"),
        [
            start_tag("div", &[("id", "foo", true), ("class", "{{bar}} baz", true)]),
            Token::chars("Some content"),
            Token::end_tag("div"),
        ]
    );
}

#[test]
fn test_end_tag_attributes_are_reported() {
    assert_eq!(
        tokens("</div class=x>"),
        [Token::end_tag("div").with_syntax_error("end tags cannot have attributes")]
    );
    assert_eq!(
        tokens("</br/>"),
        [Token::end_tag("br").with_syntax_error("end tags cannot be self-closing")]
    );
}

#[test]
fn test_named_arg_invocation() {
    assert_eq!(
        tokens("<@foo></@foo>"),
        [start_tag("@foo", &[]), Token::end_tag("@foo")]
    );
    assert_eq!(tokens("<:block>"), [start_tag(":block", &[])]);
}

// Literal `<`

#[test]
fn test_stray_less_than_is_text() {
    assert_eq!(tokens("a < b"), [Token::chars("a < b")]);
    assert_eq!(tokens("1 <= 2"), [Token::chars("1 <= 2")]);
    assert_eq!(tokens("</ x"), [Token::chars("</ x")]);
    assert_eq!(tokens("<!x>"), [Token::chars("<!x>")]);
}

#[test]
fn test_stray_less_than_before_tag() {
    assert_eq!(tokens("<<b>"), [Token::chars("<"), start_tag("b", &[])]);
}

#[test]
fn test_trailing_less_than_is_text() {
    assert_eq!(tokens("a<"), [Token::chars("a<")]);
    assert_eq!(tokens("<"), [Token::chars("<")]);
    assert_eq!(tokens("x</"), [Token::chars("x</")]);
}

#[test]
fn test_unterminated_constructs_are_dropped() {
    assert_eq!(tokens("hi<div class="), [Token::chars("hi")]);
    assert!(tokens("<!-- open").is_empty());
    assert!(tokens("<!DOCTYPE html").is_empty());
}

// Comments

#[test]
fn test_comment() {
    assert_eq!(tokens("<!-- hello -->"), [Token::comment(" hello ")]);
}

#[test]
fn test_abrupt_comments() {
    assert_eq!(tokens("<!-->"), [Token::comment("")]);
    assert_eq!(tokens("<!--->"), [Token::comment("")]);
    assert_eq!(tokens("<!---->"), [Token::comment("")]);
}

#[test]
fn test_comment_containing_dashes() {
    assert_eq!(
        tokens("<!-- A perfectly legal - appears -->"),
        [Token::comment(" A perfectly legal - appears ")]
    );
    assert_eq!(
        tokens("<!-- A questionable -- appears -->"),
        [Token::comment(" A questionable -- appears ")]
    );
    assert_eq!(tokens("<!---x-->"), [Token::comment("-x")]);
    assert_eq!(tokens("<!--x--->"), [Token::comment("x-")]);
}

// Character references

#[test]
fn test_character_references_in_data() {
    assert_eq!(
        tokens("&quot;Foo &amp; Bar&quot; &lt; &#60;&#x3c; &#x3C; &LT; &NotGreaterFullEqual; &Borksnorlax; &nleqq;"),
        [Token::chars("\"Foo & Bar\" < << < < ≧̸ &Borksnorlax; ≦̸")]
    );
}

#[test]
fn test_character_references_in_attribute() {
    assert_eq!(
        tokens("<div title='&quot;Foo &amp; Bar&quot; &blk12; &lt; &#60;&#x3c; &#x3C; &LT; &NotGreaterFullEqual; &Borksnorlax; &nleqq;'>"),
        [start_tag(
            "div",
            &[("title", "\"Foo & Bar\" ▒ < << < < ≧̸ &Borksnorlax; ≦̸", true)]
        )]
    );
    assert_eq!(
        tokens("<a href=?a=1&amp;b=2>"),
        [start_tag("a", &[("href", "?a=1&b=2", false)])]
    );
}

#[test]
fn test_references_without_semicolon_are_literal() {
    assert_eq!(tokens("&amp &copy"), [Token::chars("&amp &copy")]);
    assert_eq!(tokens("AT&T"), [Token::chars("AT&T")]);
}

#[test]
fn test_numeric_references_decode_code_points() {
    assert_eq!(tokens("&#150;"), [Token::chars("\u{96}")]);
    assert_eq!(
        tokens("&#0;&#x80;&#xD800;&#x110000;"),
        [Token::chars("\u{0}\u{80}\u{FFFD}\u{FFFD}")]
    );
}

// Newline stripping and modes

#[test]
fn test_newline_after_pre_is_stripped() {
    assert_eq!(
        tokens("<pre>\nhello</pre>"),
        [start_tag("pre", &[]), Token::chars("hello"), Token::end_tag("pre")]
    );
    assert_eq!(
        tokens("<PRE>\nhello</PRE>"),
        [start_tag("pre", &[]), Token::chars("hello"), Token::end_tag("pre")]
    );
    assert_eq!(
        tokens("<textarea>\nhello</textarea>"),
        [start_tag("textarea", &[]), Token::chars("hello"), Token::end_tag("textarea")]
    );
}

#[test]
fn test_only_one_newline_is_stripped() {
    assert_eq!(
        tokens("<pre>\n\nhello</pre>"),
        [start_tag("pre", &[]), Token::chars("\nhello"), Token::end_tag("pre")]
    );
    assert_eq!(
        tokens("<pre>\n</pre>"),
        [start_tag("pre", &[]), Token::end_tag("pre")]
    );
}

#[test]
fn test_newline_after_closing_pre_is_kept() {
    assert_eq!(
        tokens("\n<pre>\nhello</pre>\n"),
        [
            Token::chars("\n"),
            start_tag("pre", &[]),
            Token::chars("hello"),
            Token::end_tag("pre"),
            Token::chars("\n"),
        ]
    );
}

#[test]
fn test_codemod_keeps_newline_after_pre() {
    assert_eq!(
        codemod_tokens("<pre>\nhello</pre>"),
        [start_tag("pre", &[]), Token::chars("\nhello"), Token::end_tag("pre")]
    );
    assert_eq!(
        codemod_tokens("\n<pre>\nhello</pre>\n"),
        [
            Token::chars("\n"),
            start_tag("pre", &[]),
            Token::chars("\nhello"),
            Token::end_tag("pre"),
            Token::chars("\n"),
        ]
    );
    assert_eq!(
        codemod_tokens("<textarea>\nhello</textarea>"),
        [start_tag("textarea", &[]), Token::chars("\nhello"), Token::end_tag("textarea")]
    );
}

// Raw text elements

#[test]
fn test_title_content_is_text() {
    assert_eq!(
        tokens("<title>&quot;hey <b>there</b><!-- comment --></title>"),
        [
            start_tag("title", &[]),
            Token::chars("\"hey <b>there</b><!-- comment -->"),
            Token::end_tag("title"),
        ]
    );
}

#[test]
fn test_raw_text_close_is_case_insensitive() {
    assert_eq!(
        tokens("<Title><!-- hello --></Title>"),
        [
            start_tag("title", &[]),
            Token::chars("<!-- hello -->"),
            Token::end_tag("title"),
        ]
    );
}

#[test]
fn test_style_content_is_text() {
    assert_eq!(
        tokens("<style>&quot;hey <b>there</b><!-- comment --></style>"),
        [
            start_tag("style", &[]),
            Token::chars("&quot;hey <b>there</b><!-- comment -->"),
            Token::end_tag("style"),
        ]
    );
}

#[test]
fn test_script_content_is_text() {
    assert_eq!(
        tokens("<script>&quot;hey <b>there</b><!-- comment --></script>"),
        [
            start_tag("script", &[]),
            Token::chars("&quot;hey <b>there</b><!-- comment -->"),
            Token::end_tag("script"),
        ]
    );
}

#[test]
fn test_bare_less_than_in_script() {
    assert_eq!(
        tokens("<script>1 < 2 &amp;&amp; x</script>"),
        [
            start_tag("script", &[]),
            Token::chars("1 < 2 &amp;&amp; x"),
            Token::end_tag("script"),
        ]
    );
}

#[test]
fn test_textarea_content_is_text() {
    assert_eq!(
        tokens("<textarea><b>&amp;</b></textarea>"),
        [
            start_tag("textarea", &[]),
            Token::chars("<b>&</b>"),
            Token::end_tag("textarea"),
        ]
    );
}

#[test]
fn test_two_following_script_tags() {
    assert_eq!(
        tokens("<script><!-- comment --></script> <script>second</script>"),
        [
            start_tag("script", &[]),
            Token::chars("<!-- comment -->"),
            Token::end_tag("script"),
            Token::chars(" "),
            start_tag("script", &[]),
            Token::chars("second"),
            Token::end_tag("script"),
        ]
    );
}

#[test]
fn test_scripts_in_a_document() {
    let input = r#"<!DOCTYPE html><html><head><script src="/foo.js"></script><script src="/bar.js"></script><script src="/baz.js"></script></head></html>"#;
    assert_eq!(
        tokens(input),
        [
            html_doctype(None, None),
            start_tag("html", &[]),
            start_tag("head", &[]),
            start_tag("script", &[("src", "/foo.js", true)]),
            Token::end_tag("script"),
            start_tag("script", &[("src", "/bar.js", true)]),
            Token::end_tag("script"),
            start_tag("script", &[("src", "/baz.js", true)]),
            Token::end_tag("script"),
            Token::end_tag("head"),
            Token::end_tag("html"),
        ]
    );
}

// Preprocessing and locations

#[test]
fn test_carriage_returns_become_line_feeds() {
    assert_eq!(tokens("\r\r\n\r\r\n\n"), [Token::chars("\n\n\n\n\n")]);
}

#[test]
fn test_lines_are_counted() {
    assert_eq!(
        tokens_with_loc("\r\r\n\r\r\n\n"),
        [Token::chars("\n\n\n\n\n").with_loc((1, 0), (6, 0))]
    );
}

#[test]
fn test_loc_chars() {
    assert_eq!(
        tokens_with_loc("Chars"),
        [Token::chars("Chars").with_loc((1, 0), (1, 5))]
    );
}

#[test]
fn test_loc_chars_tag_chars() {
    assert_eq!(
        tokens_with_loc("Chars<div>Chars"),
        [
            Token::chars("Chars").with_loc((1, 0), (1, 5)),
            start_tag("div", &[]).with_loc((1, 5), (1, 10)),
            Token::chars("Chars").with_loc((1, 10), (1, 15)),
        ]
    );
}

#[test]
fn test_loc_adjacent_tags() {
    assert_eq!(
        tokens_with_loc("<div><div>"),
        [
            start_tag("div", &[]).with_loc((1, 0), (1, 5)),
            start_tag("div", &[]).with_loc((1, 5), (1, 10)),
        ]
    );
}

#[test]
fn test_loc_char_ref() {
    assert_eq!(
        tokens_with_loc("&gt;<div>"),
        [
            Token::chars(">").with_loc((1, 0), (1, 4)),
            start_tag("div", &[]).with_loc((1, 4), (1, 9)),
        ]
    );
}

#[test]
fn test_loc_across_lines() {
    assert_eq!(
        tokens_with_loc("Chars\n<div>Chars\n<div>"),
        [
            Token::chars("Chars\n").with_loc((1, 0), (2, 0)),
            start_tag("div", &[]).with_loc((2, 0), (2, 5)),
            Token::chars("Chars\n").with_loc((2, 5), (3, 0)),
            start_tag("div", &[]).with_loc((3, 0), (3, 5)),
        ]
    );
}

#[test]
fn test_loc_comment_tag_chars_end_tag() {
    assert_eq!(
        tokens_with_loc("<!-- multline\ncomment --><div foo=bar>Chars\n</div>"),
        [
            Token::comment(" multline\ncomment ").with_loc((1, 0), (2, 11)),
            start_tag("div", &[("foo", "bar", false)]).with_loc((2, 11), (2, 24)),
            Token::chars("Chars\n").with_loc((2, 24), (3, 0)),
            Token::end_tag("div").with_loc((3, 0), (3, 6)),
        ]
    );
}

#[test]
fn test_loc_doctype() {
    assert_eq!(
        tokens_with_loc("<!DOCTYPE html>\n"),
        [
            html_doctype(None, None).with_loc((1, 0), (1, 15)),
            Token::chars("\n").with_loc((1, 15), (2, 0)),
        ]
    );
}

#[test]
fn test_locations_are_off_by_default() {
    assert!(tokens("<div>x</div>").iter().all(|t| t.loc().is_none()));
}

// Chunked input

#[test]
fn test_chunked_input_matches_whole_input() {
    init();
    let input = "<div id=\"a\" class=b>Hi\r\nthere</div>\r\n<p>x</p>";
    let options = TokenizerOptions::default().with_loc(true);
    let whole = tokenize(input, options);

    let mut tokenizer = Tokenizer::new(Default::default(), options);
    let mut chunked = Vec::new();
    let mut buf = [0; 4];
    for c in input.chars() {
        chunked.extend(tokenizer.tokenize_part(c.encode_utf8(&mut buf)));
    }
    chunked.extend(tokenizer.tokenize_eof());

    assert_eq!(chunked, whole);
}

#[test]
fn test_carriage_return_at_chunk_boundary() {
    init();
    let options = TokenizerOptions::default().with_loc(true);
    let mut tokenizer = Tokenizer::new(Default::default(), options);
    assert!(tokenizer.tokenize_part("a\r").is_empty());
    assert!(tokenizer.tokenize_part("\nb").is_empty());
    assert_eq!(
        tokenizer.tokenize_eof(),
        Some(Token::chars("a\nb").with_loc((1, 0), (2, 1)))
    );
}

#[test]
fn test_newline_strip_across_chunks() {
    init();
    let mut tokenizer = Tokenizer::default();
    assert_eq!(tokenizer.tokenize_part("<pre>"), [start_tag("pre", &[])]);
    assert!(tokenizer.tokenize_part("\nx").is_empty());
    assert_eq!(tokenizer.tokenize_eof(), Some(Token::chars("x")));
}
