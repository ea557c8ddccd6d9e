//! Serialized token shape and option parsing (`serde` feature).

#![cfg(feature = "serde")]

use serde_json::json;
use tessel_html::{tokenize, Mode, TokenizerOptions};

#[test]
fn test_tokens_serialize_in_object_shape() {
    let tokens = tokenize(
        r#"<div id="a" hidden>x<!--c--></div x>"#,
        TokenizerOptions::default(),
    );

    assert_eq!(
        serde_json::to_value(&tokens).unwrap(),
        json!([
            {
                "type": "StartTag",
                "tagName": "div",
                "attributes": [["id", "a", true], ["hidden", "", false]],
                "selfClosing": false
            },
            { "type": "Chars", "chars": "x" },
            { "type": "Comment", "chars": "c" },
            {
                "type": "EndTag",
                "tagName": "div",
                "syntaxError": "end tags cannot have attributes"
            }
        ])
    );
}

#[test]
fn test_doctype_and_locations_serialize() {
    let tokens = tokenize(
        "<!DOCTYPE html SYSTEM 'about:legacy-compat'>",
        TokenizerOptions::default().with_loc(true),
    );

    assert_eq!(
        serde_json::to_value(&tokens).unwrap(),
        json!([{
            "type": "Doctype",
            "name": "html",
            "systemIdentifier": "about:legacy-compat",
            "loc": {
                "start": { "line": 1, "column": 0 },
                "end": { "line": 1, "column": 44 }
            }
        }])
    );
}

#[test]
fn test_options_deserialize_with_defaults() {
    let options: TokenizerOptions = serde_json::from_str(r#"{"mode": "codemod"}"#).unwrap();
    assert_eq!(options, TokenizerOptions::default().with_mode(Mode::Codemod));

    let options: TokenizerOptions = serde_json::from_str(r#"{"loc": true}"#).unwrap();
    assert_eq!(options, TokenizerOptions::default().with_loc(true));
}

#[test]
fn test_unsupported_mode_is_rejected() {
    let err = serde_json::from_str::<TokenizerOptions>(r#"{"mode": "xhtml"}"#).unwrap_err();
    assert!(err.to_string().contains("Unsupported tokenizer mode: xhtml"));
}
