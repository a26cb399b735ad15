use grammar::grammars::json::{self, Compile, Json};
use grammar::{parse, parse_complete, TokenMatch, TokenStream};
use rstest::rstest;
use serde_json::json;

#[test]
fn test_end_to_end() {
    let mut tokens = json::tokenise(r#"[1, "xyz", true, {"hello": ["a", "b", 42], "bye": null}]"#)
        .expect("valid json tokens");
    let tree: Json = parse(&mut tokens).expect("valid json");
    assert_eq!(
        tree.compile().unwrap(),
        json!([1.0, "xyz", true, {"hello": ["a", "b", 42.0], "bye": null}])
    );
}

#[test]
fn test_missing_value_reports_the_token_after_the_colon() {
    let mut tokens = json::tokenise(r#"{"key": }"#).unwrap();
    let err = parse::<Json>(&mut tokens).unwrap_err();
    assert_eq!(err.pos, 3);
    assert_eq!(err.token.value(), "}");
    // Every alternative of Json was tried at that token.
    for expected in [
        TokenMatch::of_type("number"),
        TokenMatch::of_type("string"),
        TokenMatch::of_value("null", "null"),
        TokenMatch::of_type("bool"),
        TokenMatch::of_value("op", "["),
        TokenMatch::of_value("op", "{"),
    ] {
        assert!(err.constraints().contains(&expected), "missing {expected}");
    }
    assert_eq!(tokens.save(), 0);
}

#[test]
fn test_mismatched_bracket() {
    let mut tokens = json::tokenise("{ ]").unwrap();
    let err = parse::<Json>(&mut tokens).unwrap_err();
    assert_eq!(err.pos, 1);
    assert_eq!(
        err.to_string(),
        r#"token #1 op with value "]": expected type string or value "}""#
    );
}

#[rstest]
#[case("[1 2]", 2)]
#[case("[1,, 2]", 3)]
#[case(r#"{"a" 1}"#, 2)]
#[case(r#"{"a": 1,}"#, 5)]
#[case("[[[]]", 5)]
fn test_error_positions(#[case] source: &str, #[case] pos: usize) {
    let mut tokens = json::tokenise(source).unwrap();
    let err = parse_complete::<Json>(&mut tokens).unwrap_err();
    assert_eq!(err.pos, pos, "{source}: {err}");
}

#[test]
fn test_parse_str_requires_complete_input() {
    assert!(json::parse_str("[1] [2]").is_err());
    assert_eq!(
        json::parse_str(r#"{"a": [true]}"#).unwrap().compile().unwrap(),
        json!({"a": [true]})
    );
}
