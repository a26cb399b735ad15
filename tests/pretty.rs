use grammar::grammars::{json, sexpr, sjson, Language};
use grammar::{parse, to_pretty_string, ParseOptions};

#[test]
fn test_sexpr_tree() {
    let mut tokens = sexpr::tokenise(r#"(cons a (list 123 "c")))"#).unwrap();
    let tree: sexpr::SExpr = parse(&mut tokens).unwrap();
    let out = to_pretty_string(&tree);
    insta::assert_snapshot!(out.trim_end(), @r#"
    SExpr {
      list: List {
        open: {}
        items: [
          SExpr {
            atom: {atom cons}
          }
          SExpr {
            atom: {atom a}
          }
          SExpr {
            list: List {
              open: {}
              items: [
                SExpr {
                  atom: {atom list}
                }
                SExpr {
                  number: {number 123}
                }
                SExpr {
                  string: {string "c"}
                }
              ]
              close: {}
            }
          }
        ]
        close: {}
      }
    }
    "#);
}

#[test]
fn test_sjson_empty_list_is_omitted() {
    let mut tokens = sjson::tokenise(r#"{"awards": ["fast"], "penalties": []}"#).unwrap();
    let tree: sjson::Sjson = parse(&mut tokens).unwrap();
    let out = to_pretty_string(&tree);
    insta::assert_snapshot!(out.trim_end(), @r#"
    Sjson {
      object: Object {
        open: {}
        items: [
          Pair {
            key: {string "awards"}
            colon: {}
            value: Sjson {
              list: List {
                open: {}
                items: [
                  Sjson {
                    string: {string "fast"}
                  }
                ]
                close: {}
              }
            }
          }
          Pair {
            key: {string "penalties"}
            colon: {}
            value: Sjson {
              list: List {
                open: {}
                close: {}
              }
            }
          }
        ]
        close: {}
      }
    }
    "#);
}

#[test]
fn test_json_wrappers_and_indent() {
    let doc = Language::Json
        .parse_str("[null]", &ParseOptions::default())
        .unwrap();
    insta::assert_snapshot!(doc.pretty(4).trim_end(), @r"
    Json {
        array: Array {
            open: {}
            items: [
                Json {
                    null: Null {
                        value: {null null}
                    }
                }
            ]
            close: {}
        }
    }
    ");
}

#[test]
fn test_partial_tree_prints_what_is_set() {
    let tree = json::Json {
        boolean: Some(json::Bool::default()),
        ..json::Json::default()
    };
    insta::assert_snapshot!(to_pretty_string(&tree).trim_end(), @r"
    Json {
      boolean: Bool {
        value: { }
      }
    }
    ");
}
