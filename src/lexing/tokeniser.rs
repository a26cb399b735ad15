//! Regex table tokeniser
//!
//! Token definitions are tried in declaration order: each mode compiles its definitions
//! into one anchored alternation, and the first alternative that matches at the current
//! offset wins (leftmost-first, as the regex crate resolves alternations). Each definition
//! is wrapped in its own named group so user patterns are free to use capture groups.

use super::LexError;
use crate::token::{SliceTokenStream, Token};
use regex::Regex;
use std::collections::HashMap;

/// Hook that takes over tokenizing for a definition: it receives the remaining input and
/// returns the byte length of the token starting there.
pub type SpecialFn = fn(&str) -> usize;

/// One entry of a tokeniser table.
#[derive(Debug, Clone)]
pub struct TokenDef {
    /// The regular expression the token must match
    pub pattern: String,
    /// The token type; `None` discards the matched text
    pub name: Option<String>,
    /// The lexical mode this definition belongs to (`""` is the default mode)
    pub mode: String,
    /// Mode to enter after this token
    pub push_mode: Option<String>,
    /// Return to the previous mode after this token
    pub pop_mode: bool,
    /// If set, decides how much input the token spans once the pattern has matched
    pub special: Option<SpecialFn>,
}

impl TokenDef {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        TokenDef {
            pattern: pattern.into(),
            name: Some(name.into()),
            mode: String::new(),
            push_mode: None,
            pop_mode: false,
            special: None,
        }
    }

    /// A definition whose matches are dropped from the token stream.
    pub fn skip(pattern: impl Into<String>) -> Self {
        TokenDef {
            name: None,
            ..TokenDef::new("", pattern)
        }
    }

    pub fn in_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn push_mode(mut self, mode: impl Into<String>) -> Self {
        self.push_mode = Some(mode.into());
        self
    }

    pub fn pop_mode(mut self) -> Self {
        self.pop_mode = true;
        self
    }

    pub fn special(mut self, special: SpecialFn) -> Self {
        self.special = Some(special);
        self
    }
}

#[derive(Debug, Clone)]
struct ModeTable {
    regex: Regex,
    defs: Vec<TokenDef>,
}

/// Group names starting with `__tok` are reserved for the tokeniser.
fn group_name(index: usize) -> String {
    format!("__tok{index}")
}

/// A tokeniser built from an ordered list of [`TokenDef`]s.
#[derive(Debug, Clone)]
pub struct Tokeniser {
    modes: HashMap<String, ModeTable>,
    initial_mode: String,
}

impl Tokeniser {
    /// Compile the definitions. The mode of the first definition is the initial mode.
    pub fn new(defs: Vec<TokenDef>) -> Result<Self, LexError> {
        let initial_mode = defs.first().ok_or(LexError::NoDefinitions)?.mode.clone();

        let mut grouped: Vec<(String, Vec<TokenDef>)> = Vec::new();
        for def in defs {
            match grouped.iter_mut().find(|(mode, _)| *mode == def.mode) {
                Some((_, mode_defs)) => mode_defs.push(def),
                None => grouped.push((def.mode.clone(), vec![def])),
            }
        }

        for (_, mode_defs) in &grouped {
            for def in mode_defs {
                if let Some(pushed) = &def.push_mode {
                    if !grouped.iter().any(|(mode, _)| mode == pushed) {
                        return Err(LexError::UnknownMode(pushed.clone()));
                    }
                }
            }
        }

        let mut modes = HashMap::new();
        for (mode, mode_defs) in grouped {
            let alternation = mode_defs
                .iter()
                .enumerate()
                .map(|(i, def)| format!("(?P<{}>{})", group_name(i), def.pattern))
                .collect::<Vec<_>>()
                .join("|");
            let regex = Regex::new(&format!("^(?:{alternation})"))
                .map_err(|e| LexError::Pattern(e.to_string()))?;
            modes.insert(
                mode,
                ModeTable {
                    regex,
                    defs: mode_defs,
                },
            );
        }

        Ok(Tokeniser {
            modes,
            initial_mode,
        })
    }

    /// Tokenise a whole string.
    pub fn tokenise(&self, source: &str) -> Result<SliceTokenStream, LexError> {
        let mut mode = self.initial_mode.as_str();
        let mut previous_modes: Vec<&str> = Vec::new();
        let mut tokens = Vec::new();
        let mut offset = 0;

        while offset < source.len() {
            let rest = &source[offset..];
            let table = self
                .modes
                .get(mode)
                .ok_or_else(|| LexError::UnknownMode(mode.to_string()))?;
            let caps = table
                .regex
                .captures(rest)
                .ok_or(LexError::NoMatch { offset })?;
            let Some(def) = table
                .defs
                .iter()
                .enumerate()
                .find(|(i, _)| caps.name(&group_name(*i)).is_some())
                .map(|(_, def)| def)
            else {
                return Err(LexError::NoMatch { offset });
            };

            let len = match def.special {
                Some(special) => special(rest),
                None => caps.get(0).map_or(0, |m| m.end()),
            };
            if len == 0 {
                return Err(LexError::EmptyMatch { offset });
            }
            if len > rest.len() || !rest.is_char_boundary(len) {
                return Err(LexError::NoMatch { offset });
            }

            if let Some(name) = &def.name {
                tokens.push(Token::new(name.as_str(), &rest[..len]));
            }
            if let Some(pushed) = &def.push_mode {
                previous_modes.push(mode);
                mode = pushed.as_str();
            } else if def.pop_mode {
                mode = previous_modes
                    .pop()
                    .ok_or(LexError::NoModeToPop { offset })?;
            }
            offset += len;
        }

        Ok(SliceTokenStream::new(tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(stream: &SliceTokenStream) -> Vec<(&str, &str)> {
        stream
            .tokens()
            .iter()
            .map(|t| (t.token_type(), t.value()))
            .collect()
    }

    fn arithmetic() -> Tokeniser {
        Tokeniser::new(vec![
            TokenDef::skip(r"\s+"),
            TokenDef::new("number", r"[0-9]+"),
            TokenDef::new("op", r"[-+*/()]"),
        ])
        .unwrap()
    }

    #[test]
    fn test_skips_unnamed_definitions() {
        let stream = arithmetic().tokenise("1 + (23*4)").unwrap();
        assert_eq!(
            values(&stream),
            vec![
                ("number", "1"),
                ("op", "+"),
                ("op", "("),
                ("number", "23"),
                ("op", "*"),
                ("number", "4"),
                ("op", ")"),
            ]
        );
    }

    #[test]
    fn test_declaration_order_wins() {
        let tokeniser = Tokeniser::new(vec![
            TokenDef::new("keyword", "let"),
            TokenDef::new("ident", "[a-z]+"),
        ])
        .unwrap();
        let stream = tokeniser.tokenise("let").unwrap();
        assert_eq!(values(&stream), vec![("keyword", "let")]);
    }

    #[test]
    fn test_user_capture_groups_do_not_shift_definitions() {
        let tokeniser = Tokeniser::new(vec![
            TokenDef::new("pair", r"(a)(b)"),
            TokenDef::new("other", r"c"),
        ])
        .unwrap();
        let stream = tokeniser.tokenise("abc").unwrap();
        assert_eq!(values(&stream), vec![("pair", "ab"), ("other", "c")]);
    }

    #[test]
    fn test_user_group_names_do_not_collide() {
        let tokeniser = Tokeniser::new(vec![
            TokenDef::new("first", r"(?P<t0>x)"),
            TokenDef::new("second", r"(?P<t1>y)"),
        ])
        .unwrap();
        let stream = tokeniser.tokenise("yx").unwrap();
        assert_eq!(values(&stream), vec![("second", "y"), ("first", "x")]);
    }

    #[test]
    fn test_modes_push_and_pop() {
        // Inside braces spaces are significant, outside they are dropped.
        let tokeniser = Tokeniser::new(vec![
            TokenDef::skip(r"\s+"),
            TokenDef::new("word", r"[a-z]+"),
            TokenDef::new("open", r"\{").push_mode("raw"),
            TokenDef::new("close", r"\}").in_mode("raw").pop_mode(),
            TokenDef::new("text", r"[^}]+").in_mode("raw"),
        ])
        .unwrap();
        let stream = tokeniser.tokenise("say { hi there } done").unwrap();
        assert_eq!(
            values(&stream),
            vec![
                ("word", "say"),
                ("open", "{"),
                ("text", " hi there "),
                ("close", "}"),
                ("word", "done"),
            ]
        );
    }

    #[test]
    fn test_pop_without_push_fails() {
        let tokeniser = Tokeniser::new(vec![TokenDef::new("close", r"\)").pop_mode()]).unwrap();
        assert_eq!(
            tokeniser.tokenise(")").unwrap_err(),
            LexError::NoModeToPop { offset: 0 }
        );
    }

    #[test]
    fn test_special_takes_over() {
        // Reads a length-prefixed blob such as "3:abc".
        fn blob(rest: &str) -> usize {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            let len: usize = rest[..digits].parse().unwrap_or(0);
            digits + 1 + len
        }
        let tokeniser = Tokeniser::new(vec![
            TokenDef::new("blob", r"[0-9]+:").special(blob),
            TokenDef::new("word", r"[a-z]+"),
        ])
        .unwrap();
        let stream = tokeniser.tokenise("3:a:bxy").unwrap();
        assert_eq!(values(&stream), vec![("blob", "3:a:b"), ("word", "xy")]);
    }

    #[test]
    fn test_reports_offset_of_invalid_input() {
        assert_eq!(
            arithmetic().tokenise("1 + x").unwrap_err(),
            LexError::NoMatch { offset: 4 }
        );
    }

    #[test]
    fn test_rejects_empty_matches() {
        let tokeniser = Tokeniser::new(vec![TokenDef::new("maybe", r"a*")]).unwrap();
        assert_eq!(
            tokeniser.tokenise("b").unwrap_err(),
            LexError::EmptyMatch { offset: 0 }
        );
    }

    #[test]
    fn test_rejects_unknown_pushed_mode() {
        let err = Tokeniser::new(vec![TokenDef::new("open", r"\(").push_mode("nowhere")])
            .unwrap_err();
        assert_eq!(err, LexError::UnknownMode("nowhere".to_string()));
    }

    #[test]
    fn test_rejects_bad_pattern() {
        assert!(matches!(
            Tokeniser::new(vec![TokenDef::new("bad", r"(")]),
            Err(LexError::Pattern(_))
        ));
        assert!(matches!(Tokeniser::new(vec![]), Err(LexError::NoDefinitions)));
    }
}
