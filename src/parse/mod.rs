//! The bundled Datalog front end.
//!
//! Turns policy source text into the generic [`SyntaxNode`] tree consumed by
//! the compiler. Any alternative front end producing the same tree contract
//! can stand in for this module.

mod error;
mod grammar;

use winnow::Parser;
use winnow::stream::{LocatingSlice, Stateful};

use self::error::LineIndex;
use crate::tree::SyntaxNode;
use crate::types::CompileError;

/// Parse policy source text into a concrete syntax tree.
///
/// # Errors
///
/// Returns [`CompileError::LexFailure`] when the failure sits on a character
/// outside the language's alphabet, and [`CompileError::ParseFailure`] for
/// grammar violations. Either carries messages formatted as
/// `line:<L>,col:<C>  <message>`.
pub fn parse(input: &str) -> Result<SyntaxNode, CompileError> {
    let index = LineIndex::new(input);
    let stream = Stateful {
        input: LocatingSlice::new(input),
        state: index.clone(),
    };
    grammar::theory.parse(stream).map_err(|err| {
        let offset = err.offset().min(input.len());
        let loc = index.locate(offset);
        match input[offset..].chars().next() {
            Some(c) if !error::is_legal_char(c) => CompileError::LexFailure {
                messages: vec![error::issue(loc, &format!("illegal character '{c}'"))],
            },
            _ => CompileError::ParseFailure {
                messages: vec![error::issue(loc, &err.inner().to_string())],
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_failure_on_illegal_character() {
        let err = parse("p(x) :- q(@).").unwrap_err();
        match err {
            CompileError::LexFailure { messages } => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].starts_with("line:1,col:9  "), "{}", messages[0]);
                assert!(messages[0].contains("illegal character '@'"));
            }
            other => panic!("expected LexFailure, got {other:?}"),
        }
    }

    #[test]
    fn parse_failure_on_grammar_violation() {
        let err = parse("p(x) :- .").unwrap_err();
        match err {
            CompileError::ParseFailure { messages } => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].starts_with("line:"), "{}", messages[0]);
            }
            other => panic!("expected ParseFailure, got {other:?}"),
        }
    }

    #[test]
    fn parse_failure_reports_later_line() {
        let err = parse("p(1).\nq(x) :-\n").unwrap_err();
        match err {
            CompileError::ParseFailure { messages } => {
                assert!(
                    messages[0].starts_with("line:2,") || messages[0].starts_with("line:3,"),
                    "{}",
                    messages[0]
                );
            }
            other => panic!("expected ParseFailure, got {other:?}"),
        }
    }
}
