//! Property-based tests for the tokenizer
//!
//! The tokenizer must accept any input at all: unmatched characters become
//! `Unknown` tokens, never a panic or a stuck scan. These properties are
//! checked on arbitrary strings and on generated StateSpec-shaped programs.

use proptest::prelude::*;
use statespec::pipeline::Pipeline;
use statespec::token::TokenKind;
use statespec::tokenizer::tokenize;

/// Strategy producing programs built from valid StateSpec fragments.
fn program_strategy() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        Just("#StateSpace".to_string()),
        Just("#Input".to_string()),
        Just("#Precondition".to_string()),
        Just("#Postcondition".to_string()),
        "[a-z_][a-z0-9_]{0,8}:[NZRCB];",
        "[a-z_][a-z0-9_]{0,8} = [0-9]{1,4};",
        Just("n > 0 ∧ m > 0".to_string()),
        Just("// comment".to_string()),
        Just(String::new()),
    ];
    prop::collection::vec(line, 0..20).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn test_tokenize_never_panics(input in ".*") {
        let _tokens = tokenize(&input);
    }

    #[test]
    fn test_tokenize_is_deterministic(input in ".*") {
        prop_assert_eq!(tokenize(&input), tokenize(&input));
    }

    #[test]
    fn test_positions_are_one_based_and_increasing(input in ".*") {
        let tokens = tokenize(&input);
        let mut previous = (0usize, 0usize);
        for token in &tokens {
            prop_assert!(token.line >= 1);
            prop_assert!(token.column >= 1);
            let position = (token.line, token.column);
            prop_assert!(
                position > previous,
                "token at {:?} does not advance past {:?}",
                position,
                previous
            );
            previous = position;
        }
    }

    #[test]
    fn test_nonempty_lines_end_with_newline(input in ".*") {
        let tokens = tokenize(&input);
        for pair in tokens.windows(2) {
            if pair[1].line > pair[0].line {
                prop_assert_eq!(pair[0].kind, TokenKind::Newline);
            }
        }
        if let Some(last) = tokens.last() {
            prop_assert_eq!(last.kind, TokenKind::Newline);
        }
    }

    #[test]
    fn test_pipeline_never_panics(input in ".*") {
        let _result = Pipeline::new().run(&input);
    }

    #[test]
    fn test_pipeline_never_panics_on_programs(input in program_strategy()) {
        let result = Pipeline::new().run(&input);
        // A result is either a success or carries at least one error.
        prop_assert!(result.success() || !result.errors().is_empty());
    }
}
