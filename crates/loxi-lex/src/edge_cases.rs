//! Edge case tests for loxi-lex


#[cfg(test)]
mod props {
    use crate::Scanner;
    use loxi_util::Handler;
    use proptest::prelude::*;

    proptest! {
        /// Concatenating the lexemes of a scanned token stream gives back
        /// the source with whitespace and comments removed.
        #[test]
        fn lexemes_reassemble_to_source(
            ident in "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
            number in 0u32..100_000u32,
            text in "[a-zA-Z0-9,;+*]{0,16}",
        ) {
            let source = format!(
                "var {ident} = ({number} + 2) * {ident}; // trailing note\nprint \"{text}\";"
            );
            let handler = Handler::new();
            let tokens = Scanner::new(&source, &handler).scan_tokens();

            prop_assert!(!handler.has_errors());

            let reassembled: String = tokens.iter().map(|t| t.lexeme.as_str()).collect();
            let without_comment = source.replace("// trailing note", "");
            let squeezed: String = without_comment.split_whitespace().collect();
            prop_assert_eq!(reassembled, squeezed);
        }

        /// Line numbers never decrease across a token stream.
        #[test]
        fn token_lines_monotonic(parts in proptest::collection::vec("[a-z]{1,6}", 1..8)) {
            let source = parts.join(";\n");
            let handler = Handler::new();
            let tokens = Scanner::new(&source, &handler).scan_tokens();

            for pair in tokens.windows(2) {
                prop_assert!(pair[0].line() <= pair[1].line());
            }
        }
    }
}
