//! Lexer dispatch, split into one handler module per kind of token.

mod comment;
mod core;
mod identifier;
mod number;
mod operator;
mod string;

pub use core::Lexer;

#[cfg(test)]
mod tests {
    use wispc_util::{FileId, Handler, Interner};

    use super::Lexer;
    use crate::TokenKind;

    fn lex(src: &str) -> Vec<TokenKind> {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        Lexer::new(src, FileId::DUMMY)
            .tokenize(&mut interner, &mut handler)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn skips_line_comments() {
        let kinds = lex("// hello\n1");
        assert_eq!(kinds, vec![TokenKind::Number, TokenKind::EndOfFile]);
    }

    #[test]
    fn multi_char_symbols_disambiguate_prefixes() {
        let kinds = lex("!= == >= <= := ->");
        assert_eq!(
            kinds,
            vec![
                TokenKind::BangEqual,
                TokenKind::EqualEqual,
                TokenKind::GreaterEqual,
                TokenKind::LessEqual,
                TokenKind::ColonEqual,
                TokenKind::MinusGreater,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn single_char_symbols() {
        let kinds = lex("(){},.*+-/=!><:");
        assert_eq!(
            kinds,
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Star,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Slash,
                TokenKind::Equal,
                TokenKind::Bang,
                TokenKind::Greater,
                TokenKind::Less,
                TokenKind::Colon,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn keywords_require_a_boundary() {
        assert_eq!(lex("if x"), vec![TokenKind::If, TokenKind::Identifier, TokenKind::EndOfFile]);
        // "if(" has no whitespace/EOF after "if", so it falls through to a
        // plain identifier — a deliberate, narrow quirk.
        assert_eq!(
            lex("if(x)"),
            vec![
                TokenKind::Identifier,
                TokenKind::LeftParen,
                TokenKind::Identifier,
                TokenKind::RightParen,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn numbers_with_underscores_and_one_dot() {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let tokens = Lexer::new("1_000.25", FileId::DUMMY)
            .tokenize(&mut interner, &mut handler)
            .unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(interner.resolve(tokens[0].text), "1000.25");
        assert!(!handler.has_errors());
    }

    #[test]
    fn two_dots_diagnosed_but_recovers() {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let tokens = Lexer::new("1.2.3", FileId::DUMMY)
            .tokenize(&mut interner, &mut handler)
            .unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Number, TokenKind::EndOfFile]);
        assert_eq!(interner.resolve(tokens[0].text), "1.23");
        assert!(handler.has_errors());
    }

    #[test]
    fn string_literal_copied_verbatim() {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let tokens = Lexer::new(r#""hello world""#, FileId::DUMMY)
            .tokenize(&mut interner, &mut handler)
            .unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(interner.resolve(tokens[0].text), "hello world");
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let result = Lexer::new(r#""oops"#, FileId::DUMMY).tokenize(&mut interner, &mut handler);
        assert!(result.is_err());
    }

    #[test]
    fn unmatched_byte_is_skipped() {
        let kinds = lex("1 @ 2");
        assert_eq!(kinds, vec![TokenKind::Number, TokenKind::Number, TokenKind::EndOfFile]);
    }

    #[test]
    fn identifier_vs_keyword() {
        let kinds = lex("forest for");
        assert_eq!(kinds, vec![TokenKind::Identifier, TokenKind::For, TokenKind::EndOfFile]);
    }
}
