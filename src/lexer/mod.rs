// Dieselc - A compiler for the Diesel teaching language emitting x86-64 assembly
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Lexer module for the Diesel compiler.
//!
//! Tokenization is generated by `logos` from the [`Token`] definitions.
//! This module turns its output into `(Token, Span)` pairs and classifies
//! lexing failures into compile errors.

mod tokens;

pub use tokens::Token;

use logos::Logos;

use crate::error::{CompileError, ErrorCode, Span};

/// Tokenize Diesel source code.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, CompileError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => return Err(classify_error(lexer.slice(), span)),
        }
    }

    Ok(tokens)
}

fn classify_error(slice: &str, span: Span) -> CompileError {
    match slice.chars().next() {
        Some('{') => CompileError::new(
            ErrorCode::UnterminatedComment,
            "Unterminated comment",
            span,
        )
        .with_hint("close the comment with '}'"),
        Some(c) if c.is_ascii_digit() => CompileError::new(
            ErrorCode::InvalidNumber,
            format!("Invalid number '{}'", slice),
            span,
        )
        .with_hint("integers must fit in 64 bits and reals in a double"),
        Some(c) => CompileError::new(
            ErrorCode::InvalidCharacter,
            format!("Invalid character '{}'", c),
            span,
        ),
        None => CompileError::new(ErrorCode::InvalidCharacter, "Invalid input", span),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("PROGRAM Begin end"),
            vec![Token::Program, Token::Begin, Token::End]
        );
    }

    #[test]
    fn test_identifiers_are_upper_cased() {
        assert_eq!(
            kinds("foo Bar_1"),
            vec![
                Token::Identifier("FOO".into()),
                Token::Identifier("BAR_1".into())
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("ending"), vec![Token::Identifier("ENDING".into())]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 3.5 1.0e2"),
            vec![Token::Integer(42), Token::Real(3.5), Token::Real(100.0)]
        );
    }

    #[test]
    fn test_operators_and_punctuation() {
        assert_eq!(
            kinds("x := a[1] <> b;"),
            vec![
                Token::Identifier("X".into()),
                Token::Assign,
                Token::Identifier("A".into()),
                Token::LeftBracket,
                Token::Integer(1),
                Token::RightBracket,
                Token::NotEqual,
                Token::Identifier("B".into()),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("begin { a comment\n over lines } end"),
            vec![Token::Begin, Token::End]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("  x := 1").unwrap();
        assert_eq!(tokens[0].1, Span::new(2, 3));
        assert_eq!(tokens[1].1, Span::new(4, 6));
    }

    #[test]
    fn test_invalid_character() {
        let error = tokenize("x := #").unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidCharacter);
        assert_eq!(error.span, Span::new(5, 6));
    }

    #[test]
    fn test_integer_overflow() {
        let error = tokenize("99999999999999999999").unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidNumber);
    }

    #[test]
    fn test_unterminated_comment() {
        let error = tokenize("begin { never closed").unwrap_err();
        assert_eq!(error.code, ErrorCode::UnterminatedComment);
    }
}
