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

//! Token definitions for the Diesel language.

use logos::Logos;

/// A token in the Diesel language.
///
/// Keywords and identifiers are case-insensitive; identifiers are
/// upper-cased when lexed so the symbol table only ever sees one spelling.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"\{[^}]*\}")]
pub enum Token {
    // Literals
    /// Real literal such as `3.14` or `2.0e-3`. Literals too large for
    /// an `f64` are rejected.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| {
        lex.slice().parse::<f64>().ok().filter(|value| value.is_finite())
    })]
    Real(f64),
    /// Integer literal.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),
    /// Identifier, upper-cased.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_ascii_uppercase())]
    Identifier(String),

    // Declaration keywords
    #[token("program", ignore(ascii_case))]
    Program,
    #[token("const", ignore(ascii_case))]
    Const,
    #[token("var", ignore(ascii_case))]
    Var,
    #[token("array", ignore(ascii_case))]
    Array,
    #[token("of", ignore(ascii_case))]
    Of,
    #[token("procedure", ignore(ascii_case))]
    Procedure,
    #[token("function", ignore(ascii_case))]
    Function,
    #[token("begin", ignore(ascii_case))]
    Begin,
    #[token("end", ignore(ascii_case))]
    End,

    // Control flow keywords
    #[token("if", ignore(ascii_case))]
    If,
    #[token("then", ignore(ascii_case))]
    Then,
    #[token("elsif", ignore(ascii_case))]
    Elsif,
    #[token("else", ignore(ascii_case))]
    Else,
    #[token("while", ignore(ascii_case))]
    While,
    #[token("do", ignore(ascii_case))]
    Do,
    #[token("return", ignore(ascii_case))]
    Return,

    // Word operators
    #[token("div", ignore(ascii_case))]
    Div,
    #[token("mod", ignore(ascii_case))]
    Mod,
    #[token("and", ignore(ascii_case))]
    And,
    #[token("or", ignore(ascii_case))]
    Or,
    #[token("not", ignore(ascii_case))]
    Not,

    // Operators
    #[token(":=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("=")]
    Equal,
    #[token("<>")]
    NotEqual,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,

    // Punctuation
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
}

impl Token {
    /// Describe the token for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Real(value) => format!("real {}", value),
            Token::Integer(value) => format!("integer {}", value),
            Token::Identifier(name) => format!("identifier '{}'", name),
            other => format!("'{}'", other.as_str()),
        }
    }

    /// The source text of a fixed token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Token::Real(_) => "<real>",
            Token::Integer(_) => "<integer>",
            Token::Identifier(_) => "<identifier>",
            Token::Program => "program",
            Token::Const => "const",
            Token::Var => "var",
            Token::Array => "array",
            Token::Of => "of",
            Token::Procedure => "procedure",
            Token::Function => "function",
            Token::Begin => "begin",
            Token::End => "end",
            Token::If => "if",
            Token::Then => "then",
            Token::Elsif => "elsif",
            Token::Else => "else",
            Token::While => "while",
            Token::Do => "do",
            Token::Return => "return",
            Token::Div => "div",
            Token::Mod => "mod",
            Token::And => "and",
            Token::Or => "or",
            Token::Not => "not",
            Token::Assign => ":=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Equal => "=",
            Token::NotEqual => "<>",
            Token::Less => "<",
            Token::Greater => ">",
            Token::Colon => ":",
            Token::Semicolon => ";",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::LeftBracket => "[",
            Token::RightBracket => "]",
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}
