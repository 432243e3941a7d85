/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use super::*;
use crate::ast::Mnemonic;

fn kinds(source: &str) -> Vec<TokenKind> {
    let mut lex = Lexer::new(source);
    let mut out = Vec::new();
    loop {
        let tok = lex.next().unwrap();
        let done = tok.kind == TokenKind::Eof;
        out.push(tok.kind);
        if done {
            break;
        }
    }
    out
}

#[test]
fn classifies_file_kind_keywords() {
    assert_eq!(kinds(".bin"), vec![TokenKind::KwBin, TokenKind::Eof]);
    assert_eq!(kinds(".library"), vec![TokenKind::KwLibrary, TokenKind::Eof]);
}

#[test]
fn classifies_registers() {
    assert_eq!(
        kinds("r0 r27 rZ pc sp fp"),
        vec![
            TokenKind::Register(0),
            TokenKind::Register(27),
            TokenKind::Register(28),
            TokenKind::Register(29),
            TokenKind::Register(30),
            TokenKind::Register(31),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn r28_is_not_a_register_token() {
    // only r0..r27 are registers; r28 falls back to a plain identifier
    assert_eq!(kinds("r28"), vec![TokenKind::Ident("r28".to_string()), TokenKind::Eof]);
}

#[test]
fn classifies_mnemonics() {
    assert_eq!(
        kinds("halt jmp add"),
        vec![
            TokenKind::Mnemonic(Mnemonic::Halt),
            TokenKind::Mnemonic(Mnemonic::Jmp),
            TokenKind::Mnemonic(Mnemonic::Add),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn numbers_decimal_and_hex() {
    assert_eq!(
        kinds("42 0x2A -7 -0x10"),
        vec![
            TokenKind::Number(42),
            TokenKind::Number(42),
            TokenKind::Number(-7),
            TokenKind::Number(-16),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn semicolon_starts_a_line_comment() {
    assert_eq!(
        kinds("halt ; this is ignored\nret"),
        vec![
            TokenKind::Mnemonic(Mnemonic::Halt),
            TokenKind::Newline,
            TokenKind::Mnemonic(Mnemonic::Ret),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn newline_is_always_a_token() {
    assert_eq!(kinds("\n\n"), vec![TokenKind::Newline, TokenKind::Newline, TokenKind::Eof]);
}

#[test]
fn string_literal_is_collected_whole() {
    assert_eq!(
        kinds(r#""Hi there""#),
        vec![TokenKind::StringLiteral("Hi there".to_string()), TokenKind::Eof]
    );
}

#[test]
fn unterminated_string_is_an_error() {
    let mut lex = Lexer::new("\"no closing quote");
    assert!(lex.next().is_err());
}

#[test]
fn newline_inside_string_is_an_error() {
    let mut lex = Lexer::new("\"broken\nstring\"");
    assert!(lex.next().is_err());
}

#[test]
fn peek_does_not_consume() {
    let mut lex = Lexer::new("halt ret");
    let peeked = lex.peek().unwrap();
    let next = lex.next().unwrap();
    assert_eq!(peeked, next);
    assert_eq!(lex.next().unwrap().kind, TokenKind::Mnemonic(Mnemonic::Ret));
}

#[test]
fn hash_is_stable_for_identical_source() {
    let a = Lexer::new("halt\n").hash();
    let b = Lexer::new("halt\n").hash();
    let c = Lexer::new("ret\n").hash();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 32);
}

#[test]
fn line_tracking_across_newlines() {
    let mut lex = Lexer::new("halt\nret\nnop");
    assert_eq!(lex.next().unwrap().line, 1); // halt
    assert_eq!(lex.next().unwrap().line, 1); // newline
    assert_eq!(lex.next().unwrap().line, 2); // ret
    assert_eq!(lex.line(), 2);
}

#[test]
fn brackets_and_comma_for_addressing_modes() {
    assert_eq!(
        kinds("[r0, 4]"),
        vec![
            TokenKind::LBracket,
            TokenKind::Register(0),
            TokenKind::Comma,
            TokenKind::Number(4),
            TokenKind::RBracket,
            TokenKind::Eof,
        ]
    );
}
