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

use crate::ast::Mnemonic;

/// A single lexical token: its class, its exact source text, and the
/// 1-based line it started on.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // punctuation
    Comma,
    Colon,
    Semicolon,
    Newline,
    LBracket,
    RBracket,
    Quote,
    Slash,

    // file-class keywords
    KwBin,
    KwProgram,
    KwLibrary,

    // sectional directives
    KwSection,
    KwOrg,
    KwEmbed,
    KwInclude,
    KwEqu,
    KwAs,

    // type keywords
    KwData,
    KwText,
    KwInt,
    KwArray,
    KwStr,

    // function directives
    KwFunc,
    KwInfunc,
    KwEndf,

    Ident(String),
    /// a run of intra-line whitespace, only ever produced while
    /// `set_ignore_whitespace(false)` is in effect.
    Whitespace(String),
    Number(i64),
    /// register index, already mapped (rZ=28, pc=29, sp=30, fp=31, rN=N)
    Register(u8),
    Mnemonic(Mnemonic),
    StringLiteral(String),

    Illegal,
    Eof,
}
