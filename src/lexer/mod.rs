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

pub mod token;

#[cfg(test)]
mod tests;

use crate::ast::Mnemonic;
use crate::errors::AssemblyError;
use md5::{Digest, Md5};
pub use token::{Token, TokenKind};

/// The capability set the Parser depends on. The concrete `Lexer` is the
/// sole production implementation; tests substitute a scripted mock.
pub trait Tokenizer {
    fn next(&mut self) -> Result<Token, AssemblyError>;
    fn peek(&mut self) -> Result<Token, AssemblyError>;
    fn set_ignore_whitespace(&mut self, ignore: bool);
    fn line(&self) -> usize;
    fn hash(&self) -> String;
}

fn keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        ".bin" => KwBin,
        ".program" => KwProgram,
        ".library" => KwLibrary,
        ".section" => KwSection,
        ".org" => KwOrg,
        ".embed" => KwEmbed,
        ".include" => KwInclude,
        ".equ" => KwEqu,
        "as" => KwAs,
        "data" => KwData,
        "text" => KwText,
        ".int" => KwInt,
        ".array" => KwArray,
        ".str" => KwStr,
        "@func" => KwFunc,
        "@infunc" => KwInfunc,
        "@endf" => KwEndf,
        _ => return None,
    })
}

/// Maps a register name to its encoded index. `rZ`/`pc`/`sp`/`fp` are the
/// fixed special cases (section 4.4, 9); everything else must be `r` followed
/// by a decimal in 0..=27.
fn register_index(ident: &str) -> Option<u8> {
    match ident {
        "rZ" => Some(28),
        "pc" => Some(29),
        "sp" => Some(30),
        "fp" => Some(31),
        _ => {
            let rest = ident.strip_prefix('r')?;
            if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let n: u32 = rest.parse().ok()?;
            if n <= 27 { Some(n as u8) } else { None }
        }
    }
}

/// Hand-written tokenizer with one-token lookahead. Operates over the full
/// rune sequence of the source (known upfront, so the stream hash is just
/// computed once at construction rather than incrementally).
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    ignore_whitespace: bool,
    peeked: Option<Token>,
    hash: String,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let mut hasher = Md5::new();
        hasher.update(source.as_bytes());
        let hash = hex_encode(&hasher.finalize());

        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            ignore_whitespace: true,
            peeked: None,
            hash,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += 1;
        Some(c)
    }

    fn make(&self, kind: TokenKind, literal: String, line: usize) -> Token {
        Token { kind, literal, line }
    }

    fn next_token(&mut self) -> Result<Token, AssemblyError> {
        loop {
            // skip intra-line whitespace (never newline) unless a caller has
            // asked us to preserve it
            while self.ignore_whitespace
                && matches!(self.peek_char(), Some(c) if c == ' ' || c == '\t')
            {
                self.advance_char();
            }

            let Some(c) = self.peek_char() else {
                return Ok(self.make(TokenKind::Eof, String::new(), self.line));
            };

            let line = self.line;

            match c {
                ' ' | '\t' if !self.ignore_whitespace => {
                    let mut s = String::new();
                    while matches!(self.peek_char(), Some(c) if c == ' ' || c == '\t') {
                        s.push(self.advance_char().unwrap());
                    }
                    return Ok(self.make(TokenKind::Whitespace(s.clone()), s, line));
                }
                '\n' => {
                    self.advance_char();
                    self.line += 1;
                    return Ok(self.make(TokenKind::Newline, "\n".to_string(), line));
                }
                ';' => {
                    // line comment runs to the next newline or EOS
                    while !matches!(self.peek_char(), Some('\n') | None) {
                        self.advance_char();
                    }
                    continue;
                }
                ',' => {
                    self.advance_char();
                    return Ok(self.make(TokenKind::Comma, ",".to_string(), line));
                }
                ':' => {
                    self.advance_char();
                    return Ok(self.make(TokenKind::Colon, ":".to_string(), line));
                }
                '[' => {
                    self.advance_char();
                    return Ok(self.make(TokenKind::LBracket, "[".to_string(), line));
                }
                ']' => {
                    self.advance_char();
                    return Ok(self.make(TokenKind::RBracket, "]".to_string(), line));
                }
                '/' => {
                    self.advance_char();
                    return Ok(self.make(TokenKind::Slash, "/".to_string(), line));
                }
                '"' => return self.lex_string(line),
                c if c == '.' || c == '@' || c == '_' || c.is_ascii_alphabetic() => {
                    return Ok(self.lex_ident(line));
                }
                c if c.is_ascii_digit() || c == '-' => return self.lex_number(line),
                _ => {
                    self.advance_char();
                    return Err(AssemblyError::lexical(
                        line,
                        format!("illegal character {:?}", c),
                    ));
                }
            }
        }
    }

    fn lex_ident(&mut self, line: usize) -> Token {
        let mut s = String::new();
        while matches!(self.peek_char(), Some(c) if c.is_alphanumeric() || c == '_' || c == '.' || c == '@')
        {
            s.push(self.advance_char().unwrap());
        }

        if let Some(kind) = keyword(&s) {
            return self.make(kind, s, line);
        }
        if let Some(idx) = register_index(&s) {
            return self.make(TokenKind::Register(idx), s, line);
        }
        if let Some(mnemonic) = Mnemonic::from_str(&s) {
            return self.make(TokenKind::Mnemonic(mnemonic), s, line);
        }
        self.make(TokenKind::Ident(s.clone()), s, line)
    }

    fn lex_number(&mut self, line: usize) -> Result<Token, AssemblyError> {
        let mut s = String::new();
        if self.peek_char() == Some('-') {
            s.push(self.advance_char().unwrap());
        }
        if self.peek_char() == Some('0') && matches!(self.peek_char_at(1), Some('x') | Some('X')) {
            s.push(self.advance_char().unwrap());
            s.push(self.advance_char().unwrap());
            while matches!(self.peek_char(), Some(c) if c.is_ascii_hexdigit()) {
                s.push(self.advance_char().unwrap());
            }
        } else {
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                s.push(self.advance_char().unwrap());
            }
        }

        let value = parse_number(&s)
            .ok_or_else(|| AssemblyError::lexical(line, format!("malformed number {:?}", s)))?;
        Ok(self.make(TokenKind::Number(value), s, line))
    }

    fn lex_string(&mut self, line: usize) -> Result<Token, AssemblyError> {
        self.advance_char(); // opening quote
        let mut s = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(AssemblyError::lexical(line, "unterminated string literal"));
                }
                Some('\n') => {
                    return Err(AssemblyError::lexical(
                        line,
                        "newline inside string literal",
                    ));
                }
                Some('"') => {
                    self.advance_char();
                    break;
                }
                Some(c) => {
                    s.push(c);
                    self.advance_char();
                }
            }
        }
        Ok(self.make(TokenKind::StringLiteral(s.clone()), s, line))
    }
}

impl Tokenizer for Lexer {
    fn next(&mut self) -> Result<Token, AssemblyError> {
        if let Some(t) = self.peeked.take() {
            return Ok(t);
        }
        self.next_token()
    }

    fn peek(&mut self) -> Result<Token, AssemblyError> {
        if let Some(t) = &self.peeked {
            return Ok(t.clone());
        }
        let t = self.next_token()?;
        self.peeked = Some(t.clone());
        Ok(t)
    }

    fn set_ignore_whitespace(&mut self, ignore: bool) {
        self.ignore_whitespace = ignore;
    }

    fn line(&self) -> usize {
        self.line
    }

    fn hash(&self) -> String {
        self.hash.clone()
    }
}

fn parse_number(lit: &str) -> Option<i64> {
    let (neg, rest) = match lit.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, lit),
    };
    let value = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        rest.parse::<i64>().ok()?
    };
    Some(if neg { -value } else { value })
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
