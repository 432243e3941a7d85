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

use super::Parser;
use super::utility_functions::checked_i32;
use crate::ast::Statement;
use crate::errors::AssemblyError;
use crate::lexer::{TokenKind, Tokenizer};

impl<'a, T: Tokenizer> Parser<'a, T> {
    /// One entry of `dataBlk` (section 4.2): a label, or one of
    /// `.array` / `.str` / `.int` / `.equ`.
    pub(super) fn parse_data_entry(&mut self) -> Result<(), AssemblyError> {
        let tok = self.peek()?;
        match tok.kind {
            TokenKind::Ident(_) => self.parse_data_label(),
            TokenKind::KwArray => self.parse_array(),
            TokenKind::KwStr => self.parse_str(),
            TokenKind::KwInt => self.parse_int(),
            TokenKind::KwEqu => self.parse_equ(),
            other => Err(AssemblyError::syntax(
                tok.line,
                format!("expected a label or data entry, got {:?}", other),
            )),
        }
    }

    fn parse_data_label(&mut self) -> Result<(), AssemblyError> {
        let (label, line) = self.expect_ident("a label")?;
        self.expect(TokenKind::Colon, ":").map_err(|_| {
            AssemblyError::syntax(line, format!("expected \"{}:\"", label))
        })?;
        let section = self.current_section_mut()?;
        super::reuse_or_push_label(section, label, false, None, false);
        Ok(())
    }

    fn parse_array(&mut self) -> Result<(), AssemblyError> {
        self.expect(TokenKind::KwArray, ".array")?;
        let (n, line) = self.expect_number("a byte count")?;
        if n <= 0 {
            return Err(AssemblyError::range(line, ".array count must be > 0"));
        }
        let section = self.current_section_mut()?;
        super::current_block(section)
            .statements
            .push(Statement::DataArray { line, byte_count: n as u32 });
        Ok(())
    }

    fn parse_str(&mut self) -> Result<(), AssemblyError> {
        self.expect(TokenKind::KwStr, ".str")?;
        let (text, line) = self.expect_string("a string literal")?;
        let section = self.current_section_mut()?;
        super::current_block(section)
            .statements
            .push(Statement::DataString { line, text });
        Ok(())
    }

    fn parse_int(&mut self) -> Result<(), AssemblyError> {
        self.expect(TokenKind::KwInt, ".int")?;
        let tok = self.advance()?;
        let line = tok.line;
        let statement = match tok.kind {
            TokenKind::Number(n) => Statement::DataWord { line, value: checked_i32(n, line)? },
            TokenKind::Ident(label) => Statement::DataLabelRef { line, label },
            other => {
                return Err(AssemblyError::syntax(
                    line,
                    format!(".int expects a number or label, got {:?}", other),
                ));
            }
        };
        let section = self.current_section_mut()?;
        super::current_block(section).statements.push(statement);
        Ok(())
    }

    fn parse_equ(&mut self) -> Result<(), AssemblyError> {
        self.expect(TokenKind::KwEqu, ".equ")?;
        let (name, line) = self.expect_ident("a constant name")?;
        let (value, _) = self.expect_number("a constant value")?;
        if self.ast.constants.contains_key(&name) {
            return Err(AssemblyError::semantic(
                line,
                format!("constant {:?} was already defined", name),
            ));
        }
        if self.ast.includes.contains_key(&name) {
            return Err(AssemblyError::semantic(
                line,
                format!("constant {:?} collides with an include alias", name),
            ));
        }
        let value = checked_i32(value, line)?;
        self.ast.constants.insert(name, value);
        Ok(())
    }
}
