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
use crate::ast::Operand;
use crate::errors::AssemblyError;
use crate::lexer::{TokenKind, Tokenizer};

impl<'a, T: Tokenizer> Parser<'a, T> {
    /// Collects exactly `arity` operands for an instruction. A bracket
    /// group (`[reg]` or `[reg, imm]`) counts as one or two operands
    /// toward that total — it's how `ldr`/`str` address forms and the
    /// indexed variants (`ldri`, `stppi`, ...) pack a base register and
    /// offset into a single syntactic slot (section 6).
    pub(super) fn parse_operands(&mut self, arity: usize) -> Result<Vec<Operand>, AssemblyError> {
        let mut ops = Vec::new();
        if arity == 0 {
            return Ok(ops);
        }
        loop {
            let mut group = self.parse_operand_group()?;
            ops.append(&mut group);
            if ops.len() >= arity {
                break;
            }
            self.expect(TokenKind::Comma, ",")?;
        }
        if ops.len() != arity {
            let line = self.line();
            return Err(AssemblyError::shape(
                line,
                format!("expected {} operand(s), got {}", arity, ops.len()),
            ));
        }
        Ok(ops)
    }

    fn parse_operand_group(&mut self) -> Result<Vec<Operand>, AssemblyError> {
        if self.peek()?.kind == TokenKind::LBracket {
            self.advance()?;
            let first = self.parse_bare_operand()?;
            if self.peek()?.kind == TokenKind::Comma {
                self.advance()?;
                let second = self.parse_bare_operand()?;
                self.expect(TokenKind::RBracket, "]")?;
                Ok(vec![first, second])
            } else {
                self.expect(TokenKind::RBracket, "]")?;
                Ok(vec![first])
            }
        } else {
            Ok(vec![self.parse_bare_operand()?])
        }
    }

    fn parse_bare_operand(&mut self) -> Result<Operand, AssemblyError> {
        let tok = self.advance()?;
        match tok.kind {
            TokenKind::Register(idx) => Ok(Operand::Reg(idx)),
            TokenKind::Number(n) => Ok(Operand::Immediate(checked_i32(n, tok.line)?)),
            // the resolver promotes this to External once it's known whether
            // the name contains a qualifying '.' (section 4.3, Pass B).
            TokenKind::Ident(name) => Ok(Operand::Label(name)),
            other => Err(AssemblyError::shape(
                tok.line,
                format!("expected a register, number, or label, got {:?}", other),
            )),
        }
    }
}
