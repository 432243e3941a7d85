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

use super::{OpenFunc, Parser};
use crate::ast::{Instruction, Mnemonic, Statement};
use crate::errors::AssemblyError;
use crate::lexer::{TokenKind, Tokenizer};

impl<'a, T: Tokenizer> Parser<'a, T> {
    /// One entry of `textBlk` (section 4.2): a function open/close, a
    /// plain label, or an instruction.
    pub(super) fn parse_text_entry(&mut self) -> Result<(), AssemblyError> {
        let tok = self.peek()?;
        match tok.kind {
            TokenKind::KwFunc | TokenKind::KwInfunc => self.parse_func_open(),
            TokenKind::KwEndf => self.parse_func_close(),
            TokenKind::Ident(_) => self.parse_text_label(),
            TokenKind::Mnemonic(_) => self.parse_instruction(),
            other => Err(AssemblyError::syntax(
                tok.line,
                format!("expected a label, function, or instruction, got {:?}", other),
            )),
        }
    }

    fn parse_text_label(&mut self) -> Result<(), AssemblyError> {
        let (label, line) = self.expect_ident("a label")?;
        self.expect(TokenKind::Colon, ":")
            .map_err(|_| AssemblyError::syntax(line, format!("expected \"{}:\"", label)))?;
        let (in_func, func_name, exported) = match &self.open_func {
            Some(f) => (true, Some(f.name.clone()), f.exported),
            None => (false, None, false),
        };
        let section = self.current_section_mut()?;
        super::reuse_or_push_label(section, label, in_func, func_name, exported);
        Ok(())
    }

    fn parse_func_open(&mut self) -> Result<(), AssemblyError> {
        let tok = self.advance()?;
        let exported = tok.kind == TokenKind::KwFunc;
        let line = tok.line;
        if self.open_func.is_some() {
            return Err(AssemblyError::semantic(
                line,
                "function nesting is forbidden: a function is already open",
            ));
        }
        let (name, _) = self.expect_ident("a function name")?;
        self.expect(TokenKind::Colon, ":")?;

        self.open_func = Some(OpenFunc {
            name: name.clone(),
            exported,
            statement_count: 0,
            last_mnemonic: None,
        });
        let section = self.current_section_mut()?;
        super::reuse_or_push_label(section, name.clone(), true, Some(name), exported);
        Ok(())
    }

    fn parse_func_close(&mut self) -> Result<(), AssemblyError> {
        let tok = self.advance()?;
        let line = tok.line;
        let (name, _) = self.expect_ident("the function name")?;

        let open = self
            .open_func
            .take()
            .ok_or_else(|| AssemblyError::semantic(line, "@endf with no open function"))?;
        if open.name != name {
            return Err(AssemblyError::semantic(
                line,
                format!("@endf {:?} does not match open function {:?}", name, open.name),
            ));
        }
        if open.statement_count == 0 {
            return Err(AssemblyError::semantic(
                line,
                format!("function {:?} has an empty body", open.name),
            ));
        }
        let terminates =
            matches!(open.last_mnemonic, Some(Mnemonic::Ret) | Some(Mnemonic::Jmp) | Some(Mnemonic::Halt));
        if !terminates {
            return Err(AssemblyError::semantic(
                line,
                format!("function {:?} must end on ret, jmp, or halt", open.name),
            ));
        }
        Ok(())
    }

    fn parse_instruction(&mut self) -> Result<(), AssemblyError> {
        let tok = self.advance()?;
        let (mnemonic, line) = match tok.kind {
            TokenKind::Mnemonic(m) => (m, tok.line),
            other => {
                return Err(AssemblyError::syntax(tok.line, format!("expected a mnemonic, got {:?}", other)));
            }
        };
        let operands = self.parse_operands(mnemonic.arity())?;

        if let Some(open) = &mut self.open_func {
            open.statement_count += 1;
            open.last_mnemonic = Some(mnemonic);
        }

        let section = self.current_section_mut()?;
        super::current_block(section).statements.push(Statement::Instruction {
            line,
            instruction: Instruction { mnemonic, operands },
            resolve_reference: false,
        });
        Ok(())
    }
}
