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

use crate::ast::Operand;
use crate::errors::AssemblyError;

/// Bundles the source line with a handful of operand-shape checks so call
/// sites in `encoder::mod` read as a flat list of expectations instead of
/// repeating the line number at every match.
pub struct Encoder {
    pub line: usize,
}

impl Encoder {
    pub fn new(line: usize) -> Self {
        Encoder { line }
    }

    pub fn expect_reg(&self, op: &Operand) -> Result<u8, AssemblyError> {
        match op {
            Operand::Reg(idx) => Ok(*idx),
            Operand::Label(_) | Operand::External(_) => Err(AssemblyError::resolution(
                self.line,
                "label substitution was not performed",
            )),
            _ => Err(AssemblyError::shape(self.line, "expected a register operand")),
        }
    }

    pub fn expect_immediate(&self, op: &Operand) -> Result<i64, AssemblyError> {
        match op {
            Operand::Immediate(v) | Operand::Diff(v) => Ok(*v as i64),
            Operand::Label(_) | Operand::External(_) => Err(AssemblyError::resolution(
                self.line,
                "label substitution was not performed",
            )),
            _ => Err(AssemblyError::shape(self.line, "expected an immediate or diff operand")),
        }
    }

    /// Either a register index or an immediate value, tagged so the caller
    /// can decide which hardware variant applies (`ldri`'s third operand,
    /// section 6).
    pub fn expect_reg_or_immediate(&self, op: &Operand) -> Result<RegOrImm, AssemblyError> {
        match op {
            Operand::Reg(idx) => Ok(RegOrImm::Reg(*idx)),
            Operand::Immediate(v) | Operand::Diff(v) => Ok(RegOrImm::Imm(*v as i64)),
            Operand::Label(_) | Operand::External(_) => Err(AssemblyError::resolution(
                self.line,
                "label substitution was not performed",
            )),
        }
    }
}

pub enum RegOrImm {
    Reg(u8),
    Imm(i64),
}
