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

#[cfg(test)]
mod tests;

use crate::ast::{Ast, FileKind, Org, Statement};
use crate::encoder;
use crate::errors::AssemblyError;

const BIN_MAGIC: &[u8; 8] = b"s1987gvm";
const PIC_MAGIC: &[u8; 8] = b"PIC87gvm";

/// Writes the magic header, then one `(base_addr, word_count, payload)`
/// record per origin, in source order (section 4.5).
pub fn emit(ast: &Ast) -> Result<Vec<u8>, AssemblyError> {
    let magic = if matches!(ast.file_kind, FileKind::Bin) { BIN_MAGIC } else { PIC_MAGIC };

    let mut out = Vec::new();
    out.extend_from_slice(magic);

    for org in &ast.orgs {
        let payload = emit_origin(org)?;
        let word_count = (payload.len() / 4) as u32;
        out.extend_from_slice(&org.base.to_le_bytes());
        out.extend_from_slice(&word_count.to_le_bytes());
        out.extend_from_slice(&payload);
    }

    Ok(out)
}

fn emit_origin(org: &Org) -> Result<Vec<u8>, AssemblyError> {
    let mut payload = Vec::new();
    for section in &org.sections {
        for block in &section.blocks {
            for statement in &block.statements {
                emit_statement(statement, &mut payload)?;
            }
        }
    }
    Ok(payload)
}

fn emit_statement(statement: &Statement, out: &mut Vec<u8>) -> Result<(), AssemblyError> {
    match statement {
        Statement::Instruction { line, instruction, resolve_reference } => {
            if *resolve_reference {
                return Err(AssemblyError::resolution(
                    *line,
                    "unresolved external reference at emit time",
                ));
            }
            let word = encoder::encode_instruction(instruction, *line)?;
            out.extend_from_slice(&word.to_le_bytes());
        }
        Statement::DataWord { value, .. } => {
            out.extend_from_slice(&value.to_le_bytes());
        }
        Statement::DataLabelRef { line, label } => {
            return Err(AssemblyError::resolution(
                *line,
                format!("data label reference {:?} was never resolved", label),
            ));
        }
        Statement::DataArray { byte_count, .. } => {
            let padded = byte_count.div_ceil(4) * 4;
            out.extend(vec![0u8; padded as usize]);
        }
        Statement::DataString { text, .. } => {
            for ch in text.chars() {
                out.extend_from_slice(&(ch as u32 as u16).to_le_bytes());
            }
            out.extend_from_slice(&0u16.to_le_bytes());
            while out.len() % 4 != 0 {
                out.push(0);
            }
        }
        Statement::DataBlob { bytes, .. } => {
            out.extend_from_slice(bytes);
            while out.len() % 4 != 0 {
                out.push(0);
            }
        }
    }
    Ok(())
}
