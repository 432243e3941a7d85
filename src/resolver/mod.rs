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

pub mod constants;
pub mod symbol_table;

#[cfg(test)]
mod tests;

use crate::ast::{Ast, Mnemonic, Operand, Statement};
use crate::errors::AssemblyError;
use constants::{LDR_STR_DIFF_MAX, LDR_STR_DIFF_MIN, MMIO_THRESHOLD, MOV_DIFF_MAX, MOV_DIFF_MIN};
use symbol_table::{qualify_free_label, qualify_function_label, SymbolTable};

/// Runs both resolver passes over every origin in `ast`, mutating
/// statements and operands in place (section 4.3).
pub fn resolve(ast: &mut Ast) -> Result<(), AssemblyError> {
    let mut symtab = SymbolTable::new();
    let mut org_extents = Vec::with_capacity(ast.orgs.len());

    for org in &ast.orgs {
        let total_words = assign_local_addresses(ast, org, &mut symtab)?;
        org_extents.push((org.base, org.base as u64 + 4 * total_words as u64));
    }
    check_no_overlap(&org_extents)?;

    let constants = ast.constants.clone();
    for org in &mut ast.orgs {
        convert_local_names(org, &symtab, &constants)?;
    }

    check_no_unresolved_externals(ast)?;
    Ok(())
}

/// Pass A: walks `org`'s blocks in source order, assigning each labeled
/// block's address and inserting it into `symtab`. Returns the origin's
/// total word count.
fn assign_local_addresses(
    ast: &Ast,
    org: &crate::ast::Org,
    symtab: &mut SymbolTable,
) -> Result<u32, AssemblyError> {
    let mut word_count: u32 = 0;
    for section in &org.sections {
        let include_name = section.include_name.as_deref();
        for block in &section.blocks {
            if let Some(label) = &block.label {
                let line = block.statements.first().map(|s| s.line()).unwrap_or(1);
                if ast.constants.contains_key(label) {
                    return Err(AssemblyError::semantic(
                        line,
                        format!("label {:?} shadows a constant of the same name", label),
                    ));
                }
                if ast.includes.contains_key(label) {
                    return Err(AssemblyError::semantic(
                        line,
                        format!("label {:?} shadows an include alias of the same name", label),
                    ));
                }
                let addr = org.base + 4 * word_count;
                let qualified = if block.in_func {
                    qualify_function_label(include_name, block.func_name.as_deref().unwrap_or(""), label)
                } else {
                    qualify_free_label(include_name, label)
                };
                symtab.define(qualified, addr, line)?;
            }
            for statement in &block.statements {
                word_count += statement.word_count();
            }
        }
    }
    Ok(word_count)
}

fn check_no_overlap(extents: &[(u32, u64)]) -> Result<(), AssemblyError> {
    let mut sorted: Vec<_> = extents.to_vec();
    sorted.sort_by_key(|(base, _)| *base);
    for pair in sorted.windows(2) {
        let (_, end) = pair[0];
        let (next_base, _) = pair[1];
        if end > next_base as u64 {
            return Err(AssemblyError::range(
                0,
                format!("origin ending at {:#x} overlaps origin starting at {:#x}", end, next_base),
            ));
        }
    }
    Ok(())
}

/// Pass B: rewrites every `Label`-kind operand and data label reference
/// into its resolved form, re-deriving each statement's own address with
/// the same traversal order Pass A used.
fn convert_local_names(
    org: &mut crate::ast::Org,
    symtab: &SymbolTable,
    constants: &std::collections::HashMap<String, i32>,
) -> Result<(), AssemblyError> {
    let mut word_count: u32 = 0;
    for section in &mut org.sections {
        let include_name = section.include_name.clone();
        for block in &mut section.blocks {
            let func_ctx = if block.in_func { block.func_name.clone() } else { None };
            for statement in &mut block.statements {
                let instr_addr = org.base + 4 * word_count;
                word_count += statement.word_count();

                match statement {
                    Statement::DataLabelRef { line, label } => {
                        let line = *line;
                        let addr = symtab
                            .resolve(include_name.as_deref(), func_ctx.as_deref(), label)
                            .ok_or_else(|| {
                                AssemblyError::resolution(line, format!("label {:?} does not exist", label))
                            })?;
                        *statement = Statement::DataWord { line, value: addr as i32 };
                    }
                    Statement::Instruction { line, instruction, resolve_reference } => {
                        let line = *line;
                        let mnemonic = instruction.mnemonic;
                        for operand in &mut instruction.operands {
                            let Operand::Label(text) = operand else { continue };

                            if let Some(value) = constants.get(text) {
                                *operand = Operand::Immediate(*value);
                                continue;
                            }
                            if text.contains('.') {
                                *resolve_reference = true;
                                *operand = Operand::External(text.clone());
                                continue;
                            }
                            let addr = symtab
                                .resolve(include_name.as_deref(), func_ctx.as_deref(), text)
                                .ok_or_else(|| {
                                    AssemblyError::resolution(line, format!("label {:?} does not exist", text))
                                })?;
                            *operand = transform_operand(mnemonic, line, instr_addr, addr)?;
                        }
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

/// Applies the PC-relative-vs-absolute decision (section 4.3) once a
/// label's address has been resolved.
fn transform_operand(
    mnemonic: Mnemonic,
    line: usize,
    instr_addr: u32,
    target: u32,
) -> Result<Operand, AssemblyError> {
    if mnemonic.is_branch() {
        let diff = target as i64 - instr_addr as i64;
        return Ok(Operand::Diff(diff as i32));
    }

    if matches!(mnemonic, Mnemonic::Ldr | Mnemonic::Str | Mnemonic::Mov) && target >= MMIO_THRESHOLD {
        let diff = target as i64 - instr_addr as i64;
        let (min, max) = if mnemonic == Mnemonic::Mov {
            (MOV_DIFF_MIN, MOV_DIFF_MAX)
        } else {
            (LDR_STR_DIFF_MIN, LDR_STR_DIFF_MAX)
        };
        if diff < min || diff > max {
            return Err(AssemblyError::range(
                line,
                format!("PC-relative difference {} exceeds the encodable field width", diff),
            ));
        }
        return Ok(Operand::Diff(diff as i32));
    }

    Ok(Operand::Immediate(target as i32))
}

fn check_no_unresolved_externals(ast: &Ast) -> Result<(), AssemblyError> {
    for org in &ast.orgs {
        for section in &org.sections {
            for block in &section.blocks {
                for statement in &block.statements {
                    if let Statement::Instruction { line, instruction, resolve_reference: true } = statement {
                        return Err(AssemblyError::resolution(
                            *line,
                            format!(
                                "unresolved external reference in {:?}: cross-object linking is not supported",
                                instruction.mnemonic.as_str()
                            ),
                        ));
                    }
                }
            }
        }
    }
    Ok(())
}
