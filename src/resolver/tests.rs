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

use super::resolve;
use crate::ast::{Ast, Operand, Statement};
use crate::file_reader::MockFileReader;
use crate::lexer::Lexer;
use crate::parser::parse_source;
use std::collections::HashSet;
use std::path::Path;

fn parse(source: &str) -> Ast {
    let mut lexer = Lexer::new(source);
    let reader = MockFileReader::default();
    let mut seen = HashSet::new();
    parse_source(&mut lexer, false, Path::new("."), &reader, &mut seen).unwrap()
}

fn only_instruction(ast: &Ast) -> &crate::ast::Instruction {
    for org in &ast.orgs {
        for section in &org.sections {
            for block in &section.blocks {
                for statement in &block.statements {
                    if let Statement::Instruction { instruction, .. } = statement {
                        return instruction;
                    }
                }
            }
        }
    }
    panic!("no instruction found");
}

#[test]
fn absolute_jump_becomes_a_diff_operand() {
    let mut ast = parse(".bin\n.org 0x0\n.section text\nmain:\n  jmp end\nend:\n  halt\n");
    resolve(&mut ast).unwrap();
    let instr = only_instruction(&ast);
    assert_eq!(instr.operands, vec![Operand::Diff(4)]);
}

#[test]
fn high_address_load_becomes_pc_relative() {
    let mut ast = parse(
        ".bin\n.org 0x0\n.section text\nmain:\n  ldr r0, data\n  halt\n.section data\n.org 0x3000\ndata: .int 42\n",
    );
    resolve(&mut ast).unwrap();
    let instr = only_instruction(&ast);
    assert_eq!(instr.operands[1], Operand::Diff(0x3000));
}

#[test]
fn low_address_load_stays_absolute() {
    let mut ast = parse(
        ".bin\n.org 0x0\n.section text\nmain:\n  ldr r0, data\n  halt\n.section data\ndata: .int 42\n",
    );
    resolve(&mut ast).unwrap();
    let instr = only_instruction(&ast);
    assert_eq!(instr.operands[1], Operand::Immediate(8));
}

#[test]
fn constant_substitution_does_not_apply_pc_relative_transform() {
    let mut ast =
        parse(".bin\n.org 0\n.section data\n.equ K 7\n.section text\nmain:\n  mov r1, K\n  halt\n");
    resolve(&mut ast).unwrap();
    let instr = only_instruction(&ast);
    assert_eq!(instr.operands[1], Operand::Immediate(7));
}

#[test]
fn duplicate_label_is_an_error() {
    let mut ast = parse(".bin\n.org 0\n.section text\nfoo:\n  halt\nfoo:\n  halt\n");
    assert!(resolve(&mut ast).is_err());
}

#[test]
fn unresolved_label_is_an_error() {
    let mut ast = parse(".bin\n.org 0\n.section text\nmain:\n  jmp nowhere\n");
    assert!(resolve(&mut ast).is_err());
}

#[test]
fn dotted_operand_defers_as_an_external_reference_and_then_errors() {
    let mut ast = parse(".bin\n.org 0\n.section text\nmain:\n  jmp other.label\n");
    let err = resolve(&mut ast).unwrap_err();
    assert!(format!("{err}").contains("external"));
}

#[test]
fn overlapping_origins_are_rejected() {
    let mut ast = parse(
        ".bin\n.org 0\n.section text\nmain:\n  halt\n.org 2\n.section text\nother:\n  halt\n",
    );
    assert!(resolve(&mut ast).is_err());
}

#[test]
fn mov_diff_over_16_bits_is_a_range_error() {
    let mut source = String::from(".bin\n.org 0\n.section text\nmain:\n  mov r0, data\n  halt\n.section data\n.org 0x12400\n");
    source.push_str("data: .int 1\n");
    let mut ast = parse(&source);
    assert!(resolve(&mut ast).is_err());
}
