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

use super::parse_source;
use crate::ast::{Ast, FileKind, Operand, SectionKind, Statement};
use crate::errors::AssemblyError;
use crate::file_reader::MockFileReader;
use crate::lexer::Lexer;
use std::collections::HashSet;
use std::path::Path;

fn parse(source: &str) -> Result<Ast, AssemblyError> {
    let mut lexer = Lexer::new(source);
    let reader = MockFileReader::default();
    let mut seen = HashSet::new();
    parse_source(&mut lexer, false, Path::new("."), &reader, &mut seen)
}

#[test]
fn bin_file_accepts_an_explicit_org() {
    let ast = parse(".bin\n.org 0x100\n.section text\nmain:\n  halt\n").unwrap();
    assert_eq!(ast.orgs.len(), 1);
    assert_eq!(ast.orgs[0].base, 0x100);
    assert!(!ast.orgs[0].pic);
}

#[test]
fn org_outside_bin_is_rejected() {
    let err = parse(".library\n.org 0x100\n").unwrap_err();
    assert!(matches!(err, AssemblyError::Semantic { .. }));
}

#[test]
fn program_and_library_get_an_implicit_pic_origin() {
    let ast = parse(".program start\n.section text\nstart:\n  halt\n").unwrap();
    assert_eq!(ast.orgs.len(), 1);
    assert!(ast.orgs[0].pic);
    assert_eq!(ast.orgs[0].base, 0);
    assert_eq!(ast.file_kind, FileKind::Program { entry: "start".into() });
}

#[test]
fn a_new_label_with_no_prior_statements_reuses_the_block() {
    let ast = parse(".bin\n.org 0\n.section data\nfoo:\nbar:\n.int 1\n").unwrap();
    let section = &ast.orgs[0].sections[0];
    // "foo:" is immediately followed by "bar:" with no statements in between,
    // so the block is reused and only ends up labeled "bar".
    assert_eq!(section.blocks.len(), 1);
    assert_eq!(section.blocks[0].label.as_deref(), Some("bar"));
}

#[test]
fn a_label_after_statements_pushes_a_new_block() {
    let ast = parse(".bin\n.org 0\n.section data\nfoo:\n.int 1\nbar:\n.int 2\n").unwrap();
    let section = &ast.orgs[0].sections[0];
    assert_eq!(section.blocks.len(), 2);
    assert_eq!(section.blocks[0].label.as_deref(), Some("foo"));
    assert_eq!(section.blocks[1].label.as_deref(), Some("bar"));
}

#[test]
fn function_nesting_is_rejected() {
    let err = parse(".bin\n.org 0\n.section text\n@func a:\n@func b:\n  halt\n@endf b\n@endf a\n").unwrap_err();
    assert!(matches!(err, AssemblyError::Semantic { .. }));
}

#[test]
fn endf_name_mismatch_is_rejected() {
    let err = parse(".bin\n.org 0\n.section text\n@func a:\n  halt\n@endf b\n").unwrap_err();
    assert!(matches!(err, AssemblyError::Semantic { .. }));
}

#[test]
fn function_ending_on_call_is_rejected() {
    let err = parse(".bin\n.org 0\n.section text\n@func a:\n  call a\n@endf a\n").unwrap_err();
    assert!(matches!(err, AssemblyError::Semantic { .. }));
}

#[test]
fn function_ending_on_ret_is_accepted() {
    let ast = parse(".bin\n.org 0\n.section text\n@func a:\n  ret\n@endf a\n").unwrap();
    assert_eq!(ast.orgs[0].sections[0].blocks[0].func_name.as_deref(), Some("a"));
}

#[test]
fn empty_function_body_is_rejected() {
    let err = parse(".bin\n.org 0\n.section text\n@func a:\n@endf a\n").unwrap_err();
    assert!(matches!(err, AssemblyError::Semantic { .. }));
}

#[test]
fn equ_redefinition_is_rejected() {
    let err = parse(".bin\n.org 0\n.section data\n.equ K 1\n.equ K 2\n").unwrap_err();
    assert!(matches!(err, AssemblyError::Semantic { .. }));
}

#[test]
fn bracket_operand_with_one_register_counts_as_one_operand() {
    let ast = parse(".bin\n.org 0\n.section text\nmain:\n  ldr r0, [r1]\n").unwrap();
    let Statement::Instruction { instruction, .. } = &ast.orgs[0].sections[0].blocks[0].statements[0] else {
        panic!("expected an instruction");
    };
    assert_eq!(instruction.operands, vec![Operand::Reg(0), Operand::Reg(1)]);
}

#[test]
fn bracket_operand_with_two_values_counts_as_two_operands() {
    let ast = parse(".bin\n.org 0\n.section text\nmain:\n  ldri r0, r1, 4\n").unwrap();
    let Statement::Instruction { instruction, .. } = &ast.orgs[0].sections[0].blocks[0].statements[0] else {
        panic!("expected an instruction");
    };
    assert_eq!(instruction.operands, vec![Operand::Reg(0), Operand::Reg(1), Operand::Immediate(4)]);
}

#[test]
fn include_alias_colliding_with_a_constant_is_rejected() {
    let mut reader = MockFileReader::default();
    reader.add_file("lib.asm", ".library\n.section text\nf:\n  ret\n");
    let mut lexer = Lexer::new(".bin\n.org 0\n.section data\n.equ K 1\n.include \"lib.asm\" as K\n");
    let mut seen = HashSet::new();
    let err = parse_source(&mut lexer, false, Path::new("."), &reader, &mut seen).unwrap_err();
    assert!(matches!(err, AssemblyError::Semantic { .. }));
}

#[test]
fn include_splices_sections_and_tags_them_with_the_alias() {
    let mut reader = MockFileReader::default();
    reader.add_file("lib.asm", ".library\n.section text\nhelper:\n  ret\n");
    let mut lexer = Lexer::new(".bin\n.org 0\n.include \"lib.asm\" as lib\n.section text\nmain:\n  halt\n");
    let mut seen = HashSet::new();
    let ast = parse_source(&mut lexer, false, Path::new("."), &reader, &mut seen).unwrap();
    assert_eq!(ast.includes.get("lib"), Some(&std::path::PathBuf::from("lib.asm")));
    let spliced = ast.orgs[0]
        .sections
        .iter()
        .find(|s| s.include_name.as_deref() == Some("lib"))
        .expect("spliced section with include tag");
    assert_eq!(spliced.kind, SectionKind::Text);
}

#[test]
fn including_a_non_library_file_is_rejected() {
    let mut reader = MockFileReader::default();
    reader.add_file("lib.asm", ".bin\n.org 0\n.section text\nf:\n  ret\n");
    let mut lexer = Lexer::new(".bin\n.org 0\n.include \"lib.asm\" as lib\n");
    let mut seen = HashSet::new();
    let err = parse_source(&mut lexer, false, Path::new("."), &reader, &mut seen).unwrap_err();
    assert!(matches!(err, AssemblyError::Semantic { .. }));
}

#[test]
fn an_include_cycle_is_rejected() {
    let mut reader = MockFileReader::default();
    reader.add_file("a.asm", ".library\n.include \"b.asm\" as b\n");
    reader.add_file("b.asm", ".library\n.include \"a.asm\" as a\n");
    let mut lexer = Lexer::new(".bin\n.org 0\n.include \"a.asm\" as a\n");
    let mut seen = HashSet::new();
    let err = parse_source(&mut lexer, false, Path::new("."), &reader, &mut seen).unwrap_err();
    assert!(matches!(err, AssemblyError::Semantic { .. }));
    assert!(err.to_string().contains("circular"));
}

#[test]
fn embed_produces_a_single_data_blob_statement() {
    let mut reader = MockFileReader::default();
    reader.add_binary_file("payload.bin", &[1, 2, 3, 4, 5]);
    let mut lexer = Lexer::new(".bin\n.org 0\n.embed \"payload.bin\"\n");
    let mut seen = HashSet::new();
    let ast = parse_source(&mut lexer, false, Path::new("."), &reader, &mut seen).unwrap();
    let section = &ast.orgs[0].sections[0];
    assert_eq!(section.kind, SectionKind::Embed);
    assert_eq!(section.embed_path, Some(std::path::PathBuf::from("payload.bin")));
    match &section.blocks[0].statements[0] {
        Statement::DataBlob { bytes, .. } => assert_eq!(bytes, &vec![1, 2, 3, 4, 5]),
        other => panic!("expected a data blob, got {:?}", other),
    }
}
