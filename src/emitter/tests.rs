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

use super::emit;
use crate::ast::Ast;
use crate::file_reader::MockFileReader;
use crate::lexer::Lexer;
use crate::parser::parse_source;
use crate::resolver::resolve;
use std::collections::HashSet;
use std::path::Path;

fn assemble(source: &str) -> Vec<u8> {
    let mut lexer = Lexer::new(source);
    let reader = MockFileReader::default();
    let mut seen = HashSet::new();
    let mut ast: Ast = parse_source(&mut lexer, false, Path::new("."), &reader, &mut seen).unwrap();
    resolve(&mut ast).unwrap();
    emit(&ast).unwrap()
}

#[test]
fn minimal_halt_program_matches_the_documented_bytes() {
    let bytes = assemble(".bin\n.org 0x0\n.section text\nmain:\n  halt\n");
    assert_eq!(&bytes[0..8], b"s1987gvm");
    assert_eq!(&bytes[8..], &[0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]);
}

#[test]
fn absolute_jump_matches_the_documented_bytes() {
    let bytes = assemble(".bin\n.org 0x0\n.section text\nmain:\n  jmp end\nend:\n  halt\n");
    let payload = &bytes[16..];
    assert_eq!(payload, &[0x15, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]);
}

#[test]
fn string_data_matches_the_documented_bytes() {
    let bytes = assemble(".bin\n.org 0x0\n.section data\ns: .str \"Hi\"\n");
    let payload = &bytes[16..];
    assert_eq!(payload, &[0x48, 0x00, 0x69, 0x00, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn program_files_use_the_pic_magic_and_a_single_origin() {
    let bytes = assemble(".program main\n.section text\nmain:\n  halt\n");
    assert_eq!(&bytes[0..8], b"PIC87gvm");
    assert_eq!(&bytes[8..12], &0u32.to_le_bytes());
}

#[test]
fn total_byte_count_matches_the_universal_invariant() {
    let bytes = assemble(
        ".bin\n.org 0\n.section text\nmain:\n  halt\n.org 0x40\n.section text\nother:\n  nop\n  nop\n",
    );
    // 8 (magic) + 2 * 8 (per-origin header) + 1*4 + 2*4 (payloads)
    assert_eq!(bytes.len(), 8 + 8 + 4 + 8 + 8);
}

#[test]
fn unresolved_external_reference_is_rejected_at_emit_time() {
    let mut lexer = Lexer::new(".bin\n.org 0\n.section text\nmain:\n  jmp other.label\n");
    let reader = MockFileReader::default();
    let mut seen = HashSet::new();
    let mut ast = parse_source(&mut lexer, false, Path::new("."), &reader, &mut seen).unwrap();
    assert!(resolve(&mut ast).is_err());
}
