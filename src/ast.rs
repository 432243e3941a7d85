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

use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level declaration a source file must open with.
#[derive(Debug, Clone, PartialEq)]
pub enum FileKind {
    Bin,
    Program { entry: String },
    Library,
}

/// The parsed representation of one translation unit, including anything
/// spliced in from `.include`d libraries.
#[derive(Debug, Clone)]
pub struct Ast {
    pub file_kind: FileKind,
    /// include alias -> resolved file path
    pub includes: HashMap<String, PathBuf>,
    /// `.equ` constant name -> literal value
    pub constants: HashMap<String, i32>,
    pub orgs: Vec<Org>,
    /// hex-encoded MD5 of the full source stream, from `Lexer::hash`.
    pub hash: String,
}

impl Ast {
    pub fn new(file_kind: FileKind, hash: String) -> Self {
        Ast {
            file_kind,
            includes: HashMap::new(),
            constants: HashMap::new(),
            orgs: Vec::new(),
            hash,
        }
    }
}

/// A contiguous memory origin: `.org ADDR` in `.bin` files, or the single
/// implicit PIC origin at address 0 for `.program`/`.library` files.
#[derive(Debug, Clone)]
pub struct Org {
    pub base: u32,
    pub pic: bool,
    pub sections: Vec<Section>,
}

impl Org {
    pub fn new(base: u32, pic: bool) -> Self {
        Org { base, pic, sections: Vec::new() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Data,
    Text,
    Embed,
    Include,
}

#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    /// the name under which this section's labels are externally qualified,
    /// set when the section was spliced in from an `.include`.
    pub include_name: Option<String>,
    /// set only for `SectionKind::Embed`.
    pub embed_path: Option<PathBuf>,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Section { kind, include_name: None, embed_path: None, blocks: Vec::new() }
    }
}

/// A maximal run of statements sharing a single optional label and function
/// context.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub label: Option<String>,
    pub in_func: bool,
    pub func_name: Option<String>,
    pub exported: bool,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Instruction { line: usize, instruction: Instruction, resolve_reference: bool },
    DataWord { line: usize, value: i32 },
    DataLabelRef { line: usize, label: String },
    DataArray { line: usize, byte_count: u32 },
    DataString { line: usize, text: String },
    DataBlob { line: usize, bytes: Vec<u8> },
}

impl Statement {
    pub fn line(&self) -> usize {
        match self {
            Statement::Instruction { line, .. }
            | Statement::DataWord { line, .. }
            | Statement::DataLabelRef { line, .. }
            | Statement::DataArray { line, .. }
            | Statement::DataString { line, .. }
            | Statement::DataBlob { line, .. } => *line,
        }
    }

    /// Number of 32-bit words this statement contributes to `word_count`
    /// during address assignment (spec Resolver Pass A).
    pub fn word_count(&self) -> u32 {
        match self {
            Statement::Instruction { .. } => 1,
            Statement::DataWord { .. } => 1,
            Statement::DataLabelRef { .. } => 1,
            Statement::DataArray { byte_count, .. } => byte_count.div_ceil(4),
            Statement::DataString { text, .. } => {
                let byte_count = 2 * (text.chars().count() as u32 + 1);
                byte_count.div_ceil(4)
            }
            Statement::DataBlob { bytes, .. } => (bytes.len() as u32).div_ceil(4),
        }
    }
}

/// An operand in its final, encoder-ready shape. `Label` and `External` are
/// transient: the resolver rewrites every one of them into `Reg`,
/// `Immediate`, or `Diff` before the encoder ever sees the statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Reg(u8),
    Immediate(i32),
    Diff(i32),
    Label(String),
    External(String),
}

impl Operand {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Operand::Label(_) | Operand::External(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub operands: Vec<Operand>,
}

macro_rules! mnemonics {
    ($($variant:ident => $text:literal, $arity:literal);* $(;)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Mnemonic {
            $($variant),*
        }

        impl Mnemonic {
            pub fn from_str(s: &str) -> Option<Mnemonic> {
                match s {
                    $($text => Some(Mnemonic::$variant),)*
                    _ => None,
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Mnemonic::$variant => $text),*
                }
            }

            /// Number of source operands the parser must collect for this
            /// mnemonic (spec Mnemonic arity table, section 6).
            pub fn arity(&self) -> usize {
                match self {
                    $(Mnemonic::$variant => $arity),*
                }
            }
        }
    };
}

mnemonics! {
    Nop => "nop", 0;
    Ret => "ret", 0;
    Halt => "halt", 0;
    Wfi => "wfi", 0;
    Jmp => "jmp", 1;
    Call => "call", 1;
    Mov => "mov", 2;
    Ldr => "ldr", 2;
    Str => "str", 2;
    Jeq => "jeq", 2;
    Jne => "jne", 2;
    Jlt => "jlt", 2;
    Jle => "jle", 2;
    Jgt => "jgt", 2;
    Jge => "jge", 2;
    Add => "add", 3;
    Sub => "sub", 3;
    And => "and", 3;
    Orr => "orr", 3;
    Xor => "xor", 3;
    Lsl => "lsl", 3;
    Lsr => "lsr", 3;
    Asr => "asr", 3;
    Mul => "mul", 3;
    Div => "div", 3;
    Ldri => "ldri", 3;
    Ldrpi => "ldrpi", 3;
    Ldrip => "ldrip", 3;
    Stri => "stri", 3;
    Strpi => "strpi", 3;
    Strip => "strip", 3;
    Ldppi => "ldppi", 4;
    Ldpip => "ldpip", 4;
    Stppi => "stppi", 4;
    Stpip => "stpip", 4;
}

impl Mnemonic {
    /// Branch/call mnemonics are always PC-relative (spec section 4.3).
    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            Mnemonic::Jmp
                | Mnemonic::Jeq
                | Mnemonic::Jne
                | Mnemonic::Jgt
                | Mnemonic::Jge
                | Mnemonic::Jlt
                | Mnemonic::Jle
                | Mnemonic::Call
        )
    }
}
