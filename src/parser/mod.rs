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

mod data;
mod directive;
mod instruction;
mod operand;
mod utility_functions;

#[cfg(test)]
mod tests;

use crate::ast::{Ast, FileKind, Org, Section, SectionKind};
use crate::errors::AssemblyError;
use crate::file_reader::FileReader;
use crate::lexer::{Token, TokenKind, Tokenizer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// State tracked while a text section's function scope is open. Nesting is
/// forbidden (section 4.2), so only one of these can exist at a time.
struct OpenFunc {
    name: String,
    exported: bool,
    statement_count: usize,
    last_mnemonic: Option<crate::ast::Mnemonic>,
}

/// Recursive-descent parser over a `Tokenizer`. One `Parser` handles one
/// translation unit; `.include` spawns a nested `Parser` over a fresh
/// `Lexer` and splices its result in (section 4.2, "Include handling").
pub struct Parser<'a, T: Tokenizer> {
    tok: &'a mut T,
    ast: Ast,
    open_func: Option<OpenFunc>,
    base_dir: PathBuf,
    reader: &'a dyn FileReader,
    include_stack: &'a mut HashSet<PathBuf>,
}

impl<'a, T: Tokenizer> Parser<'a, T> {
    fn new(
        tok: &'a mut T,
        file_kind: FileKind,
        base_dir: PathBuf,
        reader: &'a dyn FileReader,
        include_stack: &'a mut HashSet<PathBuf>,
    ) -> Self {
        let hash = tok.hash();
        Parser {
            tok,
            ast: Ast::new(file_kind, hash),
            open_func: None,
            base_dir,
            reader,
            include_stack,
        }
    }

    fn line(&self) -> usize {
        self.tok.line()
    }

    fn peek(&mut self) -> Result<Token, AssemblyError> {
        self.tok.peek()
    }

    fn advance(&mut self) -> Result<Token, AssemblyError> {
        self.tok.next()
    }

    /// Current origin, i.e. the one sections/includes/embeds attach to.
    fn current_org_mut(&mut self) -> Result<&mut Org, AssemblyError> {
        let line = self.line();
        self.ast
            .orgs
            .last_mut()
            .ok_or_else(|| AssemblyError::semantic(line, "no active .org to attach a section to"))
    }

    /// Current section, i.e. the one data/text entries attach to.
    fn current_section_mut(&mut self) -> Result<&mut Section, AssemblyError> {
        let line = self.line();
        self.current_org_mut()?
            .sections
            .last_mut()
            .ok_or_else(|| AssemblyError::semantic(line, "no active .section to attach an entry to"))
    }

    /// Skips newlines between top-level items; these carry no meaning
    /// outside of a block's statement stream.
    fn skip_newlines(&mut self) -> Result<(), AssemblyError> {
        while self.peek()?.kind == TokenKind::Newline {
            self.advance()?;
        }
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, AssemblyError> {
        let tok = self.advance()?;
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(AssemblyError::syntax(
                tok.line,
                format!("expected {}, got {:?}", what, tok.kind),
            ))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<(String, usize), AssemblyError> {
        let tok = self.advance()?;
        match tok.kind {
            TokenKind::Ident(name) => Ok((name, tok.line)),
            other => Err(AssemblyError::syntax(
                tok.line,
                format!("expected {}, got {:?}", what, other),
            )),
        }
    }

    fn expect_number(&mut self, what: &str) -> Result<(i64, usize), AssemblyError> {
        let tok = self.advance()?;
        match tok.kind {
            TokenKind::Number(n) => Ok((n, tok.line)),
            other => Err(AssemblyError::syntax(
                tok.line,
                format!("expected {}, got {:?}", what, other),
            )),
        }
    }

    fn expect_string(&mut self, what: &str) -> Result<(String, usize), AssemblyError> {
        let tok = self.advance()?;
        match tok.kind {
            TokenKind::StringLiteral(s) => Ok((s, tok.line)),
            other => Err(AssemblyError::syntax(
                tok.line,
                format!("expected {}, got {:?}", what, other),
            )),
        }
    }

    fn parse_file_kind(&mut self) -> Result<FileKind, AssemblyError> {
        let tok = self.advance()?;
        match tok.kind {
            TokenKind::KwBin => Ok(FileKind::Bin),
            TokenKind::KwProgram => {
                let (entry, _) = self.expect_ident("a program entry label")?;
                Ok(FileKind::Program { entry })
            }
            TokenKind::KwLibrary => Ok(FileKind::Library),
            other => Err(AssemblyError::syntax(
                tok.line,
                format!("expected .bin, .program, or .library, got {:?}", other),
            )),
        }
    }

    fn run(mut self, require_library: bool) -> Result<Ast, AssemblyError> {
        let file_kind = self.parse_file_kind()?;
        if require_library && !matches!(file_kind, FileKind::Library) {
            return Err(AssemblyError::semantic(
                self.line(),
                "an included file must declare .library",
            ));
        }
        self.ast.file_kind = file_kind;
        if !matches!(self.ast.file_kind, FileKind::Bin) {
            self.ast.orgs.push(Org::new(0, true));
        }
        self.skip_newlines()?;

        loop {
            let tok = self.peek()?;
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Newline => {
                    self.advance()?;
                }
                TokenKind::KwOrg => self.parse_org()?,
                TokenKind::KwSection => self.parse_section()?,
                TokenKind::KwInclude => self.parse_include()?,
                TokenKind::KwEmbed => self.parse_embed()?,
                other => {
                    return Err(AssemblyError::syntax(
                        tok.line,
                        format!("unexpected {:?} at top level", other),
                    ));
                }
            }
        }

        if let Some(open) = &self.open_func {
            return Err(AssemblyError::semantic(
                self.line(),
                format!("function {:?} was never closed with @endf", open.name),
            ));
        }

        Ok(self.ast)
    }

    fn parse_org(&mut self) -> Result<(), AssemblyError> {
        if matches!(self.ast.file_kind, FileKind::Bin) {
            self.expect(TokenKind::KwOrg, ".org")?;
            let (addr, line) = self.expect_number("an origin address")?;
            if addr < 0 {
                return Err(AssemblyError::range(line, "origin address cannot be negative"));
            }
            self.ast.orgs.push(Org::new(addr as u32, false));
            Ok(())
        } else {
            Err(AssemblyError::semantic(
                self.line(),
                ".org is only legal in a .bin file",
            ))
        }
    }

    fn parse_section(&mut self) -> Result<(), AssemblyError> {
        self.expect(TokenKind::KwSection, ".section")?;
        let tok = self.advance()?;
        let kind = match tok.kind {
            TokenKind::KwData => SectionKind::Data,
            TokenKind::KwText => SectionKind::Text,
            other => {
                return Err(AssemblyError::syntax(
                    tok.line,
                    format!("expected data or text, got {:?}", other),
                ));
            }
        };
        self.current_org_mut()?.sections.push(Section::new(kind));
        self.skip_newlines()?;

        loop {
            let tok = self.peek()?;
            match tok.kind {
                TokenKind::KwOrg
                | TokenKind::KwSection
                | TokenKind::KwInclude
                | TokenKind::KwEmbed
                | TokenKind::Eof => break,
                TokenKind::Newline => {
                    self.advance()?;
                }
                _ => match kind {
                    SectionKind::Data => self.parse_data_entry()?,
                    SectionKind::Text => self.parse_text_entry()?,
                    _ => unreachable!(),
                },
            }
        }
        Ok(())
    }
}

pub(crate) fn reuse_or_push_label(
    section: &mut Section,
    label: String,
    in_func: bool,
    func_name: Option<String>,
    exported: bool,
) -> &mut crate::ast::Block {
    let needs_new = match section.blocks.last() {
        Some(b) => !b.statements.is_empty() || b.label.is_some(),
        None => true,
    };
    if needs_new {
        section.blocks.push(crate::ast::Block {
            label: Some(label),
            in_func,
            func_name,
            exported,
            statements: Vec::new(),
        });
    } else {
        let b = section.blocks.last_mut().unwrap();
        b.label = Some(label);
        b.in_func = in_func;
        b.func_name = func_name;
        b.exported = exported;
    }
    section.blocks.last_mut().unwrap()
}

pub(crate) fn current_block(section: &mut Section) -> &mut crate::ast::Block {
    if section.blocks.is_empty() {
        section.blocks.push(crate::ast::Block::default());
    }
    section.blocks.last_mut().unwrap()
}

/// Parses a single translation unit's source text into an `Ast`, recursing
/// into `.include`d libraries as they're encountered. `base_dir` is the
/// directory relative paths (`.include`/`.embed`) are joined against —
/// threaded explicitly rather than chasing the process's working directory.
pub fn parse_source<T: Tokenizer>(
    tok: &mut T,
    require_library: bool,
    base_dir: &Path,
    reader: &dyn FileReader,
    include_stack: &mut HashSet<PathBuf>,
) -> Result<Ast, AssemblyError> {
    let parser = Parser::new(tok, FileKind::Bin, base_dir.to_path_buf(), reader, include_stack);
    parser.run(require_library)
}
