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
use crate::ast::{Block, Section, SectionKind, Statement};
use crate::errors::AssemblyError;
use crate::lexer::{Lexer, TokenKind, Tokenizer};
use std::path::{Component, PathBuf};

impl<'a, T: Tokenizer> Parser<'a, T> {
    /// `.include "path" as NAME` — parses the named file recursively
    /// (requiring `.library`), then splices its single origin's sections
    /// into the current origin, tagged with `NAME` (section 4.2, "Include
    /// handling").
    pub(super) fn parse_include(&mut self) -> Result<(), AssemblyError> {
        let line = self.line();
        self.expect(TokenKind::KwInclude, ".include")?;
        let (path_lit, _) = self.expect_string("an include path")?;
        self.expect(TokenKind::KwAs, "as")?;
        let (name, _) = self.expect_ident("an include alias")?;

        if self.ast.includes.contains_key(&name) || self.ast.constants.contains_key(&name) {
            return Err(AssemblyError::semantic(
                line,
                format!("include alias {:?} collides with an existing name", name),
            ));
        }

        let resolved = normalize_lexical(&self.base_dir.join(&path_lit));
        let canonical = canonicalize_best_effort(&resolved);
        if !self.include_stack.insert(canonical.clone()) {
            return Err(AssemblyError::semantic(
                line,
                format!("circular .include of {:?}", resolved.display()),
            ));
        }

        let source = self
            .reader
            .read_to_string(&resolved)
            .map_err(|e| AssemblyError::io(format!("cannot read {:?}: {e}", resolved.display())))?;

        let nested_base = resolved.parent().map(PathBuf::from).unwrap_or_else(|| self.base_dir.clone());
        let mut nested_lexer = Lexer::new(&source);
        let nested = super::parse_source(
            &mut nested_lexer,
            true,
            &nested_base,
            self.reader,
            self.include_stack,
        );

        self.include_stack.remove(&canonical);
        let mut sub_ast = nested?;

        self.ast.includes.insert(name.clone(), resolved);

        if let Some(sub_org) = sub_ast.orgs.first_mut() {
            for section in sub_org.sections.drain(..) {
                let mut section = section;
                if section.include_name.is_none() {
                    section.include_name = Some(name.clone());
                }
                self.current_org_mut()?.sections.push(section);
            }
        }
        Ok(())
    }

    /// `.embed "path"` — reads the file whole and stores it as a single
    /// unlabeled `DataBlob` statement in its own section.
    pub(super) fn parse_embed(&mut self) -> Result<(), AssemblyError> {
        let line = self.line();
        self.expect(TokenKind::KwEmbed, ".embed")?;
        let (path_lit, _) = self.expect_string("an embed path")?;
        let resolved = normalize_lexical(&self.base_dir.join(&path_lit));
        let bytes = self
            .reader
            .read_binary(&resolved)
            .map_err(|e| AssemblyError::io(format!("cannot read {:?}: {e}", resolved.display())))?;

        let mut section = Section::new(SectionKind::Embed);
        section.embed_path = Some(resolved);
        section.blocks.push(Block {
            statements: vec![Statement::DataBlob { line, bytes }],
            ..Block::default()
        });
        self.current_org_mut()?.sections.push(section);
        Ok(())
    }
}

/// Strips `.` components and resolves `..` lexically, without touching the
/// filesystem. `base_dir.join(path_lit)` leaves a leading `"./"` whenever
/// `base_dir` is `"."` (the default every caller uses), and that un-
/// normalized form would otherwise mismatch both `MockFileReader`'s
/// `HashMap<PathBuf, _>` keys and the `include_stack` cycle-detection set.
fn normalize_lexical(path: &std::path::Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalizes when possible; falls back to the lexically normalized
/// path so cycle detection still works against files that don't exist yet
/// at parse time in tests backed by a `MockFileReader`.
fn canonicalize_best_effort(path: &std::path::Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
