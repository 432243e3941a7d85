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

use thiserror::Error;

/// Every error the assembler can raise. Each variant carries the 1-based
/// source line at fault so callers can print `line N: ...` without any
/// extra bookkeeping. Fail-fast: the first error encountered aborts the
/// whole pipeline, there is no partial recovery.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssemblyError {
    #[error("line {line}: {reason}")]
    Lexical { line: usize, reason: String },

    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    #[error("line {line}: {reason}")]
    Semantic { line: usize, reason: String },

    #[error("line {line}: {reason}")]
    Resolution { line: usize, reason: String },

    #[error("line {line}: {reason}")]
    Range { line: usize, reason: String },

    #[error("line {line}: {reason}")]
    Shape { line: usize, reason: String },

    #[error("{reason}")]
    Io { reason: String },
}

impl AssemblyError {
    pub fn lexical(line: usize, reason: impl Into<String>) -> Self {
        AssemblyError::Lexical { line, reason: reason.into() }
    }

    pub fn syntax(line: usize, reason: impl Into<String>) -> Self {
        AssemblyError::Syntax { line, reason: reason.into() }
    }

    pub fn semantic(line: usize, reason: impl Into<String>) -> Self {
        AssemblyError::Semantic { line, reason: reason.into() }
    }

    pub fn resolution(line: usize, reason: impl Into<String>) -> Self {
        AssemblyError::Resolution { line, reason: reason.into() }
    }

    pub fn range(line: usize, reason: impl Into<String>) -> Self {
        AssemblyError::Range { line, reason: reason.into() }
    }

    pub fn shape(line: usize, reason: impl Into<String>) -> Self {
        AssemblyError::Shape { line, reason: reason.into() }
    }

    pub fn io(reason: impl Into<String>) -> Self {
        AssemblyError::Io { reason: reason.into() }
    }
}
