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

pub mod ast;
pub mod emitter;
pub mod encoder;
pub mod errors;
pub mod file_reader;
pub mod lexer;
pub mod parser;
pub mod resolver;

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use file_reader::FileReader;
use lexer::Lexer;

/// The single entry point the CLI (or any other caller) drives: reads the
/// whole of `source`, runs it through lex/parse/resolve/encode/emit, and
/// writes the resulting binary image to `output`.
///
/// `require_library` mirrors the parser's include-time check: set it when
/// `source` is itself meant to be included elsewhere (section 4.2), so a
/// `.bin`/`.program` file fails fast instead of producing an image nobody
/// asked for.
pub fn assemble<R: Read, W: Write, F: FileReader>(
    mut source: R,
    require_library: bool,
    base_dir: &Path,
    reader: &F,
    mut output: W,
) -> Result<()> {
    let mut text = String::new();
    source.read_to_string(&mut text).context("failed to read assembly source")?;

    let mut lexer = Lexer::new(&text);
    let mut include_stack: HashSet<_> = HashSet::new();

    let mut ast = parser::parse_source(&mut lexer, require_library, base_dir, reader, &mut include_stack)
        .context("failed during parsing")?;

    resolver::resolve(&mut ast).context("failed during symbol resolution")?;

    let bytes = emitter::emit(&ast).context("failed during encoding/emission")?;

    output.write_all(&bytes).context("failed to write output")?;
    Ok(())
}
