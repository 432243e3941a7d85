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

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use gvmasm::assemble;
use gvmasm::file_reader::AsmFileReader;
use std::fs::File;
use std::path::PathBuf;

#[derive(ClapParser)]
#[clap(version, author = "Connor Nolan", about = "gvm two-pass assembler")]
struct Opts {
    /// assembly source file
    input: PathBuf,

    /// destination for the assembled binary image
    #[clap(short, long)]
    output: PathBuf,

    /// require the source to declare `.library` (the same check the
    /// parser applies when a file is reached via `.include`)
    #[clap(long)]
    require_library: bool,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let source = File::open(&opts.input)
        .with_context(|| format!("failed to open input file: {}", opts.input.display()))?;
    let base_dir = opts.input.parent().map(|p| p.to_path_buf()).unwrap_or_else(|| PathBuf::from("."));
    let output = File::create(&opts.output)
        .with_context(|| format!("failed to create output file: {}", opts.output.display()))?;

    let reader = AsmFileReader;
    assemble(source, opts.require_library, &base_dir, &reader, output)?;

    println!("assembled {} to {}", opts.input.display(), opts.output.display());
    Ok(())
}
