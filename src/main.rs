/*
Copyright 2025 The triasm authors

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

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as clap_parser;
use triasm::assemble;
use triasm::file_reader::TriFileReader;

/// Tri-DSL to flat binary translator. Takes exactly one positional
/// argument, the DSL source path; the output is always `out.bin` in the
/// current working directory (spec.md §6: no flags, no environment
/// variables).
#[derive(clap_parser)]
#[clap(version = "0.1.0", author = "The triasm authors")]
struct Opts {
    /// Path to the DSL source file.
    source: PathBuf,
}

const OUTPUT_PATH: &str = "out.bin";

fn main() -> Result<()> {
    let opts: Opts = Opts::parse();
    let reader = TriFileReader;

    let mut out = File::create(OUTPUT_PATH)
        .with_context(|| format!("cannot create output file '{}'", OUTPUT_PATH))?;

    assemble(&opts.source, &reader, &mut out)?;

    println!("Successfully assembled {} to {}", opts.source.display(), OUTPUT_PATH);

    Ok(())
}
