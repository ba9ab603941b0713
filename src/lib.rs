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

pub mod assembler;
pub mod errors;
pub mod file_reader;
pub mod immediate;
pub mod lowering;
pub mod source;

use std::io::{Seek, Write};
use std::path::Path;

use anyhow::{Context, Result};
use file_reader::FileReader;

/// Run the full pipeline — load, lower, size, emit — writing the flat
/// binary image to `out`.
pub fn assemble<F: FileReader, W: Write + Seek>(
    source_path: &Path,
    reader: &F,
    out: &mut W,
) -> Result<()> {
    let lines = source::load(source_path, reader).context("failed during source load")?;

    let lowered = lowering::lower(&lines).context("failed during lowering pass")?;

    let sized = assembler::sizer::size(&lowered).context("failed during sizing pass")?;

    assembler::emitter::emit(&sized.lines, &sized.labels, out)
        .context("failed during code emission")?;

    Ok(())
}
