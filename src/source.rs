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

use crate::errors::AssemblyError;
use crate::file_reader::FileReader;
use std::path::Path;

/// Maximum number of DSL lines retained after comment/blank filtering.
pub const MAX_SOURCE_LINES: usize = 512;

/// Maximum visible bytes in a single retained line.
pub const MAX_LINE_BYTES: usize = 79;

/// Read the DSL source, trim each line, and drop blanks and `;` comments.
///
/// Lines are indexed from zero in the returned vector; that index is the
/// "source line" every later diagnostic is ultimately expressed in terms
/// of (printed as `index + 1`).
pub fn load(path: &Path, reader: &impl FileReader) -> Result<Vec<String>, AssemblyError> {
    let contents = reader
        .read_to_string(path)
        .map_err(|source| AssemblyError::OpenSource {
            path: path.display().to_string(),
            source,
        })?;

    let mut lines = Vec::new();
    for raw in contents.lines() {
        let trimmed = raw.trim_matches(|c: char| c == ' ' || c == '\t' || c == '\r');
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }
        if trimmed.len() > MAX_LINE_BYTES {
            return Err(AssemblyError::Capacity {
                reason: format!(
                    "source line too long (> {} bytes): '{}'",
                    MAX_LINE_BYTES, trimmed
                ),
            });
        }
        if lines.len() >= MAX_SOURCE_LINES {
            return Err(AssemblyError::Capacity {
                reason: format!("too many source lines (> {})", MAX_SOURCE_LINES),
            });
        }
        lines.push(trimmed.to_string());
    }

    Ok(lines)
}
