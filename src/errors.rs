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

use thiserror::Error;

/// The complete diagnostic surface of the translator.
///
/// `Located` covers every error traceable to a DSL source line (Syntax,
/// Borrow, Scope, Immediate, Label and Unknown-directive errors). The
/// other variants have no line to cite — opening the input, creating the
/// output, and the source sequence overflowing before the offending line
/// has a slot in the retained sequence to reference.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("cannot open source '{path}': {source}")]
    OpenSource {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create output file '{path}': {source}")]
    CreateOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("write to output file failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("{reason}")]
    Capacity { reason: String },

    #[error("Error at source line {line}: {reason}\n    {text}\n")]
    Located {
        line: usize,
        text: String,
        reason: String,
    },
}

impl AssemblyError {
    pub fn located(line: usize, text: impl Into<String>, reason: impl Into<String>) -> Self {
        AssemblyError::Located {
            line,
            text: text.into(),
            reason: reason.into(),
        }
    }
}
