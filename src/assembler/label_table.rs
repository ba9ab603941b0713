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
use std::collections::HashMap;

pub const MAX_LABELS: usize = 128;
pub const MAX_LABEL_NAME_BYTES: usize = 15;

/// Write-once label-to-address table, shared structurally by the sizer
/// (which populates it) and the emitter (which only reads it).
#[derive(Default)]
pub struct LabelTable {
    addresses: HashMap<String, u32>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str, address: u32, line: usize) -> Result<(), AssemblyError> {
        if name.len() > MAX_LABEL_NAME_BYTES {
            return Err(AssemblyError::located(
                line,
                format!("{}:", name),
                format!("label name exceeds {} bytes", MAX_LABEL_NAME_BYTES),
            ));
        }
        if self.addresses.contains_key(name) {
            return Err(AssemblyError::located(
                line,
                format!("{}:", name),
                format!("duplicate label definition: {}", name),
            ));
        }
        if self.addresses.len() >= MAX_LABELS {
            return Err(AssemblyError::Capacity {
                reason: format!("too many labels (> {})", MAX_LABELS),
            });
        }
        self.addresses.insert(name.to_string(), address);
        Ok(())
    }

    pub fn lookup(&self, name: &str, line: usize) -> Result<u32, AssemblyError> {
        self.addresses.get(name).copied().ok_or_else(|| {
            AssemblyError::located(line, name, format!("undefined label: {}", name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_then_lookup() {
        let mut t = LabelTable::new();
        t.define("loop", 0x100, 1).unwrap();
        assert_eq!(t.lookup("loop", 2).unwrap(), 0x100);
    }

    #[test]
    fn duplicate_definition_errors() {
        let mut t = LabelTable::new();
        t.define("loop", 0x100, 1).unwrap();
        let err = t.define("loop", 0x200, 2).unwrap_err();
        assert!(matches!(err, AssemblyError::Located { .. }));
    }

    #[test]
    fn undefined_lookup_errors() {
        let t = LabelTable::new();
        let err = t.lookup("missing", 1).unwrap_err();
        assert!(matches!(err, AssemblyError::Located { .. }));
    }

    #[test]
    fn overlong_name_errors() {
        let mut t = LabelTable::new();
        let name = "a".repeat(MAX_LABEL_NAME_BYTES + 1);
        let err = t.define(&name, 0, 1).unwrap_err();
        assert!(matches!(err, AssemblyError::Located { .. }));
    }

    #[test]
    fn capacity_overflow_errors() {
        let mut t = LabelTable::new();
        for i in 0..MAX_LABELS {
            t.define(&format!("l{}", i), i as u32, 1).unwrap();
        }
        let err = t.define("overflow", 0, 1).unwrap_err();
        assert!(matches!(err, AssemblyError::Capacity { .. }));
    }
}
