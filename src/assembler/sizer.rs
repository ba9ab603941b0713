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

//! Pass A: compute each assembler line's program counter without emitting
//! any bytes, and populate the label table those addresses resolve to.
//!
//! Label stability (spec.md §7) depends on this pass and the emitter
//! agreeing byte-for-byte on every instruction's width; both read the same
//! [`AsmStmt`] values produced by [`crate::assembler::line_parser::parse`].

use crate::assembler::label_table::LabelTable;
use crate::assembler::line_parser::{parse, AsmStmt};
use crate::errors::AssemblyError;
use crate::immediate;
use crate::lowering::LoweredLine;

pub struct SizedLine {
    pub stmt: AsmStmt,
    pub pc: u32,
    pub source_index: usize,
}

pub struct SizerOutput {
    pub lines: Vec<SizedLine>,
    pub labels: LabelTable,
}

/// Byte width of a statement at a given PC, or `None` if it defines a
/// label rather than occupying space.
fn width(stmt: &AsmStmt, line: usize) -> Result<u32, AssemblyError> {
    Ok(match stmt {
        AsmStmt::Org(_) => 0,
        AsmStmt::Db(bytes) => bytes.len() as u32,
        AsmStmt::Fill(count, _) => {
            immediate::parse(count).map_err(|reason| AssemblyError::located(line, count, reason))?
        }
        AsmStmt::Int(_) => 2,
        AsmStmt::Jmp(_) | AsmStmt::Call(_) => 5,
        AsmStmt::Ljmp(_, _) => 7,
        AsmStmt::LabelDef(_) => 0,
        AsmStmt::Raw(text) => {
            return Err(AssemblyError::located(line, text, "unknown directive"))
        }
    })
}

pub fn size(lowered: &[LoweredLine]) -> Result<SizerOutput, AssemblyError> {
    let mut labels = LabelTable::new();
    let mut sized = Vec::with_capacity(lowered.len());
    let mut pc: u32 = 0;

    for ll in lowered {
        let line = ll.source_index + 1;
        let stmt = parse(&ll.text);

        if let AsmStmt::Org(target) = &stmt {
            pc = immediate::parse(target)
                .map_err(|reason| AssemblyError::located(line, &ll.text, reason))?;
            sized.push(SizedLine {
                stmt,
                pc,
                source_index: ll.source_index,
            });
            continue;
        }

        if let AsmStmt::LabelDef(name) = &stmt {
            labels.define(name, pc, line)?;
            sized.push(SizedLine {
                stmt,
                pc,
                source_index: ll.source_index,
            });
            continue;
        }

        let this_pc = pc;
        let w = width(&stmt, line)?;
        pc = pc
            .checked_add(w)
            .ok_or_else(|| AssemblyError::located(line, &ll.text, "program counter overflow"))?;
        sized.push(SizedLine {
            stmt,
            pc: this_pc,
            source_index: ll.source_index,
        });
    }

    Ok(SizerOutput {
        lines: sized,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lowered(v: &[&str]) -> Vec<LoweredLine> {
        v.iter()
            .enumerate()
            .map(|(i, s)| LoweredLine {
                text: s.to_string(),
                source_index: i,
            })
            .collect()
    }

    #[test]
    fn org_sets_pc_and_db_advances() {
        let out = size(&lowered(&["ORG 0x100", "DB 0xAA,0xBB,0xCC"])).unwrap();
        assert_eq!(out.lines[0].pc, 0x100);
        assert_eq!(out.lines[1].pc, 0x100);
    }

    #[test]
    fn label_addresses_do_not_advance_pc() {
        let out = size(&lowered(&["ORG 0x10", "loop:", "INT 0x05"])).unwrap();
        assert_eq!(out.labels.lookup("loop", 1).unwrap(), 0x10);
        assert_eq!(out.lines[2].pc, 0x10);
    }

    #[test]
    fn jmp_and_call_are_five_bytes() {
        let out = size(&lowered(&["ORG 0", "JMP loop", "loop:"])).unwrap();
        assert_eq!(out.labels.lookup("loop", 1).unwrap(), 5);
    }

    #[test]
    fn ljmp_is_seven_bytes() {
        let out = size(&lowered(&["ORG 0", "LJMP 0x10:0x20", "next:"])).unwrap();
        assert_eq!(out.labels.lookup("next", 1).unwrap(), 7);
    }

    #[test]
    fn fill_advances_by_count() {
        let out = size(&lowered(&["ORG 0", "FILL 4 0x00", "next:"])).unwrap();
        assert_eq!(out.labels.lookup("next", 1).unwrap(), 4);
    }

    #[test]
    fn duplicate_label_is_error() {
        let err = size(&lowered(&["loop:", "loop:"])).unwrap_err();
        assert!(matches!(err, AssemblyError::Located { .. }));
    }

    #[test]
    fn unknown_directive_is_error() {
        let err = size(&lowered(&["NOPE"])).unwrap_err();
        assert!(matches!(err, AssemblyError::Located { .. }));
    }
}
