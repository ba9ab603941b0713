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

//! Pass B: walk the same [`AsmStmt`] stream the sizer walked and write the
//! flat binary image. Generic over `Write + Seek` so tests can target an
//! in-memory `Cursor<Vec<u8>>`, following the teacher's
//! dependency-injection-for-IO testing pattern applied here to the output
//! side instead of the input side.

use std::io::{Seek, SeekFrom, Write};

use crate::assembler::label_table::LabelTable;
use crate::assembler::line_parser::AsmStmt;
use crate::assembler::sizer::SizedLine;
use crate::errors::AssemblyError;
use crate::immediate;

const OPCODE_INT: u8 = 0xCD;
const OPCODE_JMP: u8 = 0xE9;
const OPCODE_CALL: u8 = 0xE8;
const OPCODE_LJMP: u8 = 0xEA;

pub fn emit<W: Write + Seek>(
    lines: &[SizedLine],
    labels: &LabelTable,
    out: &mut W,
) -> Result<(), AssemblyError> {
    for sl in lines {
        let line = sl.source_index + 1;
        match &sl.stmt {
            AsmStmt::Org(target) => {
                let addr = immediate::parse(target)
                    .map_err(|reason| AssemblyError::located(line, target, reason))?;
                out.seek(SeekFrom::Start(addr as u64))
                    .map_err(AssemblyError::Write)?;
            }
            AsmStmt::Db(bytes) => {
                for tok in bytes {
                    let b = immediate::parse_u8(tok, "DB byte")
                        .map_err(|reason| AssemblyError::located(line, tok, reason))?;
                    out.write_all(&[b]).map_err(AssemblyError::Write)?;
                }
            }
            AsmStmt::Fill(count, value) => {
                let n = immediate::parse(count)
                    .map_err(|reason| AssemblyError::located(line, count, reason))?;
                let b = immediate::parse_u8(value, "FILL value")
                    .map_err(|reason| AssemblyError::located(line, value, reason))?;
                let buf = vec![b; n as usize];
                out.write_all(&buf).map_err(AssemblyError::Write)?;
            }
            AsmStmt::Int(code) => {
                let imm = immediate::parse_u8(code, "INT code")
                    .map_err(|reason| AssemblyError::located(line, code, reason))?;
                out.write_all(&[OPCODE_INT, imm]).map_err(AssemblyError::Write)?;
            }
            AsmStmt::Jmp(target) => {
                emit_rel_branch(out, labels, OPCODE_JMP, target, sl.pc, line)?;
            }
            AsmStmt::Call(target) => {
                emit_rel_branch(out, labels, OPCODE_CALL, target, sl.pc, line)?;
            }
            AsmStmt::Ljmp(off, seg) => {
                let offset = immediate::parse(off)
                    .map_err(|reason| AssemblyError::located(line, off, reason))?;
                let segment = immediate::parse(seg)
                    .map_err(|reason| AssemblyError::located(line, seg, reason))?;
                let segment: u16 = segment
                    .try_into()
                    .map_err(|_| AssemblyError::located(line, seg, "segment out of u16 range"))?;
                out.write_all(&[OPCODE_LJMP]).map_err(AssemblyError::Write)?;
                out.write_all(&offset.to_le_bytes())
                    .map_err(AssemblyError::Write)?;
                out.write_all(&segment.to_le_bytes())
                    .map_err(AssemblyError::Write)?;
            }
            AsmStmt::LabelDef(_) => {}
            AsmStmt::Raw(text) => {
                return Err(AssemblyError::located(line, text, "unknown directive"))
            }
        }
    }
    Ok(())
}

fn emit_rel_branch<W: Write + Seek>(
    out: &mut W,
    labels: &LabelTable,
    opcode: u8,
    target: &str,
    pc: u32,
    line: usize,
) -> Result<(), AssemblyError> {
    let dest = labels.lookup(target, line)?;
    let pc_after = pc
        .checked_add(5)
        .ok_or_else(|| AssemblyError::located(line, target, "program counter overflow"))?;
    let rel = dest as i64 - pc_after as i64;
    let rel: i32 = rel
        .try_into()
        .map_err(|_| AssemblyError::located(line, target, "displacement out of i32 range"))?;
    out.write_all(&[opcode]).map_err(AssemblyError::Write)?;
    out.write_all(&rel.to_le_bytes()).map_err(AssemblyError::Write)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::line_parser::parse;
    use std::io::Cursor;

    fn sized(stmts: &[(&str, u32)]) -> (Vec<SizedLine>, LabelTable) {
        let mut labels = LabelTable::new();
        let mut out = Vec::new();
        for (i, (text, pc)) in stmts.iter().enumerate() {
            let stmt = parse(text);
            if let AsmStmt::LabelDef(name) = &stmt {
                labels.define(name, *pc, i + 1).unwrap();
            }
            out.push(SizedLine {
                stmt,
                pc: *pc,
                source_index: i,
            });
        }
        (out, labels)
    }

    #[test]
    fn org_seeks_and_db_writes() {
        let (lines, labels) = sized(&[("ORG 0x4", 0x4), ("DB 0xAA,0xBB", 0x4)]);
        let mut cursor = Cursor::new(Vec::new());
        emit(&lines, &labels, &mut cursor).unwrap();
        let buf = cursor.into_inner();
        assert_eq!(buf, vec![0, 0, 0, 0, 0xAA, 0xBB]);
    }

    #[test]
    fn jmp_emits_negative_relative_displacement() {
        let (lines, labels) = sized(&[("loop:", 0), ("JMP loop", 0)]);
        let mut cursor = Cursor::new(Vec::new());
        emit(&lines, &labels, &mut cursor).unwrap();
        let buf = cursor.into_inner();
        assert_eq!(buf, vec![0xE9, 0xFB, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn call_emits_forward_displacement() {
        let (lines, labels) = sized(&[("CALL sub", 0), ("sub:", 5)]);
        let mut cursor = Cursor::new(Vec::new());
        emit(&lines, &labels, &mut cursor).unwrap();
        let buf = cursor.into_inner();
        assert_eq!(buf, vec![0xE8, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn int_emits_opcode_and_imm8() {
        let (lines, labels) = sized(&[("INT 0x10", 0)]);
        let mut cursor = Cursor::new(Vec::new());
        emit(&lines, &labels, &mut cursor).unwrap();
        assert_eq!(cursor.into_inner(), vec![0xCD, 0x10]);
    }

    #[test]
    fn ljmp_emits_little_endian_offset_and_segment() {
        let (lines, labels) = sized(&[("LJMP 0x100:0x1", 0)]);
        let mut cursor = Cursor::new(Vec::new());
        emit(&lines, &labels, &mut cursor).unwrap();
        assert_eq!(
            cursor.into_inner(),
            vec![0xEA, 0x00, 0x01, 0x00, 0x00, 0x01, 0x00]
        );
    }

    #[test]
    fn fill_repeats_value() {
        let (lines, labels) = sized(&[("FILL 3 0xFF", 0)]);
        let mut cursor = Cursor::new(Vec::new());
        emit(&lines, &labels, &mut cursor).unwrap();
        assert_eq!(cursor.into_inner(), vec![0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn db_out_of_byte_range_is_error() {
        let (lines, labels) = sized(&[("DB 0x100", 0)]);
        let mut cursor = Cursor::new(Vec::new());
        let err = emit(&lines, &labels, &mut cursor).unwrap_err();
        assert!(matches!(err, AssemblyError::Located { .. }));
    }

    #[test]
    fn unknown_directive_is_error() {
        let (lines, labels) = sized(&[("NOPE", 0)]);
        let mut cursor = Cursor::new(Vec::new());
        let err = emit(&lines, &labels, &mut cursor).unwrap_err();
        assert!(matches!(err, AssemblyError::Located { .. }));
    }
}
