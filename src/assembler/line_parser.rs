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

//! A single typed parse of each assembler-dialect line, shared verbatim by
//! the sizer and the emitter so their notion of a statement can never
//! drift apart (see SPEC_FULL.md's note on this being the one deliberate
//! structural change from a from-scratch reading).

/// One assembler-dialect statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmStmt {
    Org(String),
    Db(Vec<String>),
    Fill(String, String),
    Int(String),
    Jmp(String),
    Call(String),
    Ljmp(String, String),
    LabelDef(String),
    /// Anything that reached here unrecognized; the sizer treats it as
    /// zero-width and the emitter rejects it.
    Raw(String),
}

/// Tokenize on runs of space/tab/comma, the way `strtok(line, " \t,")`
/// would: consecutive delimiters collapse and leading/trailing ones
/// produce no empty tokens.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c == ' ' || c == '\t' || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

pub fn parse(text: &str) -> AsmStmt {
    let trimmed = text.trim();

    let tokens = tokenize(trimmed);
    let Some(mnemonic) = tokens.first() else {
        return AsmStmt::Raw(trimmed.to_string());
    };

    // spec.md §4.3/§6: a line defines a label if its *first* token ends in
    // `:`; any remaining tokens on the line are discarded, matching
    // `original_source/Tri.cxx`'s single `strtok_r` check on `tok`.
    if let Some(name) = mnemonic.strip_suffix(':') {
        return AsmStmt::LabelDef(name.to_string());
    }

    match mnemonic.to_ascii_uppercase().as_str() {
        "ORG" if tokens.len() == 2 => AsmStmt::Org(tokens[1].clone()),
        "DB" => AsmStmt::Db(tokens[1..].to_vec()),
        "FILL" if tokens.len() == 3 => AsmStmt::Fill(tokens[1].clone(), tokens[2].clone()),
        "INT" if tokens.len() == 2 => AsmStmt::Int(tokens[1].clone()),
        "JMP" if tokens.len() == 2 => AsmStmt::Jmp(tokens[1].clone()),
        "CALL" if tokens.len() == 2 => AsmStmt::Call(tokens[1].clone()),
        "LJMP" if tokens.len() == 2 => {
            if let Some((off, seg)) = tokens[1].split_once(':') {
                AsmStmt::Ljmp(off.to_string(), seg.to_string())
            } else {
                AsmStmt::Raw(trimmed.to_string())
            }
        }
        _ => AsmStmt::Raw(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_org() {
        assert_eq!(parse("ORG 0x100"), AsmStmt::Org("0x100".to_string()));
    }

    #[test]
    fn parses_db_multi_byte_comma_and_space() {
        assert_eq!(
            parse("DB 0xAA, 0xBB  0xCC"),
            AsmStmt::Db(vec![
                "0xAA".to_string(),
                "0xBB".to_string(),
                "0xCC".to_string()
            ])
        );
    }

    #[test]
    fn db_with_no_operands_is_zero_width() {
        assert_eq!(parse("DB "), AsmStmt::Db(vec![]));
    }

    #[test]
    fn parses_fill() {
        assert_eq!(
            parse("FILL 4 0x00"),
            AsmStmt::Fill("4".to_string(), "0x00".to_string())
        );
    }

    #[test]
    fn parses_jmp_and_call() {
        assert_eq!(parse("JMP loop"), AsmStmt::Jmp("loop".to_string()));
        assert_eq!(parse("CALL sub1"), AsmStmt::Call("sub1".to_string()));
    }

    #[test]
    fn parses_ljmp_offset_segment() {
        assert_eq!(
            parse("LJMP 0x10:0x20"),
            AsmStmt::Ljmp("0x10".to_string(), "0x20".to_string())
        );
    }

    #[test]
    fn parses_label_definition() {
        assert_eq!(parse("loop:"), AsmStmt::LabelDef("loop".to_string()));
    }

    #[test]
    fn label_definition_discards_trailing_tokens_on_the_line() {
        assert_eq!(
            parse("start: db(1,2,3)"),
            AsmStmt::LabelDef("start".to_string())
        );
    }

    #[test]
    fn unrecognized_becomes_raw() {
        assert_eq!(parse("NOPE 1 2 3"), AsmStmt::Raw("NOPE 1 2 3".to_string()));
    }
}
