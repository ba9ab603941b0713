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

//! Numeric-immediate parsing shared by the lowerer, the sizer, and the
//! emitter (spec.md §4.4 "Immediate parsing"): `0x`-prefixed hex with at
//! least one digit and no trailing garbage, or plain decimal otherwise.

/// Parse a single immediate token. Returns `Err(reason)` on anything
/// malformed; the caller attaches source-line context.
pub fn parse(token: &str) -> Result<u32, String> {
    let token = token.trim();
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("malformed hex immediate '{}'", token));
        }
        u32::from_str_radix(hex, 16).map_err(|_| format!("hex immediate '{}' out of range", token))
    } else {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("malformed decimal immediate '{}'", token));
        }
        token
            .parse::<u32>()
            .map_err(|_| format!("decimal immediate '{}' out of range", token))
    }
}

/// Parse an immediate and require it to fit in a byte.
pub fn parse_u8(token: &str, field: &str) -> Result<u8, String> {
    let value = parse(token)?;
    u8::try_from(value).map_err(|_| format!("{} out of range: {}", field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        assert_eq!(parse("0x80"), Ok(0x80));
        assert_eq!(parse("0X1A"), Ok(0x1A));
    }

    #[test]
    fn parses_decimal() {
        assert_eq!(parse("500"), Ok(500));
        assert_eq!(parse("0"), Ok(0));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(parse("0x").is_err());
        assert!(parse("0xZZ").is_err());
        assert!(parse("0x12g").is_err());
    }

    #[test]
    fn rejects_malformed_decimal() {
        assert!(parse("12a").is_err());
        assert!(parse("").is_err());
        assert!(parse("-5").is_err());
    }

    #[test]
    fn byte_range_check() {
        assert_eq!(parse_u8("0x80", "INT imm8"), Ok(0x80));
        assert!(parse_u8("0x100", "INT imm8").is_err());
    }
}
