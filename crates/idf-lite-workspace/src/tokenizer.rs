// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IDF object tokenizer using nom combinators
//!
//! Splits one comment-free object body (`Type, a, b, ..., z;`) into trimmed
//! field tokens. The first token is the type name.

use nom::{
    bytes::complete::take_till,
    character::complete::{char, multispace0},
    multi::separated_list1,
    sequence::terminated,
    IResult, Parser,
};

/// Parse one field: everything up to the next separator, trimmed
fn field(input: &str) -> IResult<&str, &str> {
    let (input, raw) = take_till(|c: char| c == ',' || c == ';').parse(input)?;
    Ok((input, raw.trim()))
}

/// Parse a comma separated field list terminated by `;`
fn field_list(input: &str) -> IResult<&str, Vec<&str>> {
    let (input, _) = multispace0(input)?;
    terminated(separated_list1(char(','), field), char(';')).parse(input)
}

/// Tokenize an object body into its type name and field tokens
pub fn tokenize_object(input: &str) -> Result<(&str, Vec<&str>), String> {
    let (rest, mut tokens) = field_list(input).map_err(|e| format!("Malformed object: {}", e))?;
    if !rest.trim().is_empty() {
        return Err(format!("Unexpected text after ';': '{}'", rest.trim()));
    }
    let object_type = tokens.remove(0);
    if object_type.is_empty() {
        return Err("Missing object type".to_string());
    }
    Ok((object_type, tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        let (ty, fields) = tokenize_object("Material,\n  Brick,\n  Rough,\n  0.1;").unwrap();
        assert_eq!(ty, "Material");
        assert_eq!(fields, vec!["Brick", "Rough", "0.1"]);
    }

    #[test]
    fn test_tokenize_empty_fields() {
        let (ty, fields) = tokenize_object("Zone,Office,,,;").unwrap();
        assert_eq!(ty, "Zone");
        assert_eq!(fields, vec!["Office", "", "", ""]);
    }

    #[test]
    fn test_tokenize_no_fields() {
        let (ty, fields) = tokenize_object("  Output:Surfaces:List;").unwrap();
        assert_eq!(ty, "Output:Surfaces:List");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_tokenize_errors() {
        assert!(tokenize_object("Zone, Office").is_err());
        assert!(tokenize_object(", Office;").is_err());
    }
}
