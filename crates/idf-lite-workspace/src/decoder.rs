// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object decoder - converts field tokens to typed values using the schema

use idf_lite_model::{
    FieldDescriptor, FieldKind, FieldValue, IdfObject, ObjectSchema, Reference, Result,
    WorkspaceError,
};

/// Decode one token according to its descriptor
///
/// Empty tokens are Null; reference text becomes a name reference.
pub fn decode_value(token: &str, descriptor: &FieldDescriptor) -> std::result::Result<FieldValue, String> {
    if token.is_empty() {
        return Ok(FieldValue::Null);
    }
    match descriptor.kind {
        FieldKind::Int => lexical_core::parse::<i64>(token.as_bytes())
            .map(FieldValue::Int)
            .map_err(|_| format!("'{}' is not an integer ({})", token, descriptor.name)),
        FieldKind::Double => lexical_core::parse::<f64>(token.as_bytes())
            .map(FieldValue::Double)
            .map_err(|_| format!("'{}' is not a number ({})", token, descriptor.name)),
        FieldKind::String => Ok(FieldValue::String(token.to_string())),
        FieldKind::Url => Ok(FieldValue::Url(token.to_string())),
        FieldKind::Reference => Ok(FieldValue::Reference(Reference::ByName(token.to_string()))),
    }
}

/// Decode the field tokens of one object (type token already consumed)
///
/// Trailing fields that are absent stay absent; the store pads them with
/// defaults on insertion.
pub fn decode_object(schema: &ObjectSchema, tokens: &[&str], line: usize) -> Result<IdfObject> {
    let mut object = IdfObject::new(schema.object_type.clone());
    let mut tokens = tokens.iter();

    if schema.has_name {
        if let Some(name) = tokens.next() {
            if !name.is_empty() {
                object.name = Some((*name).to_string());
            }
        }
    }

    let remaining: Vec<&str> = tokens.copied().collect();
    let fixed = schema.fields.len().min(remaining.len());
    for (token, descriptor) in remaining[..fixed].iter().zip(&schema.fields) {
        let value = decode_value(token, descriptor).map_err(|msg| WorkspaceError::parse(line, msg))?;
        object.fields.push(value);
    }

    let extra = &remaining[fixed..];
    if extra.is_empty() {
        return Ok(object);
    }
    if !schema.is_extensible() {
        if extra.iter().all(|t| t.is_empty()) {
            return Ok(object);
        }
        return Err(WorkspaceError::parse(
            line,
            format!(
                "{} takes {} fields, found {}",
                schema.object_type,
                schema.fields.len(),
                remaining.len()
            ),
        ));
    }
    for chunk in extra.chunks(schema.group_size()) {
        let group = chunk
            .iter()
            .zip(&schema.extensible)
            .map(|(token, descriptor)| decode_value(token, descriptor))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|msg| WorkspaceError::parse(line, msg))?;
        object.groups.push(group);
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use idf_lite_model::{IddObjectType, SchemaRegistry};

    #[test]
    fn test_decode_material() {
        let registry = SchemaRegistry::energyplus();
        let schema = registry.schema(&IddObjectType::Material).unwrap();
        let obj = decode_object(schema, &["Brick", "Rough", "0.1", "", "1920"], 3).unwrap();
        assert_eq!(obj.name.as_deref(), Some("Brick"));
        assert_eq!(obj.fields[1], FieldValue::Double(0.1));
        assert!(obj.fields[2].is_null());
        assert_eq!(obj.fields[3], FieldValue::Double(1920.0));
    }

    #[test]
    fn test_decode_groups_and_references() {
        let registry = SchemaRegistry::energyplus();
        let schema = registry.schema(&IddObjectType::Construction).unwrap();
        let obj = decode_object(schema, &["Wall", "Brick", "Insulation"], 1).unwrap();
        assert_eq!(obj.groups.len(), 2);
        assert_eq!(
            obj.groups[1][0],
            FieldValue::Reference(Reference::ByName("Insulation".into()))
        );
    }

    #[test]
    fn test_decode_errors_carry_line() {
        let registry = SchemaRegistry::energyplus();
        let schema = registry.schema(&IddObjectType::Material).unwrap();
        match decode_object(schema, &["Brick", "Rough", "thick"], 42) {
            Err(WorkspaceError::Parse { line, .. }) => assert_eq!(line, 42),
            other => panic!("unexpected {other:?}"),
        }
        let zone = registry.schema(&IddObjectType::SiteLocation).unwrap();
        assert!(decode_object(zone, &["Site", "1", "2", "3", "4", "5"], 1).is_err());
    }
}
