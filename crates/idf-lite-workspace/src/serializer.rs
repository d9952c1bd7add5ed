// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IDF text writer
//!
//! One field per line with a `!- Field Name` comment. References are written
//! as the target's name; a dangling reference is written empty.

use crate::Workspace;
use idf_lite_model::{
    FieldValue, ObjectResolver, ObjectSchema, Reference, WorkspaceObject,
};
use std::fmt::Write;

/// Column where field comments start
const COMMENT_COLUMN: usize = 26;

/// Text form of one value
pub fn format_value(store: &dyn ObjectResolver, value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Double(d) => format_double(*d),
        FieldValue::String(s) | FieldValue::Url(s) => s.clone(),
        FieldValue::Reference(Reference::ByName(name)) => name.clone(),
        FieldValue::Reference(Reference::ByHandle(handle)) => store
            .get(*handle)
            .and_then(|o| o.name.clone())
            .unwrap_or_default(),
    }
}

/// Shortest text that reads back to the same real
pub fn format_double(value: f64) -> String {
    if value.is_finite() && value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn write_line(out: &mut String, value: &str, last: bool, comment: &str) {
    let terminator = if last { ';' } else { ',' };
    let body = format!("  {}{}", value, terminator);
    let pad = COMMENT_COLUMN.saturating_sub(body.len()).max(1);
    let _ = writeln!(out, "{}{}!- {}", body, " ".repeat(pad), comment);
}

/// Append one object
pub fn write_object(
    out: &mut String,
    store: &dyn ObjectResolver,
    schema: &ObjectSchema,
    object: &WorkspaceObject,
) {
    let mut lines: Vec<(String, String)> = Vec::with_capacity(object.num_fields() + 1);
    if schema.has_name {
        lines.push((object.name_str().to_string(), "Name".to_string()));
    }
    for (value, descriptor) in object.fields.iter().zip(&schema.fields) {
        lines.push((format_value(store, value), descriptor.name.clone()));
    }
    for (group_index, group) in object.groups.iter().enumerate() {
        for (value, descriptor) in group.iter().zip(&schema.extensible) {
            lines.push((
                format_value(store, value),
                format!("{} {}", descriptor.name, group_index + 1),
            ));
        }
    }

    if lines.is_empty() {
        let _ = writeln!(out, "{};", schema.object_type);
        return;
    }
    let _ = writeln!(out, "{},", schema.object_type);
    let last = lines.len() - 1;
    for (i, (value, comment)) in lines.iter().enumerate() {
        write_line(out, value, i == last, comment);
    }
}

impl Workspace {
    /// Serialize every object, in store order
    pub fn to_idf_string(&self) -> String {
        let mut out = String::new();
        for object in self.objects() {
            let Some(schema) = self.schema().schema(&object.object_type) else {
                continue;
            };
            write_object(&mut out, self, schema, object);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idf_lite_model::{IddObjectType, SchemaRegistry};
    use std::sync::Arc;

    #[test]
    fn test_format_double() {
        assert_eq!(format_double(1400.0), "1400");
        assert_eq!(format_double(0.1), "0.1");
        assert_eq!(format_double(-2.5), "-2.5");
    }

    #[test]
    fn test_write_construction() {
        let mut ws = Workspace::new(Arc::new(SchemaRegistry::energyplus()));
        let m = ws.add_object(IddObjectType::Material, Some("Brick"), vec![]).unwrap();
        let c = ws.add_object(IddObjectType::Construction, Some("Wall"), vec![]).unwrap();
        ws.push_extensible_group(c, vec![m.into()]).unwrap();

        let text = ws.to_idf_string();
        assert!(text.starts_with("Material,\n  Brick,"));
        assert!(text.contains("Construction,\n  Wall,"));
        assert!(text.contains("  Brick;"));
        assert!(text.contains("!- Layer 1"));
    }

    #[test]
    fn test_dangling_reference_written_empty() {
        let mut ws = Workspace::new(Arc::new(SchemaRegistry::energyplus()));
        let m = ws.add_object(IddObjectType::Material, Some("Brick"), vec![]).unwrap();
        let c = ws.add_object(IddObjectType::Construction, Some("Wall"), vec![]).unwrap();
        ws.push_extensible_group(c, vec![m.into()]).unwrap();
        ws.remove_object(m);
        let text = ws.to_idf_string();
        assert!(text.contains("  ;"));
    }
}
