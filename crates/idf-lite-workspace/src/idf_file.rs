// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IDF file reader

use crate::decoder::decode_object;
use crate::scanner::ObjectScanner;
use crate::tokenizer::tokenize_object;
use crate::Workspace;
use idf_lite_model::{
    Diagnostic, DiagnosticKind, IddObjectType, IdfObject, Result, SchemaRegistry, WorkspaceError,
};
use std::path::Path;
use std::sync::Arc;

/// Decoded objects of one IDF text, plus findings that did not stop the read
#[derive(Clone, Debug, Default)]
pub struct IdfFile {
    pub objects: Vec<IdfObject>,
    /// Unknown object types are skipped and reported here
    pub diagnostics: Vec<Diagnostic>,
}

impl IdfFile {
    /// Parse IDF text against a schema
    ///
    /// Malformed objects fail the whole read with the offending line number.
    pub fn parse(content: &str, schema: &SchemaRegistry) -> Result<Self> {
        let mut file = IdfFile::default();

        for raw in ObjectScanner::new(content) {
            if !raw.terminated {
                return Err(WorkspaceError::parse(raw.line, "object is missing its terminating ';'"));
            }
            let (type_name, tokens) =
                tokenize_object(&raw.text).map_err(|msg| WorkspaceError::parse(raw.line, msg))?;

            let object_type = IddObjectType::parse(type_name);
            let Some(object_schema) = schema.schema(&object_type) else {
                let diagnostic = Diagnostic::warning(
                    DiagnosticKind::UnknownType,
                    format!("Skipping unknown object type '{}' at line {}", type_name, raw.line),
                );
                diagnostic.log();
                file.diagnostics.push(diagnostic);
                continue;
            };
            file.objects.push(decode_object(object_schema, &tokens, raw.line)?);
        }

        log::debug!(
            "Parsed {} objects ({} skipped)",
            file.objects.len(),
            file.diagnostics.len()
        );
        Ok(file)
    }

    /// Read and parse an IDF file from disk
    pub fn load(path: impl AsRef<Path>, schema: &SchemaRegistry) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, schema)
    }

    /// Attach all objects to a new store
    pub fn into_workspace(self, schema: Arc<SchemaRegistry>) -> Result<Workspace> {
        let mut workspace = Workspace::new(schema);
        for object in self.objects {
            workspace.add_idf_object(object)?;
        }
        Ok(workspace)
    }
}

impl Workspace {
    /// Parse IDF text into a new store
    pub fn from_idf(content: &str, schema: Arc<SchemaRegistry>) -> Result<(Workspace, Vec<Diagnostic>)> {
        let file = IdfFile::parse(content, &schema)?;
        let diagnostics = file.diagnostics.clone();
        Ok((file.into_workspace(schema)?, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idf_lite_model::{ObjectResolver, ObjectResolverExt};

    const TEST_IDF: &str = "\
Version,9.6;

Material,
  Brick,                   !- Name
  Rough,                   !- Roughness
  0.1,                     !- Thickness
  0.9,                     !- Conductivity
  1920,                    !- Density
  790;                     !- Specific Heat

Construction,
  Exterior Wall,           !- Name
  Brick;                   !- Layer 1
";

    #[test]
    fn test_parse_skips_unknown_types() {
        let schema = SchemaRegistry::energyplus();
        let file = IdfFile::parse(TEST_IDF, &schema).unwrap();
        assert_eq!(file.objects.len(), 2);
        assert_eq!(file.diagnostics.len(), 1);
        assert_eq!(file.diagnostics[0].kind, DiagnosticKind::UnknownType);
    }

    #[test]
    fn test_from_idf_resolves_names() {
        let (ws, _) = Workspace::from_idf(TEST_IDF, Arc::new(SchemaRegistry::energyplus())).unwrap();
        let construction = ws
            .object_by_name(&IddObjectType::Construction, "exterior wall")
            .unwrap()
            .handle;
        let brick = ws.resolve_field(construction, 0).handle().unwrap();
        assert_eq!(ws.get_or_err(brick).unwrap().name_str(), "Brick");
        // Defaults fill absent trailing fields
        assert_eq!(ws.get_or_err(brick).unwrap().get_double(5), Some(0.9));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let schema = SchemaRegistry::energyplus();
        let text = "Material,\n  Brick,\n  Rough,\n  thick;\n";
        match IdfFile::parse(text, &schema) {
            Err(WorkspaceError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("unexpected {other:?}"),
        }
        match IdfFile::parse("Zone,\n  Office\n", &schema) {
            Err(WorkspaceError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_round_trip_text_is_stable() {
        let registry = Arc::new(SchemaRegistry::energyplus());
        let (ws, _) = Workspace::from_idf(TEST_IDF, registry.clone()).unwrap();
        let first = ws.to_idf_string();
        let (again, diagnostics) = Workspace::from_idf(&first, registry).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(again.to_idf_string(), first);
    }
}
