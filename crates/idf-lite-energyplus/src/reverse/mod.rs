// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reverse Translator - simulation workspace to typed model
//!
//! Visits every workspace object in store order. As in the forward
//! direction, handlers translate the objects they reference on demand and
//! each source object is translated once; types without a handler and broken
//! references become diagnostics on the returned [`Translation`].

mod handlers;

pub use handlers::{
    ActuatorHandler, BuildingHandler, ConstructionHandler, FenestrationSurfaceHandler,
    GasEquipmentHandler, MaterialHandler, ScheduleHandler, SiteLocationHandler, SurfaceHandler,
    ZoneHandler,
};

use crate::diagnostics::{DiagnosticSink, Translation};
use crate::error::{Result, TranslateError};
use crate::forward::ProgressCallback;
use crate::mapping::{self, Link, Translated};
use crate::model::{Model, Space};
use crate::options::ReverseTranslatorOptions;
use idf_lite_model::{
    Diagnostic, DiagnosticKind, Handle, IddObjectType, IdfObject, ObjectSchema, SchemaRegistry,
    SiUnitConverter, UnitConverter, WorkspaceError, WorkspaceObject,
};
use idf_lite_workspace::{sanitize_name, NameRegistry, Workspace};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Translates objects of one or more simulation types into the model
pub trait ReverseHandler: Send + Sync {
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ReverseContext<'_>) -> Result<Translated>;

    fn supported_types(&self) -> Vec<IddObjectType>;
}

// ============================================================================
// Context
// ============================================================================

/// State of one reverse run, handed to every handler
pub struct ReverseContext<'a> {
    workspace: &'a Workspace,
    model: Model,
    handlers: &'a HashMap<IddObjectType, Arc<dyn ReverseHandler>>,
    units: &'a dyn UnitConverter,
    visited: FxHashMap<Handle, Translated>,
    in_progress: FxHashSet<Handle>,
    names: NameRegistry,
    zone_spaces: FxHashMap<Handle, Space>,
    sink: DiagnosticSink,
}

impl<'a> ReverseContext<'a> {
    /// Source workspace
    pub fn workspace(&self) -> &'a Workspace {
        self.workspace
    }

    /// Model built so far
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn units(&self) -> &dyn UnitConverter {
        self.units
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.sink.push(diagnostic);
    }

    /// Translate a workspace object unless already done; returns its model
    /// object
    pub fn translate_and_map(&mut self, handle: Handle) -> Result<Option<Handle>> {
        if let Some(done) = self.visited.get(&handle) {
            return Ok(done.handle());
        }
        if !self.in_progress.insert(handle) {
            log::debug!("Reference cycle through {}", handle);
            return Ok(None);
        }
        let workspace = self.workspace;
        let Some(object) = workspace.get_object(handle) else {
            self.in_progress.remove(&handle);
            return Ok(None);
        };

        let handlers = self.handlers;
        let outcome = match handlers.get(&object.object_type) {
            Some(handler) => {
                log::trace!("Reverse translating {} '{}'", object.object_type, object.name_str());
                handler.translate(object, self)?
            }
            None => {
                self.report(
                    Diagnostic::warning(
                        DiagnosticKind::UntranslatableType,
                        format!("'{}' has no model counterpart and was skipped", object.name_str()),
                    )
                    .for_object(handle, &object.object_type),
                );
                Translated::Dropped
            }
        };
        self.in_progress.remove(&handle);
        self.visited.insert(handle, outcome);
        Ok(outcome.handle())
    }

    pub fn link(&mut self, object: &WorkspaceObject, index: usize) -> Link {
        mapping::resolve_link(self.workspace, object, index, &mut self.sink)
    }

    /// Model object for a reference the object cannot do without; records a
    /// broken-reference error when there is none
    pub fn translate_required(&mut self, object: &WorkspaceObject, index: usize) -> Result<Option<Handle>> {
        let field = mapping::field_name(self.workspace, object, index);
        let mapped = match self.link(object, index) {
            Link::Found(target) => self.translate_and_map(target)?,
            Link::Unset | Link::Broken => None,
        };
        if mapped.is_none() {
            self.report(mapping::broken_reference(
                object,
                &format!("'{}' has no model counterpart", field),
            ));
        }
        Ok(mapped)
    }

    /// Model object for an optional reference; a dangling value is reported
    /// and ignored
    pub fn translate_optional(&mut self, object: &WorkspaceObject, index: usize) -> Result<Option<Handle>> {
        let mapped = match self.link(object, index) {
            Link::Unset => return Ok(None),
            Link::Found(target) => self.translate_and_map(target)?,
            Link::Broken => None,
        };
        if mapped.is_none() {
            let field = mapping::field_name(self.workspace, object, index);
            self.report(
                Diagnostic::warning(
                    DiagnosticKind::BrokenReference,
                    format!("'{}' of '{}' left empty", field, object.name_str()),
                )
                .for_object(object.handle, &object.object_type),
            );
        }
        Ok(mapped)
    }

    /// Model name for `base`, unique within the model type's name group
    pub fn model_name(&mut self, source: &WorkspaceObject, base: &str, model_type: &IddObjectType) -> String {
        let candidate = sanitize_name(base);
        let candidate = if candidate.is_empty() {
            model_type.short_name()
        } else {
            candidate
        };
        let group = self
            .model
            .workspace()
            .registry()
            .schema(model_type)
            .map(|s| s.name_group().to_string())
            .unwrap_or_else(|| model_type.name().to_string());
        let claim = self.names.claim(&group, &candidate);
        if claim.exhausted {
            self.report(
                Diagnostic::error(
                    DiagnosticKind::NameCollision,
                    format!("no free name for '{}' in {}", candidate, group),
                )
                .for_object(source.handle, &source.object_type),
            );
        }
        claim.name
    }

    /// Start a model object named after `source`
    pub fn new_model_object(&mut self, source: &WorkspaceObject, model_type: IddObjectType) -> IdfObject {
        let name = self.model_name(source, source.name_str(), &model_type);
        IdfObject::new(model_type).with_name(&name)
    }

    pub fn model_schema(&self, object_type: &IddObjectType) -> Result<Arc<ObjectSchema>> {
        self.model
            .workspace()
            .registry()
            .schema(object_type)
            .cloned()
            .map(Arc::new)
            .ok_or_else(|| TranslateError::Workspace(WorkspaceError::unknown_type(object_type)))
    }

    pub fn add(&mut self, object: IdfObject) -> Result<Handle> {
        Ok(self.model.workspace_mut().add_idf_object(object)?)
    }

    /// Remember the space created for a model thermal zone
    pub fn set_zone_space(&mut self, zone: Handle, space: Space) {
        self.zone_spaces.insert(zone, space);
    }

    /// Space standing in for a model thermal zone
    pub fn zone_space(&self, zone: Handle) -> Option<Space> {
        self.zone_spaces.get(&zone).copied()
    }
}

// ============================================================================
// Translator
// ============================================================================

/// Workspace to model translator
pub struct ReverseTranslator {
    handlers: HashMap<IddObjectType, Arc<dyn ReverseHandler>>,
    options: ReverseTranslatorOptions,
    model_schema: Arc<SchemaRegistry>,
    units: Arc<dyn UnitConverter>,
    progress: Option<ProgressCallback>,
    cancel: Option<Arc<AtomicBool>>,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Default for ReverseTranslator {
    fn default() -> Self {
        Self::with_default_handlers()
    }
}

impl ReverseTranslator {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            options: ReverseTranslatorOptions::default(),
            model_schema: Arc::new(SchemaRegistry::model()),
            units: Arc::new(SiUnitConverter::new()),
            progress: None,
            cancel: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_default_handlers() -> Self {
        let mut translator = Self::new();
        translator.register(Arc::new(BuildingHandler));
        translator.register(Arc::new(SiteLocationHandler));
        translator.register(Arc::new(MaterialHandler));
        translator.register(Arc::new(ConstructionHandler));
        translator.register(Arc::new(ZoneHandler));
        translator.register(Arc::new(SurfaceHandler));
        translator.register(Arc::new(FenestrationSurfaceHandler));
        translator.register(Arc::new(ScheduleHandler));
        translator.register(Arc::new(GasEquipmentHandler));
        translator.register(Arc::new(ActuatorHandler));
        translator
    }

    pub fn with_options(mut self, options: ReverseTranslatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_model_schema(mut self, schema: Arc<SchemaRegistry>) -> Self {
        self.model_schema = schema;
        self
    }

    pub fn with_unit_converter(mut self, units: Arc<dyn UnitConverter>) -> Self {
        self.units = units;
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn register(&mut self, handler: Arc<dyn ReverseHandler>) {
        for object_type in handler.supported_types() {
            self.handlers.insert(object_type, Arc::clone(&handler));
        }
    }

    pub fn has_handler(&self, object_type: &IddObjectType) -> bool {
        self.handlers.contains_key(object_type)
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Translate a whole workspace into a new model
    pub fn translate_workspace(&mut self, workspace: &Workspace) -> Result<Translation<Model>> {
        if workspace.registry().is_empty() {
            return Err(TranslateError::MissingSchema("workspace"));
        }
        if self.model_schema.is_empty() {
            return Err(TranslateError::MissingSchema("model"));
        }
        self.errors.clear();
        self.warnings.clear();
        log::debug!("Reverse translation of {} objects", workspace.len());

        let mut ctx = ReverseContext {
            workspace,
            model: Model::with_schema(Arc::clone(&self.model_schema)),
            handlers: &self.handlers,
            units: self.units.as_ref(),
            visited: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            names: NameRegistry::new(" ", self.options.max_name_suffix as usize),
            zone_spaces: FxHashMap::default(),
            sink: DiagnosticSink::new(),
        };

        let total = workspace.len().max(1);
        let mut cancelled = false;
        for object in workspace.objects() {
            if self
                .cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                cancelled = true;
                break;
            }
            ctx.translate_and_map(object.handle)?;
            if let Some(progress) = &self.progress {
                progress(object.object_type.name(), (ctx.visited.len() as f32 / total as f32).min(1.0));
            }
        }

        if cancelled {
            ctx.report(Diagnostic::warning(
                DiagnosticKind::Cancelled,
                format!("stopped after {} objects", ctx.visited.len()),
            ));
        }
        let ReverseContext { model, sink, .. } = ctx;
        let translation = Translation::new(model, sink);
        self.errors = translation.errors.clone();
        self.warnings = translation.warnings.clone();
        if cancelled {
            return Err(TranslateError::Cancelled);
        }
        log::debug!(
            "Reverse translation done: {} objects, {} errors, {} warnings",
            translation.output.len(),
            translation.errors.len(),
            translation.warnings.len()
        );
        Ok(translation)
    }
}
