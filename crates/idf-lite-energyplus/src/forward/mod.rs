// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Forward Translator - typed model to simulation workspace
//!
//! Walks the model from its roots (unique objects first, then every object
//! without an owner) and hands each object to the handler registered for its
//! type. Handlers translate referenced objects on demand through the
//! [`ForwardContext`], so every object is translated at most once no matter
//! how many paths reach it. Children are queued after their owner.
//!
//! Problems with individual objects never stop the run; they are collected
//! as diagnostics on the returned [`Translation`].

mod handlers;

pub use handlers::{
    ActuatorHandler, BuildingHandler, ConstructionHandler, GasEquipmentHandler, MaterialHandler,
    NoCounterpartHandler, SiteHandler, SpaceHandler, SubSurfaceHandler, SurfaceHandler,
    ThermalZoneHandler,
};

use crate::diagnostics::{DiagnosticSink, Translation};
use crate::error::{Result, TranslateError};
use crate::mapping::{self, Link, Translated};
use crate::model::Model;
use crate::options::ForwardTranslatorOptions;
use idf_lite_model::idd::fields;
use idf_lite_model::{
    Diagnostic, DiagnosticKind, Handle, IddObjectType, IdfObject, ObjectResolverExt, ObjectSchema,
    SchemaRegistry, SiUnitConverter, UnitConverter, WorkspaceError, WorkspaceObject,
};
use idf_lite_workspace::{mangle_name, sanitize_name, NameRegistry, Workspace};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Name of the shared schedule synthesized for loads
pub const ALWAYS_ON_SCHEDULE: &str = "Always On";

/// Progress callback: (current object type, fraction done)
pub type ProgressCallback = Box<dyn Fn(&str, f32) + Send>;

/// Translates objects of one or more model types
///
/// Handlers look up the objects they depend on through the context, which
/// translates them first if needed.
pub trait ForwardHandler: Send + Sync {
    /// Translate one model object
    ///
    /// Data problems are reported on the context and yield
    /// [`Translated::Dropped`]; `Err` is reserved for store invariant
    /// violations.
    fn translate(&self, object: &WorkspaceObject, ctx: &mut ForwardContext<'_>) -> Result<Translated>;

    /// Model types this handler accepts
    fn supported_types(&self) -> Vec<IddObjectType>;
}

// ============================================================================
// Context
// ============================================================================

/// State of one forward run, handed to every handler
pub struct ForwardContext<'a> {
    model: &'a Model,
    output: Workspace,
    handlers: &'a HashMap<IddObjectType, Arc<dyn ForwardHandler>>,
    options: &'a ForwardTranslatorOptions,
    units: &'a dyn UnitConverter,
    visited: FxHashMap<Handle, Translated>,
    in_progress: FxHashSet<Handle>,
    names: NameRegistry,
    always_on: Option<Handle>,
    sink: DiagnosticSink,
}

impl<'a> ForwardContext<'a> {
    pub fn model(&self) -> &'a Model {
        self.model
    }

    /// Output store built so far
    pub fn output(&self) -> &Workspace {
        &self.output
    }

    pub fn units(&self) -> &dyn UnitConverter {
        self.units
    }

    pub fn options(&self) -> &ForwardTranslatorOptions {
        self.options
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.sink.push(diagnostic);
    }

    /// Outcome for a model object already visited
    pub fn translated(&self, handle: Handle) -> Option<Translated> {
        self.visited.get(&handle).copied()
    }

    /// Translate a model object unless already done; returns its output object
    ///
    /// Objects of a type without a handler are skipped with a warning.
    pub fn translate_and_map(&mut self, handle: Handle) -> Result<Option<Handle>> {
        if let Some(done) = self.visited.get(&handle) {
            return Ok(done.handle());
        }
        if !self.in_progress.insert(handle) {
            log::debug!("Reference cycle through {}", handle);
            return Ok(None);
        }
        let model = self.model;
        let Some(object) = model.workspace().get_object(handle) else {
            self.in_progress.remove(&handle);
            return Ok(None);
        };

        let handlers = self.handlers;
        let outcome = match handlers.get(&object.object_type) {
            Some(handler) => {
                log::trace!("Translating {} '{}'", object.object_type, object.name_str());
                handler.translate(object, self)?
            }
            None => {
                self.report(
                    Diagnostic::warning(
                        DiagnosticKind::UntranslatableType,
                        format!("'{}' has no counterpart and was skipped", object.name_str()),
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

    /// State of a reference field of a model object
    pub fn link(&mut self, object: &WorkspaceObject, index: usize) -> Link {
        mapping::resolve_link(self.model.workspace(), object, index, &mut self.sink)
    }

    /// Output object for a reference the object cannot do without
    ///
    /// An unset, dangling or untranslated target records a broken-reference
    /// error and yields `None`; the caller then drops the object.
    pub fn translate_required(&mut self, object: &WorkspaceObject, index: usize) -> Result<Option<Handle>> {
        let field = mapping::field_name(self.model.workspace(), object, index);
        match self.link(object, index) {
            Link::Found(target) => {
                let mapped = self.translate_and_map(target)?;
                if mapped.is_none() {
                    self.report(mapping::broken_reference(
                        object,
                        &format!("'{}' points at an object that was not translated", field),
                    ));
                }
                Ok(mapped)
            }
            Link::Unset => {
                self.report(mapping::broken_reference(object, &format!("'{}' is not set", field)));
                Ok(None)
            }
            Link::Broken => {
                self.report(mapping::broken_reference(
                    object,
                    &format!("'{}' points at a missing object", field),
                ));
                Ok(None)
            }
        }
    }

    /// Output object for an optional reference
    ///
    /// A dangling or untranslated target is reported as a warning and the
    /// field is left empty.
    pub fn translate_optional(&mut self, object: &WorkspaceObject, index: usize) -> Result<Option<Handle>> {
        match self.link(object, index) {
            Link::Unset => Ok(None),
            Link::Found(target) => {
                let mapped = self.translate_and_map(target)?;
                if mapped.is_none() {
                    self.report_left_empty(object, index);
                }
                Ok(mapped)
            }
            Link::Broken => {
                self.report_left_empty(object, index);
                Ok(None)
            }
        }
    }

    /// Warn that a reference field of `object` was left empty in the output
    pub fn report_left_empty(&mut self, object: &WorkspaceObject, index: usize) {
        let field = mapping::field_name(self.model.workspace(), object, index);
        self.report(
            Diagnostic::warning(
                DiagnosticKind::BrokenReference,
                format!("'{}' of '{}' left empty", field, object.name_str()),
            )
            .for_object(object.handle, &object.object_type),
        );
    }

    /// Output name for a model object, unique within the output name group
    pub fn output_name(&mut self, object: &WorkspaceObject, output_type: &IddObjectType) -> String {
        let clean = |name: &str| {
            if self.options.mangle_names {
                mangle_name(name)
            } else {
                sanitize_name(name)
            }
        };
        let mut candidate = object.name.as_deref().map(clean).unwrap_or_default();
        if candidate.is_empty() {
            if object.name.is_some() {
                log::debug!("'{}' has no usable characters, named after its type", object.name_str());
            }
            candidate = clean(&output_type.short_name());
        }
        let group = self
            .output
            .registry()
            .schema(output_type)
            .map(|s| s.name_group().to_string())
            .unwrap_or_else(|| output_type.name().to_string());

        let claim = self.names.claim(&group, &candidate);
        if claim.exhausted {
            self.report(
                Diagnostic::error(
                    DiagnosticKind::NameCollision,
                    format!("no free name for '{}' in {}", candidate, group),
                )
                .for_object(object.handle, &object.object_type),
            );
        } else if claim.renamed {
            log::debug!("Renamed '{}' to '{}'", candidate, claim.name);
        }
        claim.name
    }

    /// Output schema for a type the output registry must know
    pub fn output_schema(&self, object_type: &IddObjectType) -> Result<Arc<ObjectSchema>> {
        self.output
            .registry()
            .schema(object_type)
            .cloned()
            .map(Arc::new)
            .ok_or_else(|| TranslateError::Workspace(WorkspaceError::unknown_type(object_type)))
    }

    /// Start an output object named after `source`
    pub fn new_output(&mut self, source: &WorkspaceObject, output_type: IddObjectType) -> IdfObject {
        let name = self.output_name(source, &output_type);
        IdfObject::new(output_type).with_name(&name)
    }

    pub fn add(&mut self, object: IdfObject) -> Result<Handle> {
        Ok(self.output.add_idf_object(object)?)
    }

    /// The shared always-on schedule, created on first use
    pub fn always_on_schedule(&mut self) -> Result<Handle> {
        if let Some(existing) = self.always_on {
            return Ok(existing);
        }
        let name = self.names.claim(IddObjectType::ScheduleConstant.name(), ALWAYS_ON_SCHEDULE).name;
        let mut schedule = IdfObject::new(IddObjectType::ScheduleConstant).with_name(&name);
        schedule.set_field(fields::schedule_constant::HOURLY_VALUE, 1.0);
        let handle = self.add(schedule)?;
        self.always_on = Some(handle);
        Ok(handle)
    }
}

// ============================================================================
// Translator
// ============================================================================

/// Model to workspace translator
pub struct ForwardTranslator {
    handlers: HashMap<IddObjectType, Arc<dyn ForwardHandler>>,
    options: ForwardTranslatorOptions,
    output_schema: Arc<SchemaRegistry>,
    units: Arc<dyn UnitConverter>,
    progress: Option<ProgressCallback>,
    cancel: Option<Arc<AtomicBool>>,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Default for ForwardTranslator {
    fn default() -> Self {
        Self::with_default_handlers()
    }
}

impl ForwardTranslator {
    /// Translator without any handlers registered
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            options: ForwardTranslatorOptions::default(),
            output_schema: Arc::new(SchemaRegistry::energyplus()),
            units: Arc::new(SiUnitConverter::new()),
            progress: None,
            cancel: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Translator with a handler for every built-in model type that has an
    /// EnergyPlus counterpart
    pub fn with_default_handlers() -> Self {
        let mut translator = Self::new();
        translator.register(Arc::new(BuildingHandler));
        translator.register(Arc::new(SiteHandler));
        translator.register(Arc::new(MaterialHandler));
        translator.register(Arc::new(ConstructionHandler));
        translator.register(Arc::new(NoCounterpartHandler));
        translator.register(Arc::new(ThermalZoneHandler));
        translator.register(Arc::new(SpaceHandler));
        translator.register(Arc::new(SurfaceHandler));
        translator.register(Arc::new(SubSurfaceHandler));
        translator.register(Arc::new(GasEquipmentHandler));
        translator.register(Arc::new(ActuatorHandler));
        translator
    }

    pub fn with_options(mut self, options: ForwardTranslatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Output registry; must describe every type the handlers emit
    pub fn with_output_schema(mut self, schema: Arc<SchemaRegistry>) -> Self {
        self.output_schema = schema;
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

    /// Flag checked between objects; raising it ends the run with
    /// [`TranslateError::Cancelled`]
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn options(&self) -> &ForwardTranslatorOptions {
        &self.options
    }

    /// Register a handler for each of its supported types
    pub fn register(&mut self, handler: Arc<dyn ForwardHandler>) {
        for object_type in handler.supported_types() {
            self.handlers.insert(object_type, Arc::clone(&handler));
        }
    }

    pub fn has_handler(&self, object_type: &IddObjectType) -> bool {
        self.handlers.contains_key(object_type)
    }

    /// Errors of the last run
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Warnings of the last run
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Translate the whole model
    pub fn translate_model(&mut self, model: &Model) -> Result<Translation<Workspace>> {
        let roots = self.roots(model);
        self.run(model, roots, true)
    }

    /// Translate one object together with what it references and owns
    pub fn translate_model_object(&mut self, model: &Model, handle: Handle) -> Result<Translation<Workspace>> {
        self.run(model, vec![handle], false)
    }

    /// Unique objects first, then objects without a live owner, in store order
    fn roots(&self, model: &Model) -> Vec<Handle> {
        let store = model.workspace();
        let registry = store.registry();
        let (unique, rest): (Vec<&WorkspaceObject>, Vec<&WorkspaceObject>) = store
            .objects()
            .partition(|o| registry.is_unique_type(&o.object_type));

        let owned = |o: &WorkspaceObject| {
            registry
                .schema(&o.object_type)
                .and_then(|s| s.parent_field)
                .is_some()
                && store.parent(o.handle).is_some()
        };
        let unused_resource = |o: &WorkspaceObject| {
            registry.is_resource_type(&o.object_type)
                && store.inbound_reference_count(o.handle) == 0
                && store.children(o.handle).is_empty()
        };

        unique
            .into_iter()
            .chain(rest.into_iter().filter(|o| !owned(o)))
            .filter(|o| self.options.translate_unused_resources || !unused_resource(o))
            .map(|o| o.handle)
            .collect()
    }

    fn run(&mut self, model: &Model, seeds: Vec<Handle>, whole_model: bool) -> Result<Translation<Workspace>> {
        if model.workspace().registry().is_empty() {
            return Err(TranslateError::MissingSchema("model"));
        }
        if self.output_schema.is_empty() {
            return Err(TranslateError::MissingSchema("output"));
        }
        self.errors.clear();
        self.warnings.clear();
        log::debug!("Forward translation of {} objects from {} roots", model.len(), seeds.len());

        let mut ctx = ForwardContext {
            model,
            output: Workspace::new(Arc::clone(&self.output_schema)),
            handlers: &self.handlers,
            options: &self.options,
            units: self.units.as_ref(),
            visited: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            names: NameRegistry::new("_", self.options.max_name_suffix as usize),
            always_on: None,
            sink: DiagnosticSink::new(),
        };

        let total = if whole_model { model.len().max(1) } else { seeds.len().max(1) };
        let mut queue: VecDeque<Handle> = seeds.into();
        let mut cancelled = false;

        while let Some(handle) = queue.pop_front() {
            if self
                .cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                cancelled = true;
                break;
            }
            if ctx.visited.contains_key(&handle) {
                continue;
            }
            ctx.translate_and_map(handle)?;
            queue.extend(model.workspace().children(handle));

            if let Some(progress) = &self.progress {
                let label = model
                    .workspace()
                    .get_object(handle)
                    .map(|o| o.object_type.name().to_string())
                    .unwrap_or_default();
                let fraction = (ctx.visited.len() as f32 / total as f32).min(1.0);
                progress(&label, fraction);
            }
        }

        if cancelled {
            ctx.report(Diagnostic::warning(
                DiagnosticKind::Cancelled,
                format!("stopped after {} objects", ctx.visited.len()),
            ));
        }
        let ForwardContext { output, sink, .. } = ctx;
        let translation = Translation::new(output, sink);
        self.errors = translation.errors.clone();
        self.warnings = translation.warnings.clone();
        if cancelled {
            return Err(TranslateError::Cancelled);
        }
        log::debug!(
            "Forward translation done: {} objects, {} errors, {} warnings",
            translation.output.len(),
            translation.errors.len(),
            translation.warnings.len()
        );
        Ok(translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Construction, ModelObject, RenderingColor, Space, StandardOpaqueMaterial, Surface, ThermalZone,
    };
    use std::sync::Mutex;

    #[test]
    fn test_registry() {
        let translator = ForwardTranslator::with_default_handlers();
        assert!(translator.has_handler(&IddObjectType::OsMaterialAirGap));
        assert!(translator.has_handler(&IddObjectType::OsDefaultConstructionSet));
        assert!(!translator.has_handler(&IddObjectType::OsRenderingColor));
        assert!(!ForwardTranslator::new().has_handler(&IddObjectType::OsMaterial));
    }

    #[test]
    fn test_untranslatable_type_warns() {
        let mut model = Model::new();
        RenderingColor::new(&mut model).unwrap();
        let mut translator = ForwardTranslator::with_default_handlers();
        let result = translator.translate_model(&model).unwrap();
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, DiagnosticKind::UntranslatableType);
        assert!(result.output.is_empty());
        assert_eq!(translator.warnings().len(), 1);
    }

    #[test]
    fn test_empty_output_schema_is_fatal() {
        let model = Model::new();
        let mut translator =
            ForwardTranslator::with_default_handlers().with_output_schema(Arc::new(SchemaRegistry::new()));
        assert!(matches!(
            translator.translate_model(&model),
            Err(TranslateError::MissingSchema(_))
        ));
    }

    #[test]
    fn test_cancel_flag_stops_run() {
        let mut model = Model::new();
        StandardOpaqueMaterial::new(&mut model).unwrap();
        let flag = Arc::new(AtomicBool::new(true));
        let mut translator = ForwardTranslator::with_default_handlers().with_cancel_flag(Arc::clone(&flag));
        let err = translator.translate_model(&model).unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(translator.warnings()[0].kind, DiagnosticKind::Cancelled);

        flag.store(false, Ordering::Relaxed);
        assert!(translator.translate_model(&model).is_ok());
    }

    #[test]
    fn test_progress_reports_fractions() {
        let mut model = Model::new();
        StandardOpaqueMaterial::new(&mut model).unwrap();
        StandardOpaqueMaterial::new(&mut model).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut translator = ForwardTranslator::with_default_handlers().with_progress(Box::new(
            move |label: &str, fraction: f32| {
                if let Ok(mut seen) = sink.lock() {
                    seen.push((label.to_string(), fraction));
                }
            },
        ));
        translator.translate_model(&model).unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "OS:Material");
        assert!((seen[1].1 - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unused_resources_can_be_skipped() {
        let mut model = Model::new();
        let used = StandardOpaqueMaterial::new(&mut model).unwrap();
        StandardOpaqueMaterial::new(&mut model).unwrap();
        Construction::with_layers(&mut model, &[used.into()]).unwrap();

        let mut translator = ForwardTranslator::with_default_handlers()
            .with_options(ForwardTranslatorOptions::new().with_translate_unused_resources(false));
        let result = translator.translate_model(&model).unwrap();
        // Only the layer is referenced; the construction itself has no holder
        assert_eq!(result.output.handles_by_type(&IddObjectType::Material).len(), 1);
        assert!(result.output.handles_by_type(&IddObjectType::Construction).is_empty());

        let mut translator = ForwardTranslator::with_default_handlers();
        let result = translator.translate_model(&model).unwrap();
        assert_eq!(result.output.handles_by_type(&IddObjectType::Material).len(), 2);
    }

    #[test]
    fn test_translate_single_object_pulls_dependencies() {
        let mut model = Model::new();
        let zone = ThermalZone::new(&mut model).unwrap();
        let space = Space::new(&mut model).unwrap();
        space.set_thermal_zone(&mut model, Some(zone)).unwrap();
        let wall = Surface::new(&mut model, space).unwrap();
        StandardOpaqueMaterial::new(&mut model).unwrap();

        let mut translator = ForwardTranslator::with_default_handlers();
        let result = translator.translate_model_object(&model, wall.handle()).unwrap();
        assert_eq!(result.output.handles_by_type(&IddObjectType::Zone).len(), 1);
        assert_eq!(result.output.handles_by_type(&IddObjectType::BuildingSurfaceDetailed).len(), 1);
        assert!(result.output.handles_by_type(&IddObjectType::Material).is_empty());
    }
}
