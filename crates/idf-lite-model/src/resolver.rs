// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object lookup and reference resolution trait

use crate::{
    normalize_name, FieldValue, Handle, IddObjectType, Reference, SchemaRegistry, WorkspaceObject,
};

/// Outcome of resolving a reference
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReferenceResolution {
    /// Exactly one live target
    Resolved(Handle),
    /// Unset, empty, dangling or of a type the field does not accept
    Missing,
    /// Several same-named candidates, in store order
    Ambiguous(Vec<Handle>),
}

impl ReferenceResolution {
    /// The target when resolution is unambiguous
    pub fn handle(&self) -> Option<Handle> {
        match self {
            ReferenceResolution::Resolved(h) => Some(*h),
            _ => None,
        }
    }

    /// The target, or the first candidate of an ambiguous match
    pub fn first_candidate(&self) -> Option<Handle> {
        match self {
            ReferenceResolution::Resolved(h) => Some(*h),
            ReferenceResolution::Ambiguous(candidates) => candidates.first().copied(),
            ReferenceResolution::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ReferenceResolution::Missing)
    }
}

/// Object lookup and reference resolution
///
/// Implemented by object stores. Lookups by type and name return objects in
/// store (insertion) order; name lookups are case-insensitive and ignore
/// surrounding whitespace.
///
/// # Example
///
/// ```ignore
/// use idf_lite_model::{ObjectResolver, Handle};
///
/// fn construction_of(store: &dyn ObjectResolver, surface: Handle) -> Option<Handle> {
///     store.resolve_field(surface, 1).handle()
/// }
/// ```
pub trait ObjectResolver: Send + Sync {
    /// Schema registry the store validates against
    fn schema(&self) -> &SchemaRegistry;

    /// Get object by handle
    fn get(&self, handle: Handle) -> Option<&WorkspaceObject>;

    /// All objects of a type, in store order
    fn objects_by_type(&self, object_type: &IddObjectType) -> Vec<&WorkspaceObject>;

    /// All objects of a type with the given name, in store order
    fn objects_by_name(&self, object_type: &IddObjectType, name: &str) -> Vec<&WorkspaceObject>;

    /// All handles, in store order
    fn handles(&self) -> Vec<Handle>;

    /// Get total object count
    fn object_count(&self) -> usize {
        self.handles().len()
    }

    /// Position of an object in store order
    fn position(&self, handle: Handle) -> Option<usize> {
        self.handles().iter().position(|h| *h == handle)
    }

    /// First object of a type with the given name
    fn object_by_name(&self, object_type: &IddObjectType, name: &str) -> Option<&WorkspaceObject> {
        self.objects_by_name(object_type, name).into_iter().next()
    }

    /// Resolve a reference against the accepted target types
    ///
    /// An empty `targets` list accepts any type.
    fn resolve(&self, reference: &Reference, targets: &[IddObjectType]) -> ReferenceResolution {
        match reference {
            Reference::ByHandle(handle) => match self.get(*handle) {
                Some(obj) if targets.is_empty() || targets.contains(&obj.object_type) => {
                    ReferenceResolution::Resolved(*handle)
                }
                _ => ReferenceResolution::Missing,
            },
            Reference::ByName(name) => {
                if name.trim().is_empty() {
                    return ReferenceResolution::Missing;
                }
                let candidates: Vec<Handle> = if targets.is_empty() {
                    let wanted = normalize_name(name);
                    self.handles()
                        .into_iter()
                        .filter(|h| {
                            self.get(*h)
                                .and_then(|o| o.name.as_deref())
                                .is_some_and(|n| normalize_name(n) == wanted)
                        })
                        .collect()
                } else {
                    let mut found: Vec<&WorkspaceObject> = targets
                        .iter()
                        .flat_map(|ty| self.objects_by_name(ty, name))
                        .collect();
                    if targets.len() > 1 {
                        found.sort_by_key(|o| self.position(o.handle));
                    }
                    found.into_iter().map(|o| o.handle).collect()
                };
                match candidates.len() {
                    0 => ReferenceResolution::Missing,
                    1 => ReferenceResolution::Resolved(candidates[0]),
                    _ => ReferenceResolution::Ambiguous(candidates),
                }
            }
        }
    }

    /// Resolve a field value; non-reference values are Missing
    fn resolve_value(&self, value: &FieldValue, targets: &[IddObjectType]) -> ReferenceResolution {
        match value.as_reference() {
            Some(reference) => self.resolve(reference, targets),
            None => ReferenceResolution::Missing,
        }
    }

    /// Resolve the reference stored at a flattened field index, using the
    /// field descriptor's accepted target types
    fn resolve_field(&self, holder: Handle, index: usize) -> ReferenceResolution {
        let Some(obj) = self.get(holder) else {
            return ReferenceResolution::Missing;
        };
        let Some(value) = obj.get(index) else {
            return ReferenceResolution::Missing;
        };
        let targets = self
            .schema()
            .schema(&obj.object_type)
            .and_then(|s| s.descriptor(index))
            .map(|d| d.object_list.clone())
            .unwrap_or_default();
        self.resolve_value(value, &targets)
    }
}

/// Extension methods for ObjectResolver
pub trait ObjectResolverExt: ObjectResolver {
    /// Check if an object exists
    fn exists(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Get object or return error
    fn get_or_err(&self, handle: Handle) -> crate::Result<&WorkspaceObject> {
        self.get(handle)
            .ok_or(crate::WorkspaceError::ObjectNotFound(handle))
    }

    /// Count objects of a type
    fn count_by_type(&self, object_type: &IddObjectType) -> usize {
        self.objects_by_type(object_type).len()
    }

    /// Objects whose parent field resolves to `parent`, in store order
    fn children(&self, parent: Handle) -> Vec<Handle> {
        let registry = self.schema();
        self.handles()
            .into_iter()
            .filter(|h| {
                self.get(*h)
                    .and_then(|o| registry.schema(&o.object_type))
                    .and_then(|s| s.parent_field)
                    .is_some_and(|index| self.resolve_field(*h, index).handle() == Some(parent))
            })
            .collect()
    }

    /// Owning object through the schema's parent field
    fn parent(&self, child: Handle) -> Option<Handle> {
        let obj = self.get(child)?;
        let index = self.schema().schema(&obj.object_type)?.parent_field?;
        self.resolve_field(child, index).handle()
    }
}

// Blanket implementation for all ObjectResolver types
impl<T: ObjectResolver + ?Sized> ObjectResolverExt for T {}
