// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resource sharing
//!
//! Resource objects (materials, constructions, definitions, ...) may be
//! referenced by many holders. This module counts inbound references,
//! deduplicates structurally equal resources, splits a shared resource off
//! for one holder, and purges unreferenced resources.

use crate::Workspace;
use idf_lite_model::{
    FieldValue, Handle, IddObjectType, IdfObject, ObjectResolver, ObjectResolverExt, Result,
    WorkspaceError, WorkspaceObject,
};

/// Nesting limit for structural comparison of reference chains
const MAX_DEPTH: usize = 32;

/// One reference from a holder's field to a target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InboundEdge {
    pub holder: Handle,
    /// Flattened field index within the holder
    pub index: usize,
}

/// Every live reference to `target`, in store order
pub fn direct_users(store: &dyn ObjectResolver, target: Handle) -> Vec<InboundEdge> {
    let mut edges = Vec::new();
    for holder in store.handles() {
        let Some(object) = store.get(holder) else {
            continue;
        };
        for (index, _) in object.references() {
            if store.resolve_field(holder, index).handle() == Some(target) {
                edges.push(InboundEdge { holder, index });
            }
        }
    }
    edges
}

/// Number of distinct objects referencing `target` (self references excluded)
pub fn inbound_reference_count(store: &dyn ObjectResolver, target: Handle) -> usize {
    let mut holders: Vec<Handle> = direct_users(store, target)
        .into_iter()
        .map(|e| e.holder)
        .filter(|h| *h != target)
        .collect();
    holders.dedup();
    holders.len()
}

fn same_store(a: &dyn ObjectResolver, b: &dyn ObjectResolver) -> bool {
    std::ptr::eq(
        a as *const dyn ObjectResolver as *const (),
        b as *const dyn ObjectResolver as *const (),
    )
}

/// Structural equality of two objects, possibly in different stores
///
/// Compares type and every field except the name. Reference fields are equal
/// when their targets are structurally equal, or when both are unresolved
/// with the same text.
pub fn structurally_equal(
    a_store: &dyn ObjectResolver,
    a: Handle,
    b_store: &dyn ObjectResolver,
    b: Handle,
) -> bool {
    equal_at_depth(a_store, a, b_store, b, 0)
}

fn equal_at_depth(
    a_store: &dyn ObjectResolver,
    a: Handle,
    b_store: &dyn ObjectResolver,
    b: Handle,
    depth: usize,
) -> bool {
    if a == b && same_store(a_store, b_store) {
        return true;
    }
    if depth > MAX_DEPTH {
        return false;
    }
    let (Some(left), Some(right)) = (a_store.get(a), b_store.get(b)) else {
        return false;
    };
    if left.object_type != right.object_type
        || left.fields.len() != right.fields.len()
        || left.groups.len() != right.groups.len()
        || left.num_fields() != right.num_fields()
    {
        return false;
    }

    left.values()
        .zip(right.values())
        .enumerate()
        .all(|(index, (lv, rv))| match (lv, rv) {
            (FieldValue::Reference(lr), FieldValue::Reference(rr)) => {
                match (
                    a_store.resolve_field(a, index).handle(),
                    b_store.resolve_field(b, index).handle(),
                ) {
                    (Some(lt), Some(rt)) => equal_at_depth(a_store, lt, b_store, rt, depth + 1),
                    (None, None) => lr == rr,
                    _ => false,
                }
            }
            _ => lv == rv,
        })
}

/// First object in `store` structurally equal to `source`'s object `handle`
///
/// When both are the same store the object itself is skipped.
pub fn find_equivalent(
    store: &dyn ObjectResolver,
    source: &dyn ObjectResolver,
    handle: Handle,
) -> Option<Handle> {
    let object = source.get(handle)?;
    let skip_self = same_store(store, source);
    store
        .objects_by_type(&object.object_type)
        .into_iter()
        .map(|candidate| candidate.handle)
        .find(|candidate| {
            !(skip_self && *candidate == handle)
                && structurally_equal(store, *candidate, source, handle)
        })
}

impl Workspace {
    /// Add a resource, reusing a structurally equal one if present
    ///
    /// Non-resource types are added unconditionally.
    pub fn add_resource(&mut self, object: IdfObject) -> Result<Handle> {
        let is_resource = self.registry().is_resource_type(&object.object_type);
        let handle = self.add_idf_object(object)?;
        if !is_resource {
            return Ok(handle);
        }
        match find_equivalent(&*self, &*self, handle) {
            Some(existing) => {
                self.remove_object(handle);
                log::debug!("Reusing equivalent resource {}", existing);
                Ok(existing)
            }
            None => Ok(handle),
        }
    }

    /// Number of distinct holders referencing `target`
    pub fn inbound_reference_count(&self, target: Handle) -> usize {
        inbound_reference_count(self, target)
    }

    /// Give `holder` its own copy of `target` when others share it
    ///
    /// Every field of `holder` that points at `target` is rewired to the copy,
    /// so the original's holder count drops by one. Returns the handle the
    /// holder now references.
    pub fn ensure_unique(&mut self, target: Handle, holder: Handle) -> Result<Handle> {
        let slots: Vec<usize> = direct_users(&*self, target)
            .into_iter()
            .filter(|e| e.holder == holder)
            .map(|e| e.index)
            .collect();
        if slots.is_empty() {
            return Err(WorkspaceError::InvalidReference { holder, target });
        }
        if inbound_reference_count(&*self, target) <= 1 {
            return Ok(target);
        }

        let mut copy = self
            .idf_object(target)
            .ok_or(WorkspaceError::ObjectNotFound(target))?;
        if let Some(name) = copy.name.as_deref() {
            copy.name = Some(self.make_unique_name(&copy.object_type, name));
        }
        let unique = self.add_idf_object(copy)?;
        for index in slots {
            self.set_field(holder, index, unique)?;
        }
        log::debug!("Split shared {} off for holder {}", target, holder);
        Ok(unique)
    }

    /// Apply [`Workspace::ensure_unique`] to every target referenced from the
    /// holder's extensible groups, in group order
    pub fn ensure_unique_extensible_targets(&mut self, holder: Handle) -> Result<Vec<Handle>> {
        let object = self.get_or_err(holder)?;
        let fixed = object.fields.len();
        let group_size = self.registry().extensible_descriptors(&object.object_type).len();
        let group_count = object.num_groups();

        let mut targets = Vec::new();
        for group in 0..group_count {
            for offset in 0..group_size {
                let index = fixed + group * group_size + offset;
                if let Some(target) = self.resolve_field(holder, index).handle() {
                    targets.push(self.ensure_unique(target, holder)?);
                }
            }
        }
        Ok(targets)
    }

    /// Remove every resource of `object_type` with no inbound references
    ///
    /// Repeats until stable, so resources only kept alive by other purged
    /// resources of the same type go too.
    pub fn purge_unused_resource_objects(&mut self, object_type: &IddObjectType) -> Vec<WorkspaceObject> {
        let mut removed = Vec::new();
        if !self.registry().is_resource_type(object_type) {
            return removed;
        }
        loop {
            let unused: Vec<Handle> = self
                .handles_by_type(object_type)
                .into_iter()
                .filter(|h| inbound_reference_count(&*self, *h) == 0)
                .collect();
            if unused.is_empty() {
                break;
            }
            removed.extend(unused.into_iter().filter_map(|h| self.remove_object(h)));
        }
        if !removed.is_empty() {
            log::debug!("Purged {} unused {} objects", removed.len(), object_type);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idf_lite_model::idd::fields;
    use idf_lite_model::SchemaRegistry;
    use std::sync::Arc;

    fn ws() -> Workspace {
        Workspace::new(Arc::new(SchemaRegistry::model()))
    }

    fn construction(ws: &mut Workspace, name: &str, layers: &[Handle]) -> Handle {
        let c = ws.add_object(IddObjectType::OsConstruction, Some(name), vec![]).unwrap();
        for layer in layers {
            ws.push_extensible_group(c, vec![(*layer).into()]).unwrap();
        }
        c
    }

    #[test]
    fn test_inbound_count_counts_holders() {
        let mut ws = ws();
        let m = ws.add_object(IddObjectType::OsMaterial, Some("M"), vec![]).unwrap();
        let a = construction(&mut ws, "A", &[m, m]);
        construction(&mut ws, "B", &[m]);
        assert_eq!(direct_users(&ws, m).len(), 3);
        assert_eq!(ws.inbound_reference_count(m), 2);
        assert_eq!(direct_users(&ws, m)[0], InboundEdge { holder: a, index: 0 });
    }

    #[test]
    fn test_add_resource_deduplicates() {
        let mut ws = ws();
        let first = ws
            .add_resource(IdfObject::new(IddObjectType::OsMaterial).with_name("Brick"))
            .unwrap();
        let second = ws
            .add_resource(IdfObject::new(IddObjectType::OsMaterial).with_name("Brick Copy"))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(ws.len(), 1);

        let different = ws
            .add_resource(
                IdfObject::new(IddObjectType::OsMaterial)
                    .with_name("Concrete")
                    .with_field("MediumRough"),
            )
            .unwrap();
        assert_ne!(first, different);
    }

    #[test]
    fn test_structural_equality_follows_references() {
        let mut ws = ws();
        let m1 = ws.add_object(IddObjectType::OsMaterial, Some("M1"), vec![]).unwrap();
        let m2 = ws.add_object(IddObjectType::OsMaterial, Some("M2"), vec![]).unwrap();
        let m3 = ws
            .add_object(IddObjectType::OsMaterial, Some("M3"), vec!["Rough".into()])
            .unwrap();
        let a = construction(&mut ws, "A", &[m1]);
        let b = construction(&mut ws, "B", &[m2]);
        let c = construction(&mut ws, "C", &[m3]);
        assert!(structurally_equal(&ws, a, &ws, b));
        assert!(!structurally_equal(&ws, a, &ws, c));
        assert_eq!(find_equivalent(&ws, &ws, a), Some(b));
    }

    #[test]
    fn test_ensure_unique_splits_shared_resource() {
        let mut ws = ws();
        let m = ws.add_object(IddObjectType::OsMaterial, Some("M"), vec![]).unwrap();
        let a = construction(&mut ws, "A", &[m]);
        let b = construction(&mut ws, "B", &[m]);

        let unique = ws.ensure_unique(m, a).unwrap();
        assert_ne!(unique, m);
        assert_eq!(ws.inbound_reference_count(m), 1);
        assert_eq!(ws.inbound_reference_count(unique), 1);
        assert_eq!(ws.resolve_field(a, 0).handle(), Some(unique));
        assert_eq!(ws.resolve_field(b, 0).handle(), Some(m));
        assert_eq!(ws.get_object(unique).unwrap().name_str(), "M 1");

        // Editing the copy leaves the shared original alone
        let before = ws.get_object(m).unwrap().fields.clone();
        ws.set_field(unique, fields::material::THICKNESS, 0.25).unwrap();
        ws.set_field(unique, fields::material::ROUGHNESS, "VeryRough").unwrap();
        assert_eq!(ws.get_object(m).unwrap().fields, before);
        assert_eq!(ws.get_object(unique).unwrap().get_double(fields::material::THICKNESS), Some(0.25));
        assert_eq!(ws.inbound_reference_count(m), 1);

        // Already unique: no-op
        assert_eq!(ws.ensure_unique(m, b).unwrap(), m);
        assert!(matches!(
            ws.ensure_unique(unique, b),
            Err(WorkspaceError::InvalidReference { .. })
        ));
    }

    #[test]
    fn test_ensure_unique_extensible_targets() {
        let mut ws = ws();
        let m1 = ws.add_object(IddObjectType::OsMaterial, Some("M1"), vec![]).unwrap();
        let m2 = ws.add_object(IddObjectType::OsMaterial, Some("M2"), vec![]).unwrap();
        let a = construction(&mut ws, "A", &[m1, m2]);
        construction(&mut ws, "B", &[m1]);

        let layers = ws.ensure_unique_extensible_targets(a).unwrap();
        assert_eq!(layers.len(), 2);
        assert_ne!(layers[0], m1);
        assert_eq!(layers[1], m2);
        for layer in layers {
            assert_eq!(ws.inbound_reference_count(layer), 1);
        }
    }

    #[test]
    fn test_purge_is_idempotent() {
        let mut ws = ws();
        let used = ws.add_object(IddObjectType::OsMaterial, Some("Used"), vec![]).unwrap();
        ws.add_object(IddObjectType::OsMaterial, Some("Unused"), vec![]).unwrap();
        construction(&mut ws, "C", &[used]);

        let removed = ws.purge_unused_resource_objects(&IddObjectType::OsMaterial);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].name_str(), "Unused");
        assert!(ws.purge_unused_resource_objects(&IddObjectType::OsMaterial).is_empty());

        // Non-resource types are never purged
        ws.add_object(IddObjectType::OsSpace, Some("S"), vec![]).unwrap();
        assert!(ws.purge_unused_resource_objects(&IddObjectType::OsSpace).is_empty());
    }

    #[test]
    fn test_purge_leaves_resources_held_by_non_resources() {
        let mut ws = ws();
        let zone = ws.add_object(IddObjectType::OsThermalZone, Some("Z"), vec![]).unwrap();
        let space_type = ws.add_object(IddObjectType::OsSpaceType, Some("Office"), vec![]).unwrap();
        ws.add_object(
            IddObjectType::OsSpace,
            Some("S"),
            vec![space_type.into(), FieldValue::Null, zone.into()],
        )
        .unwrap();
        assert!(ws
            .purge_unused_resource_objects(&IddObjectType::OsSpaceType)
            .is_empty());
    }
}
