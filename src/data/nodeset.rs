//! Nodeset: the node store.
//!
//! Owns node identities and, per node, per-field parameter sets (value,
//! derivatives, versions) plus stored strings for name-type fields. Nodes
//! are kept in a `BTreeMap` so iteration is always in ascending identifier
//! order, which every bulk operation in this crate relies on for
//! determinism.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::data::cache::FieldCache;
use crate::data::derivative::DerivativeLabel;
use crate::data::field::{Field, FieldKind};
use crate::data::node_template::NodeTemplate;
use crate::data::parameters::{FieldParameters, Version};
use crate::events::ChangeTracker;
use crate::mesh_error::MeshFieldsError;
use crate::topology::node::NodeId;

#[derive(Clone, Debug, Default)]
struct Node {
    fields: HashMap<String, FieldParameters>,
    strings: HashMap<String, String>,
}

/// Named collection of nodes with per-field nodal parameters.
#[derive(Debug)]
pub struct Nodeset {
    name: String,
    nodes: BTreeMap<NodeId, Node>,
    tracker: Rc<ChangeTracker>,
}

impl Nodeset {
    /// Creates an empty nodeset.
    pub fn new(name: impl Into<String>) -> Self {
        Nodeset {
            name: name.into(),
            nodes: BTreeMap::new(),
            tracker: Rc::new(ChangeTracker::new()),
        }
    }

    /// Nodeset name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to this store's change tracker, for scoped batching.
    pub fn change_tracker(&self) -> Rc<ChangeTracker> {
        Rc::clone(&self.tracker)
    }

    /// Returns a fresh, mutable node blueprint with no fields defined.
    pub fn create_template(&self) -> NodeTemplate {
        NodeTemplate::new()
    }

    /// Allocates a new node with storage for every field in `template`,
    /// all values initialized to zero.
    ///
    /// `id_hint = None` assigns the smallest unused identifier >= 0.
    ///
    /// # Errors
    /// Returns `Err(DuplicateNodeIdentifier)` if `id_hint` is already used.
    pub fn create_node(
        &mut self,
        id_hint: Option<NodeId>,
        template: &NodeTemplate,
    ) -> Result<NodeId, MeshFieldsError> {
        let id = match id_hint {
            Some(id) => {
                if self.nodes.contains_key(&id) {
                    return Err(MeshFieldsError::DuplicateNodeIdentifier(id));
                }
                id
            }
            None => self.first_free_identifier(),
        };
        let mut node = Node::default();
        for entry in template.entries() {
            node.fields.insert(
                entry.field.name().to_string(),
                FieldParameters::new(entry.layout.clone()),
            );
        }
        self.nodes.insert(id, node);
        self.tracker.note_change();
        log::trace!("nodeset `{}`: created node {id}", self.name);
        Ok(id)
    }

    /// Removes a node and all its parameters.
    ///
    /// # Errors
    /// Returns `Err(UnknownNode)` if `node` is not in the store.
    pub fn destroy_node(&mut self, node: NodeId) -> Result<(), MeshFieldsError> {
        self.nodes
            .remove(&node)
            .ok_or(MeshFieldsError::UnknownNode(node))?;
        self.tracker.note_change();
        Ok(())
    }

    /// Extends an existing node's declared storage with every layout in
    /// `template` it does not already cover; existing values are preserved.
    pub fn merge_template(
        &mut self,
        node: NodeId,
        template: &NodeTemplate,
    ) -> Result<(), MeshFieldsError> {
        let entry = self
            .nodes
            .get_mut(&node)
            .ok_or(MeshFieldsError::UnknownNode(node))?;
        for t in template.entries() {
            match entry.fields.get_mut(t.field.name()) {
                Some(params) => params.merge_layout(&t.layout)?,
                None => {
                    entry
                        .fields
                        .insert(t.field.name().to_string(), FieldParameters::new(t.layout.clone()));
                }
            }
        }
        self.tracker.note_change();
        Ok(())
    }

    /// Number of nodes in the store.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `node` is in the store.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Node identifiers in ascending order.
    pub fn node_identifiers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Reads the parameters of one (field, derivative, version) slot of the
    /// node the cache is bound to.
    ///
    /// # Errors
    /// - `CacheNotBound` if the cache is not bound to a node.
    /// - `UnknownNode` / `NotEvaluable` if the node or field storage is
    ///   missing.
    /// - `UndefinedParameter` if the node does not store that slot.
    pub fn get_node_parameters(
        &self,
        cache: &FieldCache,
        field: &Field,
        derivative: DerivativeLabel,
        version: Version,
    ) -> Result<Vec<f64>, MeshFieldsError> {
        let node = cache.node().ok_or(MeshFieldsError::CacheNotBound("node"))?;
        let params = self.field_parameters(node, field)?;
        let slice =
            params
                .restrict(derivative, version)
                .ok_or(MeshFieldsError::UndefinedParameter {
                    node,
                    field: field.name().to_string(),
                    derivative,
                    version,
                })?;
        Ok(slice.to_vec())
    }

    /// Writes the parameters of one (field, derivative, version) slot of
    /// the node the cache is bound to.
    ///
    /// # Errors
    /// As [`get_node_parameters`](Self::get_node_parameters), plus
    /// `InvalidComponentCount` if `values` does not match the field's
    /// component count.
    pub fn set_node_parameters(
        &mut self,
        cache: &FieldCache,
        field: &Field,
        derivative: DerivativeLabel,
        version: Version,
        values: &[f64],
    ) -> Result<(), MeshFieldsError> {
        if values.len() != field.component_count() {
            return Err(MeshFieldsError::InvalidComponentCount {
                field: field.name().to_string(),
                expected: field.component_count(),
                found: values.len(),
            });
        }
        let node = cache.node().ok_or(MeshFieldsError::CacheNotBound("node"))?;
        let params = self.field_parameters_mut(node, field)?;
        // the stored layout is authoritative: a same-named descriptor with a
        // different component count must not reach the copy below
        let stored = params.atlas().component_count();
        if values.len() != stored {
            return Err(MeshFieldsError::InvalidComponentCount {
                field: field.name().to_string(),
                expected: stored,
                found: values.len(),
            });
        }
        let slice =
            params
                .restrict_mut(derivative, version)
                .ok_or(MeshFieldsError::UndefinedParameter {
                    node,
                    field: field.name().to_string(),
                    derivative,
                    version,
                })?;
        slice.copy_from_slice(values);
        self.tracker.note_change();
        Ok(())
    }

    /// Writes the VALUE/version-1 parameters of the bound node; the write
    /// half of direct nodal evaluation.
    pub fn assign_real(
        &mut self,
        cache: &FieldCache,
        field: &Field,
        values: &[f64],
    ) -> Result<(), MeshFieldsError> {
        self.set_node_parameters(cache, field, DerivativeLabel::Value, 1, values)
    }

    /// Stores a string value for a stored-string field on the bound node.
    ///
    /// # Errors
    /// Returns `Err(InvalidField)` unless `field` is stored-string typed.
    pub fn assign_string(
        &mut self,
        cache: &FieldCache,
        field: &Field,
        value: impl Into<String>,
    ) -> Result<(), MeshFieldsError> {
        if field.kind() != FieldKind::StoredString {
            return Err(MeshFieldsError::InvalidField(field.name().to_string()));
        }
        let node = cache.node().ok_or(MeshFieldsError::CacheNotBound("node"))?;
        let entry = self
            .nodes
            .get_mut(&node)
            .ok_or(MeshFieldsError::UnknownNode(node))?;
        entry.strings.insert(field.name().to_string(), value.into());
        self.tracker.note_change();
        Ok(())
    }

    /// Stored string value of `field` on `node`, if any.
    pub fn string_value(&self, node: NodeId, field: &Field) -> Option<&str> {
        self.nodes
            .get(&node)?
            .strings
            .get(field.name())
            .map(String::as_str)
    }

    /// Number of versions `node` stores for (field, derivative); 0 when the
    /// node, field, or derivative is undefined.
    pub fn value_number_of_versions(
        &self,
        node: NodeId,
        field: &Field,
        derivative: DerivativeLabel,
    ) -> Version {
        self.nodes
            .get(&node)
            .and_then(|n| n.fields.get(field.name()))
            .map(|p| p.atlas().versions(derivative))
            .unwrap_or(0)
    }

    /// Whether `node` stores parameters for `field`.
    pub fn defines_field(&self, node: NodeId, field: &Field) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|n| n.fields.contains_key(field.name()))
    }

    pub(crate) fn field_parameters(
        &self,
        node: NodeId,
        field: &Field,
    ) -> Result<&FieldParameters, MeshFieldsError> {
        let entry = self
            .nodes
            .get(&node)
            .ok_or(MeshFieldsError::UnknownNode(node))?;
        entry
            .fields
            .get(field.name())
            .ok_or_else(|| MeshFieldsError::NotEvaluable {
                field: field.name().to_string(),
            })
    }

    fn field_parameters_mut(
        &mut self,
        node: NodeId,
        field: &Field,
    ) -> Result<&mut FieldParameters, MeshFieldsError> {
        let entry = self
            .nodes
            .get_mut(&node)
            .ok_or(MeshFieldsError::UnknownNode(node))?;
        entry
            .fields
            .get_mut(field.name())
            .ok_or_else(|| MeshFieldsError::NotEvaluable {
                field: field.name().to_string(),
            })
    }

    /// Smallest identifier >= 0 not yet in use.
    fn first_free_identifier(&self) -> NodeId {
        let mut candidate = 0u64;
        for id in self.nodes.keys() {
            if id.get() == candidate {
                candidate += 1;
            } else if id.get() > candidate {
                break;
            }
        }
        NodeId::new(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::field::CoordinateSystemType;

    fn coordinates() -> Field {
        Field::finite_element("coordinates", 2, CoordinateSystemType::RectangularCartesian).unwrap()
    }

    fn nodeset_with_template() -> (Nodeset, NodeTemplate, Field) {
        let nodeset = Nodeset::new("nodes");
        let field = coordinates();
        let mut template = nodeset.create_template();
        template.define_field(&field).unwrap();
        (nodeset, template, field)
    }

    #[test]
    fn automatic_identifiers_fill_gaps() {
        let (mut ns, template, _) = nodeset_with_template();
        let a = ns.create_node(None, &template).unwrap();
        let b = ns.create_node(None, &template).unwrap();
        let c = ns.create_node(None, &template).unwrap();
        assert_eq!((a.get(), b.get(), c.get()), (0, 1, 2));

        ns.destroy_node(b).unwrap();
        let d = ns.create_node(None, &template).unwrap();
        assert_eq!(d.get(), 1);
        let e = ns.create_node(None, &template).unwrap();
        assert_eq!(e.get(), 3);
    }

    #[test]
    fn duplicate_identifier_rejected() {
        let (mut ns, template, _) = nodeset_with_template();
        ns.create_node(Some(NodeId::new(4)), &template).unwrap();
        assert_eq!(
            ns.create_node(Some(NodeId::new(4)), &template).unwrap_err(),
            MeshFieldsError::DuplicateNodeIdentifier(NodeId::new(4))
        );
        // the failed create must not have disturbed the store
        assert_eq!(ns.len(), 1);
    }

    #[test]
    fn parameters_roundtrip() {
        let (mut ns, template, field) = nodeset_with_template();
        let node = ns.create_node(None, &template).unwrap();
        let mut cache = FieldCache::new();
        cache.bind_node(node);

        // zero-initialized
        assert_eq!(
            ns.get_node_parameters(&cache, &field, DerivativeLabel::Value, 1)
                .unwrap(),
            vec![0.0, 0.0]
        );
        ns.set_node_parameters(&cache, &field, DerivativeLabel::Value, 1, &[3.0, 4.0])
            .unwrap();
        assert_eq!(
            ns.get_node_parameters(&cache, &field, DerivativeLabel::Value, 1)
                .unwrap(),
            vec![3.0, 4.0]
        );
    }

    #[test]
    fn component_count_enforced() {
        let (mut ns, template, field) = nodeset_with_template();
        let node = ns.create_node(None, &template).unwrap();
        let mut cache = FieldCache::new();
        cache.bind_node(node);
        assert_eq!(
            ns.set_node_parameters(&cache, &field, DerivativeLabel::Value, 1, &[1.0])
                .unwrap_err(),
            MeshFieldsError::InvalidComponentCount {
                field: "coordinates".into(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn stored_layout_width_wins_over_descriptor() {
        let (mut ns, template, _) = nodeset_with_template();
        let node = ns.create_node(None, &template).unwrap();
        let mut cache = FieldCache::new();
        cache.bind_node(node);

        // a distinct field that happens to share the stored field's name
        let wide =
            Field::finite_element("coordinates", 3, CoordinateSystemType::RectangularCartesian)
                .unwrap();
        assert_eq!(
            ns.set_node_parameters(&cache, &wide, DerivativeLabel::Value, 1, &[1.0, 2.0, 3.0])
                .unwrap_err(),
            MeshFieldsError::InvalidComponentCount {
                field: "coordinates".into(),
                expected: 2,
                found: 3
            }
        );
        // the node's stored values are untouched
        assert_eq!(
            ns.get_node_parameters(&cache, &coordinates(), DerivativeLabel::Value, 1)
                .unwrap(),
            vec![0.0, 0.0]
        );
    }

    #[test]
    fn undefined_parameter_reported() {
        let (mut ns, template, field) = nodeset_with_template();
        let node = ns.create_node(None, &template).unwrap();
        let mut cache = FieldCache::new();
        cache.bind_node(node);
        let err = ns
            .get_node_parameters(&cache, &field, DerivativeLabel::D_Ds1, 1)
            .unwrap_err();
        assert!(matches!(
            err,
            MeshFieldsError::UndefinedParameter {
                derivative: DerivativeLabel::D_Ds1,
                version: 1,
                ..
            }
        ));
    }

    #[test]
    fn unbound_cache_rejected() {
        let (mut ns, template, field) = nodeset_with_template();
        ns.create_node(None, &template).unwrap();
        let cache = FieldCache::new();
        assert_eq!(
            ns.get_node_parameters(&cache, &field, DerivativeLabel::Value, 1)
                .unwrap_err(),
            MeshFieldsError::CacheNotBound("node")
        );
    }

    #[test]
    fn merge_template_extends_storage() {
        let (mut ns, template, field) = nodeset_with_template();
        let node = ns.create_node(None, &template).unwrap();
        let mut cache = FieldCache::new();
        cache.bind_node(node);
        ns.assign_real(&cache, &field, &[1.0, 2.0]).unwrap();

        let mut wider = ns.create_template();
        wider.define_field(&field).unwrap();
        wider
            .set_value_number_of_versions(&field, DerivativeLabel::D_Ds1, 2)
            .unwrap();
        ns.merge_template(node, &wider).unwrap();

        assert_eq!(
            ns.value_number_of_versions(node, &field, DerivativeLabel::D_Ds1),
            2
        );
        // values survive the merge
        assert_eq!(
            ns.get_node_parameters(&cache, &field, DerivativeLabel::Value, 1)
                .unwrap(),
            vec![1.0, 2.0]
        );
    }

    #[test]
    fn string_values() {
        let (mut ns, mut template, _field) = nodeset_with_template();
        let name_field = Field::stored_string("name");
        // stored-string fields are not template-definable
        assert!(template.define_field(&name_field).is_err());

        let node = ns.create_node(None, &template).unwrap();
        let mut cache = FieldCache::new();
        cache.bind_node(node);
        ns.assign_string(&cache, &name_field, "apex").unwrap();
        assert_eq!(ns.string_value(node, &name_field), Some("apex"));

        // assign_string rejects non-string fields
        let err = ns.assign_string(&cache, &coordinates(), "nope").unwrap_err();
        assert_eq!(err, MeshFieldsError::InvalidField("coordinates".into()));
    }

    #[test]
    fn creation_notifies_and_batches() {
        let (mut ns, template, _) = nodeset_with_template();
        let tracker = ns.change_tracker();
        ns.create_node(None, &template).unwrap();
        assert_eq!(tracker.notifications(), 1);
        {
            let _scope = crate::events::ChangeScope::begin(ns.change_tracker());
            ns.create_node(None, &template).unwrap();
            ns.create_node(None, &template).unwrap();
            assert_eq!(tracker.notifications(), 1);
        }
        assert_eq!(tracker.notifications(), 2);
    }
}
