//! Node templates: reusable blueprints describing the parameters nodes store.
//!
//! A template is mutable until applied; applying it to a store copies its
//! per-field layouts into the new node. Templates never hold values, only
//! layout.

use std::collections::HashMap;

use crate::data::derivative::DerivativeLabel;
use crate::data::field::Field;
use crate::data::nodeset::Nodeset;
use crate::data::parameters::{ParameterAtlas, Version};
use crate::mesh_error::MeshFieldsError;
use crate::topology::node::NodeId;

#[derive(Clone, Debug)]
pub(crate) struct TemplateEntry {
    pub(crate) field: Field,
    pub(crate) layout: ParameterAtlas,
}

/// Blueprint for the per-field parameter layout of nodes.
#[derive(Clone, Debug, Default)]
pub struct NodeTemplate {
    entries: HashMap<String, TemplateEntry>,
}

impl NodeTemplate {
    /// Creates a template with no fields defined.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that nodes built from this template store parameters for
    /// `field` at derivative VALUE, version 1.
    ///
    /// Re-defining a field resets any extra derivatives/versions previously
    /// declared for it.
    ///
    /// # Errors
    /// Returns `Err(InvalidField)` if `field` is not finite-element typed.
    pub fn define_field(&mut self, field: &Field) -> Result<(), MeshFieldsError> {
        if !field.is_finite_element() {
            return Err(MeshFieldsError::InvalidField(field.name().to_string()));
        }
        let mut layout = ParameterAtlas::new(field.component_count());
        layout.try_insert(DerivativeLabel::Value, 1)?;
        self.entries.insert(
            field.name().to_string(),
            TemplateEntry {
                field: field.clone(),
                layout,
            },
        );
        Ok(())
    }

    /// Declares exactly `versions` versions of `derivative` for `field`.
    ///
    /// `versions == 0` removes the derivative from the layout.
    ///
    /// # Errors
    /// Returns `Err(FieldNotDefined)` if `field` has not been defined on
    /// this template.
    pub fn set_value_number_of_versions(
        &mut self,
        field: &Field,
        derivative: DerivativeLabel,
        versions: Version,
    ) -> Result<(), MeshFieldsError> {
        let entry = self
            .entries
            .get_mut(field.name())
            .ok_or_else(|| MeshFieldsError::FieldNotDefined(field.name().to_string()))?;
        entry.layout.set_versions(derivative, versions)
    }

    /// Number of versions of `derivative` declared for `field` (0 if the
    /// field or derivative is not on the template).
    pub fn value_number_of_versions(&self, field: &Field, derivative: DerivativeLabel) -> Version {
        self.entries
            .get(field.name())
            .map(|e| e.layout.versions(derivative))
            .unwrap_or(0)
    }

    /// Replaces this template's layout for `field` with the layout `node`
    /// actually stores, so the template can migrate field definitions across
    /// differently-structured nodes.
    ///
    /// # Errors
    /// Returns `Err(UnknownNode)` if `node` is not in `nodeset`, or
    /// `Err(NotEvaluable)` if the node does not store `field`.
    pub fn define_field_from_node(
        &mut self,
        field: &Field,
        nodeset: &Nodeset,
        node: NodeId,
    ) -> Result<(), MeshFieldsError> {
        if !field.is_finite_element() {
            return Err(MeshFieldsError::InvalidField(field.name().to_string()));
        }
        let params = nodeset.field_parameters(node, field)?;
        self.entries.insert(
            field.name().to_string(),
            TemplateEntry {
                field: field.clone(),
                layout: params.atlas().clone(),
            },
        );
        Ok(())
    }

    /// Whether no fields are defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.values()
    }
}
