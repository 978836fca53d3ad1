//! Field evaluation at cache contexts, plus nodeset aggregates.
//!
//! Node-bound caches read stored VALUE/version-1 parameters directly;
//! element-bound caches interpolate `sum_i basis_i(xi) * nodal_value_i` over
//! the element's local nodes using its element field template.
//!
//! The aggregate evaluators make a single pass over the nodeset in
//! ascending-identifier order; an empty (or nowhere-evaluable) nodeset
//! yields `None` rather than a numeric error.

use std::collections::HashMap;

use crate::data::cache::{CacheBinding, FieldCache};
use crate::data::derivative::DerivativeLabel;
use crate::data::field::Field;
use crate::data::nodeset::Nodeset;
use crate::mesh::Mesh;
use crate::mesh_error::MeshFieldsError;
use crate::topology::node::NodeId;

/// Read-side evaluator over a nodeset and, optionally, a mesh for
/// element-bound contexts.
#[derive(Clone, Copy, Debug)]
pub struct FieldEvaluator<'a> {
    nodeset: &'a Nodeset,
    mesh: Option<&'a Mesh>,
}

impl<'a> FieldEvaluator<'a> {
    /// Evaluator for node-bound caches only.
    pub fn new(nodeset: &'a Nodeset) -> Self {
        FieldEvaluator {
            nodeset,
            mesh: None,
        }
    }

    /// Evaluator that can also interpolate on elements of `mesh`.
    pub fn with_mesh(nodeset: &'a Nodeset, mesh: &'a Mesh) -> Self {
        FieldEvaluator {
            nodeset,
            mesh: Some(mesh),
        }
    }

    /// Evaluates `field` as real components at the cache's bound context.
    ///
    /// # Errors
    /// - `CacheNotBound` if the cache has no binding (or an element binding
    ///   with no mesh supplied).
    /// - `NotEvaluable` if the field is undefined at the bound context.
    pub fn evaluate_real(
        &self,
        cache: &FieldCache,
        field: &Field,
    ) -> Result<Vec<f64>, MeshFieldsError> {
        match cache.binding() {
            Some(CacheBinding::Node(node)) => {
                let params = self.nodeset.field_parameters(*node, field)?;
                params
                    .restrict(DerivativeLabel::Value, 1)
                    .map(|slice| slice.to_vec())
                    .ok_or_else(|| MeshFieldsError::NotEvaluable {
                        field: field.name().to_string(),
                    })
            }
            Some(CacheBinding::Element { element, xi }) => {
                let mesh = self
                    .mesh
                    .ok_or(MeshFieldsError::CacheNotBound("mesh-backed element"))?;
                let entry = mesh.element(*element)?;
                let eft = entry.fields.get(field.name()).ok_or_else(|| {
                    MeshFieldsError::NotEvaluable {
                        field: field.name().to_string(),
                    }
                })?;
                if entry.nodes.len() != eft.node_count() {
                    return Err(MeshFieldsError::InvalidNodeCount {
                        expected: eft.node_count(),
                        found: entry.nodes.len(),
                    });
                }
                let weights = eft.basis().weights(xi)?;
                let mut out = vec![0.0; field.component_count()];
                for (local, (&weight, &node)) in
                    weights.iter().zip(entry.nodes.iter()).enumerate()
                {
                    let params = self.nodeset.field_parameters(node, field)?;
                    let values = params
                        .restrict(
                            eft.local_node_derivative(local),
                            eft.local_node_version(local),
                        )
                        .ok_or_else(|| MeshFieldsError::NotEvaluable {
                            field: field.name().to_string(),
                        })?;
                    for (acc, value) in out.iter_mut().zip(values) {
                        *acc += weight * value;
                    }
                }
                Ok(out)
            }
            None => Err(MeshFieldsError::CacheNotBound("node or element")),
        }
    }

    /// Evaluates a string-valued field at the bound node, or `None` if the
    /// cache is not node-bound or the node stores no value.
    pub fn evaluate_string(&self, cache: &FieldCache, field: &Field) -> Option<String> {
        let node = cache.node()?;
        self.nodeset.string_value(node, field).map(str::to_string)
    }
}

/// Per-component minimum of `field` over the nodeset, or `None` if the
/// field is evaluable at no node.
pub fn nodeset_minimum(nodeset: &Nodeset, field: &Field) -> Option<Vec<f64>> {
    fold_nodeset(nodeset, field, |acc, values| {
        for (a, &v) in acc.iter_mut().zip(values) {
            if v < *a {
                *a = v;
            }
        }
    })
}

/// Per-component maximum of `field` over the nodeset.
pub fn nodeset_maximum(nodeset: &Nodeset, field: &Field) -> Option<Vec<f64>> {
    fold_nodeset(nodeset, field, |acc, values| {
        for (a, &v) in acc.iter_mut().zip(values) {
            if v > *a {
                *a = v;
            }
        }
    })
}

/// Per-component mean of `field` over the nodeset.
pub fn nodeset_mean(nodeset: &Nodeset, field: &Field) -> Option<Vec<f64>> {
    let mut count = 0usize;
    let sum = fold_nodeset_counting(nodeset, field, &mut count, |acc, values| {
        for (a, &v) in acc.iter_mut().zip(values) {
            *a += v;
        }
    })?;
    let scale = 1.0 / count as f64;
    Some(sum.into_iter().map(|s| s * scale).collect())
}

/// Min and max of a coordinates field over the nodeset.
pub fn evaluate_nodeset_coordinates_range(
    nodeset: &Nodeset,
    coordinates: &Field,
) -> Option<(Vec<f64>, Vec<f64>)> {
    let min = nodeset_minimum(nodeset, coordinates)?;
    let max = nodeset_maximum(nodeset, coordinates)?;
    Some((min, max))
}

/// Mean of a coordinates field over the nodeset.
pub fn evaluate_nodeset_mean_coordinates(
    nodeset: &Nodeset,
    coordinates: &Field,
) -> Option<Vec<f64>> {
    nodeset_mean(nodeset, coordinates)
}

/// Finds the single node whose `name_field` evaluates to `name`.
///
/// Returns `None` both when no node matches and when more than one does;
/// ambiguity deliberately collapses into "no unique match".
pub fn find_node_with_name(nodeset: &Nodeset, name_field: &Field, name: &str) -> Option<NodeId> {
    let mut found = None;
    for node in nodeset.node_identifiers() {
        if nodeset.string_value(node, name_field) == Some(name) {
            if found.is_some() {
                return None;
            }
            found = Some(node);
        }
    }
    found
}

/// Running per-name coordinate accumulator.
#[derive(Clone, Debug)]
struct CentreRecord {
    sum: Vec<f64>,
    count: usize,
}

/// Mean coordinates of nodes grouped by their name-field value.
///
/// Nodes lacking a name or readable coordinates are skipped.
pub fn node_name_centres(
    nodeset: &Nodeset,
    coordinates: &Field,
    name_field: &Field,
) -> HashMap<String, Vec<f64>> {
    let mut records: HashMap<String, CentreRecord> = HashMap::new();
    for node in nodeset.node_identifiers() {
        let Some(name) = nodeset.string_value(node, name_field) else {
            continue;
        };
        let Ok(params) = nodeset.field_parameters(node, coordinates) else {
            continue;
        };
        let Some(values) = params.restrict(DerivativeLabel::Value, 1) else {
            continue;
        };
        match records.get_mut(name) {
            Some(record) => {
                for (s, &v) in record.sum.iter_mut().zip(values) {
                    *s += v;
                }
                record.count += 1;
            }
            None => {
                records.insert(
                    name.to_string(),
                    CentreRecord {
                        sum: values.to_vec(),
                        count: 1,
                    },
                );
            }
        }
    }
    records
        .into_iter()
        .map(|(name, record)| {
            let scale = 1.0 / record.count as f64;
            (name, record.sum.into_iter().map(|s| s * scale).collect())
        })
        .collect()
}

fn fold_nodeset(
    nodeset: &Nodeset,
    field: &Field,
    fold: impl FnMut(&mut Vec<f64>, &[f64]),
) -> Option<Vec<f64>> {
    let mut count = 0usize;
    fold_nodeset_counting(nodeset, field, &mut count, fold)
}

/// Single pass over all nodes in ascending-identifier order, folding the
/// VALUE/version-1 parameters of every node that defines `field`.
fn fold_nodeset_counting(
    nodeset: &Nodeset,
    field: &Field,
    count: &mut usize,
    mut fold: impl FnMut(&mut Vec<f64>, &[f64]),
) -> Option<Vec<f64>> {
    let mut acc: Option<Vec<f64>> = None;
    for node in nodeset.node_identifiers() {
        let Ok(params) = nodeset.field_parameters(node, field) else {
            continue;
        };
        let Some(values) = params.restrict(DerivativeLabel::Value, 1) else {
            continue;
        };
        *count += 1;
        match acc.as_mut() {
            Some(acc) => fold(acc, values),
            None => acc = Some(values.to_vec()),
        }
    }
    acc
}
