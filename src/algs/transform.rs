//! Coordinate-system transformation of nodal parameters.
//!
//! Applies a linear map plus offset to every nodal parameter set of a
//! coordinate field, across all derivatives and versions. The offset is
//! added to VALUE parameters only: derivatives are direction/rate
//! quantities and invariant under translation.

use crate::algs::vectorops;
use crate::data::cache::FieldCache;
use crate::data::derivative::DerivativeLabel;
use crate::data::field::{CoordinateSystemType, Field};
use crate::data::nodeset::Nodeset;
use crate::events::ChangeScope;
use crate::mesh_error::MeshFieldsError;

/// Transforms `field`'s nodal parameters by `new = rotation_scale * old`,
/// plus `offset` on VALUE parameters.
///
/// Preconditions are validated before any mutation: the field must have 2
/// or 3 components, be finite-element typed, use rectangular cartesian
/// coordinates, and `rotation_scale`/`offset` must be conformant. Any
/// violation returns `Err(Validation)` with nothing written.
///
/// The sweep visits every node in ascending-identifier order, every
/// derivative in [`DerivativeLabel::ALL`] order, every stored version.
/// Slots a node does not store are skipped. Individual read/write failures
/// are logged and counted but do not abort the sweep, so valid nodes are
/// still transformed; if any slot failed the call returns
/// `Err(TransformIncomplete)` after completing.
///
/// The whole sweep is one batched change on the nodeset: observers see
/// either no change (validation failure) or a single update.
pub fn transform_coordinates(
    nodeset: &mut Nodeset,
    field: &Field,
    rotation_scale: &[Vec<f64>],
    offset: &[f64],
    time: f64,
) -> Result<(), MeshFieldsError> {
    let ncomp = field.component_count();
    if ncomp != 2 && ncomp != 3 {
        return Err(MeshFieldsError::Validation(format!(
            "field `{}` has invalid number of components {ncomp}",
            field.name()
        )));
    }
    if rotation_scale.len() != ncomp || offset.len() != ncomp {
        return Err(MeshFieldsError::Validation(
            "invalid matrix number of rows or offset size".into(),
        ));
    }
    if rotation_scale.iter().any(|row| row.len() != ncomp) {
        return Err(MeshFieldsError::Validation(
            "invalid matrix number of columns".into(),
        ));
    }
    if field.coordinate_system() != CoordinateSystemType::RectangularCartesian {
        return Err(MeshFieldsError::Validation(format!(
            "field `{}` is not rectangular cartesian",
            field.name()
        )));
    }
    if !field.is_finite_element() {
        return Err(MeshFieldsError::Validation(format!(
            "field `{}` is not finite-element typed",
            field.name()
        )));
    }

    let _scope = ChangeScope::begin(nodeset.change_tracker());
    let mut cache = FieldCache::new();
    cache.set_time(time);
    let mut template = nodeset.create_template();
    let mut failures = 0usize;
    let nodes: Vec<_> = nodeset.node_identifiers().collect();
    for node in nodes {
        // Migrate the template to this node's actual layout; nodes that do
        // not store the field at all are skipped entirely.
        if template
            .define_field_from_node(field, nodeset, node)
            .is_err()
        {
            continue;
        }
        cache.bind_node(node);
        for derivative in DerivativeLabel::ALL {
            let versions = template.value_number_of_versions(field, derivative);
            for version in 1..=versions {
                let values =
                    match nodeset.get_node_parameters(&cache, field, derivative, version) {
                        Ok(values) => values,
                        Err(err) => {
                            log::warn!(
                                "transform_coordinates: read failed at node {node}: {err}"
                            );
                            failures += 1;
                            continue;
                        }
                    };
                let transformed = vectorops::matrix_vector_mult(rotation_scale, &values)
                    .and_then(|new_values| {
                        if derivative.is_value() {
                            vectorops::add(&new_values, offset)
                        } else {
                            Ok(new_values)
                        }
                    });
                let result = transformed.and_then(|new_values| {
                    nodeset.set_node_parameters(&cache, field, derivative, version, &new_values)
                });
                if let Err(err) = result {
                    log::warn!("transform_coordinates: write failed at node {node}: {err}");
                    failures += 1;
                }
            }
        }
    }
    if failures > 0 {
        log::warn!(
            "transform_coordinates: failed to get/set {failures} parameter(s) of field `{}`",
            field.name()
        );
        return Err(MeshFieldsError::TransformIncomplete { failures });
    }
    Ok(())
}
