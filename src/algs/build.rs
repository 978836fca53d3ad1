//! Convenience builders for common node and element layouts.
//!
//! Each builder runs as one batched change per store it mutates, so
//! observers see a single update regardless of how many nodes or elements
//! were created.

use crate::data::cache::FieldCache;
use crate::data::field::Field;
use crate::data::nodeset::Nodeset;
use crate::events::ChangeScope;
use crate::mesh::Mesh;
use crate::mesh_error::MeshFieldsError;
use crate::topology::basis::{BasisFunctionType, ElementBasis};
use crate::topology::element::ElementId;
use crate::topology::node::NodeId;
use crate::topology::shape::ShapeType;

/// Creates one node per coordinate row, with `field` defined and its VALUE
/// parameters assigned. Identifiers are auto-assigned; the new identifiers
/// are returned in row order.
///
/// # Errors
/// - `InvalidField` if `field` is not finite-element typed.
/// - `InvalidComponentCount` if a row's length does not match the field.
pub fn create_nodes(
    nodeset: &mut Nodeset,
    field: &Field,
    coordinates: &[Vec<f64>],
) -> Result<Vec<NodeId>, MeshFieldsError> {
    let mut template = nodeset.create_template();
    template.define_field(field)?;
    let _scope = ChangeScope::begin(nodeset.change_tracker());
    let mut cache = FieldCache::new();
    let mut ids = Vec::with_capacity(coordinates.len());
    for row in coordinates {
        let node = nodeset.create_node(None, &template)?;
        cache.bind_node(node);
        nodeset.assign_real(&cache, field, row)?;
        ids.push(node);
    }
    Ok(ids)
}

/// Creates one linear-simplex triangle element per node triple.
///
/// The nodes must already exist in `nodeset` with `field` defined. Returns
/// the new element identifiers in triple order. Passing `face_mesh` derives
/// the triangles' edges into it after the elements are bound.
///
/// # Errors
/// - `DimensionMismatch` if `mesh` is not 2-D (or `face_mesh` is not 1-D).
/// - Any error from element creation or node binding.
pub fn create_triangle_elements(
    mesh: &mut Mesh,
    nodeset: &Nodeset,
    field: &Field,
    triples: &[[NodeId; 3]],
    face_mesh: Option<&mut Mesh>,
) -> Result<Vec<ElementId>, MeshFieldsError> {
    if mesh.dimension() != 2 {
        return Err(MeshFieldsError::DimensionMismatch {
            expected: 2,
            found: mesh.dimension() as usize,
        });
    }
    let eft =
        mesh.create_element_field_template(ElementBasis::new(2, BasisFunctionType::LinearSimplex))?;
    let mut template = mesh.create_element_template();
    template.set_shape_type(ShapeType::Triangle)?;
    template.define_field(field, None, &eft)?;
    let _scope = ChangeScope::begin(mesh.change_tracker());
    let mut ids = Vec::with_capacity(triples.len());
    for triple in triples {
        let element = mesh.create_element(None, &template)?;
        mesh.set_element_nodes(element, &eft, triple, nodeset)?;
        ids.push(element);
    }
    if let Some(face_mesh) = face_mesh {
        mesh.define_all_faces(face_mesh)?;
    }
    Ok(ids)
}

/// Creates the 4 corner nodes and a single bilinear square element over
/// them. `coordinates` lists the corners in local-node order (first
/// coordinate varying fastest). Passing `face_mesh` derives the square's
/// edges into it.
///
/// # Errors
/// - `DimensionMismatch` if `mesh` is not 2-D.
/// - `InvalidNodeCount` if `coordinates` does not have exactly 4 rows.
pub fn create_square_element(
    mesh: &mut Mesh,
    nodeset: &mut Nodeset,
    field: &Field,
    coordinates: &[Vec<f64>],
    face_mesh: Option<&mut Mesh>,
) -> Result<ElementId, MeshFieldsError> {
    create_lagrange_element(mesh, nodeset, field, coordinates, ShapeType::Square, face_mesh)
}

/// Creates the 8 corner nodes and a single trilinear cube element over
/// them. `coordinates` lists the corners in local-node order. Passing
/// `face_mesh` derives the cube's square faces into it.
///
/// # Errors
/// - `DimensionMismatch` if `mesh` is not 3-D.
/// - `InvalidNodeCount` if `coordinates` does not have exactly 8 rows.
pub fn create_cube_element(
    mesh: &mut Mesh,
    nodeset: &mut Nodeset,
    field: &Field,
    coordinates: &[Vec<f64>],
    face_mesh: Option<&mut Mesh>,
) -> Result<ElementId, MeshFieldsError> {
    create_lagrange_element(mesh, nodeset, field, coordinates, ShapeType::Cube, face_mesh)
}

fn create_lagrange_element(
    mesh: &mut Mesh,
    nodeset: &mut Nodeset,
    field: &Field,
    coordinates: &[Vec<f64>],
    shape: ShapeType,
    face_mesh: Option<&mut Mesh>,
) -> Result<ElementId, MeshFieldsError> {
    let dimension = shape.dimension();
    if mesh.dimension() != dimension {
        return Err(MeshFieldsError::DimensionMismatch {
            expected: dimension as usize,
            found: mesh.dimension() as usize,
        });
    }
    if coordinates.len() != shape.corner_count() {
        return Err(MeshFieldsError::InvalidNodeCount {
            expected: shape.corner_count(),
            found: coordinates.len(),
        });
    }
    let nodes = create_nodes(nodeset, field, coordinates)?;
    let eft = mesh.create_element_field_template(ElementBasis::new(
        dimension,
        BasisFunctionType::LinearLagrange,
    ))?;
    let mut template = mesh.create_element_template();
    template.set_shape_type(shape)?;
    template.define_field(field, None, &eft)?;
    let _scope = ChangeScope::begin(mesh.change_tracker());
    let element = mesh.create_element(None, &template)?;
    mesh.set_element_nodes(element, &eft, &nodes, nodeset)?;
    if let Some(face_mesh) = face_mesh {
        mesh.define_all_faces(face_mesh)?;
    }
    Ok(element)
}
