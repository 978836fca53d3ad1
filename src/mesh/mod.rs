//! Mesh: the element store.
//!
//! Owns element identities, shape types, node-to-element connectivity, and
//! per-field element field templates (basis plus local-node mapping). A mesh
//! has a fixed dimension; faces derived from its elements live in a separate
//! (dimension-1) mesh.
#![warn(missing_docs)]

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use itertools::Itertools;
use smallvec::SmallVec;

use crate::data::derivative::DerivativeLabel;
use crate::data::field::Field;
use crate::data::nodeset::Nodeset;
use crate::data::parameters::Version;
use crate::events::{ChangeScope, ChangeTracker};
use crate::mesh_error::MeshFieldsError;
use crate::topology::basis::ElementBasis;
use crate::topology::element::ElementId;
use crate::topology::node::NodeId;
use crate::topology::shape::ShapeType;

/// Local node list; linear elements never exceed 8 corners.
pub type LocalNodes = SmallVec<[NodeId; 8]>;

/// Element field template: pairs a basis with the mapping from local nodes
/// and derivatives to the element field's degrees of freedom.
///
/// The default mapping is standard corner interpolation: each local node
/// contributes its VALUE parameter, version 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementFieldTemplate {
    basis: ElementBasis,
}

impl ElementFieldTemplate {
    fn new(basis: ElementBasis) -> Self {
        ElementFieldTemplate { basis }
    }

    /// Basis the template interpolates with.
    #[inline]
    pub fn basis(&self) -> ElementBasis {
        self.basis
    }

    /// Number of local node slots the template binds.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.basis.node_count()
    }

    /// Derivative each local node contributes.
    #[inline]
    pub fn local_node_derivative(&self, _local_index: usize) -> DerivativeLabel {
        DerivativeLabel::Value
    }

    /// Version each local node contributes.
    #[inline]
    pub fn local_node_version(&self, _local_index: usize) -> Version {
        1
    }
}

/// Blueprint for elements: shape type plus per-field interpolation.
#[derive(Clone, Debug)]
pub struct ElementTemplate {
    dimension: u8,
    shape: Option<ShapeType>,
    fields: Vec<(Field, Option<usize>, ElementFieldTemplate)>,
}

impl ElementTemplate {
    /// Sets the element shape type.
    ///
    /// # Errors
    /// Returns `Err(DimensionMismatch)` if the shape's dimension does not
    /// match the mesh the template was created for.
    pub fn set_shape_type(&mut self, shape: ShapeType) -> Result<(), MeshFieldsError> {
        if shape.dimension() != self.dimension {
            return Err(MeshFieldsError::DimensionMismatch {
                expected: self.dimension as usize,
                found: shape.dimension() as usize,
            });
        }
        self.shape = Some(shape);
        Ok(())
    }

    /// Shape the template builds, if set.
    #[inline]
    pub fn shape_type(&self) -> Option<ShapeType> {
        self.shape
    }

    /// Defines interpolation of `field` on elements built from this
    /// template. `component = None` applies `eft` uniformly to all
    /// components.
    ///
    /// # Errors
    /// - `InvalidField` if `field` is not finite-element typed.
    /// - `ShapeBasisMismatch` if a shape is set and the basis cannot
    ///   interpolate over it.
    pub fn define_field(
        &mut self,
        field: &Field,
        component: Option<usize>,
        eft: &ElementFieldTemplate,
    ) -> Result<(), MeshFieldsError> {
        if !field.is_finite_element() {
            return Err(MeshFieldsError::InvalidField(field.name().to_string()));
        }
        if let Some(shape) = self.shape {
            if !eft.basis().supports_shape(shape) {
                return Err(MeshFieldsError::ShapeBasisMismatch {
                    shape,
                    basis: eft.basis().function(),
                });
            }
        }
        self.fields
            .push((field.clone(), component, eft.clone()));
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Element {
    pub(crate) shape: ShapeType,
    /// Global node identifiers bound to local slots; empty until
    /// `set_element_nodes`.
    pub(crate) nodes: LocalNodes,
    pub(crate) fields: HashMap<String, ElementFieldTemplate>,
}

/// Named collection of elements of a fixed dimension.
#[derive(Debug)]
pub struct Mesh {
    name: String,
    dimension: u8,
    elements: BTreeMap<ElementId, Element>,
    /// Sorted-node keys of registered elements, for face dedup.
    node_keys: HashMap<Vec<NodeId>, ElementId>,
    tracker: Rc<ChangeTracker>,
}

impl Mesh {
    /// Creates an empty mesh of the given dimension (1..=3).
    ///
    /// # Panics
    /// Panics if `dimension` is 0 or greater than 3.
    pub fn new(name: impl Into<String>, dimension: u8) -> Self {
        assert!(
            (1..=3).contains(&dimension),
            "mesh dimension must be 1..=3"
        );
        Mesh {
            name: name.into(),
            dimension,
            elements: BTreeMap::new(),
            node_keys: HashMap::new(),
            tracker: Rc::new(ChangeTracker::new()),
        }
    }

    /// Mesh name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Topological dimension of the mesh's elements.
    #[inline]
    pub fn dimension(&self) -> u8 {
        self.dimension
    }

    /// Shared handle to this store's change tracker, for scoped batching.
    pub fn change_tracker(&self) -> Rc<ChangeTracker> {
        Rc::clone(&self.tracker)
    }

    /// Returns a fresh element blueprint bound to this mesh's dimension.
    pub fn create_element_template(&self) -> ElementTemplate {
        ElementTemplate {
            dimension: self.dimension,
            shape: None,
            fields: Vec::new(),
        }
    }

    /// Pairs `basis` with the default corner-interpolation local-node
    /// mapping.
    ///
    /// # Errors
    /// Returns `Err(DimensionMismatch)` if the basis dimension does not
    /// match the mesh dimension.
    pub fn create_element_field_template(
        &self,
        basis: ElementBasis,
    ) -> Result<ElementFieldTemplate, MeshFieldsError> {
        if basis.dimension() != self.dimension {
            return Err(MeshFieldsError::DimensionMismatch {
                expected: self.dimension as usize,
                found: basis.dimension() as usize,
            });
        }
        Ok(ElementFieldTemplate::new(basis))
    }

    /// Allocates a new element from `template`. `id_hint = None` assigns
    /// the smallest unused identifier >= 0.
    ///
    /// # Errors
    /// - `DuplicateElementIdentifier` if `id_hint` is already used.
    /// - `MissingShapeType` if the template has no shape.
    pub fn create_element(
        &mut self,
        id_hint: Option<ElementId>,
        template: &ElementTemplate,
    ) -> Result<ElementId, MeshFieldsError> {
        let shape = template.shape.ok_or(MeshFieldsError::MissingShapeType)?;
        let id = match id_hint {
            Some(id) => {
                if self.elements.contains_key(&id) {
                    return Err(MeshFieldsError::DuplicateElementIdentifier(id));
                }
                id
            }
            None => self.first_free_identifier(),
        };
        let fields = template
            .fields
            .iter()
            .map(|(field, _component, eft)| (field.name().to_string(), eft.clone()))
            .collect();
        self.elements.insert(
            id,
            Element {
                shape,
                nodes: LocalNodes::new(),
                fields,
            },
        );
        self.tracker.note_change();
        log::trace!("mesh `{}`: created element {id}", self.name);
        Ok(id)
    }

    /// Binds the element's local node slots to node identifiers in the
    /// order `eft` expects.
    ///
    /// # Errors
    /// - `UnknownElement` if `element` is not in the mesh.
    /// - `InvalidNodeCount` if the count mismatches the basis's required
    ///   node count.
    /// - `UnknownNode` if an identifier is not in `nodeset`.
    pub fn set_element_nodes(
        &mut self,
        element: ElementId,
        eft: &ElementFieldTemplate,
        nodes: &[NodeId],
        nodeset: &Nodeset,
    ) -> Result<(), MeshFieldsError> {
        if nodes.len() != eft.node_count() {
            return Err(MeshFieldsError::InvalidNodeCount {
                expected: eft.node_count(),
                found: nodes.len(),
            });
        }
        for &node in nodes {
            if !nodeset.contains(node) {
                return Err(MeshFieldsError::UnknownNode(node));
            }
        }
        let entry = self
            .elements
            .get_mut(&element)
            .ok_or(MeshFieldsError::UnknownElement(element))?;
        // rebinding retires this element's previous key, otherwise stale
        // keys keep matching during face dedup
        if !entry.nodes.is_empty() {
            let old_key = entry.nodes.iter().copied().sorted().collect::<Vec<_>>();
            if self.node_keys.get(&old_key) == Some(&element) {
                self.node_keys.remove(&old_key);
            }
        }
        entry.nodes = LocalNodes::from_slice(nodes);
        let key = nodes.iter().copied().sorted().collect::<Vec<_>>();
        self.node_keys.insert(key, element);
        self.tracker.note_change();
        Ok(())
    }

    /// Number of elements in the store.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the store has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether `element` is in the store.
    #[inline]
    pub fn contains(&self, element: ElementId) -> bool {
        self.elements.contains_key(&element)
    }

    /// Element identifiers in ascending order.
    pub fn element_identifiers(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.keys().copied()
    }

    /// Shape of `element`.
    pub fn element_shape(&self, element: ElementId) -> Result<ShapeType, MeshFieldsError> {
        Ok(self.element(element)?.shape)
    }

    /// Global node identifiers bound to `element`'s local slots.
    pub fn element_nodes(&self, element: ElementId) -> Result<&[NodeId], MeshFieldsError> {
        Ok(&self.element(element)?.nodes)
    }

    /// Derives and registers every (dimension-1) face implied by this
    /// mesh's elements into `face_mesh`. Idempotent: faces already present
    /// (matched by their node set) are not duplicated.
    ///
    /// Elements whose nodes have not been set are skipped. Returns the
    /// number of faces created, as one batched change on `face_mesh`.
    ///
    /// # Errors
    /// Returns `Err(DimensionMismatch)` if `face_mesh` is not of dimension
    /// `self.dimension() - 1`. A 1-D mesh has point faces this kernel does
    /// not model; the call is then a no-op returning 0.
    pub fn define_all_faces(&self, face_mesh: &mut Mesh) -> Result<usize, MeshFieldsError> {
        if self.dimension <= 1 {
            return Ok(0);
        }
        if face_mesh.dimension != self.dimension - 1 {
            return Err(MeshFieldsError::DimensionMismatch {
                expected: (self.dimension - 1) as usize,
                found: face_mesh.dimension as usize,
            });
        }
        let _scope = ChangeScope::begin(face_mesh.change_tracker());
        let mut created = 0usize;
        for (id, element) in &self.elements {
            if element.nodes.is_empty() {
                log::debug!(
                    "mesh `{}`: element {id} has no nodes set, skipping face derivation",
                    self.name
                );
                continue;
            }
            // dimension >= 2, so every shape here has faces
            let face_shape = match element.shape.face_shape() {
                Some(shape) => shape,
                None => continue,
            };
            for local_nodes in element.shape.face_local_nodes() {
                let face_nodes: LocalNodes = local_nodes
                    .iter()
                    .map(|&local| element.nodes[local])
                    .collect();
                let key = face_nodes.iter().copied().sorted().collect::<Vec<_>>();
                if face_mesh.node_keys.contains_key(&key) {
                    continue;
                }
                let face_id = face_mesh.first_free_identifier();
                face_mesh.elements.insert(
                    face_id,
                    Element {
                        shape: face_shape,
                        nodes: face_nodes,
                        fields: HashMap::new(),
                    },
                );
                face_mesh.node_keys.insert(key, face_id);
                face_mesh.tracker.note_change();
                created += 1;
            }
        }
        log::debug!(
            "mesh `{}`: defined {created} face(s) into `{}`",
            self.name,
            face_mesh.name
        );
        Ok(created)
    }

    pub(crate) fn element(&self, element: ElementId) -> Result<&Element, MeshFieldsError> {
        self.elements
            .get(&element)
            .ok_or(MeshFieldsError::UnknownElement(element))
    }

    /// Smallest identifier >= 0 not yet in use.
    fn first_free_identifier(&self) -> ElementId {
        let mut candidate = 0u64;
        for id in self.elements.keys() {
            if id.get() == candidate {
                candidate += 1;
            } else if id.get() > candidate {
                break;
            }
        }
        ElementId::new(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::field::CoordinateSystemType;
    use crate::topology::basis::BasisFunctionType;

    fn coordinates() -> Field {
        Field::finite_element("coordinates", 2, CoordinateSystemType::RectangularCartesian).unwrap()
    }

    fn nodeset_with_nodes(count: usize) -> (Nodeset, Vec<NodeId>) {
        let mut ns = Nodeset::new("nodes");
        let field = coordinates();
        let mut template = ns.create_template();
        template.define_field(&field).unwrap();
        let ids = (0..count)
            .map(|_| ns.create_node(None, &template).unwrap())
            .collect();
        (ns, ids)
    }

    #[test]
    fn create_triangle_element() {
        let (ns, ids) = nodeset_with_nodes(3);
        let mut mesh = Mesh::new("mesh2d", 2);
        let mut template = mesh.create_element_template();
        template.set_shape_type(ShapeType::Triangle).unwrap();
        let eft = mesh
            .create_element_field_template(ElementBasis::new(2, BasisFunctionType::LinearSimplex))
            .unwrap();
        template.define_field(&coordinates(), None, &eft).unwrap();

        let element = mesh.create_element(None, &template).unwrap();
        assert_eq!(element.get(), 0);
        mesh.set_element_nodes(element, &eft, &ids, &ns).unwrap();
        assert_eq!(mesh.element_nodes(element).unwrap(), ids.as_slice());
        assert_eq!(mesh.element_shape(element).unwrap(), ShapeType::Triangle);
    }

    #[test]
    fn node_count_and_membership_enforced() {
        let (ns, ids) = nodeset_with_nodes(3);
        let mut mesh = Mesh::new("mesh2d", 2);
        let mut template = mesh.create_element_template();
        template.set_shape_type(ShapeType::Triangle).unwrap();
        let eft = mesh
            .create_element_field_template(ElementBasis::new(2, BasisFunctionType::LinearSimplex))
            .unwrap();
        let element = mesh.create_element(None, &template).unwrap();

        assert_eq!(
            mesh.set_element_nodes(element, &eft, &ids[..2], &ns)
                .unwrap_err(),
            MeshFieldsError::InvalidNodeCount {
                expected: 3,
                found: 2
            }
        );
        let bogus = [ids[0], ids[1], NodeId::new(99)];
        assert_eq!(
            mesh.set_element_nodes(element, &eft, &bogus, &ns).unwrap_err(),
            MeshFieldsError::UnknownNode(NodeId::new(99))
        );
    }

    #[test]
    fn template_without_shape_rejected() {
        let mut mesh = Mesh::new("mesh2d", 2);
        let template = mesh.create_element_template();
        assert_eq!(
            mesh.create_element(None, &template).unwrap_err(),
            MeshFieldsError::MissingShapeType
        );
    }

    #[test]
    fn shape_basis_mismatch_rejected() {
        let mesh = Mesh::new("mesh2d", 2);
        let mut template = mesh.create_element_template();
        template.set_shape_type(ShapeType::Square).unwrap();
        let simplex = mesh
            .create_element_field_template(ElementBasis::new(2, BasisFunctionType::LinearSimplex))
            .unwrap();
        assert_eq!(
            template
                .define_field(&coordinates(), None, &simplex)
                .unwrap_err(),
            MeshFieldsError::ShapeBasisMismatch {
                shape: ShapeType::Square,
                basis: BasisFunctionType::LinearSimplex
            }
        );
    }

    #[test]
    fn wrong_dimension_shape_rejected() {
        let mesh = Mesh::new("mesh2d", 2);
        let mut template = mesh.create_element_template();
        assert!(template.set_shape_type(ShapeType::Cube).is_err());
    }

    #[test]
    fn faces_of_two_adjacent_triangles() {
        // two triangles sharing edge (1,2): 5 distinct edges
        let (ns, ids) = nodeset_with_nodes(4);
        let mut mesh = Mesh::new("mesh2d", 2);
        let mut template = mesh.create_element_template();
        template.set_shape_type(ShapeType::Triangle).unwrap();
        let eft = mesh
            .create_element_field_template(ElementBasis::new(2, BasisFunctionType::LinearSimplex))
            .unwrap();
        for tri in [[ids[0], ids[1], ids[2]], [ids[1], ids[3], ids[2]]] {
            let element = mesh.create_element(None, &template).unwrap();
            mesh.set_element_nodes(element, &eft, &tri, &ns).unwrap();
        }

        let mut edges = Mesh::new("mesh1d", 1);
        assert_eq!(mesh.define_all_faces(&mut edges).unwrap(), 5);
        assert_eq!(edges.len(), 5);
        // idempotent
        assert_eq!(mesh.define_all_faces(&mut edges).unwrap(), 0);
        assert_eq!(edges.len(), 5);
    }

    #[test]
    fn rebinding_nodes_retires_the_old_face_key() {
        let (ns, ids) = nodeset_with_nodes(5);

        let mut edges = Mesh::new("mesh1d", 1);
        let mut edge_template = edges.create_element_template();
        edge_template.set_shape_type(ShapeType::Line).unwrap();
        let edge_eft = edges
            .create_element_field_template(ElementBasis::new(1, BasisFunctionType::LinearLagrange))
            .unwrap();
        let edge = edges.create_element(None, &edge_template).unwrap();
        edges
            .set_element_nodes(edge, &edge_eft, &[ids[0], ids[1]], &ns)
            .unwrap();
        // rebind elsewhere; the (0,1) key must no longer match
        edges
            .set_element_nodes(edge, &edge_eft, &[ids[2], ids[3]], &ns)
            .unwrap();

        let mut mesh = Mesh::new("mesh2d", 2);
        let mut template = mesh.create_element_template();
        template.set_shape_type(ShapeType::Triangle).unwrap();
        let eft = mesh
            .create_element_field_template(ElementBasis::new(2, BasisFunctionType::LinearSimplex))
            .unwrap();
        let tri = mesh.create_element(None, &template).unwrap();
        mesh.set_element_nodes(tri, &eft, &[ids[0], ids[1], ids[4]], &ns)
            .unwrap();

        // all three edges of the triangle are new, including (0,1)
        assert_eq!(mesh.define_all_faces(&mut edges).unwrap(), 3);
        assert_eq!(edges.len(), 4);
    }

    #[test]
    fn face_mesh_dimension_checked() {
        let mesh = Mesh::new("mesh3d", 3);
        let mut wrong = Mesh::new("mesh1d", 1);
        assert!(mesh.define_all_faces(&mut wrong).is_err());
    }

    #[test]
    fn one_dimensional_mesh_has_no_faces() {
        let mesh = Mesh::new("mesh1d", 1);
        let mut none = Mesh::new("mesh0d", 1);
        assert_eq!(mesh.define_all_faces(&mut none).unwrap(), 0);
    }
}
