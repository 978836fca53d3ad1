//! MeshFieldsError: unified error type for mesh-fields public APIs
//!
//! This error type is used throughout the mesh-fields library to provide robust,
//! non-panicking error handling for all public APIs. Store-level structural
//! errors are fatal to the operation that triggered them but never corrupt the
//! store they were raised from.

use thiserror::Error;

use crate::data::derivative::DerivativeLabel;
use crate::topology::basis::BasisFunctionType;
use crate::topology::element::ElementId;
use crate::topology::node::NodeId;
use crate::topology::shape::ShapeType;

/// Unified error type for mesh-fields operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshFieldsError {
    /// The field is not backed by nodal/element parameter storage.
    #[error("field `{0}` is not finite-element typed")]
    InvalidField(String),
    /// The field has not been defined on the template being mutated.
    #[error("field `{0}` is not defined on this template")]
    FieldNotDefined(String),
    /// A node with the requested identifier already exists in the nodeset.
    #[error("node identifier {0} is already in use")]
    DuplicateNodeIdentifier(NodeId),
    /// An element with the requested identifier already exists in the mesh.
    #[error("element identifier {0} is already in use")]
    DuplicateElementIdentifier(ElementId),
    /// A value slice did not match the field's declared component count.
    #[error("field `{field}` expects {expected} component(s), got {found}")]
    InvalidComponentCount {
        /// Field whose component count was violated.
        field: String,
        /// Declared component count.
        expected: usize,
        /// Length of the offending value slice.
        found: usize,
    },
    /// The node does not store the requested (field, derivative, version) slot.
    #[error("node {node} does not store field `{field}` at {derivative:?} version {version}")]
    UndefinedParameter {
        /// Node the lookup was bound to.
        node: NodeId,
        /// Field name.
        field: String,
        /// Requested derivative label.
        derivative: DerivativeLabel,
        /// Requested 1-based version.
        version: u8,
    },
    /// Local-node count does not match the basis's required node count.
    #[error("element field template expects {expected} local node(s), got {found}")]
    InvalidNodeCount {
        /// Node count the basis requires.
        expected: usize,
        /// Node count supplied.
        found: usize,
    },
    /// The identifier does not name a node in the store.
    #[error("node {0} is not in the nodeset")]
    UnknownNode(NodeId),
    /// The identifier does not name an element in the store.
    #[error("element {0} is not in the mesh")]
    UnknownElement(ElementId),
    /// The field cannot be evaluated at the bound cache context.
    #[error("field `{field}` is not evaluable at the bound context")]
    NotEvaluable {
        /// Field that could not be evaluated.
        field: String,
    },
    /// The cache is not bound to the context kind the operation requires.
    #[error("field cache is not bound to a {0}")]
    CacheNotBound(&'static str),
    /// A transform precondition failed; no parameters were mutated.
    #[error("transform validation failed: {0}")]
    Validation(String),
    /// Some parameters failed to read or write during a transform sweep.
    /// Valid nodes were still transformed.
    #[error("transform failed to get/set {failures} parameter(s)")]
    TransformIncomplete {
        /// Number of (derivative, version) slots that failed.
        failures: usize,
    },
    /// Conformance failure between two vector/matrix operands.
    #[error("dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch {
        /// Dimension required by the left operand.
        expected: usize,
        /// Dimension found on the right operand.
        found: usize,
    },
    /// The basis cannot interpolate over the element shape.
    #[error("basis {basis:?} cannot interpolate over shape {shape:?}")]
    ShapeBasisMismatch {
        /// Element shape being defined.
        shape: ShapeType,
        /// Offending basis function type.
        basis: BasisFunctionType,
    },
    /// Fields must declare at least one component.
    #[error("field `{0}` must have at least one component")]
    ZeroComponentField(String),
    /// The (derivative, version) slot was already declared on the layout.
    #[error("parameter slot {derivative:?} version {version} already declared")]
    DuplicateParameterSlot {
        /// Derivative label of the duplicate slot.
        derivative: DerivativeLabel,
        /// 1-based version of the duplicate slot.
        version: u8,
    },
    /// Versions of a derivative must be declared contiguously from 1.
    #[error("versions of {derivative:?} must be contiguous from 1")]
    NonContiguousVersions {
        /// Derivative whose version sequence was broken.
        derivative: DerivativeLabel,
    },
    /// Element creation requires the template to carry a shape type.
    #[error("element template has no shape type")]
    MissingShapeType,
}
