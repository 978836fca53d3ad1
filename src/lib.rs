//! # mesh-fields
//!
//! A minimal finite-element field kernel: node and element stores with
//! template-driven creation, per-node parameter storage addressed by
//! (derivative, version, component), cache-bound field evaluation with
//! linear interpolation on elements, face derivation, nodeset aggregates,
//! and whole-store coordinate transformation with scoped change batching.
//!
//! The crate is organised as:
//! - [`topology`] — identifier newtypes, element shapes, basis functions.
//! - [`data`] — fields, parameter layouts, the node store, the field cache.
//! - [`mesh`] — the element store and element templates.
//! - [`algs`] — evaluation, aggregates, transforms, and builders.
//! - [`events`] — scoped change batching shared by the stores.
//!
//! ```
//! use mesh_fields::prelude::*;
//!
//! let coordinates = Field::finite_element(
//!     "coordinates", 2, CoordinateSystemType::RectangularCartesian,
//! )?;
//! let mut nodes = Nodeset::new("nodes");
//! let ids = create_nodes(&mut nodes, &coordinates, &[
//!     vec![0.0, 0.0],
//!     vec![2.0, 0.0],
//! ])?;
//!
//! let mut cache = FieldCache::new();
//! cache.bind_node(ids[1]);
//! let evaluator = FieldEvaluator::new(&nodes);
//! assert_eq!(evaluator.evaluate_real(&cache, &coordinates)?, vec![2.0, 0.0]);
//! # Ok::<(), mesh_fields::mesh_error::MeshFieldsError>(())
//! ```

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod events;
pub mod mesh;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// Commonly used types and functions.
pub mod prelude {
    pub use crate::algs::{
        create_cube_element, create_nodes, create_square_element, create_triangle_elements,
        evaluate_nodeset_coordinates_range, evaluate_nodeset_mean_coordinates,
        find_node_with_name, node_name_centres, nodeset_maximum, nodeset_mean, nodeset_minimum,
        transform_coordinates, FieldEvaluator,
    };
    pub use crate::data::{
        CacheBinding, CoordinateSystemType, DerivativeLabel, DomainType, Field, FieldCache,
        FieldKind, NodeTemplate, Nodeset,
    };
    pub use crate::events::{ChangeScope, ChangeTracker};
    pub use crate::mesh::{ElementFieldTemplate, ElementTemplate, Mesh};
    pub use crate::mesh_error::MeshFieldsError;
    pub use crate::topology::{
        BasisFunctionType, ElementBasis, ElementId, NodeId, ShapeType,
    };
}
