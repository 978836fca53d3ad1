//! Topology module: entity identities, element shapes, and interpolation bases.
#![warn(missing_docs)]

pub mod basis;
pub mod element;
pub mod node;
pub mod shape;

pub use basis::{BasisFunctionType, BasisWeights, ElementBasis};
pub use element::ElementId;
pub use node::NodeId;
pub use shape::ShapeType;
