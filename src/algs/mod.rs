//! Algorithms over the node and element stores.
#![warn(missing_docs)]

pub mod build;
pub mod evaluate;
pub mod transform;
pub mod vectorops;

pub use build::{
    create_cube_element, create_nodes, create_square_element, create_triangle_elements,
};
pub use evaluate::{
    evaluate_nodeset_coordinates_range, evaluate_nodeset_mean_coordinates, find_node_with_name,
    node_name_centres, nodeset_maximum, nodeset_mean, nodeset_minimum, FieldEvaluator,
};
pub use transform::transform_coordinates;
