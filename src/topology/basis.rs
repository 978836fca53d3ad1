//! Linear interpolation bases over local element coordinates.
//!
//! Only the two linear families needed for corner interpolation are
//! provided: tensor-product Lagrange and simplex. Weight evaluation returns
//! one weight per local node; weights always sum to 1 inside the reference
//! cell.

use smallvec::{smallvec, SmallVec};

use crate::mesh_error::MeshFieldsError;
use crate::topology::shape::ShapeType;

/// Weights of every local node at one local coordinate.
pub type BasisWeights = SmallVec<[f64; 8]>;

/// Interpolation function families.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BasisFunctionType {
    /// Tensor-product linear interpolation (lines, squares, cubes).
    LinearLagrange,
    /// Barycentric linear interpolation (triangles, tetrahedra).
    LinearSimplex,
}

/// A basis function family fixed to a spatial dimension.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementBasis {
    dimension: u8,
    function: BasisFunctionType,
}

impl ElementBasis {
    /// Creates a basis of the given dimension (1..=3).
    ///
    /// # Panics
    /// Panics if `dimension` is 0 or greater than 3.
    pub fn new(dimension: u8, function: BasisFunctionType) -> Self {
        assert!(
            (1..=3).contains(&dimension),
            "basis dimension must be 1..=3"
        );
        ElementBasis {
            dimension,
            function,
        }
    }

    /// Spatial dimension of the reference cell.
    #[inline]
    pub fn dimension(&self) -> u8 {
        self.dimension
    }

    /// Function family of this basis.
    #[inline]
    pub fn function(&self) -> BasisFunctionType {
        self.function
    }

    /// Number of local nodes the basis interpolates between.
    pub fn node_count(&self) -> usize {
        match self.function {
            BasisFunctionType::LinearLagrange => 1usize << self.dimension,
            BasisFunctionType::LinearSimplex => self.dimension as usize + 1,
        }
    }

    /// Whether the basis can interpolate over the given element shape.
    pub fn supports_shape(&self, shape: ShapeType) -> bool {
        if shape.dimension() != self.dimension {
            return false;
        }
        match self.function {
            BasisFunctionType::LinearLagrange => {
                matches!(shape, ShapeType::Line | ShapeType::Square | ShapeType::Cube)
            }
            BasisFunctionType::LinearSimplex => matches!(
                shape,
                ShapeType::Line | ShapeType::Triangle | ShapeType::Tetrahedron
            ),
        }
    }

    /// Evaluates the basis weights at local coordinates `xi`.
    ///
    /// `xi` must have exactly `dimension` entries. The weight of local node
    /// `i` multiplies that node's parameter during interpolation; local-node
    /// ordering matches [`ShapeType`](crate::topology::shape::ShapeType)
    /// corner numbering (first coordinate fastest).
    pub fn weights(&self, xi: &[f64]) -> Result<BasisWeights, MeshFieldsError> {
        if xi.len() != self.dimension as usize {
            return Err(MeshFieldsError::DimensionMismatch {
                expected: self.dimension as usize,
                found: xi.len(),
            });
        }
        match self.function {
            BasisFunctionType::LinearSimplex => {
                let mut w: BasisWeights = smallvec![1.0 - xi.iter().sum::<f64>()];
                w.extend(xi.iter().copied());
                Ok(w)
            }
            BasisFunctionType::LinearLagrange => {
                let mut w = BasisWeights::new();
                for i in 0..self.node_count() {
                    let mut value = 1.0;
                    for (d, &x) in xi.iter().enumerate() {
                        value *= if (i >> d) & 1 == 1 { x } else { 1.0 - x };
                    }
                    w.push(value);
                }
                Ok(w)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_counts() {
        assert_eq!(
            ElementBasis::new(2, BasisFunctionType::LinearSimplex).node_count(),
            3
        );
        assert_eq!(
            ElementBasis::new(2, BasisFunctionType::LinearLagrange).node_count(),
            4
        );
        assert_eq!(
            ElementBasis::new(3, BasisFunctionType::LinearLagrange).node_count(),
            8
        );
        assert_eq!(
            ElementBasis::new(3, BasisFunctionType::LinearSimplex).node_count(),
            4
        );
    }

    #[test]
    fn lagrange_weights_partition_unity() {
        let basis = ElementBasis::new(2, BasisFunctionType::LinearLagrange);
        let w = basis.weights(&[0.25, 0.75]).unwrap();
        assert_eq!(w.len(), 4);
        let sum: f64 = w.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        // corner (1,1) weight is xi1*xi2
        assert!((w[3] - 0.25 * 0.75).abs() < 1e-12);
    }

    #[test]
    fn lagrange_corner_weights_are_kronecker() {
        let basis = ElementBasis::new(2, BasisFunctionType::LinearLagrange);
        let w = basis.weights(&[1.0, 0.0]).unwrap();
        assert_eq!(w.as_slice(), &[0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn simplex_weights_at_centroid() {
        let basis = ElementBasis::new(2, BasisFunctionType::LinearSimplex);
        let third = 1.0 / 3.0;
        let w = basis.weights(&[third, third]).unwrap();
        assert_eq!(w.len(), 3);
        for wi in &w {
            assert!((wi - third).abs() < 1e-12);
        }
    }

    #[test]
    fn wrong_xi_length_is_an_error() {
        let basis = ElementBasis::new(3, BasisFunctionType::LinearLagrange);
        assert_eq!(
            basis.weights(&[0.5]).unwrap_err(),
            MeshFieldsError::DimensionMismatch {
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn shape_support() {
        let lagrange2 = ElementBasis::new(2, BasisFunctionType::LinearLagrange);
        let simplex2 = ElementBasis::new(2, BasisFunctionType::LinearSimplex);
        assert!(lagrange2.supports_shape(ShapeType::Square));
        assert!(!lagrange2.supports_shape(ShapeType::Triangle));
        assert!(!lagrange2.supports_shape(ShapeType::Cube)); // wrong dimension
        assert!(simplex2.supports_shape(ShapeType::Triangle));
        assert!(!simplex2.supports_shape(ShapeType::Square));
    }
}
