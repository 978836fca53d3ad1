//! Element shape metadata and face derivation tables.
//!
//! Local-node orderings follow the tensor-product convention: the first local
//! coordinate varies fastest, so a square is numbered
//! `(0,0), (1,0), (0,1), (1,1)` and a cube extends the same pattern into the
//! third coordinate.

/// Shapes an element can take, by topological dimension.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ShapeType {
    /// 1D segment.
    Line,
    /// 2D simplex.
    Triangle,
    /// 2D tensor-product cell (quad on the unit square).
    Square,
    /// 3D simplex.
    Tetrahedron,
    /// 3D tensor-product cell (hex on the unit cube).
    Cube,
}

impl ShapeType {
    /// Returns the topological dimension of the shape.
    pub fn dimension(self) -> u8 {
        match self {
            ShapeType::Line => 1,
            ShapeType::Triangle | ShapeType::Square => 2,
            ShapeType::Tetrahedron | ShapeType::Cube => 3,
        }
    }

    /// Number of corner nodes of the shape.
    pub fn corner_count(self) -> usize {
        match self {
            ShapeType::Line => 2,
            ShapeType::Triangle => 3,
            ShapeType::Square | ShapeType::Tetrahedron => 4,
            ShapeType::Cube => 8,
        }
    }

    /// Shape of the (dimension-1) faces of this shape, or `None` for a line
    /// whose boundary is a pair of points rather than sub-elements.
    pub fn face_shape(self) -> Option<ShapeType> {
        match self {
            ShapeType::Line => None,
            ShapeType::Triangle | ShapeType::Square => Some(ShapeType::Line),
            ShapeType::Tetrahedron => Some(ShapeType::Triangle),
            ShapeType::Cube => Some(ShapeType::Square),
        }
    }

    /// Corner-node index tuples of each (dimension-1) face, in a fixed order.
    ///
    /// For tensor-product shapes the faces come in `xi_i = 0` / `xi_i = 1`
    /// pairs; simplex faces are listed in lexicographic corner order.
    pub fn face_local_nodes(self) -> &'static [&'static [usize]] {
        match self {
            ShapeType::Line => &[],
            ShapeType::Triangle => &[&[0, 1], &[0, 2], &[1, 2]],
            ShapeType::Square => &[&[0, 2], &[1, 3], &[0, 1], &[2, 3]],
            ShapeType::Tetrahedron => &[&[0, 1, 2], &[0, 1, 3], &[0, 2, 3], &[1, 2, 3]],
            ShapeType::Cube => &[
                &[0, 2, 4, 6],
                &[1, 3, 5, 7],
                &[0, 1, 4, 5],
                &[2, 3, 6, 7],
                &[0, 1, 2, 3],
                &[4, 5, 6, 7],
            ],
        }
    }
}
