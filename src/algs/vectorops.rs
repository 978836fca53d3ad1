//! Small dense vector/matrix helpers used by the transform path.
//!
//! Operands must be conformant; mismatches are reported as
//! `DimensionMismatch` rather than panicking.

use crate::mesh_error::MeshFieldsError;

/// Component-wise sum of two vectors of equal length.
pub fn add(a: &[f64], b: &[f64]) -> Result<Vec<f64>, MeshFieldsError> {
    if a.len() != b.len() {
        return Err(MeshFieldsError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

/// Matrix-vector product; each matrix row must match the vector length.
pub fn matrix_vector_mult(
    matrix: &[Vec<f64>],
    vector: &[f64],
) -> Result<Vec<f64>, MeshFieldsError> {
    let mut out = Vec::with_capacity(matrix.len());
    for row in matrix {
        if row.len() != vector.len() {
            return Err(MeshFieldsError::DimensionMismatch {
                expected: vector.len(),
                found: row.len(),
            });
        }
        out.push(row.iter().zip(vector).map(|(m, v)| m * v).sum());
    }
    Ok(out)
}
