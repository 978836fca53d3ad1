//! Field definitions: name, component count, coordinate system, domain, kind.
//!
//! A `Field` is a lightweight description passed to store and evaluator
//! operations; parameter data itself lives in the stores, keyed by field
//! name. Whether a field is backed by nodal storage is a tagged variant
//! (`FieldKind`) with a capability query rather than a runtime downcast.

use crate::mesh_error::MeshFieldsError;

/// Coordinate system a field's components are expressed in.
///
/// Only rectangular cartesian has meaning to this kernel (the coordinate
/// transform path requires it); the other systems are carried opaquely.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CoordinateSystemType {
    /// Orthonormal x/y/z components.
    RectangularCartesian,
    /// r/theta/z components.
    CylindricalPolar,
    /// r/theta/phi components.
    SphericalPolar,
    /// Orientation angles relative to element axes.
    Fibre,
}

/// Domain a field is defined over.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DomainType {
    /// Per-node parameters.
    Nodes,
    /// Per-element parameters on elements of the given dimension.
    Elements {
        /// Topological dimension of the host elements.
        dimension: u8,
    },
}

/// How a field's values come into being.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum FieldKind {
    /// Backed by nodal/element parameter storage.
    FiniteElement,
    /// Backed by a per-node string (name-type fields).
    StoredString,
    /// Derived from other fields; owns no parameter storage.
    Computed,
}

/// Description of a field.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Field {
    name: String,
    component_count: usize,
    coordinate_system: CoordinateSystemType,
    domain: DomainType,
    kind: FieldKind,
}

impl Field {
    /// Creates a finite-element field over nodes.
    ///
    /// # Errors
    /// Returns `Err(ZeroComponentField)` if `component_count == 0`.
    pub fn finite_element(
        name: impl Into<String>,
        component_count: usize,
        coordinate_system: CoordinateSystemType,
    ) -> Result<Self, MeshFieldsError> {
        let name = name.into();
        if component_count == 0 {
            return Err(MeshFieldsError::ZeroComponentField(name));
        }
        Ok(Field {
            name,
            component_count,
            coordinate_system,
            domain: DomainType::Nodes,
            kind: FieldKind::FiniteElement,
        })
    }

    /// Creates a single-component stored-string field over nodes.
    pub fn stored_string(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            component_count: 1,
            coordinate_system: CoordinateSystemType::RectangularCartesian,
            domain: DomainType::Nodes,
            kind: FieldKind::StoredString,
        }
    }

    /// Creates a computed field description (no parameter storage).
    pub fn computed(name: impl Into<String>, component_count: usize) -> Result<Self, MeshFieldsError> {
        let name = name.into();
        if component_count == 0 {
            return Err(MeshFieldsError::ZeroComponentField(name));
        }
        Ok(Field {
            name,
            component_count,
            coordinate_system: CoordinateSystemType::RectangularCartesian,
            domain: DomainType::Nodes,
            kind: FieldKind::Computed,
        })
    }

    /// Re-homes the field onto a different domain.
    pub fn with_domain(mut self, domain: DomainType) -> Self {
        self.domain = domain;
        self
    }

    /// Field name; the key parameter storage is filed under.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared number of real components.
    #[inline]
    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// Coordinate system of the components.
    #[inline]
    pub fn coordinate_system(&self) -> CoordinateSystemType {
        self.coordinate_system
    }

    /// Domain the field is defined over.
    #[inline]
    pub fn domain(&self) -> DomainType {
        self.domain
    }

    /// Storage kind of the field.
    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Capability query: is this field backed by nodal parameter storage?
    #[inline]
    pub fn is_finite_element(&self) -> bool {
        self.kind == FieldKind::FiniteElement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_element_field() {
        let f = Field::finite_element("coordinates", 3, CoordinateSystemType::RectangularCartesian)
            .unwrap();
        assert_eq!(f.name(), "coordinates");
        assert_eq!(f.component_count(), 3);
        assert!(f.is_finite_element());
        assert_eq!(f.domain(), DomainType::Nodes);
    }

    #[test]
    fn zero_components_rejected() {
        let err =
            Field::finite_element("bad", 0, CoordinateSystemType::RectangularCartesian).unwrap_err();
        assert_eq!(err, MeshFieldsError::ZeroComponentField("bad".into()));
    }

    #[test]
    fn stored_string_is_not_finite_element() {
        let f = Field::stored_string("name");
        assert_eq!(f.kind(), FieldKind::StoredString);
        assert!(!f.is_finite_element());
        assert_eq!(f.component_count(), 1);
    }

    #[test]
    fn computed_is_not_finite_element() {
        let f = Field::computed("minimum", 2).unwrap();
        assert!(!f.is_finite_element());
    }
}
