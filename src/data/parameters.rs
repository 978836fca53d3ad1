//! Nodal parameter storage for one field on one node.
//!
//! The `ParameterAtlas` maps (derivative, version) slots to contiguous
//! sub-slices of a flat data buffer; `FieldParameters` couples an atlas with
//! the buffer itself, one slice of `component_count` reals per slot. Node
//! templates carry bare atlases as layouts; nodes built from them get a
//! zero-filled buffer of the layout's total length.

use std::collections::HashMap;

use crate::data::derivative::DerivativeLabel;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshFieldsError;

/// 1-based version number of a (field, derivative) slot.
pub type Version = u8;

/// Slot key: derivative label plus 1-based version.
pub type ParameterKey = (DerivativeLabel, Version);

/// `ParameterAtlas` maintains:
/// - a lookup `map` from each slot to its offset (in reals) in the buffer,
/// - an `order` vector preserving insertion order for deterministic layout,
/// - the fixed `component_count` every slot stores.
///
/// # Invariants
///
/// - Each slot appears exactly once in `order`; `map` holds precisely the
///   keys listed in `order`.
/// - Offsets are contiguous multiples of `component_count` in insertion
///   order.
/// - Versions of each derivative are contiguous starting at 1.
///
/// These invariants are checked after mutations in debug builds and when the
/// `check-invariants` feature is enabled.
#[derive(Clone, Debug)]
pub struct ParameterAtlas {
    map: HashMap<ParameterKey, usize>,
    order: Vec<ParameterKey>,
    component_count: usize,
}

impl ParameterAtlas {
    /// Creates an empty atlas whose slots all store `component_count` reals.
    pub fn new(component_count: usize) -> Self {
        ParameterAtlas {
            map: HashMap::new(),
            order: Vec::new(),
            component_count,
        }
    }

    /// Declares a new slot; returns its offset in the buffer.
    ///
    /// # Errors
    /// Returns `Err(DuplicateParameterSlot)` if the slot exists, or
    /// `Err(NonContiguousVersions)` if `version` is 0 or does not directly
    /// follow the derivative's current highest version.
    pub fn try_insert(
        &mut self,
        derivative: DerivativeLabel,
        version: Version,
    ) -> Result<usize, MeshFieldsError> {
        if self.map.contains_key(&(derivative, version)) {
            return Err(MeshFieldsError::DuplicateParameterSlot {
                derivative,
                version,
            });
        }
        if version != self.versions(derivative) + 1 {
            return Err(MeshFieldsError::NonContiguousVersions { derivative });
        }
        let offset = self.total_len();
        self.map.insert((derivative, version), offset);
        self.order.push((derivative, version));
        self.debug_assert_invariants();
        Ok(offset)
    }

    /// Re-declares `derivative` with exactly `versions` versions.
    ///
    /// Growing appends zero-initialized slots; shrinking drops the highest
    /// versions and recomputes remaining offsets. `versions == 0` removes
    /// the derivative entirely.
    pub fn set_versions(
        &mut self,
        derivative: DerivativeLabel,
        versions: Version,
    ) -> Result<(), MeshFieldsError> {
        let current = self.versions(derivative);
        if versions > current {
            for v in current + 1..=versions {
                self.try_insert(derivative, v)?;
            }
        } else if versions < current {
            self.order
                .retain(|&(d, v)| d != derivative || v <= versions);
            self.rebuild_offsets();
        }
        self.debug_assert_invariants();
        Ok(())
    }

    /// Offset of a slot in the buffer, or `None` if undeclared.
    #[inline]
    pub fn get(&self, derivative: DerivativeLabel, version: Version) -> Option<usize> {
        self.map.get(&(derivative, version)).copied()
    }

    /// Whether the slot is declared.
    #[inline]
    pub fn contains(&self, derivative: DerivativeLabel, version: Version) -> bool {
        self.map.contains_key(&(derivative, version))
    }

    /// Number of declared versions of `derivative` (0 if undeclared).
    pub fn versions(&self, derivative: DerivativeLabel) -> Version {
        self.order.iter().filter(|&&(d, _)| d == derivative).count() as Version
    }

    /// Number of declared slots.
    #[inline]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.order.len(), self.map.len());
        self.order.len()
    }

    /// Whether no slots are declared.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Reals each slot stores.
    #[inline]
    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// Total buffer length (in reals) the atlas describes.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.order.len() * self.component_count
    }

    /// Declared slots in insertion (deterministic) order.
    pub fn slots(&self) -> impl Iterator<Item = ParameterKey> + '_ {
        self.order.iter().copied()
    }

    fn rebuild_offsets(&mut self) {
        self.map.clear();
        for (i, &key) in self.order.iter().enumerate() {
            self.map.insert(key, i * self.component_count);
        }
    }
}

impl DebugInvariants for ParameterAtlas {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "ParameterAtlas invalid");
    }

    fn validate_invariants(&self) -> Result<(), MeshFieldsError> {
        // map.keys == order, both directions
        for &key in &self.order {
            if !self.map.contains_key(&key) {
                return Err(MeshFieldsError::DuplicateParameterSlot {
                    derivative: key.0,
                    version: key.1,
                });
            }
        }
        if self.map.len() != self.order.len() {
            let (derivative, version) = self.order.first().copied().unwrap_or((
                DerivativeLabel::Value,
                0,
            ));
            return Err(MeshFieldsError::DuplicateParameterSlot {
                derivative,
                version,
            });
        }
        // offsets contiguous in insertion order
        for (i, &key) in self.order.iter().enumerate() {
            if self.map[&key] != i * self.component_count {
                return Err(MeshFieldsError::DuplicateParameterSlot {
                    derivative: key.0,
                    version: key.1,
                });
            }
        }
        // versions contiguous from 1 per derivative
        for derivative in DerivativeLabel::ALL {
            let count = self.versions(derivative);
            for v in 1..=count {
                if !self.contains(derivative, v) {
                    return Err(MeshFieldsError::NonContiguousVersions { derivative });
                }
            }
        }
        Ok(())
    }
}

/// Storage for one field's nodal parameters, backed by a `ParameterAtlas`.
#[derive(Clone, Debug)]
pub struct FieldParameters {
    atlas: ParameterAtlas,
    data: Vec<f64>,
}

impl FieldParameters {
    /// Builds zero-initialized storage matching `atlas`.
    pub fn new(atlas: ParameterAtlas) -> Self {
        let data = vec![0.0; atlas.total_len()];
        FieldParameters { atlas, data }
    }

    /// Layout of the stored slots.
    #[inline]
    pub fn atlas(&self) -> &ParameterAtlas {
        &self.atlas
    }

    /// Read-only view of one slot, or `None` if the slot is undeclared.
    pub fn restrict(&self, derivative: DerivativeLabel, version: Version) -> Option<&[f64]> {
        let offset = self.atlas.get(derivative, version)?;
        Some(&self.data[offset..offset + self.atlas.component_count()])
    }

    /// Mutable view of one slot, or `None` if the slot is undeclared.
    pub fn restrict_mut(
        &mut self,
        derivative: DerivativeLabel,
        version: Version,
    ) -> Option<&mut [f64]> {
        let offset = self.atlas.get(derivative, version)?;
        let count = self.atlas.component_count();
        Some(&mut self.data[offset..offset + count])
    }

    /// Extends storage with any slots of `layout` not yet declared here,
    /// zero-filled; existing values are preserved.
    pub fn merge_layout(&mut self, layout: &ParameterAtlas) -> Result<(), MeshFieldsError> {
        for (derivative, version) in layout.slots() {
            if !self.atlas.contains(derivative, version) {
                self.atlas.try_insert(derivative, version)?;
                self.data
                    .resize(self.atlas.total_len(), 0.0);
            }
        }
        Ok(())
    }
}
