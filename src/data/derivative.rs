//! Nodal derivative labels.
//!
//! Each nodal parameter slot is addressed by a derivative label and a
//! 1-based version number. The labels cover values and first, second, and
//! third mixed arc-length derivatives, enough for tricubic Hermite
//! interpolation.

/// Label of a nodal parameter slot.
// underscores kept to match the conventional d/ds naming
#[allow(non_camel_case_types)]
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum DerivativeLabel {
    /// The field value itself.
    Value,
    /// d/ds1.
    D_Ds1,
    /// d/ds2.
    D_Ds2,
    /// d2/ds1ds2.
    D2_Ds1Ds2,
    /// d/ds3.
    D_Ds3,
    /// d2/ds1ds3.
    D2_Ds1Ds3,
    /// d2/ds2ds3.
    D2_Ds2Ds3,
    /// d3/ds1ds2ds3.
    D3_Ds1Ds2Ds3,
}

impl DerivativeLabel {
    /// Every label in the fixed order bulk sweeps (e.g. coordinate
    /// transforms) visit them.
    pub const ALL: [DerivativeLabel; 8] = [
        DerivativeLabel::Value,
        DerivativeLabel::D_Ds1,
        DerivativeLabel::D_Ds2,
        DerivativeLabel::D2_Ds1Ds2,
        DerivativeLabel::D_Ds3,
        DerivativeLabel::D2_Ds1Ds3,
        DerivativeLabel::D2_Ds2Ds3,
        DerivativeLabel::D3_Ds1Ds2Ds3,
    ];

    /// Whether this is the absolute value slot (the only one translation
    /// offsets apply to).
    #[inline]
    pub fn is_value(self) -> bool {
        matches!(self, DerivativeLabel::Value)
    }
}
