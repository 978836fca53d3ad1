//! Data module: fields, nodal parameter storage, node store, field cache.
#![warn(missing_docs)]

pub mod cache;
pub mod derivative;
pub mod field;
pub mod node_template;
pub mod nodeset;
pub mod parameters;

pub use crate::debug_invariants::DebugInvariants;

pub use cache::{CacheBinding, FieldCache};
pub use derivative::DerivativeLabel;
pub use field::{CoordinateSystemType, DomainType, Field, FieldKind};
pub use node_template::NodeTemplate;
pub use nodeset::Nodeset;
pub use parameters::{FieldParameters, ParameterAtlas, Version};
