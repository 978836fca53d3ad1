//! Fieldcache: transient evaluation context.
//!
//! A cache binds exactly one node or one (element, local coordinates) pair
//! at a time, plus a time value for time-dependent fields. Rebinding
//! discards the previous binding. Caches are mutable scratch state and must
//! not be shared across concurrent evaluations; each evaluation path owns
//! its own cache bound to the same stores.

use smallvec::SmallVec;

use crate::topology::element::ElementId;
use crate::topology::node::NodeId;

/// The context a cache is currently bound to.
#[derive(Clone, Debug, PartialEq)]
pub enum CacheBinding {
    /// Bound to one node.
    Node(NodeId),
    /// Bound to one element at local coordinates `xi`.
    Element {
        /// Element the evaluation addresses.
        element: ElementId,
        /// Local coordinates within the element's reference cell.
        xi: SmallVec<[f64; 3]>,
    },
}

/// Per-evaluation scratch state binding field evaluation to a location and
/// time. Owns no persistent data.
#[derive(Clone, Debug, Default)]
pub struct FieldCache {
    binding: Option<CacheBinding>,
    time: f64,
}

impl FieldCache {
    /// Creates an unbound cache at time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the cache to `node`, discarding any previous binding.
    pub fn bind_node(&mut self, node: NodeId) {
        self.binding = Some(CacheBinding::Node(node));
    }

    /// Binds the cache to `element` at local coordinates `xi`, discarding
    /// any previous binding.
    pub fn bind_element(&mut self, element: ElementId, xi: &[f64]) {
        self.binding = Some(CacheBinding::Element {
            element,
            xi: SmallVec::from_slice(xi),
        });
    }

    /// Clears the binding; evaluations against an unbound cache fail.
    pub fn clear_binding(&mut self) {
        self.binding = None;
    }

    /// Sets the evaluation time.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Current evaluation time.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Current binding, if any.
    #[inline]
    pub fn binding(&self) -> Option<&CacheBinding> {
        self.binding.as_ref()
    }

    /// The bound node, if the cache is node-bound.
    pub fn node(&self) -> Option<NodeId> {
        match self.binding {
            Some(CacheBinding::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// The bound element and local coordinates, if element-bound.
    pub fn element(&self) -> Option<(ElementId, &[f64])> {
        match &self.binding {
            Some(CacheBinding::Element { element, xi }) => Some((*element, xi.as_slice())),
            _ => None,
        }
    }
}
