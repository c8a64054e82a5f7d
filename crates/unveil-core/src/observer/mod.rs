//! Viewport observation
//!
//! The reveal engine never measures anything itself. It registers elements
//! with a [`ViewportObserver`] and drains [`IntersectionEntry`] values from it
//! on every pump of the UI loop.
//!
//! - `layout` - geometry-backed observer that pools watchers per
//!   `(threshold, root margin)` pair
//! - `manual` - deterministic observer driven directly by tests and scenarios
//! - `margin` - CSS root margin parsing

mod layout;
mod manual;
pub mod margin;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use layout::LayoutObserver;
pub use manual::ManualObserver;
pub use margin::{MarginValue, RootMargin};

/// Opaque handle to a renderable element owned by a page component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// Handle for a single `observe` registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Parameters that decide when an element counts as intersecting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Fraction of the element that must be inside the root, in [0, 1]
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: RootMargin::default(),
        }
    }
}

/// A threshold crossing reported for one subscription
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub subscription: SubscriptionId,
    pub element: ElementId,
    pub ratio: f64,
    pub is_intersecting: bool,
}

/// Whether an intersection ratio satisfies a threshold
///
/// A zero threshold means "any overlap at all".
#[inline]
pub fn crosses_threshold(ratio: f64, threshold: f64) -> bool {
    if threshold <= 0.0 {
        ratio > 0.0
    } else {
        ratio >= threshold
    }
}

/// Platform visibility-detection capability consumed by the reveal engine
pub trait ViewportObserver {
    /// Start watching `element`; entries for it are tagged with the returned id
    fn observe(&mut self, element: ElementId, options: &ObserveOptions) -> SubscriptionId;

    /// Stop watching. Returns `false` when the subscription was already released.
    fn unobserve(&mut self, subscription: SubscriptionId) -> bool;

    /// Drain threshold crossings queued since the last call, in delivery order
    fn take_entries(&mut self) -> Vec<IntersectionEntry>;

    /// Number of live subscriptions
    fn subscription_count(&self) -> usize;
}
