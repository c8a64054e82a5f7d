//! Scroll-triggered reveal targets
//!
//! A target starts hidden, becomes visible the first time its element
//! crosses the observer threshold and (by default) stops observing.

mod engine;
mod group;
mod options;
mod output;
mod state;

pub use engine::{RevealChange, RevealEngine, ScopeId, TargetId};
pub use group::{GroupReveal, PerItemReveal};
pub use options::{ElementTag, RevealOptions};
pub use output::{InlineStyle, RevealOutput};
pub use state::{RevealMachine, RevealState, Step};
