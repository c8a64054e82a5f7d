//! Animation identifiers and the transitions they resolve to

pub mod easing;
mod id;
mod resolver;
mod transition;

pub use easing::EasingType;
pub use id::AnimationId;
pub use resolver::{resolve, AnimationResolver};
pub use transition::{StyleTransition, Transform};
