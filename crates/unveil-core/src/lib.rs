pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod intro;
pub mod marquee;
pub mod observer;
pub mod reveal;
pub mod scenario;
pub mod stagger;
pub mod timer;
pub mod timing;

pub use animation::{resolve, AnimationId, AnimationResolver, StyleTransition, Transform};
pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use intro::{IntroPhase, IntroSequencer, IntroTimings};
pub use observer::{ElementId, LayoutObserver, ManualObserver, RootMargin, ViewportObserver};
pub use reveal::{RevealEngine, RevealOptions, RevealOutput, ScopeId, TargetId};
pub use stagger::{StaggerGroup, StaggerMode};
