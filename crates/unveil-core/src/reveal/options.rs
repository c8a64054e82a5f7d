use serde::{Deserialize, Serialize};

use crate::animation::AnimationId;
use crate::observer::{ObserveOptions, RootMargin};
use crate::{Error, Result};

/// Semantic tag of the rendered element; carried through for page
/// components, never affects reveal behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementTag {
    #[default]
    Div,
    Section,
    Article,
    Aside,
    Header,
    Footer,
    Main,
    Nav,
    Span,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    P,
}

/// Per-target reveal configuration
///
/// Unknown keys are rejected when deserializing so a misspelt option fails
/// loudly instead of silently keeping its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealOptions {
    pub animation: AnimationId,
    /// Animation start delay applied once the target is visible
    #[serde(rename = "delay")]
    pub delay_ms: u64,
    /// Fraction of the element that must be inside the root, in [0, 1]
    pub threshold: f64,
    pub root_margin: RootMargin,
    pub trigger_once: bool,
    #[serde(rename = "as")]
    pub tag: ElementTag,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            animation: AnimationId::FALLBACK,
            delay_ms: 0,
            threshold: 0.1,
            root_margin: RootMargin::default(),
            trigger_once: true,
            tag: ElementTag::Div,
        }
    }
}

impl RevealOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options used by section wrappers: reveal a little later, 80px above the fold
    pub fn section() -> Self {
        Self {
            root_margin: RootMargin::bottom_inset(80.0),
            tag: ElementTag::Section,
            ..Self::default()
        }
    }

    /// Options used for headline text
    pub fn text() -> Self {
        Self {
            animation: AnimationId::TextReveal,
            tag: ElementTag::Span,
            ..Self::default()
        }
    }

    /// Options for the container of a stagger group
    pub fn group() -> Self {
        Self {
            root_margin: RootMargin::bottom_inset(80.0),
            ..Self::default()
        }
    }

    pub fn with_animation(mut self, animation: AnimationId) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_root_margin(mut self, root_margin: RootMargin) -> Self {
        self.root_margin = root_margin;
        self
    }

    pub fn with_trigger_once(mut self, trigger_once: bool) -> Self {
        self.trigger_once = trigger_once;
        self
    }

    pub fn with_tag(mut self, tag: ElementTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    pub fn observe_options(&self) -> ObserveOptions {
        ObserveOptions {
            threshold: self.threshold,
            root_margin: self.root_margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RevealOptions::default();
        assert_eq!(options.animation, AnimationId::SlideUp);
        assert_eq!(options.delay_ms, 0);
        assert_eq!(options.threshold, 0.1);
        assert_eq!(options.root_margin.to_string(), "0px 0px -50px 0px");
        assert!(options.trigger_once);
    }

    #[test]
    fn test_validate_threshold() {
        assert!(RevealOptions::new().with_threshold(0.0).validate().is_ok());
        assert!(RevealOptions::new().with_threshold(1.0).validate().is_ok());
        assert!(RevealOptions::new().with_threshold(1.5).validate().is_err());
        assert!(RevealOptions::new().with_threshold(-0.1).validate().is_err());
        assert!(RevealOptions::new().with_threshold(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let options: RevealOptions =
            serde_json::from_str(r#"{"animation": "zoom", "delay": 200, "as": "section"}"#).unwrap();
        assert_eq!(options.animation, AnimationId::Zoom);
        assert_eq!(options.delay_ms, 200);
        assert_eq!(options.tag, ElementTag::Section);
        assert_eq!(options.threshold, 0.1);
    }

    #[test]
    fn test_deserialize_rejects_typos() {
        let result = serde_json::from_str::<RevealOptions>(r#"{"triggerOnce": false}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_animation_deserializes_to_fallback() {
        let options: RevealOptions = serde_json::from_str(r#"{"animation": "bounce"}"#).unwrap();
        assert_eq!(options.animation, AnimationId::SlideUp);
    }

    #[test]
    fn test_section_preset() {
        let options = RevealOptions::section();
        assert_eq!(options.root_margin.to_string(), "0px 0px -80px 0px");
        assert_eq!(options.tag, ElementTag::Section);
    }
}
