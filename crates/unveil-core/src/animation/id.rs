use std::fmt;

use serde::{Deserialize, Serialize};

use super::resolver::AnimationResolver;

/// Named reveal animation
///
/// Deserializing never fails: unknown names resolve to [`AnimationId::FALLBACK`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum AnimationId {
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    Zoom,
    Rotate,
    Flip,
    Swing,
    Elastic,
    Cascade,
    Glide,
    Wave,
    Morph,
    Spiral,
    TextReveal,
    LetterSpacing,
    MotionBlurLeft,
    MotionBlurRight,
    MotionBlurUp,
    Shimmer,
    PulseGrow,
    Float,
}

impl AnimationId {
    /// Animation used for unknown or missing identifiers
    pub const FALLBACK: AnimationId = AnimationId::SlideUp;

    pub const ALL: [AnimationId; 22] = [
        AnimationId::SlideLeft,
        AnimationId::SlideRight,
        AnimationId::SlideUp,
        AnimationId::SlideDown,
        AnimationId::Zoom,
        AnimationId::Rotate,
        AnimationId::Flip,
        AnimationId::Swing,
        AnimationId::Elastic,
        AnimationId::Cascade,
        AnimationId::Glide,
        AnimationId::Wave,
        AnimationId::Morph,
        AnimationId::Spiral,
        AnimationId::TextReveal,
        AnimationId::LetterSpacing,
        AnimationId::MotionBlurLeft,
        AnimationId::MotionBlurRight,
        AnimationId::MotionBlurUp,
        AnimationId::Shimmer,
        AnimationId::PulseGrow,
        AnimationId::Float,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationId::SlideLeft => "slide-left",
            AnimationId::SlideRight => "slide-right",
            AnimationId::SlideUp => "slide-up",
            AnimationId::SlideDown => "slide-down",
            AnimationId::Zoom => "zoom",
            AnimationId::Rotate => "rotate",
            AnimationId::Flip => "flip",
            AnimationId::Swing => "swing",
            AnimationId::Elastic => "elastic",
            AnimationId::Cascade => "cascade",
            AnimationId::Glide => "glide",
            AnimationId::Wave => "wave",
            AnimationId::Morph => "morph",
            AnimationId::Spiral => "spiral",
            AnimationId::TextReveal => "text-reveal",
            AnimationId::LetterSpacing => "letter-spacing",
            AnimationId::MotionBlurLeft => "motion-blur-left",
            AnimationId::MotionBlurRight => "motion-blur-right",
            AnimationId::MotionBlurUp => "motion-blur-up",
            AnimationId::Shimmer => "shimmer",
            AnimationId::PulseGrow => "pulse-grow",
            AnimationId::Float => "float",
        }
    }

    /// Exact lookup by identifier; `None` for anything outside the closed set
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_str() == name)
    }

    /// Lookup that never fails, falling back to [`AnimationId::FALLBACK`]
    pub fn from_name_or_fallback(name: &str) -> Self {
        AnimationResolver::default().resolve_id(name)
    }

    /// CSS class applied while the element is visible
    pub fn class_name(&self) -> String {
        format!("animate-{}", self.as_str())
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AnimationId {
    fn from(name: String) -> Self {
        Self::from_name_or_fallback(&name)
    }
}

impl From<AnimationId> for &'static str {
    fn from(id: AnimationId) -> Self {
        id.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for id in AnimationId::ALL {
            assert_eq!(AnimationId::from_name(id.as_str()), Some(id));
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = AnimationId::ALL.iter().map(|id| id.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 22);
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(AnimationId::from_name("slide_up"), None);
        assert_eq!(AnimationId::from_name_or_fallback("bounce"), AnimationId::SlideUp);
        assert_eq!(AnimationId::from_name_or_fallback(""), AnimationId::SlideUp);
    }

    #[test]
    fn test_deserialize_with_fallback() {
        let id: AnimationId = serde_json::from_str("\"zoom\"").unwrap();
        assert_eq!(id, AnimationId::Zoom);
        let id: AnimationId = serde_json::from_str("\"does-not-exist\"").unwrap();
        assert_eq!(id, AnimationId::SlideUp);
        assert_eq!(serde_json::to_string(&AnimationId::PulseGrow).unwrap(), "\"pulse-grow\"");
    }

    #[test]
    fn test_class_name() {
        assert_eq!(AnimationId::MotionBlurUp.class_name(), "animate-motion-blur-up");
    }
}
