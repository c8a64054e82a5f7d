use super::id::AnimationId;
use super::transition::StyleTransition;

/// Maps animation identifiers to concrete transitions
///
/// Unknown identifiers never fail: they resolve to the fallback's transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationResolver {
    fallback: AnimationId,
}

impl Default for AnimationResolver {
    fn default() -> Self {
        Self {
            fallback: AnimationId::FALLBACK,
        }
    }
}

impl AnimationResolver {
    pub fn new(fallback: AnimationId) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> AnimationId {
        self.fallback
    }

    /// Resolve any string to the identifier that will actually be played
    pub fn resolve_id(&self, name: &str) -> AnimationId {
        match AnimationId::from_name(name) {
            Some(id) => id,
            None => {
                tracing::debug!(name, fallback = %self.fallback, "Unknown animation, using fallback");
                self.fallback
            }
        }
    }

    pub fn resolve(&self, name: &str) -> StyleTransition {
        StyleTransition::for_animation(self.resolve_id(name))
    }
}

/// Resolve with the default `slide-up` fallback
pub fn resolve(name: &str) -> StyleTransition {
    AnimationResolver::default().resolve(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_identifiers_resolve_to_themselves() {
        for id in AnimationId::ALL {
            assert_eq!(resolve(id.as_str()).animation, id);
        }
    }

    #[test]
    fn test_unknown_falls_back_to_slide_up() {
        let expected = resolve("slide-up");
        for name in ["", "Zoom", "slide_up", "fade", "motion-blur-down", " zoom"] {
            assert_eq!(resolve(name), expected, "{:?}", name);
        }
    }

    #[test]
    fn test_custom_fallback() {
        let resolver = AnimationResolver::new(AnimationId::TextReveal);
        assert_eq!(resolver.resolve("nope").animation, AnimationId::TextReveal);
        assert_eq!(resolver.resolve("zoom").animation, AnimationId::Zoom);
    }
}
