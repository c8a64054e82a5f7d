use serde::Serialize;

use super::id::AnimationId;
use crate::config::EasingType;
use crate::timing::lerp;

/// Visual offset of an element relative to its resting appearance
///
/// Translations are percentages of the element's own size, mirroring the
/// `translateX(60%)` style the site's stylesheets use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub rotate_deg: f64,
    /// Rotation around the vertical axis, used by flips
    pub rotate_y_deg: f64,
    pub blur_px: f64,
    pub letter_spacing_em: f64,
    pub opacity: f64,
}

impl Transform {
    /// Resting appearance: where every reveal ends
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        rotate_deg: 0.0,
        rotate_y_deg: 0.0,
        blur_px: 0.0,
        letter_spacing_em: 0.0,
        opacity: 1.0,
    };

    /// Fully transparent identity, the start of most reveals
    const HIDDEN: Transform = Transform {
        opacity: 0.0,
        ..Transform::IDENTITY
    };

    /// Interpolate towards `to`; `t` is not clamped so overshooting curves
    /// carry through
    pub fn lerp(&self, to: &Transform, t: f64) -> Transform {
        Transform {
            translate_x: lerp(self.translate_x, to.translate_x, t),
            translate_y: lerp(self.translate_y, to.translate_y, t),
            scale: lerp(self.scale, to.scale, t),
            rotate_deg: lerp(self.rotate_deg, to.rotate_deg, t),
            rotate_y_deg: lerp(self.rotate_y_deg, to.rotate_y_deg, t),
            blur_px: lerp(self.blur_px, to.blur_px, t).max(0.0),
            letter_spacing_em: lerp(self.letter_spacing_em, to.letter_spacing_em, t),
            opacity: lerp(self.opacity, to.opacity, t).clamp(0.0, 1.0),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Concrete transition behind an animation identifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleTransition {
    pub animation: AnimationId,
    pub class_name: String,
    pub duration_ms: u64,
    pub easing: EasingType,
    /// Appearance at progress 0; progress 1 is always [`Transform::IDENTITY`]
    pub from: Transform,
}

impl StyleTransition {
    pub fn for_animation(animation: AnimationId) -> Self {
        let (duration_ms, easing, from) = keyframes(animation);
        Self {
            animation,
            class_name: animation.class_name(),
            duration_ms,
            easing,
            from,
        }
    }

    /// Appearance at linear progress `t` in [0, 1]
    pub fn sample(&self, t: f64) -> Transform {
        let eased = self.easing.apply(t);
        self.from.lerp(&Transform::IDENTITY, eased)
    }

    /// Appearance `elapsed_ms` after the animation started (delay already elapsed)
    pub fn sample_at(&self, elapsed_ms: u64) -> Transform {
        if elapsed_ms >= self.duration_ms {
            return Transform::IDENTITY;
        }
        self.sample(elapsed_ms as f64 / self.duration_ms as f64)
    }
}

/// Duration, easing and starting transform for each animation
fn keyframes(animation: AnimationId) -> (u64, EasingType, Transform) {
    let hidden = Transform::HIDDEN;
    match animation {
        AnimationId::SlideLeft => (800, EasingType::Cubic, Transform { translate_x: 60.0, ..hidden }),
        AnimationId::SlideRight => (800, EasingType::Cubic, Transform { translate_x: -60.0, ..hidden }),
        AnimationId::SlideUp => (800, EasingType::Cubic, Transform { translate_y: 40.0, ..hidden }),
        AnimationId::SlideDown => (800, EasingType::Cubic, Transform { translate_y: -40.0, ..hidden }),
        AnimationId::Zoom => (700, EasingType::Cubic, Transform { scale: 0.6, ..hidden }),
        AnimationId::Rotate => (
            800,
            EasingType::Cubic,
            Transform { rotate_deg: -12.0, scale: 0.9, ..hidden },
        ),
        AnimationId::Flip => (900, EasingType::EaseInOut, Transform { rotate_y_deg: 90.0, ..hidden }),
        AnimationId::Swing => (
            1000,
            EasingType::Back,
            Transform { rotate_deg: 8.0, translate_y: 10.0, ..hidden },
        ),
        AnimationId::Elastic => (1200, EasingType::Elastic, Transform { scale: 0.3, ..hidden }),
        AnimationId::Cascade => (
            900,
            EasingType::Quintic,
            Transform { translate_x: -20.0, translate_y: 30.0, ..hidden },
        ),
        AnimationId::Glide => (
            1000,
            EasingType::EaseOut,
            Transform { translate_x: -30.0, translate_y: 10.0, ..hidden },
        ),
        AnimationId::Wave => (
            1100,
            EasingType::EaseInOut,
            Transform { translate_y: 20.0, rotate_deg: 4.0, ..hidden },
        ),
        AnimationId::Morph => (
            900,
            EasingType::EaseInOut,
            Transform { scale: 0.85, blur_px: 6.0, ..hidden },
        ),
        AnimationId::Spiral => (
            1200,
            EasingType::Cubic,
            Transform { rotate_deg: -180.0, scale: 0.4, ..hidden },
        ),
        AnimationId::TextReveal => (800, EasingType::Quintic, Transform { translate_y: 100.0, ..hidden }),
        AnimationId::LetterSpacing => (
            1000,
            EasingType::EaseOut,
            Transform { letter_spacing_em: 0.5, ..hidden },
        ),
        AnimationId::MotionBlurLeft => (
            700,
            EasingType::EaseOut,
            Transform { translate_x: 40.0, blur_px: 10.0, ..hidden },
        ),
        AnimationId::MotionBlurRight => (
            700,
            EasingType::EaseOut,
            Transform { translate_x: -40.0, blur_px: 10.0, ..hidden },
        ),
        AnimationId::MotionBlurUp => (
            700,
            EasingType::EaseOut,
            Transform { translate_y: 40.0, blur_px: 10.0, ..hidden },
        ),
        AnimationId::Shimmer => (1500, EasingType::Linear, Transform { blur_px: 2.0, ..hidden }),
        AnimationId::PulseGrow => (600, EasingType::Back, Transform { scale: 0.8, ..hidden }),
        AnimationId::Float => (1400, EasingType::EaseInOut, Transform { translate_y: 15.0, ..hidden }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_transition_ends_at_rest() {
        for id in AnimationId::ALL {
            let transition = StyleTransition::for_animation(id);
            let end = transition.sample(1.0);
            assert!((end.opacity - 1.0).abs() < 1e-9, "{} opacity", id);
            assert!((end.scale - 1.0).abs() < 1e-9, "{} scale", id);
            assert!(end.translate_x.abs() < 1e-9, "{} translate_x", id);
            assert!(end.translate_y.abs() < 1e-9, "{} translate_y", id);
        }
    }

    #[test]
    fn test_every_transition_starts_hidden() {
        for id in AnimationId::ALL {
            let start = StyleTransition::for_animation(id).sample(0.0);
            assert_eq!(start.opacity, 0.0, "{}", id);
        }
    }

    #[test]
    fn test_sample_at_uses_duration() {
        let transition = StyleTransition::for_animation(AnimationId::SlideUp);
        let halfway = transition.sample_at(transition.duration_ms / 2);
        assert!(halfway.translate_y > 0.0 && halfway.translate_y < 40.0);
        assert_eq!(transition.sample_at(10_000), Transform::IDENTITY);
    }

    #[test]
    fn test_class_name_matches_id() {
        let transition = StyleTransition::for_animation(AnimationId::Zoom);
        assert_eq!(transition.class_name, "animate-zoom");
        assert_eq!(transition.from.scale, 0.6);
    }
}
