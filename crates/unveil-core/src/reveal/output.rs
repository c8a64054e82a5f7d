use serde::Serialize;

use crate::animation::StyleTransition;
use crate::timing::css_millis;

/// Inline style overrides a page component applies to the element
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_delay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// What a page component binds to for one revealed element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealOutput {
    pub is_visible: bool,
    /// Animation class while visible, empty while hidden
    pub resolved_style_class: String,
    pub inline_style: InlineStyle,
}

impl RevealOutput {
    /// Suppressed element: transparent, no class and no delay so it cannot
    /// flash before its reveal
    pub fn hidden() -> Self {
        Self {
            is_visible: false,
            resolved_style_class: String::new(),
            inline_style: InlineStyle {
                animation_delay: None,
                opacity: Some(0.0),
            },
        }
    }

    pub fn visible(transition: &StyleTransition, delay_ms: u64) -> Self {
        Self {
            is_visible: true,
            resolved_style_class: transition.class_name.clone(),
            inline_style: InlineStyle {
                animation_delay: Some(css_millis(delay_ms)),
                opacity: None,
            },
        }
    }

    pub fn new(visible: bool, transition: &StyleTransition, delay_ms: u64) -> Self {
        if visible {
            Self::visible(transition, delay_ms)
        } else {
            Self::hidden()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationId;

    #[test]
    fn test_hidden_output() {
        let output = RevealOutput::hidden();
        assert!(!output.is_visible);
        assert!(output.resolved_style_class.is_empty());
        assert_eq!(output.inline_style.opacity, Some(0.0));
        assert!(output.inline_style.animation_delay.is_none());
    }

    #[test]
    fn test_visible_output_json() {
        let transition = StyleTransition::for_animation(AnimationId::Zoom);
        let output = RevealOutput::visible(&transition, 200);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["isVisible"], true);
        assert_eq!(json["resolvedStyleClass"], "animate-zoom");
        assert_eq!(json["inlineStyle"]["animationDelay"], "200ms");
        assert!(json["inlineStyle"].get("opacity").is_none());
    }
}
