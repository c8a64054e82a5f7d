use anyhow::Result;

use unveil_core::{AnimationId, AnimationResolver, StyleTransition};

pub fn run(names: &[String], list: bool, json: bool) -> Result<()> {
    let resolver = AnimationResolver::default();

    let transitions: Vec<(String, StyleTransition)> = if list || names.is_empty() {
        AnimationId::ALL
            .iter()
            .map(|id| (id.as_str().to_string(), StyleTransition::for_animation(*id)))
            .collect()
    } else {
        names
            .iter()
            .map(|name| (name.clone(), resolver.resolve(name)))
            .collect()
    };

    if json {
        let values: Vec<_> = transitions.iter().map(|(_, t)| t).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    for (name, transition) in &transitions {
        let fallback = if name.as_str() != transition.animation.as_str() {
            " (fallback)"
        } else {
            ""
        };
        println!("{} -> {}{}", name, transition.class_name, fallback);
        println!(
            "    {}ms {:?}, from opacity {} translate ({}%, {}%) scale {} rotate {}deg",
            transition.duration_ms,
            transition.easing,
            transition.from.opacity,
            transition.from.translate_x,
            transition.from.translate_y,
            transition.from.scale,
            transition.from.rotate_deg,
        );
    }

    Ok(())
}
