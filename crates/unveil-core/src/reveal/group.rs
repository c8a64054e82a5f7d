use crate::animation::{AnimationId, StyleTransition};
use crate::observer::{ElementId, ViewportObserver};
use crate::stagger::StaggerGroup;
use crate::Result;

use super::{RevealEngine, RevealOptions, RevealOutput, ScopeId, TargetId};

/// A list whose children all reveal off a single container observation
///
/// Only the container is observed; each child inherits its visibility and
/// gets its own delay from the stagger schedule.
#[derive(Debug, Clone)]
pub struct GroupReveal {
    container: TargetId,
    transition: StyleTransition,
    stagger: StaggerGroup,
    len: usize,
}

impl GroupReveal {
    /// The container is observed without delay. `options.delay_ms` becomes
    /// the stagger base when `stagger` has none of its own.
    pub fn mount<O: ViewportObserver>(
        engine: &mut RevealEngine<O>,
        scope: ScopeId,
        container: Option<ElementId>,
        options: RevealOptions,
        mut stagger: StaggerGroup,
        len: usize,
    ) -> Result<Self> {
        let animation = options.animation;
        if stagger.base_delay_ms == 0 {
            stagger.base_delay_ms = options.delay_ms;
        }
        let container = engine.mount(scope, container, options.with_delay(0))?;
        tracing::debug!("Group {} mounted with {} children", container, len);

        Ok(Self {
            container,
            transition: StyleTransition::for_animation(animation),
            stagger,
            len,
        })
    }

    pub fn container(&self) -> TargetId {
        self.container
    }

    pub fn animation(&self) -> AnimationId {
        self.transition.animation
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_visible<O: ViewportObserver>(&self, engine: &RevealEngine<O>) -> bool {
        engine.is_visible(self.container)
    }

    pub fn delay(&self, index: usize) -> u64 {
        self.stagger.group_delay(index)
    }

    pub fn item_output<O: ViewportObserver>(&self, engine: &RevealEngine<O>, index: usize) -> RevealOutput {
        RevealOutput::new(self.is_visible(engine), &self.transition, self.delay(index))
    }

    pub fn outputs<O: ViewportObserver>(&self, engine: &RevealEngine<O>) -> Vec<RevealOutput> {
        (0..self.len).map(|i| self.item_output(engine, i)).collect()
    }
}

/// A list whose children are observed independently
#[derive(Debug, Clone)]
pub struct PerItemReveal {
    items: Vec<TargetId>,
}

impl PerItemReveal {
    /// Mount one target per element, each delayed by the capped per-item schedule
    pub fn mount<O: ViewportObserver>(
        engine: &mut RevealEngine<O>,
        scope: ScopeId,
        elements: &[Option<ElementId>],
        options: RevealOptions,
        stagger: StaggerGroup,
    ) -> Result<Self> {
        let mut items = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let item_options = options.clone().with_delay(stagger.per_item_delay(index));
            match engine.mount(scope, *element, item_options) {
                Ok(id) => items.push(id),
                Err(e) => {
                    for id in items {
                        engine.unmount(id);
                    }
                    return Err(e);
                }
            }
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[TargetId] {
        &self.items
    }

    pub fn outputs<O: ViewportObserver>(&self, engine: &RevealEngine<O>) -> Vec<RevealOutput> {
        self.items
            .iter()
            .map(|id| engine.output(*id).unwrap_or_else(RevealOutput::hidden))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::ManualObserver;

    #[test]
    fn test_group_reveals_all_children_with_stagger() {
        let mut engine = RevealEngine::new(ManualObserver::new());
        let scope = ScopeId::new();
        let container = ElementId(100);
        let group = GroupReveal::mount(
            &mut engine,
            scope,
            Some(container),
            RevealOptions::group().with_animation(AnimationId::Cascade),
            StaggerGroup::new(200, 150),
            3,
        )
        .unwrap();

        assert!(group.outputs(&engine).iter().all(|o| !o.is_visible));
        assert_eq!(engine.observer().subscription_count(), 1);

        engine.observer_mut().set_ratio(container, 0.5);
        engine.pump();

        let outputs = group.outputs(&engine);
        let delays: Vec<_> = outputs
            .iter()
            .map(|o| o.inline_style.animation_delay.clone().unwrap())
            .collect();
        assert_eq!(delays, vec!["200ms", "350ms", "500ms"]);
        assert!(outputs.iter().all(|o| o.resolved_style_class == "animate-cascade"));
        assert_eq!(engine.observer().subscription_count(), 0);
    }

    #[test]
    fn test_group_delay_becomes_stagger_base() {
        let mut engine = RevealEngine::new(ManualObserver::new());
        let container = ElementId(7);
        let group = GroupReveal::mount(
            &mut engine,
            ScopeId::new(),
            Some(container),
            RevealOptions::group().with_delay(300),
            StaggerGroup::new(0, 50),
            3,
        )
        .unwrap();

        engine.observer_mut().set_ratio(container, 1.0);
        engine.pump();
        let container_output = engine.output(group.container()).unwrap();
        assert_eq!(container_output.inline_style.animation_delay.as_deref(), Some("0ms"));
        assert_eq!((0..3).map(|i| group.delay(i)).collect::<Vec<_>>(), vec![300, 350, 400]);

        // An explicit base wins over the options delay
        let explicit = GroupReveal::mount(
            &mut engine,
            ScopeId::new(),
            Some(ElementId(8)),
            RevealOptions::group().with_delay(300),
            StaggerGroup::new(200, 50),
            2,
        )
        .unwrap();
        assert_eq!(explicit.delay(0), 200);
    }

    #[test]
    fn test_per_item_reveals_independently() {
        let mut engine = RevealEngine::new(ManualObserver::new());
        let scope = ScopeId::new();
        let elements: Vec<_> = (0..12).map(|i| Some(ElementId(i))).collect();
        let list = PerItemReveal::mount(
            &mut engine,
            scope,
            &elements,
            RevealOptions::new(),
            StaggerGroup::new(100, 0),
        )
        .unwrap();

        assert_eq!(engine.outstanding_subscriptions(scope), 12);

        engine.observer_mut().set_ratio(ElementId(4), 1.0);
        engine.observer_mut().set_ratio(ElementId(11), 1.0);
        engine.pump();

        let outputs = list.outputs(&engine);
        assert_eq!(outputs.iter().filter(|o| o.is_visible).count(), 2);
        assert_eq!(outputs[4].inline_style.animation_delay.as_deref(), Some("400ms"));
        assert_eq!(outputs[11].inline_style.animation_delay.as_deref(), Some("1000ms"));
        assert!(!outputs[0].is_visible);
    }

    #[test]
    fn test_per_item_mount_failure_rolls_back() {
        let mut engine = RevealEngine::new(ManualObserver::new());
        let result = PerItemReveal::mount(
            &mut engine,
            ScopeId::new(),
            &[Some(ElementId(1)), Some(ElementId(2))],
            RevealOptions::new().with_threshold(-1.0),
            StaggerGroup::default(),
        );
        assert!(result.is_err());
        assert!(engine.is_empty());
    }
}
