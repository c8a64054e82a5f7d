use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::animation::StyleTransition;
use crate::observer::{ElementId, IntersectionEntry, SubscriptionId, ViewportObserver};
use crate::Result;

use super::{RevealMachine, RevealOptions, RevealOutput, RevealState};

/// Identifies one mounted reveal target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// Lifecycle scope of a page component; unmounting the scope tears down
/// every target mounted under it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(Uuid);

impl ScopeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScopeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visibility flip reported by [`RevealEngine::pump`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevealChange {
    pub target: TargetId,
    pub visible: bool,
}

struct Target {
    scope: ScopeId,
    element: Option<ElementId>,
    options: RevealOptions,
    transition: StyleTransition,
    machine: RevealMachine,
    subscription: Option<SubscriptionId>,
}

/// Drives every reveal target's state machine from observer entries
///
/// Each target owns at most one subscription. The engine releases it on
/// unmount or right after a one-shot target reveals, and drops entries that
/// arrive for subscriptions it no longer holds.
pub struct RevealEngine<O: ViewportObserver> {
    observer: O,
    targets: HashMap<TargetId, Target>,
    subscriptions: HashMap<SubscriptionId, TargetId>,
    next_target: u64,
}

impl<O: ViewportObserver> RevealEngine<O> {
    pub fn new(observer: O) -> Self {
        Self {
            observer,
            targets: HashMap::new(),
            subscriptions: HashMap::new(),
            next_target: 0,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access for feeding layout updates to the observer
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Register a target and start observing its element
    ///
    /// A missing element is not an error: the target is created but stays
    /// hidden forever and holds no subscription.
    pub fn mount(&mut self, scope: ScopeId, element: Option<ElementId>, options: RevealOptions) -> Result<TargetId> {
        options.validate()?;

        self.next_target += 1;
        let id = TargetId(self.next_target);

        let subscription = match element {
            Some(element) => {
                let sub = self.observer.observe(element, &options.observe_options());
                self.subscriptions.insert(sub, id);
                Some(sub)
            }
            None => {
                tracing::warn!("{} mounted without an element, it will stay hidden", id);
                None
            }
        };

        tracing::debug!(
            "Mounted {} ({}, delay {}ms, threshold {})",
            id,
            options.animation,
            options.delay_ms,
            options.threshold
        );

        self.targets.insert(
            id,
            Target {
                scope,
                element,
                transition: StyleTransition::for_animation(options.animation),
                machine: RevealMachine::new(options.trigger_once),
                options,
                subscription,
            },
        );

        Ok(id)
    }

    /// Remove a target and release its subscription
    ///
    /// Returns `false` for unknown or already-unmounted targets.
    pub fn unmount(&mut self, target: TargetId) -> bool {
        let Some(mut slot) = self.targets.remove(&target) else {
            return false;
        };
        self.release(target, &mut slot);
        tracing::debug!("Unmounted {}", target);
        true
    }

    /// Unmount every target mounted under `scope`
    pub fn unmount_scope(&mut self, scope: ScopeId) -> usize {
        let mut ids: Vec<TargetId> = self
            .targets
            .iter()
            .filter(|(_, slot)| slot.scope == scope)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();

        for id in &ids {
            self.unmount(*id);
        }
        ids.len()
    }

    /// Drain pending observer entries and apply them in delivery order
    pub fn pump(&mut self) -> Vec<RevealChange> {
        let entries = self.observer.take_entries();
        entries.into_iter().filter_map(|entry| self.dispatch(entry)).collect()
    }

    /// Apply a single intersection entry
    pub fn dispatch(&mut self, entry: IntersectionEntry) -> Option<RevealChange> {
        let Some(&target) = self.subscriptions.get(&entry.subscription) else {
            tracing::trace!("Dropping entry for released subscription {:?}", entry.subscription);
            return None;
        };
        let slot = self.targets.get_mut(&target)?;
        if slot.element != Some(entry.element) {
            tracing::trace!("Dropping entry for {} on {}", entry.element, target);
            return None;
        }

        let step = slot.machine.on_intersect(entry.is_intersecting);

        if step.release {
            if let Some(sub) = slot.subscription.take() {
                self.subscriptions.remove(&sub);
                self.observer.unobserve(sub);
            }
        }

        if !step.changed {
            return None;
        }

        let visible = slot.machine.is_visible();
        tracing::debug!(
            "{} {} at ratio {:.2}",
            target,
            if visible { "revealed" } else { "hidden" },
            entry.ratio
        );
        Some(RevealChange { target, visible })
    }

    pub fn is_visible(&self, target: TargetId) -> bool {
        self.targets
            .get(&target)
            .map(|slot| slot.machine.is_visible())
            .unwrap_or(false)
    }

    pub fn state(&self, target: TargetId) -> Option<RevealState> {
        self.targets.get(&target).map(|slot| slot.machine.state())
    }

    pub fn options(&self, target: TargetId) -> Option<&RevealOptions> {
        self.targets.get(&target).map(|slot| &slot.options)
    }

    pub fn transition(&self, target: TargetId) -> Option<&StyleTransition> {
        self.targets.get(&target).map(|slot| &slot.transition)
    }

    /// Presentation output for a mounted target
    pub fn output(&self, target: TargetId) -> Option<RevealOutput> {
        self.targets.get(&target).map(|slot| {
            RevealOutput::new(slot.machine.is_visible(), &slot.transition, slot.options.delay_ms)
        })
    }

    /// Whether the target still holds an observer subscription
    pub fn is_observing(&self, target: TargetId) -> bool {
        self.targets
            .get(&target)
            .map(|slot| slot.subscription.is_some())
            .unwrap_or(false)
    }

    /// Subscriptions still held by targets of `scope`
    pub fn outstanding_subscriptions(&self, scope: ScopeId) -> usize {
        self.targets
            .values()
            .filter(|slot| slot.scope == scope && slot.subscription.is_some())
            .count()
    }

    pub fn targets_in_scope(&self, scope: ScopeId) -> Vec<TargetId> {
        let mut ids: Vec<TargetId> = self
            .targets
            .iter()
            .filter(|(_, slot)| slot.scope == scope)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn release(&mut self, target: TargetId, slot: &mut Target) {
        if let Some(sub) = slot.subscription.take() {
            self.subscriptions.remove(&sub);
            if !self.observer.unobserve(sub) {
                tracing::trace!("{} subscription was already released", target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationId;
    use crate::geometry::Rect;
    use crate::observer::{LayoutObserver, ManualObserver};

    fn engine() -> RevealEngine<ManualObserver> {
        RevealEngine::new(ManualObserver::new())
    }

    #[test]
    fn test_reveal_once_and_release() {
        let mut engine = engine();
        let scope = ScopeId::new();
        let el = ElementId(1);
        let target = engine
            .mount(scope, Some(el), RevealOptions::new().with_animation(AnimationId::Zoom).with_delay(200))
            .unwrap();

        assert!(!engine.is_visible(target));
        assert_eq!(engine.output(target), Some(RevealOutput::hidden()));

        engine.observer_mut().set_ratio(el, 0.3);
        let changes = engine.pump();
        assert_eq!(changes, vec![RevealChange { target, visible: true }]);

        let output = engine.output(target).unwrap();
        assert_eq!(output.resolved_style_class, "animate-zoom");
        assert_eq!(output.inline_style.animation_delay.as_deref(), Some("200ms"));
        assert_eq!(output.inline_style.opacity, None);

        // Released exactly once, further movement is ignored
        assert!(!engine.is_observing(target));
        assert_eq!(engine.observer().subscription_count(), 0);
        engine.observer_mut().set_ratio(el, 0.0);
        assert!(engine.pump().is_empty());
        assert!(engine.is_visible(target));
    }

    #[test]
    fn test_below_threshold_stays_hidden() {
        let mut engine = engine();
        let el = ElementId(1);
        let target = engine.mount(ScopeId::new(), Some(el), RevealOptions::new()).unwrap();

        engine.observer_mut().set_ratio(el, 0.05);
        assert!(engine.pump().is_empty());
        assert!(!engine.is_visible(target));
        assert!(engine.is_observing(target));
    }

    #[test]
    fn test_duplicate_entries_release_once() {
        let mut engine = engine();
        let el = ElementId(3);
        let target = engine.mount(ScopeId::new(), Some(el), RevealOptions::new()).unwrap();
        let sub = engine.observer().subscriptions_for(el)[0];

        engine.observer_mut().fire(sub, el, true);
        engine.observer_mut().fire(sub, el, true);
        let changes = engine.pump();

        assert_eq!(changes.len(), 1);
        assert!(engine.is_visible(target));
        assert_eq!(engine.observer().release_count(sub), 1);
    }

    #[test]
    fn test_missing_element_stays_hidden() {
        let mut engine = engine();
        let scope = ScopeId::new();
        let target = engine.mount(scope, None, RevealOptions::new()).unwrap();

        assert_eq!(engine.observer().subscription_count(), 0);
        assert!(engine.pump().is_empty());
        assert_eq!(engine.output(target), Some(RevealOutput::hidden()));
        assert_eq!(engine.outstanding_subscriptions(scope), 0);
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let mut engine = engine();
        let result = engine.mount(ScopeId::new(), Some(ElementId(1)), RevealOptions::new().with_threshold(3.0));
        assert!(result.is_err());
        assert!(engine.is_empty());
        assert_eq!(engine.observer().subscription_count(), 0);
    }

    #[test]
    fn test_unmount_before_reveal_releases_and_drops_late_entries() {
        let mut engine = engine();
        let scope = ScopeId::new();
        let el = ElementId(9);
        let target = engine.mount(scope, Some(el), RevealOptions::new()).unwrap();
        let sub = engine.observer().subscriptions_for(el)[0];

        // Entry already queued when the target goes away
        engine.observer_mut().fire(sub, el, true);
        assert!(engine.unmount(target));
        assert!(!engine.unmount(target));

        assert!(engine.pump().is_empty());
        assert_eq!(engine.observer().release_count(sub), 1);
        assert_eq!(engine.outstanding_subscriptions(scope), 0);
        assert_eq!(engine.output(target), None);
    }

    #[test]
    fn test_unmount_scope() {
        let mut engine = engine();
        let page = ScopeId::new();
        let other = ScopeId::new();
        for i in 0..3 {
            engine.mount(page, Some(ElementId(i)), RevealOptions::new()).unwrap();
        }
        let kept = engine.mount(other, Some(ElementId(10)), RevealOptions::new()).unwrap();

        assert_eq!(engine.outstanding_subscriptions(page), 3);
        assert_eq!(engine.unmount_scope(page), 3);
        assert_eq!(engine.outstanding_subscriptions(page), 0);
        assert_eq!(engine.observer().subscription_count(), 1);
        assert!(engine.is_observing(kept));
    }

    #[test]
    fn test_retrigger_toggles_visibility() {
        let mut engine = engine();
        let el = ElementId(4);
        let target = engine
            .mount(ScopeId::new(), Some(el), RevealOptions::new().with_trigger_once(false))
            .unwrap();

        engine.observer_mut().set_ratio(el, 1.0);
        assert_eq!(engine.pump(), vec![RevealChange { target, visible: true }]);
        engine.observer_mut().set_ratio(el, 0.0);
        assert_eq!(engine.pump(), vec![RevealChange { target, visible: false }]);
        assert!(engine.is_observing(target));
        assert_eq!(
            engine.state(target),
            Some(RevealState {
                visible: false,
                has_triggered: true
            })
        );
        assert_eq!(engine.output(target), Some(RevealOutput::hidden()));
    }

    #[test]
    fn test_layout_observer_end_to_end() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let mut engine = RevealEngine::new(LayoutObserver::new(viewport));
        let el = ElementId(1);
        engine.observer_mut().set_element_rect(el, Rect::new(0.0, 700.0, 800.0, 200.0));
        let target = engine.mount(ScopeId::new(), Some(el), RevealOptions::new()).unwrap();

        assert!(engine.pump().is_empty());

        // Top 40px of the element inside the viewport, but the -50px margin hides it
        engine.observer_mut().set_viewport(Rect::new(0.0, 140.0, 800.0, 600.0));
        assert!(engine.pump().is_empty());

        engine.observer_mut().set_viewport(Rect::new(0.0, 300.0, 800.0, 600.0));
        assert_eq!(engine.pump(), vec![RevealChange { target, visible: true }]);
        assert_eq!(engine.observer().subscription_count(), 0);
    }
}
