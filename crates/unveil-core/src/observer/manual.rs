use std::collections::{BTreeMap, HashMap, VecDeque};

use super::{crosses_threshold, ElementId, IntersectionEntry, ObserveOptions, SubscriptionId, ViewportObserver};

#[derive(Debug)]
struct ManualSubscription {
    element: ElementId,
    threshold: f64,
    last: Option<bool>,
}

/// Deterministic observer driven by explicit ratio updates
///
/// Used by tests and scenario replays: nothing is measured, the caller sets
/// each element's intersection ratio and the observer queues an entry for
/// every subscription whose threshold state flips. Root margins are assumed
/// to be already folded into the supplied ratio.
#[derive(Debug, Default)]
pub struct ManualObserver {
    subscriptions: BTreeMap<SubscriptionId, ManualSubscription>,
    ratios: HashMap<ElementId, f64>,
    queue: VecDeque<IntersectionEntry>,
    releases: HashMap<SubscriptionId, usize>,
    next_subscription: u64,
}

impl ManualObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update an element's ratio and queue crossings for its subscriptions
    pub fn set_ratio(&mut self, element: ElementId, ratio: f64) {
        let ratio = ratio.clamp(0.0, 1.0);
        self.ratios.insert(element, ratio);

        for (id, sub) in self.subscriptions.iter_mut() {
            if sub.element != element {
                continue;
            }
            let is_intersecting = crosses_threshold(ratio, sub.threshold);
            if sub.last == Some(is_intersecting) {
                continue;
            }
            sub.last = Some(is_intersecting);
            self.queue.push_back(IntersectionEntry {
                subscription: *id,
                element,
                ratio,
                is_intersecting,
            });
        }
    }

    /// Queue a raw entry regardless of thresholds, as a platform might on
    /// duplicate or late callbacks
    pub fn fire(&mut self, subscription: SubscriptionId, element: ElementId, is_intersecting: bool) {
        self.queue.push_back(IntersectionEntry {
            subscription,
            element,
            ratio: if is_intersecting { 1.0 } else { 0.0 },
            is_intersecting,
        });
    }

    /// How many times `unobserve` actually released this subscription
    pub fn release_count(&self, subscription: SubscriptionId) -> usize {
        self.releases.get(&subscription).copied().unwrap_or(0)
    }

    pub fn is_observing(&self, subscription: SubscriptionId) -> bool {
        self.subscriptions.contains_key(&subscription)
    }

    /// Live subscriptions for an element
    pub fn subscriptions_for(&self, element: ElementId) -> Vec<SubscriptionId> {
        self.subscriptions
            .iter()
            .filter(|(_, sub)| sub.element == element)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl ViewportObserver for ManualObserver {
    fn observe(&mut self, element: ElementId, options: &ObserveOptions) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);

        let mut sub = ManualSubscription {
            element,
            threshold: options.threshold,
            last: None,
        };

        // Initial report when the element's ratio is already known
        if let Some(&ratio) = self.ratios.get(&element) {
            let is_intersecting = crosses_threshold(ratio, sub.threshold);
            sub.last = Some(is_intersecting);
            self.queue.push_back(IntersectionEntry {
                subscription: id,
                element,
                ratio,
                is_intersecting,
            });
        }

        self.subscriptions.insert(id, sub);
        id
    }

    fn unobserve(&mut self, subscription: SubscriptionId) -> bool {
        if self.subscriptions.remove(&subscription).is_none() {
            return false;
        }
        *self.releases.entry(subscription).or_insert(0) += 1;
        true
    }

    fn take_entries(&mut self) -> Vec<IntersectionEntry> {
        self.queue.drain(..).collect()
    }

    fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_queues_entry() {
        let mut observer = ManualObserver::new();
        let el = ElementId(7);
        let sub = observer.observe(el, &ObserveOptions::default());

        observer.set_ratio(el, 0.05);
        let entries = observer.take_entries();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_intersecting);

        observer.set_ratio(el, 0.08);
        assert!(observer.take_entries().is_empty());

        observer.set_ratio(el, 0.1);
        let entries = observer.take_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subscription, sub);
        assert!(entries[0].is_intersecting);
    }

    #[test]
    fn test_observe_reports_known_ratio() {
        let mut observer = ManualObserver::new();
        let el = ElementId(1);
        observer.set_ratio(el, 0.5);
        let sub = observer.observe(el, &ObserveOptions::default());

        let entries = observer.take_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subscription, sub);
        assert!(entries[0].is_intersecting);
    }

    #[test]
    fn test_unobserve_is_idempotent() {
        let mut observer = ManualObserver::new();
        let sub = observer.observe(ElementId(1), &ObserveOptions::default());

        assert!(observer.unobserve(sub));
        assert!(!observer.unobserve(sub));
        assert_eq!(observer.release_count(sub), 1);
        assert_eq!(observer.subscription_count(), 0);
    }
}
