use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{crosses_threshold, ElementId, IntersectionEntry, ObserveOptions, SubscriptionId, ViewportObserver};
use crate::geometry::{intersection_ratio, Rect};

/// Pool key: one watcher per distinct threshold / root margin pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct WatcherKey {
    threshold_bits: u64,
    margin: String,
}

impl WatcherKey {
    fn new(options: &ObserveOptions) -> Self {
        Self {
            threshold_bits: options.threshold.to_bits(),
            margin: options.root_margin.to_string(),
        }
    }
}

#[derive(Debug)]
struct Registration {
    subscription: SubscriptionId,
    element: ElementId,
    /// Last reported intersecting state; `None` until the first report
    last: Option<bool>,
}

#[derive(Debug)]
struct Watcher {
    options: ObserveOptions,
    registrations: Vec<Registration>,
}

/// Observer that computes intersections from laid-out element rectangles
///
/// Call [`set_viewport`](Self::set_viewport) whenever the page scrolls or
/// resizes and [`set_element_rect`](Self::set_element_rect) whenever layout
/// changes; [`take_entries`](ViewportObserver::take_entries) then reports every
/// registration whose intersecting state changed, including an initial report
/// once an element has a rectangle.
#[derive(Debug, Default)]
pub struct LayoutObserver {
    viewport: Rect,
    rects: HashMap<ElementId, Rect>,
    watchers: BTreeMap<WatcherKey, Watcher>,
    owners: HashMap<SubscriptionId, WatcherKey>,
    next_subscription: u64,
}

impl LayoutObserver {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    pub fn set_element_rect(&mut self, element: ElementId, rect: Rect) {
        self.rects.insert(element, rect);
    }

    /// Forget an element's layout; its registrations stay but go quiet
    pub fn remove_element(&mut self, element: ElementId) {
        self.rects.remove(&element);
    }

    /// Number of pooled platform watchers currently alive
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    /// Current intersection ratio of an element against the unadjusted viewport
    pub fn ratio_of(&self, element: ElementId) -> Option<f64> {
        self.rects
            .get(&element)
            .map(|rect| intersection_ratio(rect, &self.viewport))
    }
}

impl ViewportObserver for LayoutObserver {
    fn observe(&mut self, element: ElementId, options: &ObserveOptions) -> SubscriptionId {
        self.next_subscription += 1;
        let subscription = SubscriptionId(self.next_subscription);
        let key = WatcherKey::new(options);

        let watcher = self.watchers.entry(key.clone()).or_insert_with(|| {
            debug!(
                threshold = options.threshold,
                margin = %options.root_margin,
                "Creating pooled watcher"
            );
            Watcher {
                options: *options,
                registrations: Vec::new(),
            }
        });
        watcher.registrations.push(Registration {
            subscription,
            element,
            last: None,
        });
        self.owners.insert(subscription, key);

        subscription
    }

    fn unobserve(&mut self, subscription: SubscriptionId) -> bool {
        let Some(key) = self.owners.remove(&subscription) else {
            return false;
        };

        if let Some(watcher) = self.watchers.get_mut(&key) {
            watcher.registrations.retain(|r| r.subscription != subscription);
            if watcher.registrations.is_empty() {
                self.watchers.remove(&key);
            }
        }

        true
    }

    fn take_entries(&mut self) -> Vec<IntersectionEntry> {
        let mut entries = Vec::new();

        for watcher in self.watchers.values_mut() {
            let root = watcher.options.root_margin.apply(&self.viewport);
            let threshold = watcher.options.threshold;

            for registration in &mut watcher.registrations {
                let Some(rect) = self.rects.get(&registration.element) else {
                    continue;
                };

                let ratio = intersection_ratio(rect, &root);
                let is_intersecting = crosses_threshold(ratio, threshold);
                if registration.last == Some(is_intersecting) {
                    continue;
                }

                registration.last = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    subscription: registration.subscription,
                    element: registration.element,
                    ratio,
                    is_intersecting,
                });
            }
        }

        entries
    }

    fn subscription_count(&self) -> usize {
        self.owners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::RootMargin;

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_initial_report_and_crossing() {
        let mut observer = LayoutObserver::new(viewport());
        let el = ElementId(1);
        observer.set_element_rect(el, Rect::new(0.0, 200.0, 100.0, 50.0));

        let sub = observer.observe(el, &ObserveOptions::default());
        let entries = observer.take_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subscription, sub);
        assert!(!entries[0].is_intersecting);

        // Nothing changed, nothing reported
        assert!(observer.take_entries().is_empty());

        // Scroll so the element sits well above the -50px bottom margin
        observer.set_viewport(Rect::new(0.0, 180.0, 100.0, 100.0));
        let entries = observer.take_entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_intersecting);
    }

    #[test]
    fn test_root_margin_delays_reveal() {
        let mut observer = LayoutObserver::new(viewport());
        let el = ElementId(1);
        // Top edge 20px above the fold: inside the raw viewport, but below
        // the margin-adjusted one
        observer.set_element_rect(el, Rect::new(0.0, 80.0, 100.0, 100.0));
        observer.observe(el, &ObserveOptions::default());

        let entries = observer.take_entries();
        assert!(!entries[0].is_intersecting);
        assert!(observer.ratio_of(el).unwrap() > 0.1);
    }

    #[test]
    fn test_watchers_are_pooled() {
        let mut observer = LayoutObserver::new(viewport());
        let a = observer.observe(ElementId(1), &ObserveOptions::default());
        let _b = observer.observe(ElementId(2), &ObserveOptions::default());
        let _c = observer.observe(
            ElementId(3),
            &ObserveOptions {
                threshold: 0.1,
                root_margin: RootMargin::bottom_inset(80.0),
            },
        );

        assert_eq!(observer.watcher_count(), 2);
        assert_eq!(observer.subscription_count(), 3);

        assert!(observer.unobserve(a));
        assert!(!observer.unobserve(a));
        assert_eq!(observer.watcher_count(), 2);
        assert_eq!(observer.subscription_count(), 2);
    }

    #[test]
    fn test_empty_watcher_is_dropped() {
        let mut observer = LayoutObserver::new(viewport());
        let sub = observer.observe(ElementId(1), &ObserveOptions::default());
        assert!(observer.unobserve(sub));
        assert_eq!(observer.watcher_count(), 0);
        assert_eq!(observer.subscription_count(), 0);
    }

    #[test]
    fn test_unlaid_element_stays_quiet() {
        let mut observer = LayoutObserver::new(viewport());
        observer.observe(ElementId(9), &ObserveOptions::default());
        assert!(observer.take_entries().is_empty());
    }
}
