//! Scripted reveal scenarios
//!
//! A scenario declares reveal targets and a timeline of intersection changes
//! and unmounts. [`Scenario::run`] replays it through a [`RevealEngine`] on a
//! [`ManualObserver`] and reports every visibility flip.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observer::{ElementId, ManualObserver};
use crate::reveal::{GroupReveal, PerItemReveal, RevealEngine, RevealOptions, RevealOutput, ScopeId, TargetId};
use crate::stagger::{StaggerGroup, StaggerMode};
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub targets: Vec<ScenarioTarget>,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioTarget {
    pub name: String,
    /// `false` simulates a component whose element never rendered
    #[serde(default = "default_true")]
    pub element: bool,
    #[serde(default)]
    pub options: RevealOptions,
    #[serde(default)]
    pub group: Option<GroupSpec>,
}

/// Makes a target a staggered list of `count` children
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSpec {
    #[serde(default)]
    pub mode: StaggerMode,
    pub count: usize,
    #[serde(default)]
    pub base_delay_ms: u64,
    #[serde(default = "default_step_delay")]
    pub step_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: ScenarioAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScenarioAction {
    /// Set the intersection ratio of a target's element, or of one child
    /// of a per-item list (all children when `item` is absent)
    Intersect {
        target: String,
        #[serde(default)]
        item: Option<usize>,
        ratio: f64,
    },
    Unmount {
        target: String,
    },
    /// Tear down the whole page
    UnmountAll,
}

/// One visibility flip in the replay
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub at_ms: u64,
    pub label: String,
    pub output: RevealOutput,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabeledOutput {
    pub label: String,
    /// `None` once unmounted
    pub output: Option<RevealOutput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub timeline: Vec<TimelineEntry>,
    pub outputs: Vec<LabeledOutput>,
    pub outstanding_subscriptions: usize,
}

enum Mounted {
    Single(TargetId),
    Group(GroupReveal),
    PerItem(PerItemReveal),
}

struct Handle {
    name: String,
    /// One label per reported output, fixed at mount
    labels: Vec<String>,
    elements: Vec<ElementId>,
    mounted: Option<Mounted>,
}

impl Handle {
    fn outputs(&self, engine: &RevealEngine<ManualObserver>) -> Vec<Option<RevealOutput>> {
        match &self.mounted {
            None => vec![None; self.labels.len()],
            Some(Mounted::Single(id)) => vec![engine.output(*id)],
            Some(Mounted::Group(group)) => group.outputs(engine).into_iter().map(Some).collect(),
            Some(Mounted::PerItem(list)) => list.outputs(engine).into_iter().map(Some).collect(),
        }
    }

    fn unmount(&mut self, engine: &mut RevealEngine<ManualObserver>) {
        match self.mounted.take() {
            Some(Mounted::Single(id)) => {
                engine.unmount(id);
            }
            Some(Mounted::Group(group)) => {
                engine.unmount(group.container());
            }
            Some(Mounted::PerItem(list)) => {
                for id in list.items() {
                    engine.unmount(*id);
                }
            }
            None => {}
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_step_delay() -> u64 {
    100
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for target in &self.targets {
            if !names.insert(target.name.as_str()) {
                return Err(Error::Scenario(format!("duplicate target '{}'", target.name)));
            }
            target.options.validate()?;
        }

        for event in &self.events {
            let name = match &event.action {
                ScenarioAction::Intersect { target, ratio, .. } => {
                    if !ratio.is_finite() {
                        return Err(Error::Scenario(format!("ratio for '{}' is not a number", target)));
                    }
                    target
                }
                ScenarioAction::Unmount { target } => target,
                ScenarioAction::UnmountAll => continue,
            };
            if !names.contains(name.as_str()) {
                return Err(Error::Scenario(format!("event at {}ms names unknown target '{}'", event.at_ms, name)));
            }
        }

        Ok(())
    }

    /// Replay the scenario
    pub fn run(&self) -> Result<ScenarioReport> {
        let mut engine = RevealEngine::new(ManualObserver::new());
        let scope = ScopeId::new();
        let mut handles = self.mount_all(&mut engine, scope)?;

        let mut events: Vec<&ScenarioEvent> = self.events.iter().collect();
        events.sort_by_key(|event| event.at_ms);

        let mut timeline = Vec::new();
        let mut last = snapshot(&handles, &engine);

        for event in events {
            self.apply(&mut engine, scope, &mut handles, &event.action)?;
            let changes = engine.pump();
            tracing::debug!("{}ms: {} visibility changes", event.at_ms, changes.len());

            let now = snapshot(&handles, &engine);
            for ((label, before), (_, after)) in last.iter().zip(now.iter()) {
                let was_visible = before.as_ref().map(|o| o.is_visible).unwrap_or(false);
                if let Some(output) = after {
                    if output.is_visible != was_visible {
                        timeline.push(TimelineEntry {
                            at_ms: event.at_ms,
                            label: label.clone(),
                            output: output.clone(),
                        });
                    }
                }
            }
            last = now;
        }

        Ok(ScenarioReport {
            timeline,
            outputs: last
                .into_iter()
                .map(|(label, output)| LabeledOutput { label, output })
                .collect(),
            outstanding_subscriptions: engine.outstanding_subscriptions(scope),
        })
    }

    fn mount_all(&self, engine: &mut RevealEngine<ManualObserver>, scope: ScopeId) -> Result<Vec<Handle>> {
        let mut next_element = 0u64;
        let mut element = |present: bool| {
            next_element += 1;
            present.then_some(ElementId(next_element))
        };

        let mut handles = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let options = target.options.clone();
            let (mounted, elements) = match &target.group {
                None => {
                    let el = element(target.element);
                    (Mounted::Single(engine.mount(scope, el, options)?), el.into_iter().collect())
                }
                Some(spec) if spec.mode == StaggerMode::Group => {
                    let el = element(target.element);
                    let stagger = StaggerGroup::new(spec.base_delay_ms, spec.step_delay_ms);
                    let group = GroupReveal::mount(engine, scope, el, options, stagger, spec.count)?;
                    (Mounted::Group(group), el.into_iter().collect())
                }
                Some(spec) => {
                    let els: Vec<Option<ElementId>> = (0..spec.count).map(|_| element(target.element)).collect();
                    let stagger = StaggerGroup::new(spec.base_delay_ms, 0);
                    let list = PerItemReveal::mount(engine, scope, &els, options, stagger)?;
                    (Mounted::PerItem(list), els.into_iter().flatten().collect())
                }
            };
            let labels = match &target.group {
                Some(spec) => (0..spec.count).map(|i| format!("{}[{}]", target.name, i)).collect(),
                None => vec![target.name.clone()],
            };
            handles.push(Handle {
                name: target.name.clone(),
                labels,
                elements,
                mounted: Some(mounted),
            });
        }
        Ok(handles)
    }

    fn apply(
        &self,
        engine: &mut RevealEngine<ManualObserver>,
        scope: ScopeId,
        handles: &mut [Handle],
        action: &ScenarioAction,
    ) -> Result<()> {
        match action {
            ScenarioAction::Intersect { target, item, ratio } => {
                let handle = find(handles, target)?;
                let elements: Vec<ElementId> = match item {
                    Some(i) => match &handle.mounted {
                        Some(Mounted::PerItem(_)) => handle.elements.get(*i).copied().into_iter().collect(),
                        None => Vec::new(),
                        _ => {
                            return Err(Error::Scenario(format!(
                                "'{}' is not a per-item list, it has no item {}",
                                target, i
                            )))
                        }
                    },
                    None => handle.elements.clone(),
                };
                for element in elements {
                    engine.observer_mut().set_ratio(element, *ratio);
                }
            }
            ScenarioAction::Unmount { target } => {
                find(handles, target)?.unmount(engine);
            }
            ScenarioAction::UnmountAll => {
                for handle in handles.iter_mut() {
                    handle.mounted = None;
                }
                engine.unmount_scope(scope);
            }
        }
        Ok(())
    }
}

fn find<'a>(handles: &'a mut [Handle], name: &str) -> Result<&'a mut Handle> {
    handles
        .iter_mut()
        .find(|h| h.name == name)
        .ok_or_else(|| Error::Scenario(format!("unknown target '{}'", name)))
}

/// Labels and outputs for every target, children expanded
fn snapshot(handles: &[Handle], engine: &RevealEngine<ManualObserver>) -> Vec<(String, Option<RevealOutput>)> {
    handles
        .iter()
        .flat_map(|handle| handle.labels.iter().cloned().zip(handle.outputs(engine)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "name": "landing",
        "targets": [
            {"name": "hero", "options": {"animation": "zoom", "delay": 200, "threshold": 0.1,
                                         "root_margin": "0px 0px -50px 0px", "trigger_once": true}},
            {"name": "cards", "options": {"animation": "cascade"},
             "group": {"mode": "group", "count": 5, "base_delay_ms": 200, "step_delay_ms": 100}},
            {"name": "faq", "group": {"mode": "per-item", "count": 3, "base_delay_ms": 100}},
            {"name": "ghost", "element": false}
        ],
        "events": [
            {"at_ms": 50, "kind": "intersect", "target": "hero", "ratio": 0.05},
            {"at_ms": 100, "kind": "intersect", "target": "hero", "ratio": 0.1},
            {"at_ms": 400, "kind": "intersect", "target": "cards", "ratio": 0.6},
            {"at_ms": 900, "kind": "intersect", "target": "faq", "item": 2, "ratio": 1.0},
            {"at_ms": 950, "kind": "intersect", "target": "hero", "ratio": 0.0}
        ]
    }"#;

    fn output<'a>(report: &'a ScenarioReport, label: &str) -> &'a RevealOutput {
        report
            .outputs
            .iter()
            .find(|o| o.label == label)
            .and_then(|o| o.output.as_ref())
            .unwrap()
    }

    #[test]
    fn test_landing_page_replay() {
        let report = Scenario::from_json(PAGE).unwrap().run().unwrap();

        let hero = output(&report, "hero");
        assert!(hero.is_visible);
        assert_eq!(hero.resolved_style_class, "animate-zoom");
        assert_eq!(hero.inline_style.animation_delay.as_deref(), Some("200ms"));

        let delays: Vec<_> = (0..5)
            .map(|i| {
                output(&report, &format!("cards[{}]", i))
                    .inline_style
                    .animation_delay
                    .clone()
                    .unwrap()
            })
            .collect();
        assert_eq!(delays, vec!["200ms", "300ms", "400ms", "500ms", "600ms"]);

        assert!(!output(&report, "faq[0]").is_visible);
        assert_eq!(
            output(&report, "faq[2]").inline_style.animation_delay.as_deref(),
            Some("200ms")
        );
        assert_eq!(output(&report, "ghost"), &RevealOutput::hidden());

        // hero at 100ms, five cards at 400ms, one faq item at 900ms
        assert_eq!(report.timeline.len(), 7);
        assert_eq!(report.timeline[0].at_ms, 100);
        assert_eq!(report.timeline[0].label, "hero");

        // Two per-item children still waiting for their element
        assert_eq!(report.outstanding_subscriptions, 2);
    }

    #[test]
    fn test_unmount_all_releases_everything() {
        let mut scenario = Scenario::from_json(PAGE).unwrap();
        scenario.events.push(ScenarioEvent {
            at_ms: 1000,
            action: ScenarioAction::UnmountAll,
        });
        let report = scenario.run().unwrap();

        assert_eq!(report.outstanding_subscriptions, 0);
        assert!(report.outputs.iter().all(|o| o.output.is_none()));
    }

    #[test]
    fn test_events_after_unmount_are_ignored() {
        let json = r#"{
            "targets": [{"name": "a"}],
            "events": [
                {"at_ms": 10, "kind": "unmount", "target": "a"},
                {"at_ms": 20, "kind": "intersect", "target": "a", "ratio": 1.0}
            ]
        }"#;
        let report = Scenario::from_json(json).unwrap().run().unwrap();
        assert!(report.timeline.is_empty());
        assert!(report.outputs[0].output.is_none());
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let json = r#"{"targets": [], "events": [{"at_ms": 0, "kind": "unmount", "target": "nope"}]}"#;
        assert!(matches!(Scenario::from_json(json), Err(Error::Scenario(_))));
    }

    #[test]
    fn test_duplicate_target_is_rejected() {
        let json = r#"{"targets": [{"name": "a"}, {"name": "a"}]}"#;
        assert!(matches!(Scenario::from_json(json), Err(Error::Scenario(_))));
    }

    #[test]
    fn test_bad_threshold_is_rejected() {
        let json = r#"{"targets": [{"name": "a", "options": {"threshold": 4.0}}]}"#;
        assert!(matches!(Scenario::from_json(json), Err(Error::InvalidThreshold(_))));
    }

    #[test]
    fn test_demo_scenario_replays() {
        let scenario = Scenario::from_json(include_str!("../../../demos/landing.json")).unwrap();
        let report = scenario.run().unwrap();

        assert!(report
            .timeline
            .iter()
            .any(|e| e.label == "problem-list" && e.at_ms == 240 && e.output.is_visible));
        assert_eq!(report.outstanding_subscriptions, 0);
        assert!(report.outputs.iter().all(|o| o.output.is_none()));
        // Retriggering tagline shows, hides and shows again
        let tagline: Vec<_> = report
            .timeline
            .iter()
            .filter(|e| e.label == "tagline")
            .map(|e| e.output.is_visible)
            .collect();
        assert_eq!(tagline, vec![true, false, true]);
    }
}
