use serde::Serialize;

/// Visibility of one reveal target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RevealState {
    pub visible: bool,
    /// Set on the first reveal and never cleared
    pub has_triggered: bool,
}

/// What a single intersection report did to a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Step {
    /// `visible` flipped
    pub changed: bool,
    /// The observer subscription must be released now
    pub release: bool,
}

/// Per-target reveal state machine
///
/// `Hidden -> Visible` and stop when `trigger_once`; otherwise the target
/// toggles back to hidden whenever it leaves the viewport.
#[derive(Debug, Clone)]
pub struct RevealMachine {
    state: RevealState,
    trigger_once: bool,
}

impl RevealMachine {
    pub fn new(trigger_once: bool) -> Self {
        Self {
            state: RevealState::default(),
            trigger_once,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    /// One-shot target that has already revealed; ignores everything
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.trigger_once && self.state.has_triggered
    }

    pub fn on_intersect(&mut self, is_intersecting: bool) -> Step {
        if self.is_terminal() {
            return Step::default();
        }

        match (is_intersecting, self.state.visible) {
            (true, false) => {
                self.state.visible = true;
                self.state.has_triggered = true;
                Step {
                    changed: true,
                    release: self.trigger_once,
                }
            }
            (false, true) => {
                self.state.visible = false;
                Step {
                    changed: true,
                    release: false,
                }
            }
            _ => Step::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_reveal() {
        let mut machine = RevealMachine::new(true);
        assert!(!machine.is_visible());

        let step = machine.on_intersect(true);
        assert!(step.changed && step.release);
        assert!(machine.is_visible());
        assert!(machine.is_terminal());

        // Exits and repeats are ignored once terminal
        assert_eq!(machine.on_intersect(false), Step::default());
        assert_eq!(machine.on_intersect(true), Step::default());
        assert!(machine.is_visible());
    }

    #[test]
    fn test_exit_before_first_reveal_is_noop() {
        let mut machine = RevealMachine::new(true);
        assert_eq!(machine.on_intersect(false), Step::default());
        assert_eq!(machine.state(), RevealState::default());
    }

    #[test]
    fn test_retrigger_toggles() {
        let mut machine = RevealMachine::new(false);

        assert!(machine.on_intersect(true).changed);
        assert!(!machine.on_intersect(true).changed);
        let step = machine.on_intersect(false);
        assert!(step.changed && !step.release);
        assert_eq!(
            machine.state(),
            RevealState {
                visible: false,
                has_triggered: true
            }
        );
        assert!(machine.on_intersect(true).changed);
        assert!(machine.is_visible());
    }
}
