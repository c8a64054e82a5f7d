//! Landing intro: two captions fade in and out over the hero, then the
//! overlay lifts and the title appears.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::timer::{TimerId, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntroPhase {
    Text1,
    Text1Fade,
    Text2,
    Text2Fade,
    OverlayFade,
    Done,
}

impl IntroPhase {
    pub const ALL: [IntroPhase; 6] = [
        IntroPhase::Text1,
        IntroPhase::Text1Fade,
        IntroPhase::Text2,
        IntroPhase::Text2Fade,
        IntroPhase::OverlayFade,
        IntroPhase::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntroPhase::Text1 => "text1",
            IntroPhase::Text1Fade => "text1-fade",
            IntroPhase::Text2 => "text2",
            IntroPhase::Text2Fade => "text2-fade",
            IntroPhase::OverlayFade => "overlay-fade",
            IntroPhase::Done => "done",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, IntroPhase::Done)
    }
}

impl fmt::Display for IntroPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase durations in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroTimings {
    /// First caption fading in
    pub text1_duration_ms: u64,
    pub text1_hold_ms: u64,
    pub text1_fade_ms: u64,
    pub text2_duration_ms: u64,
    pub text2_hold_ms: u64,
    pub text2_fade_ms: u64,
    pub overlay_fade_ms: u64,
}

impl Default for IntroTimings {
    fn default() -> Self {
        Self {
            text1_duration_ms: 1500,
            text1_hold_ms: 800,
            text1_fade_ms: 1000,
            text2_duration_ms: 1500,
            text2_hold_ms: 800,
            text2_fade_ms: 1000,
            overlay_fade_ms: 1000,
        }
    }
}

impl IntroTimings {
    /// Timings from the five phase lengths: text1 shown, text1 fading,
    /// text2 shown, text2 fading, overlay fading
    pub fn from_phase_durations(durations: [u64; 5]) -> Self {
        Self {
            text1_duration_ms: durations[0],
            text1_hold_ms: 0,
            text1_fade_ms: durations[1],
            text2_duration_ms: durations[2],
            text2_hold_ms: 0,
            text2_fade_ms: durations[3],
            overlay_fade_ms: durations[4],
        }
    }

    /// How long each phase before `done` lasts
    pub fn phase_durations(&self) -> [(IntroPhase, u64); 5] {
        [
            (IntroPhase::Text1, self.text1_duration_ms.saturating_add(self.text1_hold_ms)),
            (IntroPhase::Text1Fade, self.text1_fade_ms),
            (IntroPhase::Text2, self.text2_duration_ms.saturating_add(self.text2_hold_ms)),
            (IntroPhase::Text2Fade, self.text2_fade_ms),
            (IntroPhase::OverlayFade, self.overlay_fade_ms),
        ]
    }

    /// Absolute offset from mount at which each later phase starts
    pub fn schedule(&self) -> [(IntroPhase, u64); 5] {
        let durations = self.phase_durations();
        let mut at = 0u64;
        let mut schedule = [(IntroPhase::Done, 0); 5];
        for (i, (_, duration)) in durations.iter().enumerate() {
            at = at.saturating_add(*duration);
            schedule[i] = (IntroPhase::ALL[i + 1], at);
        }
        schedule
    }

    pub fn total_ms(&self) -> u64 {
        self.schedule()[4].1
    }
}

/// Timer payload; `generation` ties it to one mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntroEvent {
    pub phase: IntroPhase,
    pub generation: u64,
}

/// What the hero renders for a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IntroView {
    /// 0 = none, 1 = first caption, 2 = second caption
    pub caption: u8,
    pub caption_fading: bool,
    /// The intro overlay is still drawn
    pub overlay: bool,
    pub overlay_fading: bool,
    pub title: bool,
}

impl IntroView {
    pub fn for_phase(phase: IntroPhase) -> Self {
        match phase {
            IntroPhase::Text1 => Self {
                caption: 1,
                overlay: true,
                ..Self::default()
            },
            IntroPhase::Text1Fade => Self {
                caption: 1,
                caption_fading: true,
                overlay: true,
                ..Self::default()
            },
            IntroPhase::Text2 => Self {
                caption: 2,
                overlay: true,
                ..Self::default()
            },
            IntroPhase::Text2Fade => Self {
                caption: 2,
                caption_fading: true,
                overlay: true,
                ..Self::default()
            },
            IntroPhase::OverlayFade => Self {
                overlay: true,
                overlay_fading: true,
                title: true,
                ..Self::default()
            },
            IntroPhase::Done => Self {
                title: true,
                ..Self::default()
            },
        }
    }
}

/// Drives [`IntroPhase`] from one-shot timers
///
/// Every transition is scheduled at mount with its absolute offset. Events
/// from an earlier mount, or arriving while unmounted, are ignored.
#[derive(Debug)]
pub struct IntroSequencer {
    timings: IntroTimings,
    phase: IntroPhase,
    generation: u64,
    mounted: bool,
    timers: Vec<TimerId>,
}

impl IntroSequencer {
    pub fn new(timings: IntroTimings) -> Self {
        Self {
            timings,
            phase: IntroPhase::Text1,
            generation: 0,
            mounted: false,
            timers: Vec::new(),
        }
    }

    pub fn timings(&self) -> &IntroTimings {
        &self.timings
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn view(&self) -> IntroView {
        IntroView::for_phase(self.phase)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Overlay still covers the page
    pub fn is_active(&self) -> bool {
        self.mounted && !self.phase.is_done()
    }

    /// Start (or restart) the sequence from `text1`
    pub fn mount<Q: TimerQueue<IntroEvent>>(&mut self, timers: &mut Q) {
        if self.mounted {
            self.unmount(timers);
        }

        self.generation += 1;
        self.phase = IntroPhase::Text1;
        self.mounted = true;

        for (phase, at) in self.timings.schedule() {
            let id = timers.schedule(
                Duration::from_millis(at),
                IntroEvent {
                    phase,
                    generation: self.generation,
                },
            );
            self.timers.push(id);
        }

        tracing::debug!("Intro mounted (generation {}, {}ms)", self.generation, self.timings.total_ms());
    }

    /// Cancel every pending transition
    pub fn unmount<Q: TimerQueue<IntroEvent>>(&mut self, timers: &mut Q) {
        let cancelled = self.timers.drain(..).filter(|id| timers.cancel(*id)).count();
        self.mounted = false;
        tracing::debug!("Intro unmounted in {}, cancelled {} timers", self.phase, cancelled);
    }

    /// Jump straight to `done`
    pub fn skip<Q: TimerQueue<IntroEvent>>(&mut self, timers: &mut Q) {
        for id in self.timers.drain(..) {
            timers.cancel(id);
        }
        self.phase = IntroPhase::Done;
    }

    /// Apply a fired timer. Returns the new phase if it advanced.
    pub fn handle(&mut self, event: IntroEvent) -> Option<IntroPhase> {
        if !self.mounted || event.generation != self.generation {
            tracing::trace!("Ignoring stale intro event {:?}", event);
            return None;
        }
        if event.phase <= self.phase {
            return None;
        }

        self.phase = event.phase;
        tracing::debug!("Intro phase -> {}", self.phase);
        if self.phase.is_done() {
            self.timers.clear();
        }
        Some(self.phase)
    }
}
