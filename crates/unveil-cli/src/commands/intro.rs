use std::time::Duration;

use anyhow::{bail, Result};
use tokio::time::Instant;

use unveil_core::intro::IntroEvent;
use unveil_core::timer::{ManualTimers, TokioTimers};
use unveil_core::{AppConfig, IntroPhase, IntroSequencer, IntroTimings};

pub async fn run(
    config: &AppConfig,
    durations: Option<Vec<u64>>,
    unmount_at: Option<u64>,
    live: bool,
) -> Result<()> {
    let timings = match durations {
        Some(values) => {
            let Ok(durations) = <[u64; 5]>::try_from(values.as_slice()) else {
                bail!("--durations takes exactly five values, got {}", values.len());
            };
            IntroTimings::from_phase_durations(durations)
        }
        None => config.intro.timings,
    };

    let timeline = if live {
        live_timeline(timings, unmount_at).await
    } else {
        virtual_timeline(timings, unmount_at)
    };

    for (at, phase) in &timeline {
        println!("{:>6}ms  {}", at, phase);
    }
    if let Some(at) = unmount_at {
        if timeline.last().map(|(_, p)| !p.is_done()).unwrap_or(true) {
            println!("{:>6}ms  (unmounted)", at);
        }
    }

    Ok(())
}

/// Phase transitions on a virtual clock, starting with `text-1` at 0
fn virtual_timeline(timings: IntroTimings, unmount_at: Option<u64>) -> Vec<(u64, IntroPhase)> {
    let mut timers = ManualTimers::new();
    let mut sequencer = IntroSequencer::new(timings);
    sequencer.mount(&mut timers);

    let mut timeline = vec![(0, sequencer.phase())];
    let end = unmount_at.unwrap_or_else(|| timings.total_ms());

    for (at, event) in timers.drain_until(Duration::from_millis(end)) {
        if let Some(phase) = sequencer.handle(event) {
            timeline.push((at.as_millis() as u64, phase));
        }
    }

    if unmount_at.is_some() {
        sequencer.unmount(&mut timers);
    }
    timeline
}

/// Same as [`virtual_timeline`] but on tokio timers, timestamps measured
async fn live_timeline(timings: IntroTimings, unmount_at: Option<u64>) -> Vec<(u64, IntroPhase)> {
    let mut timers: TokioTimers<IntroEvent> = TokioTimers::new();
    let mut sequencer = IntroSequencer::new(timings);
    let start = Instant::now();
    sequencer.mount(&mut timers);

    let mut timeline = vec![(0, sequencer.phase())];
    let deadline = unmount_at.map(|ms| start + Duration::from_millis(ms));

    loop {
        let event = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, timers.recv()).await {
                Ok(event) => event,
                Err(_) => {
                    sequencer.unmount(&mut timers);
                    break;
                }
            },
            None => timers.recv().await,
        };

        let Some(event) = event else {
            break;
        };
        if let Some(phase) = sequencer.handle(event) {
            timeline.push((start.elapsed().as_millis() as u64, phase));
            if phase.is_done() {
                break;
            }
        }
    }

    timeline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeline() {
        let timeline = virtual_timeline(IntroTimings::default(), None);
        assert_eq!(
            timeline,
            vec![
                (0, IntroPhase::Text1),
                (2300, IntroPhase::Text1Fade),
                (3300, IntroPhase::Text2),
                (5600, IntroPhase::Text2Fade),
                (6600, IntroPhase::OverlayFade),
                (7600, IntroPhase::Done),
            ]
        );
    }

    #[test]
    fn test_unmount_stops_the_timeline() {
        let timeline = virtual_timeline(IntroTimings::default(), Some(4000));
        assert_eq!(timeline.last(), Some(&(3300, IntroPhase::Text2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_timeline_unmounts() {
        let timeline = live_timeline(IntroTimings::from_phase_durations([100, 100, 100, 100, 100]), Some(250)).await;
        let phases: Vec<_> = timeline.iter().map(|(_, p)| *p).collect();
        assert_eq!(phases, vec![IntroPhase::Text1, IntroPhase::Text1Fade, IntroPhase::Text2]);
    }
}
