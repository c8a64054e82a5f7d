//! Scroll animation controller
//!
//! Eases the page offset towards its target and measures how fast the offset
//! moves, which the marquee turns into a speed boost.

use std::time::{Duration, Instant};

use unveil_core::timing::{lerp_u16, progress};
use unveil_core::{EasingType, ScrollConfig};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: u16,
    to: u16,
    duration: Duration,
    easing: EasingType,
}

impl ActiveAnimation {
    fn position_at(&self, now: Instant) -> Option<u16> {
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed >= self.duration {
            return None;
        }
        let t = self.easing.apply(progress(elapsed, self.duration));
        Some(lerp_u16(self.from, self.to, t))
    }
}

/// Scroll animation controller
///
/// Queue movement with `scroll_by` / `scroll_to`, then call `update` once
/// per frame to get the interpolated offset in lines.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current_scroll: u16,
    /// Deltas queued since the last frame, applied together
    pending_delta: i32,
    /// Lines per second, measured between updates
    velocity: f64,
    last_update: Option<(Instant, u16)>,
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current_scroll: 0,
            pending_delta: 0,
            velocity: 0.0,
            last_update: None,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// A zero duration counts as instant scrolling
    pub fn is_smooth(&self) -> bool {
        self.config.smooth_enabled && self.config.animation_duration_ms > 0
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Animation running or movement queued
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0
    }

    /// Where the page ends up once the current animation finishes
    pub fn target_scroll(&self) -> u16 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current_scroll)
    }

    #[inline]
    pub fn current_scroll(&self) -> u16 {
        self.current_scroll
    }

    /// Measured scroll speed in lines per second; negative while scrolling up
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Jump without animating
    pub fn set_scroll(&mut self, scroll: u16) {
        self.animation = None;
        self.current_scroll = scroll;
        self.pending_delta = 0;
    }

    pub fn scroll_to(&mut self, target: u16, max_scroll: u16) {
        let target = target.min(max_scroll);

        if !self.is_smooth() {
            self.current_scroll = target;
            self.animation = None;
            return;
        }

        if self.current_scroll == target {
            self.animation = None;
            return;
        }

        self.animation = Some(self.animation_to(target));
    }

    /// Queue a relative move (positive = down)
    pub fn scroll_by(&mut self, delta: i32, max_scroll: u16) {
        if !self.is_smooth() {
            self.current_scroll = clamp_scroll(self.current_scroll as i32 + delta, max_scroll);
            self.animation = None;
            return;
        }

        self.pending_delta += delta;
    }

    pub fn scroll_lines(&mut self, direction: i32, max_scroll: u16) {
        let lines = self.config.scroll_lines.max(1) as i32;
        self.scroll_by(direction.signum() * lines, max_scroll);
    }

    pub fn scroll_half_page(&mut self, direction: i32, viewport_height: u16, max_scroll: u16) {
        let half_page = (viewport_height / 2).max(1) as i32;
        self.scroll_by(direction.signum() * half_page, max_scroll);
    }

    pub fn scroll_page(&mut self, direction: i32, viewport_height: u16, max_scroll: u16) {
        let page = viewport_height.max(1) as i32;
        self.scroll_by(direction.signum() * page, max_scroll);
    }

    pub fn update(&mut self, max_scroll: u16) -> u16 {
        self.update_at(Instant::now(), max_scroll)
    }

    /// Advance to `now` and return the offset to draw
    pub fn update_at(&mut self, now: Instant, max_scroll: u16) -> u16 {
        if self.pending_delta != 0 {
            let target = clamp_scroll(self.target_scroll() as i32 + self.pending_delta, max_scroll);
            self.pending_delta = 0;

            if target != self.current_scroll {
                let mut animation = self.animation_to(target);
                animation.start = now;
                self.animation = Some(animation);
            }
        }

        if let Some(animation) = &self.animation {
            match animation.position_at(now) {
                Some(position) => self.current_scroll = position.min(max_scroll),
                None => {
                    self.current_scroll = animation.to.min(max_scroll);
                    self.animation = None;
                }
            }
        }

        self.measure_velocity(now);
        self.current_scroll
    }

    pub fn cancel(&mut self) {
        self.animation = None;
        self.pending_delta = 0;
    }

    fn animation_to(&self, target: u16) -> ActiveAnimation {
        ActiveAnimation {
            start: Instant::now(),
            from: self.current_scroll,
            to: target,
            duration: Duration::from_millis(self.config.animation_duration_ms),
            easing: self.config.easing,
        }
    }

    fn measure_velocity(&mut self, now: Instant) {
        if let Some((at, scroll)) = self.last_update {
            let dt = now.saturating_duration_since(at).as_secs_f64();
            if dt > 0.0 {
                self.velocity = (self.current_scroll as f64 - scroll as f64) / dt;
            }
        }
        self.last_update = Some((now, self.current_scroll));
    }
}

fn clamp_scroll(value: i32, max_scroll: u16) -> u16 {
    value.clamp(0, max_scroll as i32) as u16
}
