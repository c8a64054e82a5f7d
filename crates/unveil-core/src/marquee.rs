//! Scroll-velocity driven marquee
//!
//! A row of repeated text drifts at a base velocity. Page scroll speed,
//! smoothed by a spring, multiplies that velocity and flips its direction
//! when the page scrolls back up.

use std::time::Duration;

use crate::config::MarqueeConfig;

/// Largest single integration step; longer frames are subdivided
const MAX_STEP_SECS: f64 = 1.0 / 120.0;

/// Damped spring chasing a moving target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    position: f64,
    velocity: f64,
}

impl Spring {
    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass: 1.0,
            position: 0.0,
            velocity: 0.0,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Advance by `dt_secs` towards `target` (semi-implicit Euler)
    pub fn step(&mut self, target: f64, dt_secs: f64) -> f64 {
        let mut remaining = dt_secs.max(0.0);

        while remaining > 1e-9 {
            let dt = remaining.min(MAX_STEP_SECS);
            remaining -= dt;

            let spring_force = -self.stiffness * (self.position - target);
            let damping_force = -self.damping * self.velocity;
            let acceleration = (spring_force + damping_force) / self.mass;

            self.velocity += acceleration * dt;
            self.position += self.velocity * dt;
        }

        self.position
    }

    pub fn is_settled(&self, target: f64, threshold: f64) -> bool {
        (self.position - target).abs() < threshold && self.velocity.abs() < threshold
    }
}

/// Linear map from one range to another, without clamping
pub fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    if in_max == in_min {
        return out_min;
    }
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// Wrap `value` into `[min, max)`
pub fn wrap(min: f64, max: f64, value: f64) -> f64 {
    let range = max - min;
    if range <= 0.0 {
        return min;
    }
    (((value - min) % range) + range) % range + min
}

/// One marquee row
#[derive(Debug, Clone)]
pub struct VelocityMarquee {
    base_velocity: f64,
    velocity_input_max: f64,
    velocity_factor_max: f64,
    spring: Spring,
    scroll_velocity: f64,
    base_x: f64,
    direction: f64,
}

impl VelocityMarquee {
    pub fn new(config: &MarqueeConfig) -> Self {
        Self {
            base_velocity: config.base_velocity,
            velocity_input_max: config.velocity_input_max,
            velocity_factor_max: config.velocity_factor_max,
            spring: Spring::new(config.stiffness, config.damping),
            scroll_velocity: 0.0,
            base_x: 0.0,
            direction: 1.0,
        }
    }

    /// Row moving the other way, as alternating rows do
    pub fn reversed(mut self) -> Self {
        self.base_velocity = -self.base_velocity;
        self
    }

    pub fn base_velocity(&self) -> f64 {
        self.base_velocity
    }

    /// Latest raw page scroll velocity, in the same units per second as the offset
    pub fn set_scroll_velocity(&mut self, velocity: f64) {
        self.scroll_velocity = velocity;
    }

    /// Smoothed scroll velocity mapped to a speed multiplier
    pub fn velocity_factor(&self) -> f64 {
        map_range(
            self.spring.position(),
            0.0,
            self.velocity_input_max,
            0.0,
            self.velocity_factor_max,
        )
    }

    /// `1.0` or `-1.0`; follows the sign of the last non-zero factor
    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Advance one frame and return the wrapped offset in `[-copy_width, 0)`
    pub fn tick(&mut self, dt: Duration, copy_width: f64) -> f64 {
        let dt_secs = dt.as_secs_f64();
        self.spring.step(self.scroll_velocity, dt_secs);

        let factor = self.velocity_factor();
        if factor < 0.0 {
            self.direction = -1.0;
        } else if factor > 0.0 {
            self.direction = 1.0;
        }

        let mut move_by = self.direction * self.base_velocity * dt_secs;
        move_by += self.direction * move_by * factor;
        self.base_x += move_by;

        self.offset(copy_width)
    }

    pub fn offset(&self, copy_width: f64) -> f64 {
        wrap(-copy_width, 0.0, self.base_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Duration {
        Duration::from_millis(16)
    }

    #[test]
    fn test_map_range_is_unclamped() {
        assert_eq!(map_range(500.0, 0.0, 1000.0, 0.0, 5.0), 2.5);
        assert_eq!(map_range(2000.0, 0.0, 1000.0, 0.0, 5.0), 10.0);
        assert_eq!(map_range(-1000.0, 0.0, 1000.0, 0.0, 5.0), -5.0);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(-100.0, 0.0, 0.0), -100.0);
        assert_eq!(wrap(-100.0, 0.0, 30.0), -70.0);
        assert_eq!(wrap(-100.0, 0.0, -250.0), -50.0);
        assert_eq!(wrap(-100.0, 0.0, -100.0), -100.0);
        assert_eq!(wrap(0.0, 0.0, 42.0), 0.0);
    }

    #[test]
    fn test_spring_settles_on_target() {
        let mut spring = Spring::new(400.0, 50.0);
        for _ in 0..120 {
            spring.step(1000.0, 1.0 / 60.0);
        }
        assert!((spring.position() - 1000.0).abs() < 1.0);
        assert!(spring.is_settled(1000.0, 1.0));
    }

    #[test]
    fn test_idle_marquee_drifts_at_base_velocity() {
        let mut marquee = VelocityMarquee::new(&MarqueeConfig::default());
        for _ in 0..10 {
            marquee.tick(Duration::from_millis(100), 10_000.0);
        }
        // 80 units/s for one second
        assert!((marquee.offset(10_000.0) - (80.0 - 10_000.0)).abs() < 1e-6);
        assert_eq!(marquee.direction(), 1.0);
    }

    #[test]
    fn test_scrolling_boosts_speed() {
        let config = MarqueeConfig::default();
        let mut idle = VelocityMarquee::new(&config);
        let mut boosted = VelocityMarquee::new(&config);
        boosted.set_scroll_velocity(1000.0);

        for _ in 0..60 {
            idle.tick(frame(), 1e9);
            boosted.tick(frame(), 1e9);
        }

        let idle_moved = idle.offset(1e9) + 1e9;
        let boosted_moved = boosted.offset(1e9) + 1e9;
        assert!(boosted_moved > idle_moved * 3.0);
    }

    #[test]
    fn test_scrolling_up_flips_direction() {
        let mut marquee = VelocityMarquee::new(&MarqueeConfig::default());
        marquee.set_scroll_velocity(-800.0);
        for _ in 0..30 {
            marquee.tick(frame(), 500.0);
        }
        assert_eq!(marquee.direction(), -1.0);
        assert!(marquee.velocity_factor() < 0.0);
    }

    #[test]
    fn test_offset_stays_in_range() {
        let mut marquee = VelocityMarquee::new(&MarqueeConfig::default()).reversed();
        marquee.set_scroll_velocity(3000.0);
        for _ in 0..500 {
            let offset = marquee.tick(frame(), 120.0);
            assert!((-120.0..0.0).contains(&offset));
        }
    }
}
