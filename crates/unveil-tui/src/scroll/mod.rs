//! Smooth scrolling for the page preview
//!
//! [`ScrollAnimator`] eases the scroll position and reports the scroll
//! velocity that drives the marquee. Easing curves and progress math live in
//! `unveil_core::animation::easing` and `unveil_core::timing`.

pub mod animation;

pub use animation::ScrollAnimator;
