use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use unveil_core::geometry::Rect;
use unveil_core::intro::IntroEvent;
use unveil_core::marquee::VelocityMarquee;
use unveil_core::reveal::{GroupReveal, PerItemReveal};
use unveil_core::timer::TokioTimers;
use unveil_core::timing::progress;
use unveil_core::{
    AppConfig, IntroPhase, IntroSequencer, LayoutObserver, RevealEngine, ScopeId, TargetId,
    Transform,
};

use crate::page::{self, BlockReveal, Page, PageLayout, CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::scroll::ScrollAnimator;
use crate::theme::Theme;

/// A page block after mounting into the reveal engine
#[derive(Debug, Clone)]
pub enum MountedBlock {
    Static,
    Single(TargetId),
    Group(GroupReveal),
    PerItem(PerItemReveal),
}

impl MountedBlock {
    fn targets(&self) -> Vec<TargetId> {
        match self {
            MountedBlock::Static => Vec::new(),
            MountedBlock::Single(id) => vec![*id],
            MountedBlock::Group(group) => vec![group.container()],
            MountedBlock::PerItem(items) => items.items().to_vec(),
        }
    }
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub page: Page,
    pub layout: PageLayout,
    pub engine: RevealEngine<LayoutObserver>,
    scope: ScopeId,
    pub blocks: Vec<MountedBlock>,
    /// When each visible target became visible
    revealed_at: HashMap<TargetId, Instant>,
    pub intro: IntroSequencer,
    intro_timers: TokioTimers<IntroEvent>,
    phase_started: Instant,
    /// Two rows drifting in opposite directions
    pub marquees: [VelocityMarquee; 2],
    marquee_offsets: [f64; 2],
    marquee_copy_width: u16,
    last_frame: Instant,
    pub scroll: ScrollAnimator,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
}

impl App {
    /// Build the page and mount every block. Needs a tokio runtime for the
    /// intro timers.
    pub fn new(config: Arc<AppConfig>, theme: Theme) -> Result<Self> {
        let page = Page::landing(&config.reveal, &config.stagger);
        let mut engine = RevealEngine::new(LayoutObserver::default());
        let scope = ScopeId::new();

        let mut blocks = Vec::with_capacity(page.len());
        for (index, block) in page.blocks.iter().enumerate() {
            let element = Some(page::Block::element(index));
            let mounted = match &block.reveal {
                BlockReveal::Static => MountedBlock::Static,
                BlockReveal::Single(options) => {
                    MountedBlock::Single(engine.mount(scope, element, options.clone())?)
                }
                BlockReveal::Group { options, stagger } => {
                    let len = match &block.content {
                        page::BlockContent::Items(items) => items.len(),
                        _ => 0,
                    };
                    MountedBlock::Group(GroupReveal::mount(
                        &mut engine,
                        scope,
                        element,
                        options.clone(),
                        *stagger,
                        len,
                    )?)
                }
                BlockReveal::PerItem { options, stagger } => {
                    let elements: Vec<_> = match &block.content {
                        page::BlockContent::Items(items) => (0..items.len())
                            .map(|i| Some(page::Block::item_element(index, i)))
                            .collect(),
                        _ => Vec::new(),
                    };
                    MountedBlock::PerItem(PerItemReveal::mount(
                        &mut engine,
                        scope,
                        &elements,
                        options.clone(),
                        *stagger,
                    )?)
                }
            };
            blocks.push(mounted);
        }
        tracing::info!("Mounted {} reveal targets in scope {}", engine.len(), scope);

        let marquees = [
            VelocityMarquee::new(&config.marquee),
            VelocityMarquee::new(&config.marquee).reversed(),
        ];
        let copy_width = unicode_width::UnicodeWidthStr::width(page::marquee_copy().as_str()) as u16;
        let now = Instant::now();

        let mut app = Self {
            scroll: ScrollAnimator::new(config.ui.scroll.clone()),
            intro: IntroSequencer::new(config.intro.timings),
            intro_timers: TokioTimers::new(),
            phase_started: now,
            config,
            theme,
            page,
            layout: PageLayout::default(),
            engine,
            scope,
            blocks,
            revealed_at: HashMap::new(),
            marquees,
            marquee_offsets: [0.0; 2],
            marquee_copy_width: copy_width,
            last_frame: now,
            should_quit: false,
            status_message: None,
            pending_key: None,
        };

        if app.config.intro.enabled {
            app.replay_intro();
        }
        Ok(app)
    }

    /// Re-layout for a new page area and refresh every element rectangle
    pub fn resize(&mut self, width: u16, height: u16) {
        if self.layout.width == width && self.layout.viewport_height == height {
            return;
        }

        self.layout = page::layout(&self.page, width, height);
        for (element, rect) in self.layout.element_rects() {
            self.engine.observer_mut().set_element_rect(element, rect);
        }

        let max_scroll = self.layout.max_scroll();
        if self.scroll.current_scroll() > max_scroll {
            self.scroll.set_scroll(max_scroll);
        }
        self.sync_viewport();
        tracing::debug!("Page laid out at {}x{}, {} rows", width, height, self.layout.height);
    }

    /// Advance timers, scrolling, reveals and marquees to `now`
    pub fn tick(&mut self, now: Instant) {
        for event in self.intro_timers.try_recv_all() {
            if let Some(phase) = self.intro.handle(event) {
                self.phase_started = now;
                if phase.is_done() {
                    tracing::info!("Intro finished");
                }
            }
        }

        let max_scroll = self.layout.max_scroll();
        self.scroll.update_at(now, max_scroll);
        self.sync_viewport();

        for change in self.engine.pump() {
            if change.visible {
                self.revealed_at.insert(change.target, now);
            } else {
                self.revealed_at.remove(&change.target);
            }
        }

        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        let scroll_velocity_px = self.scroll.velocity() * CELL_HEIGHT_PX;
        let copy_width_px = self.marquee_copy_width as f64 * CELL_WIDTH_PX;
        for (marquee, offset) in self.marquees.iter_mut().zip(self.marquee_offsets.iter_mut()) {
            marquee.set_scroll_velocity(scroll_velocity_px);
            *offset = marquee.tick(dt, copy_width_px) / CELL_WIDTH_PX;
        }
    }

    fn sync_viewport(&mut self) {
        let viewport = Rect::new(
            0.0,
            self.scroll.current_scroll() as f64 * CELL_HEIGHT_PX,
            self.layout.width as f64 * CELL_WIDTH_PX,
            self.layout.viewport_height as f64 * CELL_HEIGHT_PX,
        );
        self.engine.observer_mut().set_viewport(viewport);
    }

    /// Restart the intro from its first caption
    pub fn replay_intro(&mut self) {
        self.intro.mount(&mut self.intro_timers);
        self.phase_started = Instant::now();
    }

    pub fn skip_intro(&mut self) {
        if self.intro.is_active() {
            self.intro.skip(&mut self.intro_timers);
            self.phase_started = Instant::now();
        }
    }

    /// Time spent in the current intro phase and that phase's length
    pub fn intro_progress(&self, now: Instant) -> f64 {
        let phase = self.intro.phase();
        let length = self
            .intro
            .timings()
            .phase_durations()
            .iter()
            .find(|(p, _)| *p == phase)
            .map(|(_, ms)| *ms)
            .unwrap_or(0);
        progress(
            now.saturating_duration_since(self.phase_started),
            Duration::from_millis(length),
        )
    }

    pub fn intro_phase(&self) -> IntroPhase {
        self.intro.phase()
    }

    /// Appearance of a target `delay_ms` into its reveal; `None` while hidden
    pub fn appearance(&self, target: TargetId, delay_ms: u64, now: Instant) -> Option<Transform> {
        if !self.engine.is_visible(target) {
            return None;
        }
        let transition = self.engine.transition(target)?;
        let Some(revealed_at) = self.revealed_at.get(&target) else {
            return Some(Transform::IDENTITY);
        };

        let elapsed = now.saturating_duration_since(*revealed_at).as_millis() as u64;
        if elapsed < delay_ms {
            return Some(transition.from);
        }
        Some(transition.sample_at(elapsed - delay_ms))
    }

    /// Appearance of item `item` of block `block`, or of the whole block
    pub fn item_appearance(&self, block: usize, item: usize, now: Instant) -> Option<Transform> {
        match self.blocks.get(block)? {
            MountedBlock::Static => Some(Transform::IDENTITY),
            MountedBlock::Single(id) => {
                let delay = self.engine.options(*id).map(|o| o.delay_ms).unwrap_or(0);
                self.appearance(*id, delay, now)
            }
            MountedBlock::Group(group) => self.appearance(group.container(), group.delay(item), now),
            MountedBlock::PerItem(items) => {
                let id = *items.items().get(item)?;
                let delay = self.engine.options(id).map(|o| o.delay_ms).unwrap_or(0);
                self.appearance(id, delay, now)
            }
        }
    }

    pub fn marquee_offset(&self, row: usize) -> f64 {
        self.marquee_offsets.get(row).copied().unwrap_or(0.0)
    }

    pub fn marquee_copy_width(&self) -> u16 {
        self.marquee_copy_width
    }

    /// Number of targets currently visible, out of all mounted
    pub fn revealed_count(&self) -> (usize, usize) {
        let targets: Vec<TargetId> = self.blocks.iter().flat_map(|b| b.targets()).collect();
        let visible = targets.iter().filter(|id| self.engine.is_visible(**id)).count();
        (visible, targets.len())
    }

    /// Something on screen is still moving, so poll at the frame rate
    pub fn needs_animation_frame(&self, now: Instant) -> bool {
        if self.scroll.needs_update() || self.intro.is_active() || self.marquee_in_view() {
            return true;
        }
        self.revealed_at.iter().any(|(id, at)| {
            let Some(transition) = self.engine.transition(*id) else {
                return false;
            };
            // Longest possible stagger on top of the transition itself
            let tail = self.config.stagger.per_item_cap_ms.max(1000);
            now.saturating_duration_since(*at) < Duration::from_millis(transition.duration_ms + tail)
        })
    }

    fn marquee_in_view(&self) -> bool {
        let top = self.scroll.current_scroll();
        let bottom = top.saturating_add(self.layout.viewport_height);
        self.page
            .blocks
            .iter()
            .zip(&self.layout.blocks)
            .any(|(block, layout)| {
                block.content == page::BlockContent::Marquee
                    && layout.y < bottom
                    && layout.y + layout.height > top
            })
    }

    pub fn scroll_lines(&mut self, direction: i32) {
        let max = self.layout.max_scroll();
        self.scroll.scroll_lines(direction, max);
    }

    pub fn scroll_half_page(&mut self, direction: i32) {
        let max = self.layout.max_scroll();
        self.scroll
            .scroll_half_page(direction, self.layout.viewport_height, max);
    }

    pub fn scroll_page(&mut self, direction: i32) {
        let max = self.layout.max_scroll();
        self.scroll.scroll_page(direction, self.layout.viewport_height, max);
    }

    pub fn jump_to_top(&mut self) {
        let max = self.layout.max_scroll();
        self.scroll.scroll_to(0, max);
    }

    pub fn jump_to_bottom(&mut self) {
        let max = self.layout.max_scroll();
        self.scroll.scroll_to(max, max);
    }

    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    /// Tear down every reveal target
    pub fn unmount(&mut self) {
        let removed = self.engine.unmount_scope(self.scope);
        self.intro.unmount(&mut self.intro_timers);
        self.revealed_at.clear();
        tracing::info!(
            "Unmounted {} targets, {} subscriptions left",
            removed,
            self.engine.outstanding_subscriptions(self.scope)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::timer::TimerQueue;
    use unveil_core::ViewportObserver;

    fn app(intro: bool) -> App {
        let mut config = AppConfig::default();
        config.intro.enabled = intro;
        config.ui.scroll.smooth_enabled = false;
        App::new(Arc::new(config), Theme::dark()).unwrap()
    }

    #[tokio::test]
    async fn test_nothing_below_hero_is_revealed_on_first_tick() {
        let mut app = app(false);
        app.resize(80, 24);
        app.tick(Instant::now());

        // Hero fills the first screen; nothing below it is visible yet
        let (visible, total) = app.revealed_count();
        assert!(total > 0);
        assert_eq!(visible, 0);
    }

    #[tokio::test]
    async fn test_scrolling_reveals_sections() {
        let mut app = app(false);
        app.resize(80, 24);
        app.tick(Instant::now());

        app.jump_to_bottom();
        app.tick(Instant::now());
        let (visible, _) = app.revealed_count();
        assert!(visible > 0);
    }

    #[tokio::test]
    async fn test_one_shot_reveals_stay_after_scrolling_back() {
        let mut app = app(false);
        app.resize(80, 24);
        app.scroll_page(1);
        app.tick(Instant::now());
        let (revealed, _) = app.revealed_count();
        assert!(revealed > 0);

        app.jump_to_top();
        app.tick(Instant::now());
        assert_eq!(app.revealed_count().0, revealed);
    }

    #[tokio::test]
    async fn test_appearance_waits_for_delay() {
        let mut app = app(false);
        app.resize(80, 24);
        app.jump_to_bottom();
        let now = Instant::now();
        app.tick(now);

        let (index, id) = app
            .blocks
            .iter()
            .enumerate()
            .find_map(|(i, b)| match b {
                MountedBlock::Single(id) if app.engine.is_visible(*id) => Some((i, *id)),
                _ => None,
            })
            .unwrap();

        let transition = app.engine.transition(id).unwrap().clone();
        let delay = app.engine.options(id).unwrap().delay_ms;
        if delay > 0 {
            assert_eq!(app.item_appearance(index, 0, now), Some(transition.from));
        }
        let settled = now + Duration::from_millis(delay + transition.duration_ms + 1);
        assert_eq!(app.item_appearance(index, 0, settled), Some(Transform::IDENTITY));
    }

    #[tokio::test]
    async fn test_skip_intro() {
        let mut app = app(true);
        assert!(app.intro.is_active());
        app.skip_intro();
        assert_eq!(app.intro_phase(), IntroPhase::Done);
        assert!(!app.intro.is_active());
    }

    #[tokio::test]
    async fn test_unmount_releases_everything() {
        let mut app = app(true);
        app.resize(80, 24);
        assert!(app.intro_timers.pending() > 0);
        assert!(app.engine.observer().subscription_count() > 0);

        app.unmount();
        assert!(app.engine.is_empty());
        assert!(!app.intro.is_mounted());
        assert_eq!(app.intro_timers.pending(), 0);
        assert_eq!(app.engine.observer().subscription_count(), 0);
    }
}
