use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::Clear,
    Frame,
};
use unveil_core::IntroPhase;

use super::{centered_x, put};
use crate::app::App;
use crate::theme::blend;

pub const FIRST_CAPTION: &str = "You forget more than you remember?";
pub const SECOND_CAPTION: &str = "What if you didn't have to...";

/// Share of a caption phase spent fading the caption in
const CAPTION_FADE_IN: f64 = 0.4;

pub struct IntroOverlayWidget;

impl IntroOverlayWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
        let view = app.intro.view();
        if !app.intro.is_mounted() || !view.overlay {
            return;
        }

        let progress = app.intro_progress(now);
        let theme = &app.theme;

        let overlay_opacity = if view.overlay_fading { 1.0 - progress } else { 1.0 };
        if overlay_opacity >= 0.5 {
            frame.render_widget(Clear, area);
        }
        let backdrop = blend(theme.bg, theme.overlay, overlay_opacity);
        frame.buffer_mut().set_style(area, Style::default().bg(backdrop));

        let caption = match view.caption {
            1 => FIRST_CAPTION,
            2 => SECOND_CAPTION,
            _ => return,
        };

        let caption_opacity = match app.intro_phase() {
            IntroPhase::Text1 | IntroPhase::Text2 => (progress / CAPTION_FADE_IN).min(1.0),
            _ if view.caption_fading => 1.0 - progress,
            _ => 1.0,
        };
        let style = Style::default()
            .fg(blend(backdrop, theme.fg, caption_opacity))
            .bg(backdrop)
            .add_modifier(Modifier::ITALIC);

        let y = area.y as i32 + area.height as i32 / 2;
        put(frame.buffer_mut(), area, centered_x(area, caption), y, caption, style);

        let hint = "s: skip";
        let hint_style = Style::default().fg(blend(backdrop, theme.muted, 0.6)).bg(backdrop);
        put(
            frame.buffer_mut(),
            area,
            area.right() as i32 - hint.len() as i32 - 1,
            area.bottom() as i32 - 1,
            hint,
            hint_style,
        );
    }
}
