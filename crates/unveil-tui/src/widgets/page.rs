use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};
use unicode_width::UnicodeWidthStr;
use unveil_core::Transform;

use super::{centered_x, put, MarqueeWidget};
use crate::app::App;
use crate::page::{BlockContent, BlockLayout, ItemLayout, TextRole};
use crate::theme::Theme;

/// Rows of translation slack so sliding elements near the edge still draw
const OVERSCAN: u16 = 8;

pub struct PageWidget;

impl PageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
        let scroll = app.scroll.current_scroll();
        let top = scroll.saturating_sub(OVERSCAN);
        let bottom = scroll.saturating_add(area.height).saturating_add(OVERSCAN);

        frame
            .buffer_mut()
            .set_style(area, Style::default().bg(app.theme.bg).fg(app.theme.fg));

        for (index, (block, layout)) in app.page.blocks.iter().zip(&app.layout.blocks).enumerate() {
            if layout.y >= bottom || layout.y + layout.height <= top {
                continue;
            }

            match &block.content {
                BlockContent::Marquee => {
                    let y = area.y as i32 + layout.y as i32 - scroll as i32;
                    MarqueeWidget::render(frame, area, y, app);
                }
                BlockContent::Hero => {
                    if app.intro.view().title {
                        Self::render_hero(frame, area, layout, scroll, app, now);
                    }
                }
                _ => {
                    for (i, item) in layout.items.iter().enumerate() {
                        if let Some(transform) = app.item_appearance(index, i, now) {
                            draw_item(frame, area, layout, item, scroll, &transform, &app.theme);
                        }
                    }
                }
            }
        }
    }

    fn render_hero(frame: &mut Frame, area: Rect, layout: &BlockLayout, scroll: u16, app: &App, now: Instant) {
        // The title fades in underneath the fading overlay
        let opacity = match app.intro_phase() {
            unveil_core::IntroPhase::OverlayFade => app.intro_progress(now),
            _ => 1.0,
        };
        let style = Style::default()
            .fg(app.theme.fade(app.theme.accent, opacity))
            .add_modifier(Modifier::BOLD);

        for item in &layout.items {
            for (row, line) in item.lines.iter().enumerate() {
                if line.text.is_empty() {
                    continue;
                }
                let y = area.y as i32 + (item.y + row as u16) as i32 - scroll as i32;
                let spaced = spread(&line.text, 1);
                put(frame.buffer_mut(), area, centered_x(area, &spaced), y, &spaced, style);
            }
        }
    }
}

fn draw_item(
    frame: &mut Frame,
    area: Rect,
    block: &BlockLayout,
    item: &ItemLayout,
    scroll: u16,
    transform: &Transform,
    theme: &Theme,
) {
    // Edge-on flips draw nothing
    if transform.rotate_y_deg.to_radians().cos().abs() < 0.2 {
        return;
    }

    let width = block.width as f64;
    let height = item.height() as f64;
    let dx = (transform.translate_x / 100.0 * width).round() as i32;
    let dy = (transform.translate_y / 100.0 * height).round() as i32;
    // Shrinking pulls lines in from the left edge
    let indent = ((1.0 - transform.scale).max(0.0) * width / 2.0).round() as i32;
    // Rotation is approximated as a horizontal shear
    let shear = transform.rotate_deg.to_radians().sin();
    let gap = (transform.letter_spacing_em * 2.0).round().clamp(0.0, 3.0) as usize;

    for (row, line) in item.lines.iter().enumerate() {
        if line.text.is_empty() {
            continue;
        }
        let mut style = Style::default().fg(theme.fade(role_color(line.role, theme), transform.opacity));
        if matches!(line.role, TextRole::Title | TextRole::HeroTitle) {
            style = style.add_modifier(Modifier::BOLD);
        }
        if transform.blur_px > 1.0 {
            style = style.add_modifier(Modifier::DIM);
        }

        let text = spread(&line.text, gap);
        let x = area.x as i32 + block.x as i32 + dx + indent + (shear * row as f64 * 2.0).round() as i32;
        let y = area.y as i32 + (item.y + row as u16) as i32 + dy - scroll as i32;
        put(frame.buffer_mut(), area, x, y, &text, style);
    }
}

fn role_color(role: TextRole, theme: &Theme) -> ratatui::style::Color {
    match role {
        TextRole::Tag | TextRole::HeroTitle => theme.accent,
        TextRole::Title | TextRole::Item => theme.fg,
        TextRole::Body => theme.muted,
    }
}

/// Insert `gap` spaces between characters
fn spread(text: &str, gap: usize) -> String {
    if gap == 0 {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.width() * (gap + 1));
    for (i, c) in text.chars().enumerate() {
        if i > 0 {
            out.push_str(&" ".repeat(gap));
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread() {
        assert_eq!(spread("abc", 0), "abc");
        assert_eq!(spread("abc", 1), "a b c");
        assert_eq!(spread("", 2), "");
    }
}
