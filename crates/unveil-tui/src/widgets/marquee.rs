use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};

use super::put;
use crate::app::App;
use crate::page::marquee_copy;

pub struct MarqueeWidget;

impl MarqueeWidget {
    /// Draw both marquee rows starting at screen row `y`
    pub fn render(frame: &mut Frame, area: Rect, y: i32, app: &App) {
        let copy = marquee_copy();
        let copy_width = app.marquee_copy_width().max(1) as i32;
        let copies = app.config.marquee.copies.max(1) as i32;

        for row in 0..2 {
            let style = if row == 0 {
                Style::default()
                    .fg(app.theme.bg)
                    .bg(app.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.accent).bg(app.theme.bg)
            };

            let line_y = y + row;
            if line_y >= area.y as i32 && line_y < area.bottom() as i32 {
                let band = Rect::new(area.x, line_y as u16, area.width, 1);
                frame.buffer_mut().set_style(band, style);
            }

            let start = area.x as i32 + app.marquee_offset(row as usize).round() as i32;
            // Enough copies to cover the widest terminal, at least the configured count
            let needed = (area.width as i32 / copy_width + 2).max(copies);
            for n in 0..needed {
                put(frame.buffer_mut(), area, start + n * copy_width, line_y, &copy, style);
            }
        }
    }
}
