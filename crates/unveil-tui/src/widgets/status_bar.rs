use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let mode_str = if app.intro.is_active() { "INTRO" } else { "PAGE" };

        let (visible, total) = app.revealed_count();
        let max_scroll = app.layout.max_scroll();
        let percent = if max_scroll == 0 {
            100
        } else {
            (app.scroll.current_scroll() as u32 * 100 / max_scroll as u32).min(100)
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            format!(
                " {} | {} | Revealed: {}/{} | {}%",
                mode_str,
                app.intro_phase(),
                visible,
                total,
                percent
            )
        };

        let help_hint = " q:quit j/k:scroll gg/G:top/bottom r:replay s:skip ";
        let padding_len = area
            .width
            .saturating_sub(status_text.len() as u16 + help_hint.len() as u16)
            as usize;

        let bar = Style::default().bg(app.theme.status_bg);
        let line = Line::from(vec![
            Span::styled(status_text, bar.fg(app.theme.fg)),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(app.theme.muted)),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
