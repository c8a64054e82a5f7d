mod intro_overlay;
mod marquee;
mod page;
mod status_bar;

pub use intro_overlay::IntroOverlayWidget;
pub use marquee::MarqueeWidget;
pub use page::PageWidget;
pub use status_bar::StatusBarWidget;

use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use unicode_width::UnicodeWidthChar;

/// Write `text` at a possibly off-screen position, clipped to `area`
pub(crate) fn put(buf: &mut Buffer, area: Rect, x: i32, y: i32, text: &str, style: Style) {
    if y < area.y as i32 || y >= area.bottom() as i32 {
        return;
    }

    let mut x = x;
    let mut chars = text.chars();
    while x < area.x as i32 {
        match chars.next() {
            Some(c) => x += c.width().unwrap_or(0) as i32,
            None => return,
        }
    }
    if x >= area.right() as i32 {
        return;
    }

    let visible: String = chars.collect();
    let max_width = (area.right() as i32 - x) as usize;
    buf.set_stringn(x as u16, y as u16, visible, max_width, style);
}

/// Column at which `text` sits centred in `area`
pub(crate) fn centered_x(area: Rect, text: &str) -> i32 {
    let width = unicode_width::UnicodeWidthStr::width(text) as i32;
    area.x as i32 + (area.width as i32 - width) / 2
}
