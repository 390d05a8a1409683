use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    Terminal,
};

use crate::theme::Rgb;

pub type Term = Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>;

// ── Style helpers ─────────────────────────────────────────────────────────────
// All take the accent explicitly; nothing here reads global state.

pub fn normal_style(accent: Rgb) -> Style {
    Style::default().fg(accent.to_color())
}

pub fn sel_style(accent: Rgb) -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(accent.to_color())
        .add_modifier(Modifier::BOLD)
}

pub fn title_style(accent: Rgb) -> Style {
    Style::default()
        .fg(accent.to_color())
        .add_modifier(Modifier::BOLD)
}

pub fn dim_style(accent: Rgb) -> Style {
    Style::default()
        .fg(accent.to_color())
        .add_modifier(Modifier::DIM)
}

/// Plain body text, independent of the accent.
pub fn plain_style() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// ── Overlay geometry ──────────────────────────────────────────────────────────

/// A centered rect of at most `w` x `h`, clamped to the screen.
pub fn centered_box(size: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(size.width);
    let h = h.min(size.height);
    Rect::new(
        size.x + (size.width - w) / 2,
        size.y + (size.height - h) / 2,
        w,
        h,
    )
}
