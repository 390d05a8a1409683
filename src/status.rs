use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::ThemeStore;
use crate::ui::sel_style;

// ── Status bar ────────────────────────────────────────────────────────────────

/// Left and right status-bar text: clock on the left, active profile and
/// accent color on the right.
pub fn status_parts(theme: &ThemeStore) -> (String, String) {
    let now = Local::now().format("%A, %d. %B - %I:%M%p").to_string();
    let profile = theme.profile();
    let right = format!(
        "{} · {} {}px · {}",
        profile.name,
        profile.font_family,
        profile.font_size,
        theme.accent().hex()
    );
    (now, right)
}

pub fn render_status_bar(f: &mut Frame, area: Rect, theme: &ThemeStore) {
    if area.height == 0 {
        return;
    }

    let (now, right) = status_parts(theme);
    let style = sel_style(theme.accent());

    let left = Span::styled(format!(" {now}"), style);
    let right_span = Span::styled(format!("{right} "), style);

    // Pad center
    let used = now.len() + 1 + right.len() + 1;
    let pad = " ".repeat((area.width as usize).saturating_sub(used));

    let line = Line::from(vec![left, Span::styled(pad, style), right_span]);
    f.render_widget(Paragraph::new(line), area);
}
