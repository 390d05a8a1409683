use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

use crate::theme::Rgb;
use crate::ui::{hint_style, normal_style, Term};

// (text, per-character delay ms, hold ms after the sequence)
const SEQUENCES: &[(&str, u64, u64)] = &[
    ("RUBY SYSTEMS (TM) TERMLINK\nSET TERMINAL/INQUIRE", 20, 1200),
    ("RBY-100\n>MOUNT /dev/gem0\n>SET HALT RESTART/MAINT", 30, 1200),
    (
        "RUBY OS v1.0.0\nCOPYRIGHT RUBY SYSTEMS\nUppermem: 64KB\nGem core (1A8)\nReady",
        25, 1000,
    ),
];

/// Typewriter boot banner. Space, Enter or Esc skips ahead to the desktop.
pub fn bootup(terminal: &mut Term, accent: Rgb) -> Result<()> {
    'sequences: for (text, char_delay_ms, hold_ms) in SEQUENCES {
        let mut shown: Vec<String> = Vec::new();
        for line in text.lines() {
            shown.push(String::new());
            for ch in line.chars() {
                if let Some(current) = shown.last_mut() {
                    current.push(ch);
                }
                if frame(terminal, &shown, accent, *char_delay_ms)? {
                    break 'sequences;
                }
            }
        }
        if hold(terminal, &shown, accent, *hold_ms)? {
            break 'sequences;
        }
    }

    // Brief blank frame before the desktop appears.
    terminal.draw(|f| f.render_widget(Paragraph::new(""), f.area()))?;
    std::thread::sleep(Duration::from_millis(300));
    Ok(())
}

/// Draw one boot frame, then wait `delay_ms`. Returns true on skip.
fn frame(terminal: &mut Term, lines: &[String], accent: Rgb, delay_ms: u64) -> Result<bool> {
    terminal.draw(|f| draw_boot(f, lines, accent))?;
    if skip_requested()? {
        return Ok(true);
    }
    std::thread::sleep(Duration::from_millis(delay_ms));
    Ok(false)
}

/// Keep the finished sequence on screen, staying responsive to skips.
fn hold(terminal: &mut Term, lines: &[String], accent: Rgb, hold_ms: u64) -> Result<bool> {
    for _ in 0..hold_ms / 50 {
        if frame(terminal, lines, accent, 50)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn draw_boot(f: &mut Frame, lines: &[String], accent: Rgb) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    // Vertical centering via leading blank lines.
    let top = rows[0].height.saturating_sub(lines.len() as u16) / 2;
    let banner: Vec<Line> = std::iter::repeat_with(Line::default)
        .take(top as usize)
        .chain(
            lines
                .iter()
                .map(|l| Line::from(Span::styled(l.as_str(), normal_style(accent)))),
        )
        .collect();
    f.render_widget(Paragraph::new(banner).alignment(Alignment::Center), rows[0]);

    f.render_widget(
        Paragraph::new(Span::styled("SPACE to skip", hint_style())).alignment(Alignment::Center),
        rows[1],
    );
}

fn skip_requested() -> Result<bool> {
    if !event::poll(Duration::from_millis(0))? {
        return Ok(false);
    }
    if let Event::Key(k) = event::read()? {
        return Ok(k.kind == KeyEventKind::Press
            && matches!(k.code, KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Esc));
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_build_up_to_the_version_banner() {
        assert!(!SEQUENCES.is_empty());
        let (last, _, _) = SEQUENCES.last().unwrap();
        assert!(last.contains("RUBY OS v1.0.0"));
        // Every sequence types and holds for a finite, nonzero time.
        for (text, char_delay, hold) in SEQUENCES {
            assert!(!text.is_empty());
            assert!(*char_delay > 0 && *hold >= 50);
        }
    }
}
