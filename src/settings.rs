use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Duration;

use crate::desktop::{input_prompt, Desktop};
use crate::profiles::TerminalProfile;
use crate::theme::{Channel, ColorTarget, Rgb, ThemeStore, ACCENT_DEFAULT, PANEL_DEFAULT};
use crate::ui::{centered_box, dim_style, hint_style, normal_style, sel_style, title_style, Term};

/// Preset swatches offered for both color targets.
pub const PRESETS: &[(&str, Rgb)] = &[
    ("Ruby", Rgb::new(0xB6, 0x31, 0x63)),
    ("Azure", Rgb::new(0x3B, 0x82, 0xF6)),
    ("Violet", Rgb::new(0x8B, 0x5C, 0xF6)),
    ("Emerald", Rgb::new(0x10, 0xB9, 0x81)),
    ("Amber", Rgb::new(0xF5, 0x9E, 0x0B)),
    ("Rose", Rgb::new(0xEC, 0x48, 0x99)),
];

// ── Row model ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsRow {
    Preset(ColorTarget),
    ChannelRow(ColorTarget, Channel),
    Reset(ColorTarget),
    Profile,
    Back,
}

fn target_label(target: ColorTarget) -> &'static str {
    match target {
        ColorTarget::Accent => "Accent",
        ColorTarget::Panel => "Panel",
    }
}

fn settings_rows(theme: &ThemeStore) -> Vec<(String, SettingsRow)> {
    let mut rows = Vec::new();
    for (target, default) in [
        (ColorTarget::Accent, ACCENT_DEFAULT),
        (ColorTarget::Panel, PANEL_DEFAULT),
    ] {
        let label = target_label(target);
        let color = theme.color(target);
        rows.push((
            format!("{label} Color: {} [choose]", color.hex()),
            SettingsRow::Preset(target),
        ));
        for channel in Channel::ALL {
            rows.push((
                format!(
                    "{label} {}: {} [adjust]",
                    channel.label(),
                    color.channel(channel)
                ),
                SettingsRow::ChannelRow(target, channel),
            ));
        }
        rows.push((
            format!("Reset {label} ({})", default.hex()),
            SettingsRow::Reset(target),
        ));
    }
    rows.push((
        format!("Terminal Profile: {} [choose]", theme.profile().name),
        SettingsRow::Profile,
    ));
    rows.push(("Back".to_string(), SettingsRow::Back));
    rows
}

// ── Choice overlays ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChoiceKind {
    Preset(ColorTarget),
    Profile,
}

#[derive(Debug, Clone, Copy)]
struct ChoiceOverlay {
    kind: ChoiceKind,
    selected: usize,
}

fn choice_items(kind: ChoiceKind, theme: &ThemeStore, catalog: &[TerminalProfile]) -> Vec<String> {
    match kind {
        ChoiceKind::Preset(target) => PRESETS
            .iter()
            .map(|(name, color)| {
                let mark = if theme.color(target) == *color { " *" } else { "" };
                format!("{name}  {}{mark}", color.hex())
            })
            .collect(),
        ChoiceKind::Profile => catalog
            .iter()
            .map(|p| {
                let mark = if theme.profile().name == p.name { " *" } else { "" };
                format!("{}  {} {}px{mark}", p.name, p.font_family, p.font_size)
            })
            .collect(),
    }
}

fn initial_choice_index(kind: ChoiceKind, theme: &ThemeStore, catalog: &[TerminalProfile]) -> usize {
    match kind {
        ChoiceKind::Preset(target) => PRESETS
            .iter()
            .position(|(_, color)| *color == theme.color(target))
            .unwrap_or(0),
        ChoiceKind::Profile => catalog
            .iter()
            .position(|p| p.name == theme.profile().name)
            .unwrap_or(0),
    }
}

fn apply_choice(
    theme: &mut ThemeStore,
    kind: ChoiceKind,
    selected: usize,
    catalog: &[TerminalProfile],
) {
    match kind {
        ChoiceKind::Preset(target) => {
            if let Some((_, color)) = PRESETS.get(selected) {
                match target {
                    ColorTarget::Accent => theme.set_accent(*color),
                    ColorTarget::Panel => theme.set_panel(*color),
                }
            }
        }
        ChoiceKind::Profile => {
            if let Some(profile) = catalog.get(selected) {
                theme.select_profile(profile.clone());
            }
        }
    }
}

// ── Activation and adjustment ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activation {
    None,
    TypeChannel(ColorTarget, Channel),
    Back,
}

fn activate_row(
    theme: &mut ThemeStore,
    row: SettingsRow,
    overlay: &mut Option<ChoiceOverlay>,
    catalog: &[TerminalProfile],
) -> Activation {
    match row {
        SettingsRow::Preset(target) => {
            let kind = ChoiceKind::Preset(target);
            *overlay = Some(ChoiceOverlay {
                kind,
                selected: initial_choice_index(kind, theme, catalog),
            });
            Activation::None
        }
        SettingsRow::ChannelRow(target, channel) => Activation::TypeChannel(target, channel),
        SettingsRow::Reset(ColorTarget::Accent) => {
            theme.reset_accent();
            Activation::None
        }
        SettingsRow::Reset(ColorTarget::Panel) => {
            theme.reset_panel();
            Activation::None
        }
        SettingsRow::Profile => {
            let kind = ChoiceKind::Profile;
            *overlay = Some(ChoiceOverlay {
                kind,
                selected: initial_choice_index(kind, theme, catalog),
            });
            Activation::None
        }
        SettingsRow::Back => Activation::Back,
    }
}

/// Left/Right adjustment on a channel row. Clamped by the store.
fn adjust_row(theme: &mut ThemeStore, row: SettingsRow, delta: i64) -> bool {
    match row {
        SettingsRow::ChannelRow(target, channel) => {
            let current = theme.color(target).channel(channel) as i64;
            theme.set_channel(target, channel, current + delta);
            true
        }
        _ => false,
    }
}

// ── Overlay loops ─────────────────────────────────────────────────────────────

pub fn settings_overlay(terminal: &mut Term, desktop: &mut Desktop) -> Result<()> {
    let mut cursor = 0usize;
    let mut overlay: Option<ChoiceOverlay> = None;

    loop {
        let rows = settings_rows(&desktop.theme);
        cursor = cursor.min(rows.len().saturating_sub(1));
        let items = overlay.map(|o| choice_items(o.kind, &desktop.theme, &desktop.catalog));

        terminal.draw(|f| {
            desktop.draw(f);
            draw_settings_box(f, desktop, &rows, cursor, overlay, items.as_deref());
        })?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(mut active) = overlay {
            let len = items.as_ref().map_or(0, |i| i.len());
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    active.selected = active.selected.saturating_sub(1);
                    overlay = Some(active);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    active.selected = (active.selected + 1).min(len.saturating_sub(1));
                    overlay = Some(active);
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    apply_choice(&mut desktop.theme, active.kind, active.selected, &desktop.catalog);
                    overlay = None;
                }
                KeyCode::Esc | KeyCode::Tab | KeyCode::Char('q') => overlay = None,
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => cursor = cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                cursor = (cursor + 1).min(rows.len().saturating_sub(1))
            }
            KeyCode::Left | KeyCode::Right => {
                let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
                    10
                } else {
                    1
                };
                let delta = if key.code == KeyCode::Left { -step } else { step };
                if let Some(&(_, row)) = rows.get(cursor) {
                    adjust_row(&mut desktop.theme, row, delta);
                }
            }
            KeyCode::Enter => {
                let Some(&(_, row)) = rows.get(cursor) else {
                    continue;
                };
                match activate_row(&mut desktop.theme, row, &mut overlay, &desktop.catalog) {
                    Activation::Back => break,
                    Activation::TypeChannel(target, channel) => {
                        let prompt =
                            format!("{} {} (0-255):", target_label(target), channel.label());
                        if let Some(text) = input_prompt(terminal, desktop, &prompt)? {
                            // Unparsable numeric input degrades to 0, then clamps.
                            let value = text.trim().parse::<i64>().unwrap_or(0);
                            desktop.theme.set_channel(target, channel, value);
                        }
                    }
                    Activation::None => {}
                }
            }
            KeyCode::Esc | KeyCode::Tab | KeyCode::Char('q') => break,
            _ => {}
        }
    }
    Ok(())
}

fn draw_settings_box(
    f: &mut Frame,
    desktop: &Desktop,
    rows: &[(String, SettingsRow)],
    cursor: usize,
    overlay: Option<ChoiceOverlay>,
    items: Option<&[String]>,
) {
    let accent = desktop.theme.accent();
    let extra = items.map_or(0, |i| i.len() + 1);
    let height = (rows.len() + extra + 3) as u16;
    let area = centered_box(f.area(), 44, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(normal_style(accent))
        .title(Span::styled(" Colors & Profile ", title_style(accent)));
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, (label, _)) in rows.iter().enumerate() {
        let selected = idx == cursor;
        if selected {
            lines.push(Line::from(Span::styled(
                format!(" > {label}"),
                sel_style(accent),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!("   {label}"),
                normal_style(accent),
            )));
        }
        if selected {
            if let (Some(active), Some(items)) = (overlay, items) {
                for (choice_idx, choice) in items.iter().enumerate() {
                    let style = if choice_idx == active.selected {
                        sel_style(accent)
                    } else {
                        dim_style(accent)
                    };
                    lines.push(Line::from(Span::styled(
                        format!("     {choice}"),
                        style,
                    )));
                }
                lines.push(Line::from(Span::styled(
                    "     ↵ apply   Esc close",
                    hint_style(),
                )));
            }
        }
    }
    lines.push(Line::from(Span::styled(
        " ←/→ adjust (±10 with Shift)   ↵ choose/type",
        hint_style(),
    )));
    f.render_widget(Paragraph::new(lines), inner);
}

/// Standalone profile picker, reachable directly from the desktop.
pub fn profile_picker(terminal: &mut Term, desktop: &mut Desktop) -> Result<()> {
    let mut selected = initial_choice_index(ChoiceKind::Profile, &desktop.theme, &desktop.catalog);

    loop {
        let items = choice_items(ChoiceKind::Profile, &desktop.theme, &desktop.catalog);

        terminal.draw(|f| {
            desktop.draw(f);
            let accent = desktop.theme.accent();
            let area = centered_box(f.area(), 40, items.len() as u16 + 2);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(normal_style(accent))
                .title(Span::styled(" Terminal Profile ", title_style(accent)));
            let inner = block.inner(area);
            f.render_widget(Clear, area);
            f.render_widget(block, area);
            let lines: Vec<Line> = items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    if idx == selected {
                        Line::from(Span::styled(format!(" > {item}"), sel_style(accent)))
                    } else {
                        Line::from(Span::styled(format!("   {item}"), normal_style(accent)))
                    }
                })
                .collect();
            f.render_widget(Paragraph::new(lines), inner);
        })?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => selected = selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                selected = (selected + 1).min(desktop.catalog.len().saturating_sub(1))
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                apply_choice(&mut desktop.theme, ChoiceKind::Profile, selected, &desktop.catalog);
                break;
            }
            KeyCode::Esc | KeyCode::Tab | KeyCode::Char('q') => break,
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::builtin_catalog;

    fn store() -> ThemeStore {
        ThemeStore::new(builtin_catalog().remove(0))
    }

    #[test]
    fn rows_cover_both_targets_and_the_profile() {
        let theme = store();
        let rows = settings_rows(&theme);
        assert!(rows
            .iter()
            .any(|(label, _)| label.starts_with("Accent Color: #B63163")));
        assert!(rows
            .iter()
            .any(|(label, _)| label.starts_with("Panel Color: #2A2A2A")));
        assert!(rows.iter().any(|(label, _)| label == "Reset Accent (#B63163)"));
        assert!(rows.iter().any(|(label, _)| label == "Reset Panel (#2A2A2A)"));
        assert!(rows
            .iter()
            .any(|(label, _)| label.starts_with("Terminal Profile: Ruby Dark")));
        assert_eq!(rows.last().map(|(label, _)| label.as_str()), Some("Back"));
    }

    #[test]
    fn channel_rows_show_current_values() {
        let mut theme = store();
        theme.set_accent_hex("#102030");
        let rows = settings_rows(&theme);
        assert!(rows.iter().any(|(label, _)| label == "Accent R: 16 [adjust]"));
        assert!(rows.iter().any(|(label, _)| label == "Accent G: 32 [adjust]"));
        assert!(rows.iter().any(|(label, _)| label == "Accent B: 48 [adjust]"));
    }

    #[test]
    fn adjust_clamps_at_both_bounds() {
        let mut theme = store();
        theme.set_accent_hex("#FE0000");
        let row = SettingsRow::ChannelRow(ColorTarget::Accent, Channel::R);
        assert!(adjust_row(&mut theme, row, 10));
        assert_eq!(theme.accent().r, 255);
        assert!(adjust_row(&mut theme, row, -1000));
        assert_eq!(theme.accent().r, 0);
        // Non-channel rows do not adjust.
        assert!(!adjust_row(&mut theme, SettingsRow::Back, 1));
    }

    #[test]
    fn activation_routes_rows_correctly() {
        let mut theme = store();
        let mut overlay = None;
        let catalog = builtin_catalog();

        assert_eq!(
            activate_row(&mut theme, SettingsRow::Back, &mut overlay, &catalog),
            Activation::Back
        );
        assert_eq!(
            activate_row(
                &mut theme,
                SettingsRow::ChannelRow(ColorTarget::Panel, Channel::B),
                &mut overlay,
                &catalog
            ),
            Activation::TypeChannel(ColorTarget::Panel, Channel::B)
        );
        assert!(overlay.is_none());

        activate_row(
            &mut theme,
            SettingsRow::Preset(ColorTarget::Accent),
            &mut overlay,
            &catalog,
        );
        assert!(matches!(
            overlay,
            Some(ChoiceOverlay {
                kind: ChoiceKind::Preset(ColorTarget::Accent),
                ..
            })
        ));
    }

    #[test]
    fn reset_rows_restore_the_fixed_defaults() {
        let mut theme = store();
        let mut overlay = None;
        let catalog = builtin_catalog();
        theme.set_accent_hex("#3B82F6");
        theme.set_panel_hex("#000000");
        activate_row(
            &mut theme,
            SettingsRow::Reset(ColorTarget::Accent),
            &mut overlay,
            &catalog,
        );
        activate_row(
            &mut theme,
            SettingsRow::Reset(ColorTarget::Panel),
            &mut overlay,
            &catalog,
        );
        assert_eq!(theme.accent().hex(), "#B63163");
        assert_eq!(theme.panel().hex(), "#2A2A2A");
    }

    #[test]
    fn preset_choice_applies_the_swatch() {
        let mut theme = store();
        let catalog = builtin_catalog();
        let emerald = PRESETS
            .iter()
            .position(|(name, _)| *name == "Emerald")
            .unwrap();
        apply_choice(&mut theme, ChoiceKind::Preset(ColorTarget::Accent), emerald, &catalog);
        assert_eq!(theme.accent().hex(), "#10B981");
        // Out-of-range indices are ignored.
        apply_choice(&mut theme, ChoiceKind::Preset(ColorTarget::Accent), 99, &catalog);
        assert_eq!(theme.accent().hex(), "#10B981");
    }

    #[test]
    fn profile_choice_replaces_the_profile_wholesale() {
        let mut theme = store();
        let catalog = builtin_catalog();
        apply_choice(&mut theme, ChoiceKind::Profile, 2, &catalog);
        assert_eq!(theme.profile(), &catalog[2]);
    }

    #[test]
    fn current_values_are_marked_in_choice_lists() {
        let mut theme = store();
        let catalog = builtin_catalog();
        theme.set_accent_hex("#3B82F6");
        let items = choice_items(ChoiceKind::Preset(ColorTarget::Accent), &theme, &catalog);
        assert!(items.iter().any(|i| i.starts_with("Azure") && i.ends_with('*')));
        assert_eq!(
            initial_choice_index(ChoiceKind::Preset(ColorTarget::Accent), &theme, &catalog),
            1
        );
        assert_eq!(initial_choice_index(ChoiceKind::Profile, &theme, &catalog), 0);
    }
}
