use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

use crate::console::Console;
use crate::profiles::{builtin_catalog, load_catalog, TerminalProfile};
use crate::scripts::ScriptList;
use crate::settings;
use crate::status::render_status_bar;
use crate::theme::ThemeStore;
use crate::ui::{
    centered_box, dim_style, hint_style, normal_style, plain_style, sel_style, title_style, Term,
};

const SIDEBAR_WIDTH: u16 = 28;

// How long the status-bar clock may go without a repaint.
const TICK: Duration = Duration::from_secs(10);

// ── Desktop state ─────────────────────────────────────────────────────────────

/// Top-level view state. Owns the theme store, the script list and the
/// console; render functions borrow it, mutations go through its methods.
pub struct Desktop {
    pub theme: ThemeStore,
    pub scripts: ScriptList,
    pub console: Console,
    pub catalog: Vec<TerminalProfile>,
    pub chat_input: String,
    pub chat_focused: bool,
    pub selected: usize,
    pub editing: bool,
    pub fullscreen: bool,
    console_height: usize,
}

impl Desktop {
    pub fn new() -> Self {
        let catalog = load_catalog();
        let initial = catalog
            .first()
            .cloned()
            .unwrap_or_else(|| builtin_catalog().remove(0));
        Self {
            theme: ThemeStore::new(initial),
            scripts: ScriptList::default(),
            console: Console::new(),
            catalog,
            chat_input: String::new(),
            chat_focused: false,
            selected: 0,
            editing: false,
            fullscreen: false,
            console_height: 0,
        }
    }

    pub fn move_selection(&mut self, delta: i64) {
        if self.scripts.is_empty() {
            self.selected = 0;
            return;
        }
        let max = self.scripts.len() as i64 - 1;
        self.selected = (self.selected as i64 + delta).clamp(0, max) as usize;
    }

    /// Echo the selected script into the console. Nothing runs for real.
    pub fn run_selected(&mut self) {
        if let Some(entry) = self.scripts.get(self.selected) {
            let command = entry.command.clone();
            self.console.echo_command(&command);
        }
    }

    /// Remove the selected script, returning its name. Confirmation is the
    /// caller's job.
    pub fn delete_selected(&mut self) -> Option<String> {
        let entry = self.scripts.get(self.selected)?.clone();
        self.scripts.remove(entry.id);
        self.move_selection(0);
        Some(entry.name)
    }

    /// Submit the chat input: clear it and echo a stub acknowledgement.
    /// There is no request path.
    pub fn submit_chat(&mut self) {
        let text = self.chat_input.trim().to_string();
        self.chat_input.clear();
        if text.is_empty() {
            return;
        }
        self.console.push_line(format!("ruby> {text}"));
        self.console.push_line("Ruby is offline. No uplink configured.");
        self.console.push_line(String::new());
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(size);

        if self.fullscreen {
            self.draw_terminal_pane(f, rows[0]);
        } else {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
                .split(rows[0]);
            self.draw_sidebar(f, cols[0]);
            self.draw_terminal_pane(f, cols[1]);
        }

        render_status_bar(f, rows[1], &self.theme);
    }

    fn draw_sidebar(&self, f: &mut Frame, area: Rect) {
        let accent = self.theme.accent();
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(dim_style(accent));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(inner);

        // Title
        let title = Line::from(vec![
            Span::styled("◆ ", normal_style(accent)),
            Span::styled("Ruby OS", title_style(accent)),
            if self.editing {
                Span::styled("  [edit]", dim_style(accent))
            } else {
                Span::raw("")
            },
        ]);
        f.render_widget(Paragraph::new(title), rows[0]);

        // Script list
        let mut lines: Vec<Line> = Vec::new();
        if self.scripts.is_empty() {
            lines.push(Line::from(Span::styled("(no scripts, press a)", hint_style())));
        }
        for (idx, entry) in self.scripts.iter().enumerate() {
            let marker = if self.editing { " ✕" } else { "" };
            let label = format!("{}{marker}", entry.name);
            if idx == self.selected {
                lines.push(Line::from(Span::styled(format!(" > {label}"), sel_style(accent))));
                lines.push(Line::from(Span::styled(
                    format!("   $ {}", entry.command),
                    hint_style(),
                )));
            } else {
                lines.push(Line::from(Span::styled(format!("   {label}"), plain_style())));
            }
        }
        f.render_widget(Paragraph::new(lines), rows[1]);

        // Chat input stub
        let chat_border = if self.chat_focused {
            normal_style(accent)
        } else {
            hint_style()
        };
        let chat_block = Block::default()
            .borders(Borders::ALL)
            .border_style(chat_border)
            .title(Span::styled("◆", normal_style(accent)));
        let chat_inner = chat_block.inner(rows[2]);
        f.render_widget(chat_block, rows[2]);
        let chat_line = if self.chat_input.is_empty() && !self.chat_focused {
            Line::from(Span::styled("Ask Ruby...", hint_style()))
        } else {
            let cursor = if self.chat_focused { "█" } else { "" };
            Line::from(Span::styled(
                format!("{}{cursor}", self.chat_input),
                plain_style(),
            ))
        };
        f.render_widget(Paragraph::new(chat_line), chat_inner);

        // Key hints
        let hints = vec![
            Line::from(Span::styled("↵ run  a add  e edit  d del", hint_style())),
            Line::from(Span::styled("s colors  p profile  ⇥ chat", hint_style())),
            Line::from(Span::styled("f full  q quit", hint_style())),
        ];
        f.render_widget(Paragraph::new(hints), rows[3]);
    }

    /// Pane title: profile name, plus a scrollback marker while the console
    /// is detached from the tail.
    fn pane_title(&self) -> String {
        let name = &self.theme.profile().name;
        if self.console.following() {
            format!(" {name} ")
        } else {
            format!(" {name} · scrollback ({} lines) ", self.console.line_count())
        }
    }

    fn draw_terminal_pane(&mut self, f: &mut Frame, area: Rect) {
        let accent = self.theme.accent();
        let profile = self.theme.profile().clone();
        let panel = self.theme.panel();

        let title = self.pane_title();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(normal_style(accent))
            .title(Span::styled(title, title_style(accent)))
            .style(Style::default().bg(profile.background.to_color()));
        let inner = block.inner(area);
        f.render_widget(block, area);

        self.console_height = inner.height as usize;

        let mut text_style = Style::default()
            .fg(profile.foreground.to_color())
            .bg(panel.to_color());
        if profile.dimmed() {
            text_style = text_style.add_modifier(Modifier::DIM);
        }

        let lines: Vec<Line> = self
            .console
            .visible(self.console_height)
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect();
        f.render_widget(Paragraph::new(lines).style(text_style), inner);
    }

    fn scroll_height(&self) -> usize {
        self.console_height.max(1)
    }
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new()
    }
}

// ── Event loop ────────────────────────────────────────────────────────────────

enum Flow {
    Continue,
    Quit,
}

pub fn run_desktop(terminal: &mut Term, desktop: &mut Desktop) -> Result<()> {
    let mut drawn_revision: Option<u64> = None;
    let mut last_tick = Instant::now();

    loop {
        // Pull-based redraw: repaint when the theme revision moved, after
        // handled input, or when the clock tick is due.
        let revision = desktop.theme.revision();
        if drawn_revision != Some(revision) || last_tick.elapsed() >= TICK {
            terminal.draw(|f| desktop.draw(f))?;
            drawn_revision = Some(revision);
            last_tick = Instant::now();
        }

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key(terminal, desktop, key)? {
            Flow::Quit => break,
            Flow::Continue => drawn_revision = None,
        }
    }
    Ok(())
}

fn handle_key(terminal: &mut Term, desktop: &mut Desktop, key: KeyEvent) -> Result<Flow> {
    if desktop.chat_focused {
        match key.code {
            KeyCode::Esc | KeyCode::Tab => desktop.chat_focused = false,
            KeyCode::Enter => desktop.submit_chat(),
            KeyCode::Backspace => {
                desktop.chat_input.pop();
            }
            KeyCode::Char(c) if (c as u32) >= 32 => desktop.chat_input.push(c),
            _ => {}
        }
        return Ok(Flow::Continue);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(Flow::Quit),
        KeyCode::Up | KeyCode::Char('k') => desktop.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => desktop.move_selection(1),
        KeyCode::Enter | KeyCode::Char(' ') => desktop.run_selected(),
        KeyCode::Char('a') => add_script_flow(terminal, desktop)?,
        KeyCode::Char('e') => desktop.editing = !desktop.editing,
        KeyCode::Char('d') | KeyCode::Delete => {
            if desktop.editing {
                if let Some(entry) = desktop.scripts.get(desktop.selected).cloned() {
                    if confirm(terminal, desktop, &format!("Delete '{}'?", entry.name))? {
                        desktop.delete_selected();
                        let name = entry.name;
                        flash(terminal, desktop, &format!("{name} deleted."), 800)?;
                    }
                }
            }
        }
        KeyCode::Char('s') => settings::settings_overlay(terminal, desktop)?,
        KeyCode::Char('p') => settings::profile_picker(terminal, desktop)?,
        KeyCode::Tab => desktop.chat_focused = true,
        KeyCode::Char('f') => desktop.fullscreen = !desktop.fullscreen,
        KeyCode::PageUp => {
            let h = desktop.scroll_height();
            desktop.console.scroll_up(h);
        }
        KeyCode::PageDown => {
            let h = desktop.scroll_height();
            desktop.console.scroll_down(h);
        }
        _ => {}
    }
    Ok(Flow::Continue)
}

// ── Modal overlays ────────────────────────────────────────────────────────────
// Each runs its own small loop, repainting the desktop underneath every frame.

fn add_script_flow(terminal: &mut Term, desktop: &mut Desktop) -> Result<()> {
    let name = match input_prompt(terminal, desktop, "Script name:")? {
        Some(n) if !n.is_empty() => n,
        Some(_) => return flash(terminal, desktop, "Error: Invalid input.", 800),
        None => return Ok(()),
    };
    let command = match input_prompt(terminal, desktop, &format!("Command for '{name}':"))? {
        Some(c) if !c.is_empty() => c,
        Some(_) => return flash(terminal, desktop, "Error: Invalid input.", 800),
        None => return Ok(()),
    };
    desktop.scripts.add(name.clone(), command);
    desktop.selected = desktop.scripts.len() - 1;
    flash(terminal, desktop, &format!("{name} added."), 800)
}

pub(crate) fn input_prompt(
    terminal: &mut Term,
    desktop: &mut Desktop,
    prompt: &str,
) -> Result<Option<String>> {
    let mut buf = String::new();

    loop {
        terminal.draw(|f| {
            desktop.draw(f);
            let accent = desktop.theme.accent();
            let area = centered_box(f.area(), 46, 5);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(normal_style(accent));
            let inner = block.inner(area);
            f.render_widget(Clear, area);
            f.render_widget(block, area);
            let text = format!("{prompt}\n> {buf}█");
            f.render_widget(Paragraph::new(text).style(plain_style()), inner);
        })?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Enter => return Ok(Some(buf.trim().to_string())),
                KeyCode::Esc => return Ok(None),
                KeyCode::Backspace => {
                    buf.pop();
                }
                KeyCode::Char(c) if (c as u32) >= 32 => buf.push(c),
                _ => {}
            }
        }
    }
}

fn confirm(terminal: &mut Term, desktop: &mut Desktop, message: &str) -> Result<bool> {
    loop {
        terminal.draw(|f| {
            desktop.draw(f);
            let accent = desktop.theme.accent();
            let area = centered_box(f.area(), (message.len() as u16 + 8).max(30), 5);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(normal_style(accent));
            let inner = block.inner(area);
            f.render_widget(Clear, area);
            f.render_widget(block, area);
            let text = format!("{message}\n\n[y] Yes    [n] No");
            f.render_widget(Paragraph::new(text).style(plain_style()), inner);
        })?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return Ok(false),
                _ => {}
            }
        }
    }
}

fn flash(terminal: &mut Term, desktop: &mut Desktop, message: &str, ms: u64) -> Result<()> {
    terminal.draw(|f| {
        desktop.draw(f);
        let accent = desktop.theme.accent();
        let area = centered_box(f.area(), message.len() as u16 + 6, 3);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(sel_style(accent))
            .style(sel_style(accent));
        let inner = block.inner(area);
        f.render_widget(Clear, area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new(message)
                .alignment(ratatui::layout::Alignment::Center)
                .style(sel_style(accent)),
            inner,
        );
    })?;
    std::thread::sleep(Duration::from_millis(ms));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ACCENT_DEFAULT;

    #[test]
    fn new_desktop_has_stock_defaults() {
        let desktop = Desktop::new();
        assert_eq!(desktop.theme.accent(), ACCENT_DEFAULT);
        assert_eq!(desktop.theme.panel().hex(), "#2A2A2A");
        assert_eq!(desktop.scripts.len(), 1);
        assert!(!desktop.catalog.is_empty());
        assert_eq!(desktop.theme.profile(), &desktop.catalog[0]);
    }

    #[test]
    fn run_selected_echoes_without_executing() {
        let mut desktop = Desktop::new();
        let before = desktop.console.line_count();
        desktop.run_selected();
        assert!(desktop.console.line_count() > before);
        let all = desktop.console.visible(desktop.console.line_count());
        assert!(all.contains(&"$ mail -e".to_string()));
    }

    #[test]
    fn selection_clamps_to_the_script_list() {
        let mut desktop = Desktop::new();
        desktop.move_selection(-5);
        assert_eq!(desktop.selected, 0);
        desktop.scripts.add("Second", "true");
        desktop.move_selection(10);
        assert_eq!(desktop.selected, 1);
    }

    #[test]
    fn delete_selected_reclamps_the_cursor() {
        let mut desktop = Desktop::new();
        desktop.scripts.add("Second", "true");
        desktop.selected = 1;
        assert_eq!(desktop.delete_selected().as_deref(), Some("Second"));
        assert_eq!(desktop.selected, 0);
        assert_eq!(desktop.scripts.len(), 1);
    }

    #[test]
    fn pane_title_marks_detached_scrollback() {
        let mut desktop = Desktop::new();
        assert_eq!(desktop.pane_title(), " Ruby Dark ");

        desktop.console.scroll_up(1);
        let title = desktop.pane_title();
        assert!(title.contains("scrollback"));
        assert!(title.contains(&desktop.console.line_count().to_string()));

        desktop.console.scroll_down(1);
        assert_eq!(desktop.pane_title(), " Ruby Dark ");
    }

    #[test]
    fn chat_submit_clears_input_and_stays_offline() {
        let mut desktop = Desktop::new();
        desktop.chat_input = "  hello ruby  ".to_string();
        desktop.submit_chat();
        assert!(desktop.chat_input.is_empty());
        let all = desktop.console.visible(desktop.console.line_count());
        assert!(all.contains(&"ruby> hello ruby".to_string()));

        // Whitespace-only input is dropped without an echo.
        let before = desktop.console.line_count();
        desktop.chat_input = "   ".to_string();
        desktop.submit_chat();
        assert_eq!(desktop.console.line_count(), before);
    }
}
