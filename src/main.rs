use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use std::io::stdout;

mod boot;
mod console;
mod desktop;
mod profiles;
mod scripts;
mod settings;
mod status;
mod theme;
mod ui;

use desktop::{run_desktop, Desktop};
use ui::Term;

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn init_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(ratatui::Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// ── Main application loop ─────────────────────────────────────────────────────

fn run(terminal: &mut Term, show_bootup: bool) -> Result<()> {
    let mut desktop = Desktop::new();

    if show_bootup {
        boot::bootup(terminal, desktop.theme.accent())?;
    }

    run_desktop(terminal, &mut desktop)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let no_boot = args.contains(&"--no-boot".to_string());

    let mut terminal = init_terminal()?;

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        run(&mut terminal, !no_boot)
    }));

    // Always restore terminal
    restore_terminal(&mut terminal).ok();
    print!(
        "{}",
        crossterm::terminal::Clear(crossterm::terminal::ClearType::All)
    );

    match result {
        Ok(r) => r,
        Err(_) => {
            eprintln!("Ruby OS crashed.");
            Ok(())
        }
    }
}
