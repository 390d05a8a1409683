// ── Simulated terminal output ─────────────────────────────────────────────────

/// Append-only text buffer behind the terminal pane. Nothing is ever
/// executed; scripts and chat submissions only echo lines into it.
#[derive(Debug, Clone)]
pub struct Console {
    lines: Vec<String>,
    /// `None` follows the tail; `Some(offset)` is a manual scroll position.
    scroll: Option<usize>,
}

impl Console {
    pub fn new() -> Self {
        Self {
            lines: vec![
                "Ruby OS v1.0.0".to_string(),
                "Type 'help' for available commands".to_string(),
                String::new(),
                "$ _".to_string(),
            ],
            scroll: None,
        }
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Echo a script activation without running anything.
    pub fn echo_command(&mut self, command: &str) {
        self.push_line(format!("$ {command}"));
        self.push_line(format!("Executing: {command}..."));
        self.push_line(String::new());
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn max_offset(&self, height: usize) -> usize {
        self.lines.len().saturating_sub(height)
    }

    fn offset(&self, height: usize) -> usize {
        match self.scroll {
            Some(o) => o.min(self.max_offset(height)),
            None => self.max_offset(height),
        }
    }

    pub fn scroll_up(&mut self, height: usize) {
        let cur = self.offset(height);
        self.scroll = Some(cur.saturating_sub(1));
    }

    /// Scrolling past the tail resumes following it.
    pub fn scroll_down(&mut self, height: usize) {
        let next = self.offset(height) + 1;
        if next >= self.max_offset(height) {
            self.scroll = None;
        } else {
            self.scroll = Some(next);
        }
    }

    pub fn following(&self) -> bool {
        self.scroll.is_none()
    }

    /// The slice of lines visible in a pane of the given height.
    pub fn visible(&self, height: usize) -> &[String] {
        let first = self.offset(height);
        let last = (first + height).min(self.lines.len());
        &self.lines[first..last]
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
