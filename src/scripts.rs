// ── Launcher scripts ──────────────────────────────────────────────────────────

/// A user-defined named shortcut with an inert command string. The command
/// is never executed, so its content is not validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    pub id: u64,
    pub name: String,
    pub command: String,
}

/// Insertion-ordered script list. Ids come from a session-monotonic counter
/// and are never reused, even after a delete.
#[derive(Debug, Clone)]
pub struct ScriptList {
    entries: Vec<ScriptEntry>,
    next_id: u64,
}

impl ScriptList {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    pub fn add(&mut self, name: impl Into<String>, command: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(ScriptEntry {
            id,
            name: name.into(),
            command: command.into(),
        });
        id
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn get(&self, index: usize) -> Option<&ScriptEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScriptEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ScriptList {
    /// The stock desktop ships with one example shortcut.
    fn default() -> Self {
        let mut list = Self::new();
        list.add("Check Mail", "mail -e");
        list
    }
}
