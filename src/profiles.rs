use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::theme::Rgb;

// ── Terminal profiles ─────────────────────────────────────────────────────────

/// A named bundle of terminal-pane display settings. Selected wholesale;
/// individual fields are not user-editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalProfile {
    pub name: String,
    pub background: Rgb,
    pub foreground: Rgb,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u16,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

fn default_font_family() -> String {
    "JetBrains Mono".to_string()
}

const fn default_font_size() -> u16 {
    14
}

const fn default_opacity() -> f32 {
    1.0
}

impl TerminalProfile {
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.font_size > 0 && (0.0..=1.0).contains(&self.opacity)
    }

    /// A cell terminal cannot blend layers; low opacity renders as DIM text.
    pub fn dimmed(&self) -> bool {
        self.opacity < 0.75
    }
}

fn profile(
    name: &str,
    background: &str,
    foreground: &str,
    font_family: &str,
    font_size: u16,
    opacity: f32,
) -> TerminalProfile {
    TerminalProfile {
        name: name.to_string(),
        // Literals below are all well-formed.
        background: Rgb::parse(background).unwrap_or(Rgb::new(0, 0, 0)),
        foreground: Rgb::parse(foreground).unwrap_or(Rgb::new(255, 255, 255)),
        font_family: font_family.to_string(),
        font_size,
        opacity,
    }
}

/// The built-in catalog. The first entry is the default profile.
pub fn builtin_catalog() -> Vec<TerminalProfile> {
    vec![
        profile("Ruby Dark", "#1A1A1A", "#F8F8F2", "JetBrains Mono", 14, 1.0),
        profile("Classic Green", "#000000", "#33FF33", "IBM Plex Mono", 13, 1.0),
        profile("Amber Phosphor", "#2B1B00", "#FFB000", "IBM Plex Mono", 14, 0.95),
        profile("Midnight Azure", "#0F172A", "#93C5FD", "Fira Code", 13, 1.0),
        profile("Ghost", "#101010", "#9CA3AF", "JetBrains Mono", 12, 0.6),
    ]
}

// ── Catalog override ──────────────────────────────────────────────────────────

fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn catalog_file() -> PathBuf {
    base_dir().join("profiles.json")
}

fn read_catalog(path: &Path) -> Option<Vec<TerminalProfile>> {
    let text = std::fs::read_to_string(path).ok()?;
    let parsed: Vec<TerminalProfile> = serde_json::from_str(&text).ok()?;
    let valid: Vec<TerminalProfile> = parsed.into_iter().filter(TerminalProfile::is_valid).collect();
    if valid.is_empty() {
        None
    } else {
        Some(valid)
    }
}

/// Load the profile catalog: `profiles.json` next to the executable when it
/// exists and yields at least one valid entry, the built-in list otherwise.
pub fn load_catalog() -> Vec<TerminalProfile> {
    read_catalog(&catalog_file()).unwrap_or_else(builtin_catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_entries_are_valid_and_default_first() {
        let catalog = builtin_catalog();
        assert!(!catalog.is_empty());
        assert!(catalog.iter().all(TerminalProfile::is_valid));
        assert_eq!(catalog[0].name, "Ruby Dark");
        assert_eq!(catalog[0].font_size, 14);
    }

    #[test]
    fn override_file_discards_invalid_entries() {
        let json = r##"[
            {"name": "Custom", "background": "#112233", "foreground": "#EEEEEE",
             "font_family": "Menlo", "font_size": 16, "opacity": 0.9},
            {"name": "", "background": "#000000", "foreground": "#FFFFFF"},
            {"name": "Broken", "background": "#000000", "foreground": "#FFFFFF",
             "font_size": 0}
        ]"##;
        let dir = std::env::temp_dir().join("rubyos-profile-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("profiles.json");
        std::fs::write(&path, json).unwrap();
        let catalog = read_catalog(&path).expect("one valid entry");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "Custom");
        assert_eq!(catalog[0].background.hex(), "#112233");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_or_garbage_override_falls_back_to_builtin() {
        assert!(read_catalog(Path::new("/nonexistent/profiles.json")).is_none());
        let dir = std::env::temp_dir().join("rubyos-profile-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("garbage.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(read_catalog(&path).is_none());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn serde_defaults_fill_missing_display_fields() {
        let json = r##"{"name": "Min", "background": "#000000", "foreground": "#FFFFFF"}"##;
        let p: TerminalProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.font_family, "JetBrains Mono");
        assert_eq!(p.font_size, 14);
        assert_eq!(p.opacity, 1.0);
        assert!(p.is_valid());
        assert!(!p.dimmed());
    }
}
