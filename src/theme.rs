use ratatui::style::Color;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::profiles::TerminalProfile;

// ── Color ─────────────────────────────────────────────────────────────────────

/// 24-bit RGB color. Canonical text form is `#RRGGBB` (uppercase on output,
/// either case accepted on input).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const ACCENT_DEFAULT: Rgb = Rgb::new(0xB6, 0x31, 0x63);
pub const PANEL_DEFAULT: Rgb = Rgb::new(0x2A, 0x2A, 0x2A);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional, case-insensitive).
    /// Returns `None` for anything malformed.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 {
            return None;
        }
        let mut bytes = [0u8; 3];
        hex::decode_to_slice(digits, &mut bytes).ok()?;
        Some(Self::new(bytes[0], bytes[1], bytes[2]))
    }

    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn channel(&self, channel: Channel) -> u8 {
        match channel {
            Channel::R => self.r,
            Channel::G => self.g,
            Channel::B => self.b,
        }
    }

    pub fn with_channel(self, channel: Channel, value: u8) -> Self {
        let mut out = self;
        match channel {
            Channel::R => out.r = value,
            Channel::G => out.g = value,
            Channel::B => out.b = value,
        }
        out
    }

    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid color '{s}'")))
    }
}

/// Clamp an arbitrary integer to a valid channel value.
pub fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

// ── Targets ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    R,
    G,
    B,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::R, Channel::G, Channel::B];

    pub fn label(self) -> &'static str {
        match self {
            Channel::R => "R",
            Channel::G => "G",
            Channel::B => "B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Accent,
    Panel,
}

// ── ThemeStore ────────────────────────────────────────────────────────────────

/// Single source of truth for the accent color, panel color and active
/// terminal profile. Owned by the desktop and passed by reference to render
/// code; views never mutate it except through these setters.
///
/// Every mutation bumps `revision`, which the event loop compares against
/// the last drawn revision to decide whether a redraw is due.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    accent: Rgb,
    panel: Rgb,
    profile: TerminalProfile,
    revision: u64,
}

impl ThemeStore {
    pub fn new(profile: TerminalProfile) -> Self {
        Self {
            accent: ACCENT_DEFAULT,
            panel: PANEL_DEFAULT,
            profile,
            revision: 0,
        }
    }

    pub fn accent(&self) -> Rgb {
        self.accent
    }

    pub fn panel(&self) -> Rgb {
        self.panel
    }

    pub fn profile(&self) -> &TerminalProfile {
        &self.profile
    }

    pub fn color(&self, target: ColorTarget) -> Rgb {
        match target {
            ColorTarget::Accent => self.accent,
            ColorTarget::Panel => self.panel,
        }
    }

    /// Monotonic change counter for pull-based redraw.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_accent(&mut self, color: Rgb) {
        self.accent = color;
        self.revision += 1;
    }

    pub fn set_panel(&mut self, color: Rgb) {
        self.panel = color;
        self.revision += 1;
    }

    /// Apply a hex color string to the accent. Malformed input is rejected:
    /// the previous color is kept and no change signal fires.
    pub fn set_accent_hex(&mut self, input: &str) -> bool {
        match Rgb::parse(input) {
            Some(c) => {
                self.set_accent(c);
                true
            }
            None => false,
        }
    }

    pub fn set_panel_hex(&mut self, input: &str) -> bool {
        match Rgb::parse(input) {
            Some(c) => {
                self.set_panel(c);
                true
            }
            None => false,
        }
    }

    pub fn reset_accent(&mut self) {
        self.set_accent(ACCENT_DEFAULT);
    }

    pub fn reset_panel(&mut self) {
        self.set_panel(PANEL_DEFAULT);
    }

    /// Replace the active profile wholesale. No partial-field update.
    pub fn select_profile(&mut self, profile: TerminalProfile) {
        self.profile = profile;
        self.revision += 1;
    }

    /// Clamp `value` to [0,255], recompute the full color from the three
    /// channels and apply it via the target's setter. Callers feeding user
    /// text degrade unparsable input to 0 before calling this.
    pub fn set_channel(&mut self, target: ColorTarget, channel: Channel, value: i64) {
        let next = self.color(target).with_channel(channel, clamp_channel(value));
        match target {
            ColorTarget::Accent => self.set_accent(next),
            ColorTarget::Panel => self.set_panel(next),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::builtin_catalog;

    fn store() -> ThemeStore {
        ThemeStore::new(builtin_catalog().remove(0))
    }

    #[test]
    fn clamp_stays_in_range_and_is_idempotent() {
        for v in [i64::MIN, -1, 0, 1, 128, 255, 256, 300, i64::MAX] {
            let c = clamp_channel(v);
            assert!(c as i64 >= 0 && c as i64 <= 255);
            assert_eq!(clamp_channel(c as i64), c);
        }
    }

    #[test]
    fn hex_round_trips_case_insensitively() {
        for s in ["#B63163", "#b63163", "#2a2a2a", "10B981"] {
            let c = Rgb::parse(s).expect("valid color");
            assert!(c.hex().eq_ignore_ascii_case(&format!(
                "#{}",
                s.trim_start_matches('#')
            )));
            assert_eq!(Rgb::parse(&c.hex()), Some(c));
        }
    }

    #[test]
    fn malformed_hex_is_rejected() {
        for s in ["", "#", "#B631", "#B6316G", "not a color", "#B631634"] {
            assert_eq!(Rgb::parse(s), None);
        }
    }

    #[test]
    fn rejected_input_keeps_previous_color_and_revision() {
        let mut theme = store();
        theme.set_accent_hex("#10B981");
        let rev = theme.revision();
        assert!(!theme.set_accent_hex("#NOTHEX"));
        assert_eq!(theme.accent().hex(), "#10B981");
        assert_eq!(theme.revision(), rev);
    }

    #[test]
    fn resets_yield_the_fixed_defaults() {
        let mut theme = store();
        theme.set_accent_hex("#3B82F6");
        theme.set_panel_hex("#000000");
        theme.reset_accent();
        theme.reset_panel();
        assert_eq!(theme.accent().hex(), "#B63163");
        assert_eq!(theme.panel().hex(), "#2A2A2A");
    }

    #[test]
    fn set_channel_clamps_out_of_range_values() {
        let mut theme = store();
        theme.set_channel(ColorTarget::Accent, Channel::R, 300);
        assert_eq!(theme.accent().r, 255);
        theme.set_channel(ColorTarget::Accent, Channel::G, -40);
        assert_eq!(theme.accent().g, 0);
        // Other channels untouched by a single-channel write.
        assert_eq!(theme.accent().b, ACCENT_DEFAULT.b);
    }

    #[test]
    fn set_channel_recomputes_the_full_hex_color() {
        let mut theme = store();
        theme.set_panel_hex("#102030");
        theme.set_channel(ColorTarget::Panel, Channel::G, 0x99);
        assert_eq!(theme.panel().hex(), "#109930");
    }

    #[test]
    fn every_mutation_bumps_the_revision() {
        let mut theme = store();
        let mut last = theme.revision();
        theme.set_accent(Rgb::new(1, 2, 3));
        assert!(theme.revision() > last);
        last = theme.revision();
        theme.reset_panel();
        assert!(theme.revision() > last);
        last = theme.revision();
        let profile = builtin_catalog().remove(1);
        theme.select_profile(profile);
        assert!(theme.revision() > last);
    }

    #[test]
    fn select_profile_replaces_wholesale() {
        let mut theme = store();
        let next = builtin_catalog().remove(2);
        theme.select_profile(next.clone());
        assert_eq!(theme.profile(), &next);
        // No stale field survives from the previous profile.
        assert_eq!(theme.profile().font_size, next.font_size);
    }

    #[test]
    fn serde_uses_the_canonical_hex_form() {
        let c = Rgb::parse("#b63163").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#B63163\"");
        let back: Rgb = serde_json::from_str("\"#10b981\"").unwrap();
        assert_eq!(back.hex(), "#10B981");
        assert!(serde_json::from_str::<Rgb>("\"#xyzxyz\"").is_err());
    }
}
