//! Palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

use ripwatch_core::{AlertLevel, LevelClass};

// ── Palette ───────────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363
pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29
pub const LIGHT_BLUE: Color = Color::Rgb(139, 233, 253); // #8be9fd

// ── Panels ────────────────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn tab_active() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn selected_row() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

// ── Status ────────────────────────────────────────────────────────────

pub fn disc_title() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Artist line; highlighted while a disc sits idle in the drive.
pub fn artist(highlight: bool) -> Style {
    if highlight {
        Style::default().fg(CORAL).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM_WHITE)
    }
}

pub fn warning_banner() -> Style {
    Style::default().fg(ELECTRIC_YELLOW)
}

pub fn gauge() -> Style {
    Style::default().fg(ELECTRIC_PURPLE).bg(BG_HIGHLIGHT)
}

// ── Logs ──────────────────────────────────────────────────────────────

pub fn log_time() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn log_level(class: &LevelClass) -> Style {
    let color = match class {
        LevelClass::Debug => BORDER_GRAY,
        LevelClass::Info => LIGHT_BLUE,
        LevelClass::Warning => ELECTRIC_YELLOW,
        LevelClass::Error | LevelClass::Critical => ERROR_RED,
        LevelClass::Success => SUCCESS_GREEN,
        LevelClass::Other(_) => DIM_WHITE,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn log_message() -> Style {
    Style::default().fg(DIM_WHITE)
}

// ── Alerts ────────────────────────────────────────────────────────────

/// Border color and icon of an alert toast.
pub fn alert(level: AlertLevel) -> (Color, &'static str) {
    match level {
        AlertLevel::Success => (SUCCESS_GREEN, "✓"),
        AlertLevel::Error => (ERROR_RED, "✗"),
        AlertLevel::Warning => (ELECTRIC_YELLOW, "!"),
        AlertLevel::Info => (NEON_CYAN, "·"),
    }
}
