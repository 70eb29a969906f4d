//! Light and dark style presets.
//!
//! Two fixed bundles of colors, one per [`ThemeMode`]. Pure data, consumed
//! by the rendering layer.
//!
//! Each preset covers:
//! - window background/foreground
//! - display field and its border
//! - buttons, their borders, and hover (focused) / pressed states

use ratatui::style::{Color, Modifier, Style};

use crate::types::ThemeMode;

/// A complete look for the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreset {
    /// Whole window.
    pub window: Style,
    /// Display field text area.
    pub display: Style,
    /// Display field border.
    pub display_border: Style,
    /// Idle button.
    pub button: Style,
    /// Idle button border.
    pub button_border: Style,
    /// Button under the keyboard focus.
    pub hover: Style,
    /// Button that was just pressed.
    pub pressed: Style,
    /// Title bar.
    pub title: Style,
    /// Footer / help line.
    pub help: Style,
}

// ============================================================================
// PALETTES
// ============================================================================

const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Light preset: pale window, white field and buttons, grey borders.
pub const LIGHT: ThemePreset = ThemePreset {
    window: Style::new().bg(hex(0xf7f7f7)).fg(hex(0x111111)),
    display: Style::new()
        .bg(hex(0xffffff))
        .fg(hex(0x111111))
        .add_modifier(Modifier::BOLD),
    display_border: Style::new().bg(hex(0xf7f7f7)).fg(hex(0xcfcfcf)),
    button: Style::new().bg(hex(0xffffff)).fg(hex(0x111111)),
    button_border: Style::new().bg(hex(0xf7f7f7)).fg(hex(0xd0d0d0)),
    hover: Style::new().bg(hex(0xfafafa)).fg(hex(0x111111)).add_modifier(Modifier::BOLD),
    pressed: Style::new()
        .bg(hex(0xf0f0f0))
        .fg(hex(0x111111))
        .add_modifier(Modifier::REVERSED),
    title: Style::new().bg(hex(0xf7f7f7)).fg(hex(0x111111)).add_modifier(Modifier::BOLD),
    help: Style::new().bg(hex(0xf7f7f7)).fg(hex(0x777777)),
};

/// Dark preset: near-black window, slate field and buttons.
pub const DARK: ThemePreset = ThemePreset {
    window: Style::new().bg(hex(0x14161a)).fg(hex(0xeaeaea)),
    display: Style::new()
        .bg(hex(0x1e2126))
        .fg(hex(0xeaeaea))
        .add_modifier(Modifier::BOLD),
    display_border: Style::new().bg(hex(0x14161a)).fg(hex(0x2e3238)),
    button: Style::new().bg(hex(0x1b1e23)).fg(hex(0xeaeaea)),
    button_border: Style::new().bg(hex(0x14161a)).fg(hex(0x30343b)),
    hover: Style::new().bg(hex(0x22262c)).fg(hex(0xeaeaea)).add_modifier(Modifier::BOLD),
    pressed: Style::new()
        .bg(hex(0x262b32))
        .fg(hex(0xeaeaea))
        .add_modifier(Modifier::REVERSED),
    title: Style::new().bg(hex(0x14161a)).fg(hex(0xeaeaea)).add_modifier(Modifier::BOLD),
    help: Style::new().bg(hex(0x14161a)).fg(hex(0x8a8f98)),
};

/// The preset for a theme state.
pub fn preset(mode: ThemeMode) -> &'static ThemePreset {
    match mode {
        ThemeMode::Light => &LIGHT,
        ThemeMode::Dark => &DARK,
    }
}

// ============================================================================
// TESTS
// ============================================================================
