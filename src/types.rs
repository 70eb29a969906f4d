//! Domain types for keypad-calc.
//!
//! Button symbols, operators, theme state and configuration.
//! Pure data, no I/O.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

// ============================================================================
// OPERATORS
// ============================================================================

/// The four binary operators exposed on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// The character shown on the button and written into the buffer.
    pub const fn as_char(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    pub fn from_char(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// The three-character buffer token: `" + "`.
    pub fn token(self) -> String {
        format!(" {} ", self.as_char())
    }
}

// ============================================================================
// BUTTON SYMBOLS
// ============================================================================

/// Label of the backspace button.
pub const BACKSPACE_LABEL: &str = "⌫";

/// Immutable label carried by every keypad event.
///
/// The set is closed: every button on the keypad maps to exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// 0 through 9.
    Digit(u8),
    Dot,
    Operator(Operator),
    LeftParen,
    RightParen,
    Clear,
    Backspace,
    Equals,
}

impl Symbol {
    /// Parse a button label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Symbol> {
        if label == BACKSPACE_LABEL {
            return Some(Symbol::Backspace);
        }

        let mut chars = label.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }

        match c {
            '0'..='9' => Some(Symbol::Digit(c as u8 - b'0')),
            '.' => Some(Symbol::Dot),
            '(' => Some(Symbol::LeftParen),
            ')' => Some(Symbol::RightParen),
            'C' => Some(Symbol::Clear),
            '=' => Some(Symbol::Equals),
            _ => Operator::from_char(c).map(Symbol::Operator),
        }
    }

    /// The label painted on the button.
    pub fn label(self) -> String {
        match self {
            Symbol::Digit(d) => d.to_string(),
            Symbol::Dot => ".".to_string(),
            Symbol::Operator(op) => op.as_char().to_string(),
            Symbol::LeftParen => "(".to_string(),
            Symbol::RightParen => ")".to_string(),
            Symbol::Clear => "C".to_string(),
            Symbol::Backspace => BACKSPACE_LABEL.to_string(),
            Symbol::Equals => "=".to_string(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// ============================================================================
// THEME STATE
// ============================================================================

/// Which of the two fixed style presets is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => f.write_str("Light"),
            ThemeMode::Dark => f.write_str("Dark"),
        }
    }
}

// ============================================================================
// FEEDBACK
// ============================================================================

/// One-way notification produced by every keypad action.
///
/// Handlers never talk to the speech facility directly; they return this
/// and the caller hands it to a [`crate::speech::Notifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    /// Short status phrase to be spoken. Never empty.
    pub phrase: String,
    /// Whether an audible confirmation chime accompanies the phrase.
    pub chime: bool,
}

impl Feedback {
    pub fn spoken(phrase: impl Into<String>) -> Self {
        Feedback {
            phrase: phrase.into(),
            chime: false,
        }
    }

    pub fn with_chime(phrase: impl Into<String>) -> Self {
        Feedback {
            phrase: phrase.into(),
            chime: true,
        }
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Language used for spoken phrases and the preferred voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    /// Traditional Chinese (Taiwan).
    ZhTw,
}

impl Language {
    /// BCP 47 culture name handed to voice selection.
    pub const fn culture(self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::ZhTw => "zh-TW",
        }
    }
}

/// Speech backend requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechChoice {
    /// Detect the platform's facility once at startup.
    #[default]
    Auto,
    PowerShell,
    Say,
    Espeak,
    /// Terminal bell only, no speech.
    Bell,
    /// No audible feedback at all.
    Off,
}

/// Configuration for the notification port.
#[derive(Debug, Clone, Default)]
pub struct SpeechConfig {
    pub choice: SpeechChoice,
    pub language: Language,
    /// Voice name forwarded to `say`/`espeak`. None = platform default.
    pub voice: Option<String>,
}

/// Configuration for the interactive keypad.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Theme applied at construction.
    pub theme: ThemeMode,
    pub speech: SpeechConfig,
    /// Log destination for the TUI. None = default cache location.
    pub log_file: Option<PathBuf>,
}

/// Output format for headless commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable pretty output.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

// ============================================================================
// TESTS
// ============================================================================
