//! TUI state algebra: pure types, zero effects.
//!
//! The keypad grid, the focus cursor, semantic actions and the transition
//! type the update function returns. The calculator itself lives in
//! [`Keypad`]; `App` only adds what the display surface needs on top.

use crossterm::event::{KeyEvent, MouseEvent};

use crate::keypad::Keypad;
use crate::types::{Feedback, Operator, Symbol, ThemeMode};

// ============================================================================
// KEYPAD GRID
// ============================================================================

pub const GRID_ROWS: usize = 5;
pub const GRID_COLS: usize = 4;

/// Button layout, top row first.
pub const GRID: [[Symbol; GRID_COLS]; GRID_ROWS] = [
    [
        Symbol::Clear,
        Symbol::Backspace,
        Symbol::LeftParen,
        Symbol::RightParen,
    ],
    [
        Symbol::Digit(7),
        Symbol::Digit(8),
        Symbol::Digit(9),
        Symbol::Operator(Operator::Add),
    ],
    [
        Symbol::Digit(4),
        Symbol::Digit(5),
        Symbol::Digit(6),
        Symbol::Operator(Operator::Subtract),
    ],
    [
        Symbol::Digit(1),
        Symbol::Digit(2),
        Symbol::Digit(3),
        Symbol::Operator(Operator::Multiply),
    ],
    [
        Symbol::Digit(0),
        Symbol::Dot,
        Symbol::Equals,
        Symbol::Operator(Operator::Divide),
    ],
];

/// Anything clickable on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Key(Symbol),
    ThemeToggle,
}

/// Keyboard focus position in [`GRID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Focus {
    pub row: usize,
    pub col: usize,
}

impl Focus {
    pub fn symbol(self) -> Symbol {
        GRID[self.row][self.col]
    }

    /// Focus on the given symbol's button.
    pub fn of(symbol: Symbol) -> Option<Focus> {
        GRID.iter().enumerate().find_map(|(row, keys)| {
            keys.iter()
                .position(|&s| s == symbol)
                .map(|col| Focus { row, col })
        })
    }
}

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal size changed; redraw.
    Resize,
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model.
#[derive(Debug)]
pub struct App {
    pub keypad: Keypad,
    pub focus: Focus,
    /// Highlighted with the pressed style until the next idle tick.
    pub pressed: Option<Button>,
    pub should_quit: bool,
}

impl App {
    pub fn new(keypad: Keypad) -> Self {
        App {
            keypad,
            focus: Focus::default(),
            pressed: None,
            should_quit: false,
        }
    }

    pub fn theme(&self) -> ThemeMode {
        self.keypad.theme()
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key and mouse events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A keypad button, typed or clicked.
    Press(Symbol),
    ToggleTheme,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Press the focused button.
    Activate,
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of applying an action to the App.
///
/// The effects boundary delivers `Announce` to the notifier.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Only the UI changed (focus moved); nothing to announce.
    Redraw,
    /// A keypad handler ran and produced feedback.
    Announce(Feedback),
    Quit,
}

// ============================================================================
// TESTS
// ============================================================================
