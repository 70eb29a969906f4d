//! Keypad controller: owns the expression buffer and theme state.
//!
//! Every entry point runs exactly one handler and returns exactly one
//! [`Feedback`]. Handlers touch no I/O; delivering the feedback is the
//! caller's job.

use tracing::debug;

use crate::buffer::{ExpressionBuffer, ERROR_MARKER};
use crate::eval::{evaluate, format_general, strip_whitespace, RESULT_PRECISION};
use crate::phrases::Phrasebook;
use crate::types::{Feedback, Language, Operator, Symbol, ThemeMode};

/// Calculator state behind the display surface.
#[derive(Debug, Clone)]
pub struct Keypad {
    buffer: ExpressionBuffer,
    theme: ThemeMode,
    phrases: Phrasebook,
}

impl Keypad {
    /// Empty buffer, light theme.
    pub fn new(language: Language) -> Self {
        Keypad {
            buffer: ExpressionBuffer::new(),
            theme: ThemeMode::Light,
            phrases: Phrasebook::new(language),
        }
    }

    pub fn with_theme(mut self, theme: ThemeMode) -> Self {
        self.theme = theme;
        self
    }

    /// Current display text.
    pub fn display(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    /// Route a button symbol to its handler.
    pub fn press(&mut self, symbol: Symbol) -> Feedback {
        debug!(%symbol, display = self.display(), "keypad press");
        match symbol {
            Symbol::Digit(d) => self.append(&d.to_string(), self.phrases.symbol(symbol)),
            Symbol::Dot => self.append(".", self.phrases.symbol(symbol)),
            Symbol::Operator(op) => self.operator(op),
            Symbol::LeftParen => self.append("(", self.phrases.symbol(symbol)),
            Symbol::RightParen => self.append(")", self.phrases.symbol(symbol)),
            Symbol::Clear => self.clear(),
            Symbol::Backspace => self.backspace(),
            Symbol::Equals => self.equals(),
        }
    }

    /// Route a raw button label. Unknown labels are a no-op.
    pub fn press_label(&mut self, label: &str) -> Option<Feedback> {
        match Symbol::from_label(label) {
            Some(symbol) => Some(self.press(symbol)),
            None => {
                debug!(label, "ignoring unknown button label");
                None
            }
        }
    }

    /// Flip between the light and dark presets.
    pub fn toggle_theme(&mut self) -> Feedback {
        self.theme = self.theme.toggled();
        debug!(theme = %self.theme, "theme toggled");
        Feedback::spoken(self.phrases.toggle_theme())
    }

    // ========================================================================
    // HANDLERS
    // ========================================================================

    fn append(&mut self, text: &str, phrase: String) -> Feedback {
        self.buffer.append(text);
        Feedback::with_chime(phrase)
    }

    /// Merging replaces text in place, so only a fresh append chimes.
    fn operator(&mut self, op: Operator) -> Feedback {
        let merged = self.buffer.push_operator(op);
        let phrase = self.phrases.operator(op);
        if merged {
            Feedback::spoken(phrase)
        } else {
            Feedback::with_chime(phrase)
        }
    }

    fn clear(&mut self) -> Feedback {
        self.buffer.clear();
        Feedback::spoken(self.phrases.symbol(Symbol::Clear))
    }

    fn backspace(&mut self) -> Feedback {
        self.buffer.backspace();
        Feedback::spoken(self.phrases.symbol(Symbol::Backspace))
    }

    fn equals(&mut self) -> Feedback {
        let expr = strip_whitespace(self.buffer.as_str());
        if expr.is_empty() {
            return Feedback::spoken(self.phrases.equals());
        }

        match evaluate(&expr) {
            Ok(value) => {
                let text = format_general(value, RESULT_PRECISION);
                let phrase = self.phrases.equals_result(&text);
                self.buffer.replace(text);
                Feedback::spoken(phrase)
            }
            Err(e) => {
                debug!(expr = %expr, error = %e, "evaluation failed");
                self.buffer.replace(ERROR_MARKER);
                Feedback::spoken(self.phrases.equals_error())
            }
        }
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Keypad::new(Language::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
