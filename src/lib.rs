//! keypad-calc: a terminal keypad calculator with spoken feedback.

pub mod buffer;
pub mod eval;
pub mod keypad;
pub mod logging;
pub mod phrases;
pub mod report;
pub mod speech;
pub mod tui;
pub mod types;
