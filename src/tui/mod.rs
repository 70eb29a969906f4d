//! TUI module: the keypad's display surface.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: pure data types (App, Action, Transition, button grid)
//! - `update`: transitions, no I/O
//! - `view`: pure rendering and hit-testing
//! - `theme`: light/dark style presets
//! - `run`: effects (terminal, input thread, notifier)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;

pub use run::run;
