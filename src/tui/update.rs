//! State transitions: (App, Action) → Transition.
//!
//! Mutates only in-memory state; fully testable without a terminal.
//! Anything audible is returned as `Transition::Announce` for the effects
//! layer to deliver.

use super::state::{Action, App, Button, Focus, Transition, GRID_COLS, GRID_ROWS};

/// Apply one action.
pub fn update(app: &mut App, action: &Action) -> Transition {
    match action {
        Action::Press(symbol) => {
            if let Some(focus) = Focus::of(*symbol) {
                app.focus = focus;
            }
            app.pressed = Some(Button::Key(*symbol));
            Transition::Announce(app.keypad.press(*symbol))
        }
        Action::Activate => {
            let symbol = app.focus.symbol();
            app.pressed = Some(Button::Key(symbol));
            Transition::Announce(app.keypad.press(symbol))
        }
        Action::ToggleTheme => {
            app.pressed = Some(Button::ThemeToggle);
            Transition::Announce(app.keypad.toggle_theme())
        }
        Action::MoveUp => move_focus(app, |f| Focus {
            row: f.row.saturating_sub(1),
            ..f
        }),
        Action::MoveDown => move_focus(app, |f| Focus {
            row: (f.row + 1).min(GRID_ROWS - 1),
            ..f
        }),
        Action::MoveLeft => move_focus(app, |f| Focus {
            col: f.col.saturating_sub(1),
            ..f
        }),
        Action::MoveRight => move_focus(app, |f| Focus {
            col: (f.col + 1).min(GRID_COLS - 1),
            ..f
        }),
        Action::Quit => {
            app.should_quit = true;
            Transition::Quit
        }
    }
}

/// Idle tick: drop the pressed highlight.
pub fn release(app: &mut App) -> bool {
    app.pressed.take().is_some()
}

fn move_focus(app: &mut App, step: impl Fn(Focus) -> Focus) -> Transition {
    app.focus = step(app.focus);
    app.pressed = None;
    Transition::Redraw
}

// ============================================================================
// TESTS
// ============================================================================
