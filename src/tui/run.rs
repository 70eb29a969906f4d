//! TUI effects boundary: event loop, terminal lifecycle, input mapping.
//!
//! This is the only TUI module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui,
//! and hands every announced feedback to the notifier.
//!
//! A key reader thread feeds a single mpsc channel. The loop waits on it
//! with a short timeout; a timeout is the idle tick that releases the
//! pressed-button highlight.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::{debug, info, warn};

use crate::keypad::Keypad;
use crate::speech::Notifier;
use crate::types::{AppConfig, Operator, Symbol};

use super::state::{Action, App, AppEvent, Button, Transition};
use super::update::{release, update};
use super::view::{hit_test, render};

/// How long a pressed button stays highlighted without further input.
const PRESS_HIGHLIGHT: Duration = Duration::from_millis(150);

// ============================================================================
// INPUT MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char(c @ '0'..='9') => Some(Action::Press(Symbol::Digit(c as u8 - b'0'))),
        KeyCode::Char('.') | KeyCode::Char(',') => Some(Action::Press(Symbol::Dot)),
        KeyCode::Char('(') => Some(Action::Press(Symbol::LeftParen)),
        KeyCode::Char(')') => Some(Action::Press(Symbol::RightParen)),
        KeyCode::Char('x') => Some(Action::Press(Symbol::Operator(Operator::Multiply))),
        KeyCode::Char(c) if Operator::from_char(c).is_some() => {
            Operator::from_char(c).map(|op| Action::Press(Symbol::Operator(op)))
        }
        KeyCode::Char('=') | KeyCode::Enter => Some(Action::Press(Symbol::Equals)),
        KeyCode::Backspace => Some(Action::Press(Symbol::Backspace)),
        KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Delete => {
            Some(Action::Press(Symbol::Clear))
        }

        KeyCode::Char('t') | KeyCode::Char('T') => Some(Action::ToggleTheme),

        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Char(' ') => Some(Action::Activate),

        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),

        _ => None,
    }
}

/// Map a left click to the action of the button under it.
pub fn map_mouse(mouse: MouseEvent, area: Rect) -> Option<Action> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }
    match hit_test(area, mouse.column, mouse.row)? {
        Button::Key(symbol) => Some(Action::Press(symbol)),
        Button::ThemeToggle => Some(Action::ToggleTheme),
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
///
/// Once raw mode is on, any later failure restores the terminal before
/// returning the error.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let terminal = enter_screen();
    if terminal.is_err() {
        let _ = restore_terminal();
    }
    terminal
}

fn enter_screen() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(io::stdout());
    Terminal::new(backend)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards them to the channel.
fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            let app_event = match event::read() {
                // Windows reports both press and release
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(Event::Mouse(mouse)) => AppEvent::Mouse(mouse),
                Ok(Event::Resize(..)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(app_event).is_err() {
                break; // receiver dropped, TUI is shutting down
            }
        }
    });
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the interactive keypad until the user quits.
pub fn run(config: &AppConfig, notifier: Box<dyn Notifier>) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let keypad = Keypad::new(config.speech.language).with_theme(config.theme);
    let mut app = App::new(keypad);

    info!(theme = %app.theme(), "keypad started");

    let (tx, rx) = mpsc::channel::<AppEvent>();
    spawn_input_reader(tx);

    let result = event_loop(&mut terminal, &mut app, &rx, notifier.as_ref());
    let restored = restore_terminal();
    settle(result, restored)
}

/// The event loop's error wins over a restore error.
fn settle(result: io::Result<()>, restored: io::Result<()>) -> io::Result<()> {
    if let Err(e) = &restored {
        warn!(error = %e, "terminal restore failed");
    }
    result.and(restored)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mpsc::Receiver<AppEvent>,
    notifier: &dyn Notifier,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        let event = match rx.recv_timeout(PRESS_HIGHLIGHT) {
            Ok(e) => e,
            Err(RecvTimeoutError::Timeout) => {
                release(app);
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        };

        let action = match event {
            AppEvent::Key(key) => map_key(key),
            AppEvent::Mouse(mouse) => {
                let size = terminal.size()?;
                map_mouse(mouse, Rect::new(0, 0, size.width, size.height))
            }
            AppEvent::Resize => None,
        };

        if let Some(action) = action {
            match update(app, &action) {
                Transition::Announce(feedback) => {
                    debug!(phrase = %feedback.phrase, chime = feedback.chime, "announce");
                    notifier.announce(&feedback);
                }
                Transition::Redraw | Transition::Quit => {}
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
