//! Pure rendering: map App state to ratatui widget trees.
//!
//! The same `layout()` drives both drawing and mouse hit-testing, so a
//! click always lands on the button that is painted there.

use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::types::Symbol;

use super::state::{App, Button, GRID, GRID_COLS, GRID_ROWS};
use super::theme::{self, ThemePreset};

/// Width of the theme toggle button in the top bar.
const TOGGLE_WIDTH: u16 = 16;

/// Display field height including its border.
const DISPLAY_HEIGHT: u16 = 3;

const TITLE: &str = " Keypad";

const HELP: &str =
    " [0-9 . + - * / ( )] type  [Enter] =  [Bksp] ⌫  [c] clear  [t] theme  [arrows/Space] focus  [q] quit";

// ============================================================================
// LAYOUT
// ============================================================================

/// Screen regions for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceLayout {
    pub title: Rect,
    pub toggle: Rect,
    pub display: Rect,
    /// One rect per keypad button, in [`GRID`] order.
    pub keys: Vec<(Rect, Symbol)>,
    pub help: Rect,
}

/// Split the frame into top bar, display, button grid and help line.
pub fn layout(area: Rect) -> SurfaceLayout {
    let chunks = Layout::vertical([
        Constraint::Length(1),              // top bar
        Constraint::Length(DISPLAY_HEIGHT), // display
        Constraint::Min(0),                 // keypad
        Constraint::Length(1),              // help
    ])
    .split(area);

    let top = Layout::horizontal([Constraint::Min(0), Constraint::Length(TOGGLE_WIDTH)])
        .split(chunks[0]);

    let rows = Layout::vertical([Constraint::Ratio(1, GRID_ROWS as u32); GRID_ROWS])
        .split(chunks[2]);

    let mut keys = Vec::with_capacity(GRID_ROWS * GRID_COLS);
    for (row_area, row_symbols) in rows.iter().zip(GRID.iter()) {
        let cells = Layout::horizontal([Constraint::Ratio(1, GRID_COLS as u32); GRID_COLS])
            .split(*row_area);
        for (cell, symbol) in cells.iter().zip(row_symbols.iter()) {
            keys.push((*cell, *symbol));
        }
    }

    SurfaceLayout {
        title: top[0],
        toggle: top[1],
        display: chunks[1],
        keys,
        help: chunks[3],
    }
}

/// Which button, if any, sits at a terminal cell.
pub fn hit_test(area: Rect, column: u16, row: u16) -> Option<Button> {
    let regions = layout(area);
    let position = Position::new(column, row);

    if regions.toggle.contains(position) {
        return Some(Button::ThemeToggle);
    }
    regions
        .keys
        .iter()
        .find(|(rect, _)| rect.contains(position))
        .map(|(_, symbol)| Button::Key(*symbol))
}

// ============================================================================
// RENDER
// ============================================================================

/// Render the whole surface to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let preset = theme::preset(app.theme());
    let regions = layout(area);

    frame.render_widget(Block::default().style(preset.window), area);

    frame.render_widget(Paragraph::new(Span::styled(TITLE, preset.title)), regions.title);
    frame.render_widget(render_toggle(app, preset), regions.toggle);
    frame.render_widget(render_display(app.keypad.display(), preset), regions.display);

    let focused = app.focus.symbol();
    for (rect, symbol) in &regions.keys {
        let style = if app.pressed == Some(Button::Key(*symbol)) {
            preset.pressed
        } else if *symbol == focused {
            preset.hover
        } else {
            preset.button
        };
        frame.render_widget(render_key(*symbol, style, preset), *rect);
    }

    frame.render_widget(Paragraph::new(Span::styled(HELP, preset.help)), regions.help);
}

fn render_toggle(app: &App, preset: &ThemePreset) -> Paragraph<'static> {
    let style = if app.pressed == Some(Button::ThemeToggle) {
        preset.pressed
    } else {
        preset.button
    };
    Paragraph::new(Line::from(format!("[t] {} theme", app.theme())))
        .alignment(Alignment::Center)
        .style(style)
}

/// Right-aligned expression field.
fn render_display<'a>(text: &'a str, preset: &ThemePreset) -> Paragraph<'a> {
    Paragraph::new(Line::from(text))
        .alignment(Alignment::Right)
        .style(preset.display)
        .block(
            Block::bordered()
                .border_style(preset.display_border)
                .style(preset.display),
        )
}

fn render_key(symbol: Symbol, style: Style, preset: &ThemePreset) -> Paragraph<'static> {
    Paragraph::new(Line::from(symbol.label()))
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::bordered().border_style(preset.button_border).style(style))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypad::Keypad;
    use crate::tui::state::Focus;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn area() -> Rect {
        Rect::new(0, 0, 40, 24)
    }

    fn draw(app: &App) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(40, 24)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn layout_has_one_rect_per_button() {
        let regions = layout(area());
        assert_eq!(regions.keys.len(), GRID_ROWS * GRID_COLS);
        assert_eq!(regions.display.height, DISPLAY_HEIGHT);
        assert_eq!(regions.toggle.width, TOGGLE_WIDTH);
    }

    #[test]
    fn hit_test_finds_buttons_at_their_centers() {
        let regions = layout(area());
        for (rect, symbol) in &regions.keys {
            let x = rect.x + rect.width / 2;
            let y = rect.y + rect.height / 2;
            assert_eq!(hit_test(area(), x, y), Some(Button::Key(*symbol)));
        }
    }

    #[test]
    fn hit_test_finds_theme_toggle() {
        let regions = layout(area());
        assert_eq!(
            hit_test(area(), regions.toggle.x + 1, regions.toggle.y),
            Some(Button::ThemeToggle)
        );
    }

    #[test]
    fn hit_test_misses_display_and_help() {
        let regions = layout(area());
        assert_eq!(hit_test(area(), 5, regions.display.y + 1), None);
        assert_eq!(hit_test(area(), 5, regions.help.y), None);
    }

    #[test]
    fn renders_display_text_and_labels() {
        let mut keypad = Keypad::default();
        for label in ["1", "2", "+", "7"] {
            keypad.press_label(label);
        }
        let app = App::new(keypad);
        let text = screen_text(&draw(&app));

        assert!(text.contains("12 + 7"));
        assert!(text.contains("Keypad"));
        assert!(text.contains("⌫"));
        assert!(text.contains("Light theme"));
    }

    #[test]
    fn dark_theme_paints_dark_background() {
        let mut app = App::new(Keypad::default());
        app.keypad.toggle_theme();
        let terminal = draw(&app);

        let corner = &terminal.backend().buffer()[(0, 0)];
        assert_eq!(Some(corner.bg), theme::DARK.title.bg);
        assert!(screen_text(&terminal).contains("Dark theme"));
    }

    #[test]
    fn focused_button_uses_hover_style() {
        let mut app = App::new(Keypad::default());
        app.focus = Focus::of(Symbol::Digit(5)).unwrap();
        let terminal = draw(&app);

        let regions = layout(area());
        let (rect, _) = regions
            .keys
            .iter()
            .find(|(_, s)| *s == Symbol::Digit(5))
            .unwrap();
        let cell = &terminal.backend().buffer()[(rect.x + 1, rect.y + 1)];
        assert_eq!(Some(cell.bg), theme::LIGHT.hover.bg);
    }
}
