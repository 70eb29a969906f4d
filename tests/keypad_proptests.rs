//! Property-based tests for the keypad, buffer and evaluator.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use keypad_calc::buffer::{ExpressionBuffer, ERROR_MARKER};
use keypad_calc::eval::{evaluate, format_general, RESULT_PRECISION};
use keypad_calc::keypad::Keypad;
use keypad_calc::speech::Notifier;
use keypad_calc::types::{Language, Operator, Symbol};

// ===== Strategy definitions =====

fn digit_strategy() -> impl Strategy<Value = u8> {
    0u8..=9u8
}

fn operator_strategy() -> impl Strategy<Value = Operator> {
    prop::sample::select(Operator::ALL.to_vec())
}

/// Any button on the keypad.
fn symbol_strategy() -> impl Strategy<Value = Symbol> {
    prop_oneof![
        4 => digit_strategy().prop_map(Symbol::Digit),
        1 => Just(Symbol::Dot),
        3 => operator_strategy().prop_map(Symbol::Operator),
        1 => Just(Symbol::LeftParen),
        1 => Just(Symbol::RightParen),
        1 => Just(Symbol::Clear),
        1 => Just(Symbol::Backspace),
        1 => Just(Symbol::Equals),
    ]
}

/// Digits and operators only, the input a plain calculation is built from.
fn arithmetic_symbol_strategy() -> impl Strategy<Value = Symbol> {
    prop_oneof![
        3 => digit_strategy().prop_map(Symbol::Digit),
        1 => operator_strategy().prop_map(Symbol::Operator),
    ]
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Press(Symbol),
    ToggleTheme,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        8 => symbol_strategy().prop_map(Step::Press),
        1 => Just(Step::ToggleTheme),
    ]
}

fn language_strategy() -> impl Strategy<Value = Language> {
    prop_oneof![Just(Language::En), Just(Language::ZhTw)]
}

/// A number as typed on the keypad, e.g. "012" or "3.25".
fn number_text_strategy() -> impl Strategy<Value = String> {
    ("[0-9]{1,15}", proptest::option::of("[0-9]{1,8}")).prop_map(|(int, frac)| match frac {
        Some(frac) => format!("{}.{}", int, frac),
        None => int,
    })
}

// ===== Helpers =====

fn keypad_after(symbols: &[Symbol]) -> Keypad {
    let mut keypad = Keypad::new(Language::En);
    for &symbol in symbols {
        keypad.press(symbol);
    }
    keypad
}

/// Digits of the mantissa, ignoring sign, point and leading zeros.
fn significant_digits(text: &str) -> usize {
    let mantissa = text.split('e').next().unwrap_or(text);
    mantissa
        .chars()
        .filter(|c| c.is_ascii_digit())
        .skip_while(|&c| c == '0')
        .count()
}

fn ends_with_operator_token(text: &str) -> bool {
    let mut buffer = ExpressionBuffer::new();
    buffer.append(text);
    buffer.trailing_operator().is_some()
}

#[derive(Default, Clone)]
struct Counter {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl Notifier for Counter {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }

    fn chime(&self) {}
}

// ===== Result precision =====

proptest! {
    /// Any digit/operator sequence shows at most twelve significant digits
    #[test]
    fn prop_results_have_at_most_twelve_digits(
        symbols in prop::collection::vec(arithmetic_symbol_strategy(), 1..40)
    ) {
        let mut keypad = keypad_after(&symbols);
        keypad.press(Symbol::Equals);

        let display = keypad.display();
        if display != ERROR_MARKER {
            prop_assert!(
                significant_digits(display) <= RESULT_PRECISION,
                "{:?} -> {}", symbols, display
            );
        }
    }

    /// Evaluated digit/operator strings never format past the precision
    #[test]
    fn prop_evaluated_strings_format_within_precision(
        first in number_text_strategy(),
        rest in prop::collection::vec((operator_strategy(), number_text_strategy()), 0..8)
    ) {
        let mut expr = first;
        for (op, number) in &rest {
            expr.push(op.as_char());
            expr.push_str(number);
        }

        if let Ok(value) = evaluate(&expr) {
            let text = format_general(value, RESULT_PRECISION);
            prop_assert!(significant_digits(&text) <= RESULT_PRECISION, "{} -> {}", expr, text);
        }
    }

    /// format_general honours the precision for any finite value
    #[test]
    fn prop_format_general_respects_precision(value in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let text = format_general(value, RESULT_PRECISION);
        prop_assert!(significant_digits(&text) <= RESULT_PRECISION, "{} -> {}", value, text);
    }
}

// ===== Operator merge and backspace =====

proptest! {
    /// Two operators in a row leave only the second, after any prefix
    #[test]
    fn prop_operator_merge_after_any_prefix(
        prefix in prop::collection::vec(symbol_strategy(), 0..30),
        first in operator_strategy(),
        second in operator_strategy(),
    ) {
        let mut direct = keypad_after(&prefix);
        direct.press(Symbol::Operator(second));

        let mut merged = keypad_after(&prefix);
        merged.press(Symbol::Operator(first));
        merged.press(Symbol::Operator(second));

        prop_assert_eq!(merged.display(), direct.display());
    }

    /// The buffer never ends with two operator tokens
    #[test]
    fn prop_no_double_operator_tail(symbols in prop::collection::vec(symbol_strategy(), 0..40)) {
        let keypad = keypad_after(&symbols);
        let display = keypad.display();
        if ends_with_operator_token(display) {
            let before = &display[..display.len() - 3];
            prop_assert!(!ends_with_operator_token(before), "{:?} -> {:?}", symbols, display);
        }
    }

    /// Backspace after an operator removes the whole token
    #[test]
    fn prop_backspace_removes_operator_token(
        prefix in prop::collection::vec(symbol_strategy(), 0..30),
        op in operator_strategy(),
    ) {
        let before = keypad_after(&prefix).display().to_string();
        let expected = if ends_with_operator_token(&before) {
            before[..before.len() - 3].to_string()
        } else {
            before
        };

        let mut keypad = keypad_after(&prefix);
        keypad.press(Symbol::Operator(op));
        keypad.press(Symbol::Backspace);

        prop_assert_eq!(keypad.display(), expected.as_str());
    }

    /// Backspace after a digit removes exactly that digit
    #[test]
    fn prop_backspace_undoes_digit(
        prefix in prop::collection::vec(symbol_strategy(), 0..30),
        digit in digit_strategy(),
    ) {
        let before = keypad_after(&prefix).display().to_string();

        let mut keypad = keypad_after(&prefix);
        keypad.press(Symbol::Digit(digit));
        keypad.press(Symbol::Backspace);

        prop_assert_eq!(keypad.display(), before.as_str());
    }
}

// ===== Feedback =====

proptest! {
    /// Every action produces exactly one non-empty spoken phrase
    #[test]
    fn prop_one_phrase_per_action(
        language in language_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..50),
    ) {
        let counter = Counter::default();
        let mut keypad = Keypad::new(language);

        for step in &steps {
            let feedback = match *step {
                Step::Press(symbol) => keypad.press(symbol),
                Step::ToggleTheme => keypad.toggle_theme(),
            };
            prop_assert!(!feedback.phrase.is_empty(), "{:?}", step);
            counter.announce(&feedback);
        }

        prop_assert_eq!(counter.spoken.lock().unwrap().len(), steps.len());
    }

    /// Clear always empties the display whatever came before
    #[test]
    fn prop_clear_empties(symbols in prop::collection::vec(symbol_strategy(), 0..40)) {
        let mut keypad = keypad_after(&symbols);
        keypad.press(Symbol::Clear);
        prop_assert_eq!(keypad.display(), "");
    }
}
