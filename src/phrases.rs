//! Spoken phrases for every keypad action.
//!
//! Pure lookup tables keyed by [`Language`].

use crate::types::{Language, Operator, Symbol};

/// Phrase table for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phrasebook {
    language: Language,
}

impl Phrasebook {
    pub fn new(language: Language) -> Self {
        Phrasebook { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Phrase for a button press. Equals is handled separately because its
    /// phrase depends on the evaluation outcome.
    pub fn symbol(&self, symbol: Symbol) -> String {
        match symbol {
            Symbol::Digit(d) => d.to_string(),
            Symbol::Dot => self.pick("point", "點"),
            Symbol::Operator(op) => self.operator(op),
            Symbol::LeftParen => self.pick("left parenthesis", "左括號"),
            Symbol::RightParen => self.pick("right parenthesis", "右括號"),
            Symbol::Clear => self.pick("clear", "清除"),
            Symbol::Backspace => self.pick("backspace", "退格"),
            Symbol::Equals => self.equals(),
        }
    }

    pub fn operator(&self, op: Operator) -> String {
        match op {
            Operator::Add => self.pick("plus", "加"),
            Operator::Subtract => self.pick("minus", "減"),
            Operator::Multiply => self.pick("times", "乘"),
            Operator::Divide => self.pick("divided by", "除"),
        }
    }

    pub fn equals(&self) -> String {
        self.pick("equals", "等於")
    }

    pub fn error(&self) -> String {
        self.pick("error", "錯誤")
    }

    /// "equals" immediately followed by the result, as one utterance.
    pub fn equals_result(&self, result: &str) -> String {
        format!("{} {}", self.equals(), result)
    }

    pub fn equals_error(&self) -> String {
        format!("{} {}", self.equals(), self.error())
    }

    pub fn toggle_theme(&self) -> String {
        self.pick("switch theme", "切換主題")
    }

    fn pick(&self, en: &str, zh_tw: &str) -> String {
        match self.language {
            Language::En => en.to_string(),
            Language::ZhTw => zh_tw.to_string(),
        }
    }
}

impl Default for Phrasebook {
    fn default() -> Self {
        Phrasebook::new(Language::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn all_symbols() -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = (0..=9).map(Symbol::Digit).collect();
        symbols.extend(Operator::ALL.map(Symbol::Operator));
        symbols.extend([
            Symbol::Dot,
            Symbol::LeftParen,
            Symbol::RightParen,
            Symbol::Clear,
            Symbol::Backspace,
            Symbol::Equals,
        ]);
        symbols
    }

    #[test]
    fn digits_speak_themselves() {
        let book = Phrasebook::new(Language::ZhTw);
        assert_eq!(book.symbol(Symbol::Digit(3)), "3");
    }

    #[test]
    fn english_operator_names() {
        let book = Phrasebook::new(Language::En);
        assert_eq!(book.operator(Operator::Add), "plus");
        assert_eq!(book.operator(Operator::Divide), "divided by");
    }

    #[test]
    fn chinese_operator_names() {
        let book = Phrasebook::new(Language::ZhTw);
        assert_eq!(book.operator(Operator::Subtract), "減");
        assert_eq!(book.operator(Operator::Multiply), "乘");
    }

    #[test]
    fn every_phrase_is_non_empty() {
        for language in [Language::En, Language::ZhTw] {
            let book = Phrasebook::new(language);
            for symbol in all_symbols() {
                assert!(!book.symbol(symbol).is_empty(), "{:?}", symbol);
            }
            assert!(!book.toggle_theme().is_empty());
            assert!(!book.equals_error().is_empty());
        }
    }

    #[test]
    fn equals_phrases_combine_into_one_utterance() {
        let book = Phrasebook::new(Language::En);
        assert_eq!(book.equals_result("11"), "equals 11");
        assert_eq!(book.equals_error(), "equals error");
    }
}
