//! Arithmetic expression evaluation.
//!
//! A small recursive-descent evaluator standing in for a general scripting
//! engine. Four binary operators, unary sign, parentheses, standard
//! precedence (`* /` bind tighter than `+ -`, left associative).
//!
//! Pure functions, no I/O.

use thiserror::Error;

use crate::types::Operator;

/// Significant digits shown for a result.
pub const RESULT_PRECISION: usize = 12;

/// Deepest nesting of parentheses and unary signs the parser accepts.
pub const MAX_NESTING: usize = 256;

/// Why an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("malformed number '{text}' at position {pos}")]
    MalformedNumber { text: String, pos: usize },

    #[error("unexpected {found} at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unclosed parenthesis opened at position {pos}")]
    UnclosedParen { pos: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NotFinite,

    #[error("expression nested deeper than {max} levels at position {pos}")]
    TooDeep { max: usize, pos: usize },
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Remove every whitespace character, not just the edges.
pub fn strip_whitespace(expr: &str) -> String {
    expr.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Evaluate an arithmetic expression.
///
/// Whitespace is tolerated between tokens; callers that follow the keypad
/// contract strip it first with [`strip_whitespace`].
pub fn evaluate(expr: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;

    if let Some(token) = parser.peek() {
        return Err(EvalError::UnexpectedToken {
            found: token.kind.describe(),
            pos: token.pos,
        });
    }

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NotFinite)
    }
}

/// Format a number like C's `%.{precision}g`.
///
/// Fixed notation when the decimal exponent lies in `[-4, precision)`,
/// scientific otherwise. Trailing zeros are dropped in both forms.
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let precision = precision.max(1);

    // Round to the requested significant digits first; the exponent of the
    // rounded value decides the notation.
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// Strip trailing zeros after a decimal point, and the point itself.
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

// ============================================================================
// TOKENIZER
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Operator(Operator),
    LeftParen,
    RightParen,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Operator(op) => format!("operator '{}'", op.as_char()),
            TokenKind::LeftParen => "'('".to_string(),
            TokenKind::RightParen => "')'".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    /// Char offset into the source, for error messages.
    pos: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let kind = match c {
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = parse_number(&text).ok_or(EvalError::MalformedNumber {
                    text,
                    pos: start,
                })?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    pos: start,
                });
                continue;
            }
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            _ => match Operator::from_char(c) {
                Some(op) => TokenKind::Operator(op),
                None => return Err(EvalError::UnexpectedChar { ch: c, pos: i }),
            },
        };

        tokens.push(Token { kind, pos: i });
        i += 1;
    }

    Ok(tokens)
}

/// Digits with at most one dot and at least one digit: `12`, `.5`, `5.`.
fn parse_number(text: &str) -> Option<f64> {
    let dots = text.chars().filter(|&c| c == '.').count();
    let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
    if dots > 1 || digits == 0 {
        return None;
    }
    text.parse().ok()
}

// ============================================================================
// PARSER
// ============================================================================

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Open `(` and unary signs on the current descent.
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Enter one nesting level, failing past [`MAX_NESTING`].
    fn descend(&mut self, pos: usize) -> Result<(), EvalError> {
        if self.depth >= MAX_NESTING {
            return Err(EvalError::TooDeep {
                max: MAX_NESTING,
                pos,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// expr := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Operator(op @ (Operator::Add | Operator::Subtract))) => *op,
                _ => return Ok(value),
            };
            self.pos += 1;
            let rhs = self.term()?;
            value = match op {
                Operator::Add => value + rhs,
                _ => value - rhs,
            };
        }
    }

    /// term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Operator(op @ (Operator::Multiply | Operator::Divide))) => *op,
                _ => return Ok(value),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                Operator::Multiply => value * rhs,
                _ => {
                    if rhs == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value / rhs
                }
            };
        }
    }

    /// unary := ('+' | '-') unary | primary
    fn unary(&mut self) -> Result<f64, EvalError> {
        let (negate, pos) = match self.peek() {
            Some(Token {
                kind: TokenKind::Operator(op @ (Operator::Add | Operator::Subtract)),
                pos,
            }) => (*op == Operator::Subtract, *pos),
            _ => return self.primary(),
        };
        self.pos += 1;

        self.descend(pos)?;
        let value = self.unary()?;
        self.depth -= 1;

        Ok(if negate { -value } else { value })
    }

    /// primary := number | '(' expr ')'
    fn primary(&mut self) -> Result<f64, EvalError> {
        let token = self.next().cloned().ok_or(EvalError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Number(n) => Ok(n),
            TokenKind::LeftParen => {
                self.descend(token.pos)?;
                let value = self.expression()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token {
                        kind: TokenKind::RightParen,
                        ..
                    }) => Ok(value),
                    Some(other) => Err(EvalError::UnexpectedToken {
                        found: other.kind.describe(),
                        pos: other.pos,
                    }),
                    None => Err(EvalError::UnclosedParen { pos: token.pos }),
                }
            }
            other => Err(EvalError::UnexpectedToken {
                found: other.describe(),
                pos: token.pos,
            }),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_fmt(expr: &str) -> String {
        format_general(evaluate(expr).unwrap(), RESULT_PRECISION)
    }

    // --- Evaluation ---

    #[test]
    fn precedence_multiplication_first() {
        assert_eq!(eval_fmt("3+4*2"), "11");
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(eval_fmt("(1+2)*3"), "9");
    }

    #[test]
    fn subtraction_and_division_are_left_associative() {
        assert_eq!(eval_fmt("10-4-3"), "3");
        assert_eq!(eval_fmt("100/10/5"), "2");
    }

    #[test]
    fn unary_minus() {
        assert_eq!(eval_fmt("-3+5"), "2");
        assert_eq!(eval_fmt("(-3)*2"), "-6");
        assert_eq!(eval_fmt("2*-3"), "-6");
        assert_eq!(eval_fmt("--4"), "4");
    }

    #[test]
    fn unary_plus() {
        assert_eq!(eval_fmt("+7"), "7");
    }

    #[test]
    fn decimal_forms() {
        assert_eq!(eval_fmt(".5+.5"), "1");
        assert_eq!(eval_fmt("5.*2"), "10");
        assert_eq!(eval_fmt("0.1+0.2"), "0.3");
    }

    #[test]
    fn leading_zeros_are_decimal() {
        assert_eq!(eval_fmt("012"), "12");
    }

    #[test]
    fn whitespace_is_tolerated() {
        assert_eq!(eval_fmt(" 3 + 4 * 2 "), "11");
    }

    #[test]
    fn strip_whitespace_removes_interior_spaces() {
        assert_eq!(strip_whitespace(" 3 + 4\t*\n2 "), "3+4*2");
        assert_eq!(strip_whitespace("   "), "");
    }

    // --- Errors ---

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(evaluate("5/0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("0/0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("1/(2-2)"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn dangling_operator_is_an_error() {
        assert_eq!(evaluate("3+"), Err(EvalError::UnexpectedEnd));
    }

    #[test]
    fn unclosed_paren_is_an_error() {
        assert_eq!(evaluate("(1+2"), Err(EvalError::UnclosedParen { pos: 0 }));
    }

    #[test]
    fn stray_close_paren_is_an_error() {
        assert!(matches!(
            evaluate("1+2)"),
            Err(EvalError::UnexpectedToken { pos: 3, .. })
        ));
    }

    #[test]
    fn empty_parens_are_an_error() {
        assert!(matches!(evaluate("()"), Err(EvalError::UnexpectedToken { .. })));
    }

    #[test]
    fn implicit_multiplication_is_an_error() {
        assert!(evaluate("2(3)").is_err());
    }

    #[test]
    fn multiple_dots_are_an_error() {
        assert_eq!(
            evaluate("1.2.3"),
            Err(EvalError::MalformedNumber {
                text: "1.2.3".to_string(),
                pos: 0
            })
        );
        assert!(evaluate(".").is_err());
    }

    #[test]
    fn letters_are_an_error() {
        assert_eq!(
            evaluate("Error7"),
            Err(EvalError::UnexpectedChar { ch: 'E', pos: 0 })
        );
    }

    #[test]
    fn exponent_operator_is_not_accepted() {
        assert!(evaluate("2**3").is_err());
        assert!(evaluate("2^3").is_err());
    }

    #[test]
    fn overflow_is_not_finite() {
        let huge = format!("1{}", "0".repeat(308));
        assert_eq!(evaluate(&format!("{}*10", huge)), Err(EvalError::NotFinite));
    }

    #[test]
    fn empty_input_is_unexpected_end() {
        assert_eq!(evaluate(""), Err(EvalError::UnexpectedEnd));
    }

    // --- Formatting ---

    #[test]
    fn format_integers_without_fraction() {
        assert_eq!(format_general(11.0, 12), "11");
        assert_eq!(format_general(-6.0, 12), "-6");
        assert_eq!(format_general(-0.0, 12), "0");
    }

    #[test]
    fn format_rounds_to_twelve_significant_digits() {
        assert_eq!(format_general(1.0 / 3.0, 12), "0.333333333333");
        assert_eq!(format_general(2.0 / 3.0, 12), "0.666666666667");
        assert_eq!(format_general(123456.7890123456, 12), "123456.789012");
    }

    #[test]
    fn format_switches_to_scientific_for_large_values() {
        assert_eq!(format_general(123456789012.0, 12), "123456789012");
        assert_eq!(format_general(1234567890123.0, 12), "1.23456789012e+12");
        assert_eq!(format_general(1e15, 12), "1e+15");
    }

    #[test]
    fn format_switches_to_scientific_for_small_values() {
        assert_eq!(format_general(0.0001, 12), "0.0001");
        assert_eq!(format_general(0.00001, 12), "1e-05");
        assert_eq!(format_general(-0.000012345, 12), "-1.2345e-05");
    }

    #[test]
    fn format_rounding_can_bump_exponent() {
        assert_eq!(format_general(999999999999.5, 12), "1e+12");
    }

    #[test]
    fn format_special_values() {
        assert_eq!(format_general(f64::NAN, 12), "nan");
        assert_eq!(format_general(f64::INFINITY, 12), "inf");
        assert_eq!(format_general(f64::NEG_INFINITY, 12), "-inf");
    }

    #[test]
    fn deep_parentheses_are_rejected_without_overflow() {
        let n = 100_000;
        let expr = format!("{}1{}", "(".repeat(n), ")".repeat(n));
        assert_eq!(
            evaluate(&expr),
            Err(EvalError::TooDeep {
                max: MAX_NESTING,
                pos: MAX_NESTING
            })
        );
    }

    #[test]
    fn long_unary_runs_are_rejected_without_overflow() {
        let expr = format!("{}1", "-".repeat(100_000));
        assert!(matches!(evaluate(&expr), Err(EvalError::TooDeep { .. })));
    }

    #[test]
    fn nesting_up_to_the_limit_still_evaluates() {
        let expr = format!("{}7{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(evaluate(&expr), Ok(7.0));

        let mixed = format!("{}2", "-(".repeat(MAX_NESTING / 2)) + &")".repeat(MAX_NESTING / 2);
        assert_eq!(evaluate(&mixed), Ok(2.0));
    }

    #[test]
    fn sibling_groups_do_not_accumulate_depth() {
        let expr = vec!["(1)"; MAX_NESTING * 4].join("+");
        assert_eq!(eval_fmt(&expr), (MAX_NESTING * 4).to_string());
    }

    #[test]
    fn error_messages_are_readable() {
        assert_eq!(EvalError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            EvalError::UnexpectedChar { ch: 'x', pos: 2 }.to_string(),
            "unexpected character 'x' at position 2"
        );
    }
}
