//! Operator rewriting for Python output
//!
//! Expressions are kept as source text, so translation is a fixed sequence
//! of replacements. Every replacement skips string literals and is
//! idempotent: running a rewrite over its own output changes nothing.

use crate::lexer::{literal_mask, replace_all, replace_calls, Keyword, Match};

/// Line-level rewrites applied to every instruction: `<>`, calls to
/// `racine` (with or without a space before `(`), and the space-delimited
/// ` puissance `, ` mod ` and ` div ` operators.
///
/// Returns the rewritten text and whether it now calls into `math`.
pub fn rewrite_line(text: &str) -> (String, bool) {
    let (text, _) = replace_all(text, "<>", "!=", Match::Text);
    let (text, sqrt) = replace_calls(&text, Keyword::Racine.as_str(), "math.sqrt");
    let (text, pow) = replace_all(&text, " puissance ", " ** ", Match::Text);
    let (text, _) = replace_all(&text, " mod ", " % ", Match::Text);
    let (text, _) = replace_all(&text, " div ", " // ", Match::Text);

    (text, sqrt + pow > 0)
}

/// Whole-word logical operators, `mod`/`div` and boolean literals
pub fn translate_operators(text: &str) -> String {
    let mut text = text.to_string();

    for keyword in [
        Keyword::Non,
        Keyword::Et,
        Keyword::Ou,
        Keyword::Mod,
        Keyword::Vrai,
        Keyword::Faux,
        Keyword::Div,
    ] {
        if let Some(python) = keyword.python() {
            text = replace_all(&text, keyword.as_str(), python, Match::Word).0;
        }
    }

    replace_all(&text, "<>", "!=", Match::Text).0
}

/// Full translation of an expression
pub fn translate_expression(text: &str) -> (String, bool) {
    let (text, uses_math) = rewrite_line(text);
    (translate_operators(&text), uses_math)
}

/// Translation of a `si`/`tantque` condition, where a lone `=` compares
pub fn translate_condition(text: &str) -> (String, bool) {
    let (text, uses_math) = translate_expression(text);
    (equality(&text), uses_math)
}

fn equality(text: &str) -> String {
    let mask = literal_mask(text);
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 2);

    for (i, c) in text.char_indices() {
        out.push(c);
        if c != '=' || !mask[i] {
            continue;
        }
        let prev = i.checked_sub(1).map(|j| bytes[j]);
        let next = bytes.get(i + 1).copied();
        if !matches!(prev, Some(b'=' | b'<' | b'>' | b'!')) && next != Some(b'=') {
            out.push('=');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(text: &str) -> String {
        translate_condition(text).0
    }

    #[test]
    fn test_line_rewrites() {
        assert_eq!(rewrite_line("x <> y"), ("x != y".to_string(), false));
        assert_eq!(rewrite_line("a DIV 2"), ("a // 2".to_string(), false));
        assert_eq!(rewrite_line("a mod 2"), ("a % 2".to_string(), false));
        assert_eq!(rewrite_line("x puissance 3"), ("x ** 3".to_string(), true));
        assert_eq!(rewrite_line("Racine(x) + 1"), ("math.sqrt(x) + 1".to_string(), true));
        assert_eq!(rewrite_line("x = racine (y)"), ("x = math.sqrt(y)".to_string(), true));
        assert_eq!(rewrite_line("racines(y)"), ("racines(y)".to_string(), false));
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(condition("a et b ou non c"), "a and b or not c");
        assert_eq!(condition("A ET B OU NON(C)"), "A and B or not(C)");
        assert_eq!(condition("non (x > 0)"), "not (x > 0)");
        assert_eq!(condition("fini et trouve"), "fini and trouve");
        assert_eq!(condition("note mod 2 = 0"), "note % 2 == 0");
    }

    #[test]
    fn test_boolean_literals() {
        let cases = [
            ("vrai", "True"),
            ("Vrai", "True"),
            ("VRAI", "True"),
            ("faux", "False"),
            ("Faux", "False"),
            ("FAUX", "False"),
            ("vrai et x", "True and x"),
            ("FAUX ou x", "False or x"),
            ("x = Vrai", "x == True"),
            ("x <> faux", "x != False"),
            ("(trouve = VRAI)", "(trouve == True)"),
        ];
        for (input, expected) in cases {
            assert_eq!(condition(input), expected, "{}", input);
        }
    }

    #[test]
    fn test_equality() {
        assert_eq!(condition("x = 1"), "x == 1");
        assert_eq!(condition("x == 1"), "x == 1");
        assert_eq!(condition("x <= 1 et y >= 2"), "x <= 1 and y >= 2");
        assert_eq!(condition("x <> 1"), "x != 1");
    }

    #[test]
    fn test_literals_untouched() {
        assert_eq!(condition("s = \"vrai et faux = 1\""), "s == \"vrai et faux = 1\"");
        assert_eq!(translate_expression("'a mod b'").0, "'a mod b'");
    }

    #[test]
    fn test_div_does_not_hide_rest_of_line() {
        assert_eq!(condition("a div 2 = 1 et b"), "a // 2 == 1 and b");
        assert_eq!(translate_expression("n div 2 + racine(n)").0, "n // 2 + math.sqrt(n)");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "a et b ou non c",
            "x mod 2 = 0 et vrai",
            "n div 2 <> racine(n)",
            "racine  (x) puissance 2",
            "x puissance 2 = FAUX",
            "s = \"non\"",
        ];
        for input in inputs {
            let once = condition(input);
            assert_eq!(condition(&once), once, "{}", input);
            let (line, _) = rewrite_line(input);
            assert_eq!(rewrite_line(&line).0, line, "{}", input);
        }
    }
}
