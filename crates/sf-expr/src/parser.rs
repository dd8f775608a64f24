//! Text to [`Expr`] through evalexpr's operator-tree builder.
//!
//! The accepted grammar is evalexpr's arithmetic subset with two local
//! adjustments applied before building: `**` is an alias for `^`, and bare
//! integer literals are read as reals so `1/2` is `0.5`. Only the functions
//! and constants registered in [`crate::expr`] are allowed, and every free
//! symbol must be a plain identifier.

use crate::error::ParseError;
use crate::expr::{Expr, evaluation_context, free_symbol_names, is_function};
use evalexpr::{ContextWithMutableVariables, Node, Value, build_operator_tree};

/// Parse a complete expression.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    let text = text.trim();
    operator_tree(text)?;
    Ok(Expr::from_source(text))
}

/// Parse the longest leading substring of `text` that forms an expression.
///
/// Returns the expression and the byte length consumed.
pub fn parse_prefix(text: &str) -> Option<(Expr, usize)> {
    let mut ends: Vec<usize> = text.char_indices().map(|(i, _)| i).skip(1).collect();
    ends.push(text.len());
    ends.into_iter()
        .rev()
        .find_map(|end| parse(&text[..end]).ok().map(|e| (e, end)))
}

/// Build and validate the operator tree for `text`.
pub(crate) fn operator_tree(text: &str) -> Result<Node, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let syntax = |message: String| ParseError::Syntax {
        text: text.to_string(),
        message,
    };

    let tree = build_operator_tree(&real_literals(text)).map_err(|err| syntax(err.to_string()))?;

    if let Some(name) = tree.iter_function_identifiers().find(|name| !is_function(name)) {
        return Err(ParseError::UnknownFunction {
            name: name.to_string(),
        });
    }
    let symbols = free_symbol_names(&tree);
    if let Some(name) = symbols.iter().find(|name| !is_identifier(name)) {
        return Err(ParseError::InvalidIdentifier {
            name: name.to_string(),
        });
    }

    // The builder accepts some shapes (dangling operators, assignments)
    // that only fail once evaluated. A dry run with every symbol bound
    // surfaces those here instead of at sampling time.
    let mut context = evaluation_context().map_err(|err| syntax(err.to_string()))?;
    for name in &symbols {
        context
            .set_value(name.to_string(), Value::Float(1.0))
            .map_err(|err| syntax(err.to_string()))?;
    }
    tree.eval_with_context(&context)
        .map_err(|err| syntax(err.to_string()))?;

    Ok(tree)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Rewrite `**` to `^` and give bare integer literals a fractional part.
fn real_literals(text: &str) -> String {
    fn flush(word: &mut String, out: &mut String) {
        out.push_str(word);
        if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
            out.push_str(".0");
        }
        word.clear();
    }

    let text = text.replace("**", "^");
    let mut out = String::with_capacity(text.len() + 8);
    let mut word = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            out.push(c);
        }
    }
    flush(&mut word, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> f64 {
        parse(text).unwrap().as_constant().unwrap()
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval("1 + 2*3"), 7.0);
        assert_eq!(eval("(1 + 2)*3"), 9.0);
        assert_eq!(eval("8/4/2"), 1.0);
        assert_eq!(eval("10 - 4 - 3"), 3.0);
    }

    #[test]
    fn integer_literals_divide_as_reals() {
        assert_eq!(eval("1/2"), 0.5);
        assert_eq!(eval("7/2 - 3"), 0.5);
        assert_eq!(real_literals("x2 + 10*1.5 - 3"), "x2 + 10.0*1.5 - 3.0");
    }

    #[test]
    fn power_forms() {
        assert_eq!(eval("2^3"), 8.0);
        assert_eq!(eval("2**3"), 8.0);
        assert_eq!(eval("(-2)^2"), 4.0);
    }

    #[test]
    fn constants_and_functions() {
        assert!((eval("pi/2") - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert!((eval("sin(pi/2)") - 1.0).abs() < 1e-15);
        assert!((eval("log(e)") - 1.0).abs() < 1e-15);
        assert_eq!(eval("1.5e2"), 150.0);
    }

    #[test]
    fn symbols_are_free() {
        let e = parse("a*sin(2*pi*x)").unwrap();
        let names: Vec<String> = e
            .free_symbols()
            .unwrap()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["a", "x"]);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse("").unwrap_err(), ParseError::Empty);
        assert_eq!(parse("   ").unwrap_err(), ParseError::Empty);
        assert_eq!(
            parse("foo(1)").unwrap_err(),
            ParseError::UnknownFunction { name: "foo".into() }
        );
        assert_eq!(
            parse("0.25abc").unwrap_err(),
            ParseError::InvalidIdentifier {
                name: "0.25abc".into()
            }
        );
        assert!(parse("1 + ").is_err());
        assert!(parse("(1 + 2").is_err());
        assert!(parse("2 $ 3").is_err());
        assert!(parse("a = 3").is_err());
    }

    #[test]
    fn prefix_takes_longest_valid_head() {
        let (e, used) = parse_prefix("0.25abc").unwrap();
        assert_eq!(e.as_constant(), Some(0.25));
        assert_eq!(used, 4);

        let (e, _) = parse_prefix("pi/2 +").unwrap();
        assert!((e.as_constant().unwrap() - std::f64::consts::FRAC_PI_2).abs() < 1e-15);

        assert!(parse_prefix("*3").is_none());
    }

    #[test]
    fn parsed_text_is_kept_verbatim() {
        for text in ["x^2 + 1", "-(x - 1)*a", "sin(2*pi*x)/x", "x**2"] {
            let e = parse(text).unwrap();
            assert_eq!(e.as_str(), text);
            assert_eq!(parse(&e.to_string()).unwrap(), e);
        }
    }
}
