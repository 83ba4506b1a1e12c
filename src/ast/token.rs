use crate::ast::Operator;
use std::fmt;

/// A lexical unit of a formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Identifier(String),
    Operator(Operator),
    LeftParen,
    RightParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{}", value),
            Token::Identifier(name) => f.write_str(name),
            Token::Operator(operator) => write!(f, "{}", operator),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
        }
    }
}

/// A token together with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub position: usize,
}

/// Identifiers in a token stream that name variables, deduplicated in
/// first-occurrence order.
///
/// An identifier directly followed by `(` is a call, never a variable.
/// Registered function names and reserved constants are excluded even when
/// they appear bare.
pub fn variable_names(tokens: &[SpannedToken]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut iter = tokens.iter().peekable();
    while let Some(spanned) = iter.next() {
        if let Token::Identifier(name) = &spanned.token {
            let called = matches!(iter.peek(), Some(next) if next.token == Token::LeftParen);
            if called
                || crate::functions::is_function(name)
                || crate::functions::constants::is_constant(name)
                || names.contains(name)
            {
                continue;
            }
            names.push(name.clone());
        }
    }
    names
}

/// Checks that parentheses balance and never nest deeper than `max_depth`.
///
/// Errors carry a message and the byte offset of the offending paren.
pub(crate) fn check_nesting(
    tokens: &[SpannedToken],
    max_depth: usize,
) -> Result<(), (String, usize)> {
    let mut open: Vec<usize> = Vec::new();
    for spanned in tokens {
        match spanned.token {
            Token::LeftParen => {
                open.push(spanned.position);
                if open.len() > max_depth {
                    return Err((
                        format!("parentheses nest deeper than {} levels", max_depth),
                        spanned.position,
                    ));
                }
            }
            Token::RightParen => {
                if open.pop().is_none() {
                    return Err(("unexpected ')'".to_string(), spanned.position));
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(position) => Err(("'(' is never closed".to_string(), position)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spanned(tokens: Vec<Token>) -> Vec<SpannedToken> {
        tokens
            .into_iter()
            .enumerate()
            .map(|(position, token)| SpannedToken { token, position })
            .collect()
    }

    #[test]
    fn test_variable_names_skip_calls() {
        let tokens = spanned(vec![
            Token::Identifier("Max".to_string()),
            Token::LeftParen,
            Token::Identifier("X".to_string()),
            Token::Comma,
            Token::Number(2.0),
            Token::RightParen,
        ]);
        assert_eq!(variable_names(&tokens), vec!["X"]);
    }

    #[test]
    fn test_variable_names_skip_bare_functions_and_constants() {
        let tokens = spanned(vec![
            Token::Identifier("sin".to_string()),
            Token::Operator(Operator::Add),
            Token::Identifier("PI".to_string()),
            Token::Operator(Operator::Add),
            Token::Identifier("r".to_string()),
            Token::Operator(Operator::Multiply),
            Token::Identifier("r".to_string()),
        ]);
        assert_eq!(variable_names(&tokens), vec!["r"]);
    }

    #[test]
    fn test_nesting_within_limit() {
        let tokens = spanned(vec![
            Token::LeftParen,
            Token::LeftParen,
            Token::Number(1.0),
            Token::RightParen,
            Token::RightParen,
            Token::LeftParen,
            Token::Number(2.0),
            Token::RightParen,
        ]);
        assert_eq!(check_nesting(&tokens, 2), Ok(()));
        assert_eq!(
            check_nesting(&tokens, 1),
            Err(("parentheses nest deeper than 1 levels".to_string(), 1))
        );
    }

    #[test]
    fn test_nesting_unbalanced() {
        let unclosed = spanned(vec![Token::LeftParen, Token::Number(1.0)]);
        assert_eq!(
            check_nesting(&unclosed, 8),
            Err(("'(' is never closed".to_string(), 0))
        );

        let stray = spanned(vec![Token::Number(1.0), Token::RightParen]);
        assert_eq!(
            check_nesting(&stray, 8),
            Err(("unexpected ')'".to_string(), 1))
        );
    }
}
