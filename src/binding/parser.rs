// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Parser for binding declarations.
//!
//! A declaration is a comma separated list of `operator: expression`
//! pairs, for example:
//!
//! ```text
//! text: fullName, className: { active: isActive, "is-empty": !items }
//! ```
//!
//! Grammar:
//!
//! ```text
//! declaration := ( pair ( "," pair )* ","? )?
//! pair        := key ":" expr
//! key         := identifier | string
//! expr        := "!" expr | primary
//! primary     := identifier | string | number | "true" | "false" | "null"
//!              | "{" ( pair ( "," pair )* ","? )? "}"
//!              | "(" expr ")"
//! ```
//!
//! Repeated keys keep their first position and their last expression.

use serde_json::{Number, Value};

use crate::errors::ParseError;

/// Expression tree of one operator's right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a model attribute accessor.
    Ident { name: String, position: usize },
    /// Literal value baked into the declaration.
    Literal(Value),
    /// Object literal; keys in declaration order.
    Object(Vec<(String, Expr)>),
    /// Prefix negation.
    Not(Box<Expr>),
}

impl Expr {
    /// Visit every identifier in the expression, depth first.
    pub fn identifiers(&self) -> Vec<(&str, usize)> {
        let mut found = Vec::new();
        self.collect_identifiers(&mut found);
        found
    }

    fn collect_identifiers<'a>(&'a self, found: &mut Vec<(&'a str, usize)>) {
        match self {
            Expr::Ident { name, position } => found.push((name.as_str(), *position)),
            Expr::Literal(_) => {}
            Expr::Object(entries) => entries
                .iter()
                .for_each(|(_, expr)| expr.collect_identifiers(found)),
            Expr::Not(inner) => inner.collect_identifiers(found),
        }
    }
}

/// One `operator: expression` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorBinding {
    pub operator: String,
    pub expr: Expr,
    /// Offset of the operator key in the declaration text
    pub position: usize,
}

/// A parsed declaration for one selector.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingDeclaration {
    selector: String,
    source: String,
    operators: Vec<OperatorBinding>,
}

impl BindingDeclaration {
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The declaration text as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn operators(&self) -> &[OperatorBinding] {
        &self.operators
    }

    pub fn operator(&self, name: &str) -> Option<&OperatorBinding> {
        self.operators.iter().find(|o| o.operator == name)
    }

    pub fn operator_names(&self) -> impl Iterator<Item = &str> {
        self.operators.iter().map(|o| o.operator.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

/// Parse `text`, the declaration bound to `selector`.
pub fn parse(selector: &str, text: &str) -> Result<BindingDeclaration, ParseError> {
    let tokens = tokenize(selector, text)?;
    let mut parser = Parser {
        selector,
        tokens,
        cursor: 0,
    };
    let entries = parser.pairs(Token::End)?;
    parser.expect(&Token::End, "expected ',' or end of declaration")?;

    let operators = entries
        .into_iter()
        .map(|(operator, position, expr)| OperatorBinding {
            operator,
            expr,
            position,
        })
        .collect();

    Ok(BindingDeclaration {
        selector: selector.to_string(),
        source: text.to_string(),
        operators,
    })
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Num(Number),
    Colon,
    Comma,
    Bang,
    LBrace,
    RBrace,
    LParen,
    RParen,
    End,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("identifier '{}'", name),
            Token::Str(_) => "string".to_string(),
            Token::Num(n) => format!("number {}", n),
            Token::Colon => "':'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Bang => "'!'".to_string(),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::End => "end of declaration".to_string(),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

fn tokenize(selector: &str, text: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let single = match c {
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            '!' => Some(Token::Bang),
            '{' => Some(Token::LBrace),
            '}' => Some(Token::RBrace),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        };
        if let Some(token) = single {
            chars.next();
            tokens.push((token, start));
            continue;
        }

        if c.is_whitespace() {
            chars.next();
        } else if c == '"' || c == '\'' {
            chars.next();
            let mut value = String::new();
            let mut closed = false;
            while let Some((_, next)) = chars.next() {
                match next {
                    '\\' => match chars.next() {
                        Some((_, 'n')) => value.push('\n'),
                        Some((_, 't')) => value.push('\t'),
                        Some((_, 'r')) => value.push('\r'),
                        Some((_, escaped)) => value.push(escaped),
                        None => break,
                    },
                    quote if quote == c => {
                        closed = true;
                        break;
                    }
                    other => value.push(other),
                }
            }
            if !closed {
                return Err(ParseError::new(selector, start, "unterminated string"));
            }
            tokens.push((Token::Str(value), start));
        } else if c.is_ascii_digit() || c == '-' || c == '.' {
            let mut literal = String::new();
            while let Some(&(_, next)) = chars.peek() {
                let sign_after_exponent =
                    (next == '-' || next == '+') && literal.ends_with(['e', 'E']);
                let accepted = next.is_ascii_digit()
                    || next == '.'
                    || next == 'e'
                    || next == 'E'
                    || sign_after_exponent
                    || (next == '-' && literal.is_empty());
                if !accepted {
                    break;
                }
                literal.push(next);
                chars.next();
            }
            tokens.push((Token::Num(parse_number(selector, start, &literal)?), start));
        } else if is_ident_start(c) {
            let mut name = String::new();
            while let Some(&(_, next)) = chars.peek() {
                if !is_ident_part(next) {
                    break;
                }
                name.push(next);
                chars.next();
            }
            tokens.push((Token::Ident(name), start));
        } else {
            return Err(ParseError::new(
                selector,
                start,
                format!("unexpected character '{}'", c),
            ));
        }
    }

    tokens.push((Token::End, text.len()));
    Ok(tokens)
}

fn parse_number(selector: &str, position: usize, literal: &str) -> Result<Number, ParseError> {
    if let Ok(integer) = literal.parse::<i64>() {
        return Ok(Number::from(integer));
    }
    literal
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| ParseError::new(selector, position, format!("invalid number '{}'", literal)))
}

struct Parser<'a> {
    selector: &'a str,
    tokens: Vec<(Token, usize)>,
    cursor: usize,
}

impl Parser<'_> {
    fn peek(&self) -> &(Token, usize) {
        // the token list always ends with Token::End
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> (Token, usize) {
        let token = self.peek().clone();
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.selector, self.peek().1, message)
    }

    fn expect(&mut self, token: &Token, message: &str) -> Result<usize, ParseError> {
        let (found, position) = self.peek().clone();
        if &found != token {
            return Err(self.error(format!("{}, found {}", message, found.describe())));
        }
        self.advance();
        Ok(position)
    }

    /// `key: expr` pairs up to (not including) `close`.
    fn pairs(&mut self, close: Token) -> Result<Vec<(String, usize, Expr)>, ParseError> {
        let mut entries: Vec<(String, usize, Expr)> = Vec::new();
        while self.peek().0 != close {
            let (key, position) = match self.advance() {
                (Token::Ident(name), position) | (Token::Str(name), position) => (name, position),
                (other, position) => {
                    return Err(ParseError::new(
                        self.selector,
                        position,
                        format!("expected a key, found {}", other.describe()),
                    ))
                }
            };
            self.expect(&Token::Colon, "expected ':' after key")?;
            let expr = self.expr()?;

            match entries.iter_mut().find(|(existing, _, _)| *existing == key) {
                Some(entry) => entry.2 = expr,
                None => entries.push((key, position, expr)),
            }

            if self.peek().0 == Token::Comma {
                self.advance();
            } else {
                break;
            }
        }
        Ok(entries)
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let (token, position) = self.advance();
        match token {
            Token::Bang => Ok(Expr::Not(Box::new(self.expr()?))),
            Token::Ident(name) => Ok(match name.as_str() {
                "true" => Expr::Literal(Value::Bool(true)),
                "false" => Expr::Literal(Value::Bool(false)),
                "null" => Expr::Literal(Value::Null),
                _ => Expr::Ident { name, position },
            }),
            Token::Str(s) => Ok(Expr::Literal(Value::String(s))),
            Token::Num(n) => Ok(Expr::Literal(Value::Number(n))),
            Token::LBrace => {
                let entries = self.pairs(Token::RBrace)?;
                self.expect(&Token::RBrace, "expected ',' or '}'")?;
                Ok(Expr::Object(
                    entries.into_iter().map(|(key, _, expr)| (key, expr)).collect(),
                ))
            }
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(&Token::RParen, "expected ')'")?;
                Ok(inner)
            }
            other => Err(ParseError::new(
                self.selector,
                position,
                format!("expected an expression, found {}", other.describe()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ident(name: &str, position: usize) -> Expr {
        Expr::Ident {
            name: name.to_string(),
            position,
        }
    }

    #[test]
    fn test_parse_simple_pairs() {
        let declaration = parse("#name", "text: fullName, value: firstName").unwrap();

        assert_eq!(declaration.selector(), "#name");
        assert_eq!(
            declaration.operator_names().collect::<Vec<_>>(),
            vec!["text", "value"]
        );
        assert_eq!(declaration.operator("text").unwrap().expr, ident("fullName", 6));
        assert_eq!(declaration.operator("value").unwrap().position, 16);
    }

    #[test]
    fn test_parse_object_literal_with_string_keys_and_trailing_comma() {
        let declaration = parse(".item", "className: { active: isActive, 'is-empty': !count, },").unwrap();

        let expr = &declaration.operator("className").unwrap().expr;
        match expr {
            Expr::Object(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].0, "active");
                assert_eq!(entries[1].0, "is-empty");
                assert!(matches!(entries[1].1, Expr::Not(_)));
            }
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_literals() {
        let declaration = parse(
            "p",
            r#"text: "it's", html: 'a\'b', toggle: true, enabled: null, css: { width: -1.5e2 }"#,
        )
        .unwrap();

        assert_eq!(declaration.operator("text").unwrap().expr, Expr::Literal(json!("it's")));
        assert_eq!(declaration.operator("html").unwrap().expr, Expr::Literal(json!("a'b")));
        assert_eq!(declaration.operator("toggle").unwrap().expr, Expr::Literal(json!(true)));
        assert_eq!(declaration.operator("enabled").unwrap().expr, Expr::Literal(json!(null)));
        assert_eq!(
            declaration.operator("css").unwrap().expr,
            Expr::Object(vec![("width".to_string(), Expr::Literal(json!(-150.0)))])
        );
    }

    #[test]
    fn test_parenthesised_negation() {
        let declaration = parse("p", "toggle: !(!visible)").unwrap();
        let expr = &declaration.operator("toggle").unwrap().expr;
        assert_eq!(
            *expr,
            Expr::Not(Box::new(Expr::Not(Box::new(ident("visible", 11)))))
        );
        assert_eq!(expr.identifiers(), vec![("visible", 11)]);
    }

    #[test]
    fn test_repeated_key_keeps_last_expression() {
        let declaration = parse("p", "text: a, html: b, text: c").unwrap();
        assert_eq!(
            declaration.operator_names().collect::<Vec<_>>(),
            vec!["text", "html"]
        );
        assert_eq!(declaration.operator("text").unwrap().expr, ident("c", 24));
    }

    #[test]
    fn test_empty_declaration_is_allowed() {
        assert!(parse("p", "   ").unwrap().is_empty());
    }

    #[test]
    fn test_errors_carry_selector_and_position() {
        let err = parse("#total", "text total").unwrap_err();
        assert_eq!(err.selector, "#total");
        assert_eq!(err.position, 5);
        assert!(err.message.contains("expected ':'"));

        let err = parse("#total", "text: 'open").unwrap_err();
        assert_eq!(err.message, "unterminated string");

        let err = parse("#total", "text: a b").unwrap_err();
        assert_eq!(err.position, 8);

        let err = parse("#total", "text: a; alert(1)").unwrap_err();
        assert!(err.message.contains("unexpected character ';'"));

        let err = parse("#total", "text: ").unwrap_err();
        assert!(err.message.contains("expected an expression"));
    }
}
