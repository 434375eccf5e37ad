//! A small recursive-descent parser for the list literals models emit.
//!
//! Supported: signed integers, floats, single- or double-quoted strings,
//! lists `[...]`, tuples `(...)`, trailing commas and arbitrary whitespace.
//! A parenthesized single value without a comma is that value, not a tuple.

use super::ExtractionError;

const MAX_DEPTH: usize = 64;

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// Quoted string
    Str(String),
    /// `[...]`
    List(Vec<Literal>),
    /// `(...)`
    Tuple(Vec<Literal>),
}

impl Literal {
    /// Name of the literal kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Str(_) => "str",
            Literal::List(_) => "list",
            Literal::Tuple(_) => "tuple",
        }
    }

    /// Elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Literal]> {
        match self {
            Literal::List(items) => Some(items),
            _ => None,
        }
    }

    /// Read as a vertex id: integers, integral floats and numeric strings.
    pub fn as_vertex(&self) -> Option<i64> {
        match self {
            Literal::Int(n) => Some(*n),
            Literal::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Literal::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Str(s) => write!(f, "{:?}", s),
            Literal::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Literal::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_items(f: &mut std::fmt::Formatter<'_>, items: &[Literal]) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Parse a complete literal; trailing input is an error.
pub fn parse_literal(text: &str) -> Result<Literal, ExtractionError> {
    let mut parser = Parser {
        chars: text.char_indices().peekable(),
        text,
        depth: 0,
    };
    parser.skip_whitespace();
    if parser.peek().is_none() {
        return Err(ExtractionError::Empty);
    }
    let value = parser.value()?;
    parser.skip_whitespace();
    match parser.chars.next() {
        None => Ok(value),
        Some((pos, c)) => Err(malformed(format!(
            "unexpected {:?} at offset {} after value",
            c, pos
        ))),
    }
}

fn malformed(reason: impl Into<String>) -> ExtractionError {
    ExtractionError::MalformedLiteral(reason.into())
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    text: &'a str,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.text.len(), |&(i, _)| i)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.chars.next();
        }
    }

    fn value(&mut self) -> Result<Literal, ExtractionError> {
        self.skip_whitespace();
        match self.peek() {
            Some('[') => self.sequence(']').map(|(items, _)| Literal::List(items)),
            Some('(') => {
                let (mut items, trailing_comma) = self.sequence(')')?;
                if items.len() == 1 && !trailing_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(Literal::Tuple(items))
                }
            }
            Some(quote @ ('\'' | '"')) => self.string(quote),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) => Err(malformed(format!(
                "unexpected {:?} at offset {}",
                c,
                self.offset()
            ))),
            None => Err(malformed("unexpected end of input")),
        }
    }

    /// Parse `item, item, ... close` after an opener; reports whether a comma followed
    /// the last item.
    fn sequence(&mut self, close: char) -> Result<(Vec<Literal>, bool), ExtractionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(malformed("nesting too deep"));
        }
        self.chars.next(); // opener

        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(c) if c == close => {
                    self.chars.next();
                    break;
                }
                None => return Err(malformed(format!("missing closing {:?}", close))),
                _ => {}
            }

            items.push(self.value()?);
            trailing_comma = false;

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.chars.next();
                    trailing_comma = true;
                }
                Some(c) if c == close => {}
                Some(c) => {
                    return Err(malformed(format!(
                        "expected ',' or {:?}, found {:?} at offset {}",
                        close,
                        c,
                        self.offset()
                    )))
                }
                None => return Err(malformed(format!("missing closing {:?}", close))),
            }
        }

        self.depth -= 1;
        Ok((items, trailing_comma))
    }

    fn string(&mut self, quote: char) -> Result<Literal, ExtractionError> {
        self.chars.next(); // opening quote
        let mut out = String::new();
        loop {
            match self.chars.next() {
                Some((_, c)) if c == quote => return Ok(Literal::Str(out)),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, 'r')) => out.push('\r'),
                    Some((_, c)) => out.push(c),
                    None => return Err(malformed("unterminated string")),
                },
                Some((_, '\n')) | None => return Err(malformed("unterminated string")),
                Some((_, c)) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Literal, ExtractionError> {
        let start = self.offset();
        let mut is_float = false;

        if matches!(self.peek(), Some('-' | '+')) {
            self.chars.next();
        }
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.chars.next();
                    if matches!(self.peek(), Some('-' | '+')) {
                        self.chars.next();
                    }
                    continue;
                }
                _ => break,
            }
            self.chars.next();
        }

        let end = self.offset();
        let raw = &self.text[start..end];
        let digits = raw.replace('_', "");

        if is_float {
            digits
                .parse::<f64>()
                .map(Literal::Float)
                .map_err(|_| malformed(format!("invalid number {:?}", raw)))
        } else {
            digits
                .parse::<i64>()
                .map(Literal::Int)
                .map_err(|_| malformed(format!("invalid number {:?}", raw)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_list() {
        assert_eq!(
            parse_literal("[0, 1, -2]").unwrap(),
            Literal::List(vec![Literal::Int(0), Literal::Int(1), Literal::Int(-2)])
        );
    }

    #[test]
    fn test_nested_lists_and_trailing_commas() {
        let literal = parse_literal(" [ [0, 1,], [2 ,3] , ] ").unwrap();
        let outer = literal.as_list().unwrap();
        assert_eq!(outer.len(), 2);
        assert_eq!(
            outer[1],
            Literal::List(vec![Literal::Int(2), Literal::Int(3)])
        );
    }

    #[test]
    fn test_mixed_elements() {
        let literal = parse_literal("['1', \"2\", 3.0, 4.5]").unwrap();
        let items = literal.as_list().unwrap();
        assert_eq!(items[0].as_vertex(), Some(1));
        assert_eq!(items[1].as_vertex(), Some(2));
        assert_eq!(items[2].as_vertex(), Some(3));
        assert_eq!(items[3].as_vertex(), None);
    }

    #[test]
    fn test_tuples() {
        assert_eq!(parse_literal("(1)").unwrap(), Literal::Int(1));
        assert_eq!(
            parse_literal("(1,)").unwrap(),
            Literal::Tuple(vec![Literal::Int(1)])
        );
        assert_eq!(parse_literal("()").unwrap(), Literal::Tuple(vec![]));
        assert_eq!(parse_literal("(1, 2)").unwrap().kind(), "tuple");
    }

    #[test]
    fn test_strings_with_escapes() {
        assert_eq!(
            parse_literal(r#"'it\'s'"#).unwrap(),
            Literal::Str("it's".to_string())
        );
    }

    #[test]
    fn test_malformed_inputs() {
        for text in ["[1, 2", "[1 2]", "[1, x]", "1]", "'open", "[1,,2]", "{1, 2}", "--1"] {
            assert!(
                matches!(parse_literal(text), Err(ExtractionError::MalformedLiteral(_))),
                "expected malformed literal for {:?}",
                text
            );
        }
        assert_eq!(parse_literal("   "), Err(ExtractionError::Empty));
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}{}", "[".repeat(100), "]".repeat(100));
        assert!(matches!(
            parse_literal(&deep),
            Err(ExtractionError::MalformedLiteral(_))
        ));
    }

    #[test]
    fn test_display() {
        let literal = parse_literal("[[0, 1], (2,), 'a']").unwrap();
        assert_eq!(literal.to_string(), "[[0, 1], (2,), \"a\"]");
    }
}
