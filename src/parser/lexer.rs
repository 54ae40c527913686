//! Tokenizer for the type specification grammar.
//!
//! Identifier and number shapes are matched with anchored regexes against the
//! remaining input; strings and regex literals are scanned by hand because of
//! their escape rules.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SyntaxError;
use crate::span::Span;

// ------------------------------- Tokens ---------------------------------- //

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Name(String),      // lower-case, possibly `::` qualified
    Reference(String), // capitalized, spelling as written
    Str(String),
    Integer(i64),
    Float(f64),
    Regex(String),
    LBracket,
    RBracket,
    Comma,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
}

// ------------------------------ Patterns --------------------------------- //

static NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:::)?[a-z_][a-z0-9_]*(?:::[a-z_][a-z0-9_]*)*").expect("static regex")
});

static REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:::)?[A-Z][A-Za-z0-9_]*(?:::[A-Z][A-Za-z0-9_]*)*").expect("static regex")
});

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^-?(?:0[xX][0-9A-Fa-f]+|[0-9]+\.[0-9]+(?:[eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+|[0-9]+)",
    )
    .expect("static regex")
});

// ------------------------------- Lexer ----------------------------------- //

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn tokenize(mut self) -> Result<Vec<Spanned>, SyntaxError> {
        let mut out = Vec::new();
        while let Some(tok) = self.next_token()? {
            out.push(tok);
        }
        Ok(out)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();
            if trimmed.starts_with('#') {
                let line_len = trimmed.find('\n').unwrap_or(trimmed.len());
                self.pos += line_len;
            } else {
                break;
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Option<Spanned>, SyntaxError> {
        self.skip_trivia();
        let start = self.pos;
        let Some(c) = self.peek_char() else {
            return Ok(None);
        };

        let token = match c {
            '[' => { self.pos += 1; Token::LBracket }
            ']' => { self.pos += 1; Token::RBracket }
            ',' => { self.pos += 1; Token::Comma }
            '\'' => self.single_quoted()?,
            '"' => self.double_quoted()?,
            '/' => self.regex_literal()?,
            c if c.is_ascii_digit() || c == '-' => self.number()?,
            _ => {
                if let Some(m) = REFERENCE.find(self.rest()) {
                    self.pos += m.end();
                    Token::Reference(m.as_str().to_string())
                } else if let Some(m) = NAME.find(self.rest()) {
                    self.pos += m.end();
                    Token::Name(m.as_str().to_string())
                } else {
                    return Err(SyntaxError::new(
                        format!("unexpected character {c:?}"),
                        Span::new(start, start + c.len_utf8()),
                    ));
                }
            }
        };

        // `Foo-bar`, `12abc`, `Foo$`: a word must end at a delimiter
        if matches!(token, Token::Name(_) | Token::Reference(_) | Token::Integer(_) | Token::Float(_)) {
            if let Some(next) = self.peek_char() {
                if next.is_alphanumeric() || next == '_' || next == '-' || next == '.' || next == ':' {
                    let bad_end = self.pos + next.len_utf8();
                    return Err(SyntaxError::new(
                        "malformed word or number",
                        Span::new(start, bad_end),
                    ));
                }
            }
        }

        tracing::trace!(?token, start, end = self.pos, "token");
        Ok(Some(Spanned { token, span: Span::new(start, self.pos) }))
    }

    fn number(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        let Some(m) = NUMBER.find(self.rest()) else {
            return Err(SyntaxError::new("expected a number", Span::new(start, start + 1)));
        };
        let text = m.as_str();
        self.pos += m.end();
        let span = Span::new(start, self.pos);

        let (negative, digits) = match text.strip_prefix('-') {
            Some(d) => (true, d),
            None => (false, text),
        };

        if digits.contains(['.', 'e', 'E']) && !digits.starts_with("0x") && !digits.starts_with("0X") {
            return match text.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Token::Float(f)),
                _ => Err(SyntaxError::new(format!("invalid float {text}"), span)),
            };
        }

        let (radix, body) = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
            (16, hex)
        } else if digits.len() > 1 && digits.starts_with('0') {
            (8, &digits[1..])
        } else {
            (10, digits)
        };

        let signed = if negative { format!("-{body}") } else { body.to_string() };
        i64::from_str_radix(&signed, radix)
            .map(Token::Integer)
            .map_err(|_| SyntaxError::new(format!("invalid integer {text}"), span))
    }

    fn single_quoted(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\'' => {
                    self.pos += i + 1;
                    return Ok(Token::Str(out));
                }
                '\\' => match chars.next() {
                    Some((_, '\\')) => out.push('\\'),
                    Some((_, '\'')) => out.push('\''),
                    Some((_, other)) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => break,
                },
                c => out.push(c),
            }
        }
        Err(SyntaxError::new("unterminated string", Span::new(start, self.src.len())))
    }

    fn double_quoted(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(Token::Str(out));
                }
                '\\' => match chars.next() {
                    Some((_, '\\')) => out.push('\\'),
                    Some((_, '"')) => out.push('"'),
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, 'r')) => out.push('\r'),
                    Some((_, 's')) => out.push(' '),
                    Some((_, '$')) => out.push('$'),
                    Some((_, other)) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => break,
                },
                c => out.push(c),
            }
        }
        Err(SyntaxError::new("unterminated string", Span::new(start, self.src.len())))
    }

    fn regex_literal(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        let mut body = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '/' => {
                    self.pos += i + 1;
                    let span = Span::new(start, self.pos);
                    if let Err(e) = Regex::new(&body) {
                        tracing::debug!(%e, "regex literal rejected");
                        return Err(SyntaxError::new(format!("invalid regular expression /{body}/"), span));
                    }
                    return Ok(Token::Regex(body));
                }
                '\n' => break,
                '\\' => match chars.next() {
                    Some((_, '/')) => body.push('/'),
                    Some((_, other)) => {
                        body.push('\\');
                        body.push(other);
                    }
                    None => break,
                },
                c => body.push(c),
            }
        }
        Err(SyntaxError::new("unterminated regular expression", Span::new(start, self.src.len())))
    }
}

pub fn tokenize(src: &str) -> Result<Vec<Spanned>, SyntaxError> {
    Lexer::new(src).tokenize()
}

// ------------------------------- Tests ----------------------------------- //

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        tokenize(src).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn access_expression_tokens() {
        assert_eq!(
            tokens("Hash[Integer, Array[String]]"),
            vec![
                Token::Reference("Hash".into()),
                Token::LBracket,
                Token::Reference("Integer".into()),
                Token::Comma,
                Token::Reference("Array".into()),
                Token::LBracket,
                Token::Reference("String".into()),
                Token::RBracket,
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn qualified_names_and_references() {
        assert_eq!(
            tokens("apache::mod Foo::Bar ::top"),
            vec![
                Token::Name("apache::mod".into()),
                Token::Reference("Foo::Bar".into()),
                Token::Name("::top".into()),
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            tokens("10 -3 0x1F 010 1.5 -2.5e-1 1e3"),
            vec![
                Token::Integer(10),
                Token::Integer(-3),
                Token::Integer(31),
                Token::Integer(8),
                Token::Float(1.5),
                Token::Float(-0.25),
                Token::Float(1000.0),
            ]
        );
    }

    #[test]
    fn integer_overflow_is_an_error() {
        let err = tokenize("99999999999999999999").unwrap_err();
        assert!(err.message.contains("invalid integer"));
    }

    #[test]
    fn float_overflow_is_an_error() {
        assert!(tokenize("1e999").is_err());
    }

    #[test]
    fn bad_octal_is_an_error() {
        assert!(tokenize("09").is_err());
    }

    #[test]
    fn string_escapes() {
        assert_eq!(tokens(r"'it\'s \\ \n'"), vec![Token::Str(r"it's \ \n".into())]);
        assert_eq!(tokens(r#""a\tb\"c""#), vec![Token::Str("a\tb\"c".into())]);
    }

    #[test]
    fn regex_literal_unescapes_delimiter() {
        assert_eq!(tokens(r"/a\/b\d+/"), vec![Token::Regex(r"a/b\d+".into())]);
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let err = tokenize("/a(/").unwrap_err();
        assert_eq!(err.span, Span::new(0, 4));
    }

    #[test]
    fn unterminated_string_spans_to_end() {
        let err = tokenize("Enum['a, 'b']").unwrap_err();
        assert_eq!(err.message, "unterminated string");
        assert_eq!(err.span, Span::new(11, 13));
        let err = tokenize("Enum['abc").unwrap_err();
        assert_eq!(err.span, Span::new(5, 9));
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        assert_eq!(tokens("  # nothing here\n  "), vec![]);
        assert_eq!(tokens("String # trailing"), vec![Token::Reference("String".into())]);
    }

    #[test]
    fn spans_cover_token_text() {
        let toks = tokenize("  Array[ 'x' ]").unwrap();
        let spans: Vec<Span> = toks.iter().map(|t| t.span).collect();
        assert_eq!(
            spans,
            vec![Span::new(2, 7), Span::new(7, 8), Span::new(9, 12), Span::new(13, 14)]
        );
    }

    #[test]
    fn word_must_end_at_delimiter() {
        assert!(tokenize("Foo-bar").is_err());
        assert!(tokenize("12abc").is_err());
        assert!(tokenize("foo$").is_err());
    }
}
