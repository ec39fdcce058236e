// File: src/meta/literal.rs
// Purpose: Locate a metadata declaration call in script text and evaluate its literal argument

//! Restricted literal evaluation
//!
//! Nothing is ever executed. The argument of the declaration call is parsed as a
//! literal expression and converted to a JSON value:
//!
//! - strings: `'..'`, `".."` and template literals without `${}` substitutions
//! - numbers: decimal, exponent, `0x`/`0o`/`0b`, `_` separators, unary `+`/`-`
//! - `true`, `false`, `null`
//! - arrays and object literals (identifier, string or number keys, trailing commas)
//!
//! Anything else (identifiers, calls, spreads, shorthand properties, computed keys,
//! array holes, `undefined`, `NaN`, `Infinity`, BigInt) is rejected.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Maximum nesting of arrays and objects
pub const MAX_DEPTH: usize = 128;

/// Why a literal could not be evaluated
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected {found} at byte {pos}")]
    Unexpected { found: String, pos: usize },

    #[error("unterminated string starting at byte {0}")]
    UnterminatedString(usize),

    #[error("unterminated comment starting at byte {0}")]
    UnterminatedComment(usize),

    #[error("invalid escape sequence at byte {0}")]
    InvalidEscape(usize),

    #[error("invalid number literal `{0}`")]
    InvalidNumber(String),

    #[error("`{0}` is not a literal value")]
    NotLiteral(String),

    #[error("template literal with substitutions at byte {0}")]
    TemplateSubstitution(usize),

    #[error("literal nested too deeply")]
    TooDeep,

    #[error("trailing input at byte {0}")]
    TrailingInput(usize),
}

type Result<T> = std::result::Result<T, LiteralError>;

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Ident(&'a str),
    Str(String),
    Template { cooked: String, substituted: bool },
    Num(&'a str),
    Punct(char),
}

#[derive(Debug)]
struct Spanned<'a> {
    token: Token<'a>,
    pos: usize,
}

fn describe(token: &Token<'_>) -> String {
    match token {
        Token::Ident(name) => format!("identifier `{}`", name),
        Token::Str(_) => "string".to_string(),
        Token::Template { .. } => "template literal".to_string(),
        Token::Num(raw) => format!("number `{}`", raw),
        Token::Punct(c) => format!("`{}`", c),
    }
}

fn unexpected(spanned: Spanned<'_>) -> LiteralError {
    LiteralError::Unexpected {
        found: describe(&spanned.token),
        pos: spanned.pos,
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                self.pos = match rest.find('\n') {
                    Some(end) => self.pos + end + 1,
                    None => self.src.len(),
                };
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => return Err(LiteralError::UnterminatedComment(self.pos)),
                }
            } else if let Some(c) = self.peek_char().filter(|c| c.is_whitespace()) {
                self.pos += c.len_utf8();
            } else {
                return Ok(());
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Spanned<'a>>> {
        self.skip_trivia()?;
        let pos = self.pos;
        let Some(c) = self.peek_char() else {
            return Ok(None);
        };

        let starts_fraction = c == '.'
            && self.rest()[1..]
                .chars()
                .next()
                .is_some_and(|next| next.is_ascii_digit());

        let token = match c {
            '"' | '\'' => Token::Str(self.string(c)?),
            '`' => self.template()?,
            c if c.is_ascii_digit() || starts_fraction => Token::Num(self.number()),
            c if is_ident_start(c) => Token::Ident(self.ident()),
            c => {
                self.bump();
                Token::Punct(c)
            }
        };

        Ok(Some(Spanned { token, pos }))
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek_char().is_some_and(is_ident_continue) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn number(&mut self) -> &'a str {
        let start = self.pos;
        let rest = self.rest();
        let hex = rest.starts_with("0x") || rest.starts_with("0X");

        while let Some(c) = self.peek_char() {
            let after_exponent = !hex && matches!(self.src[start..self.pos].chars().last(), Some('e' | 'E'));
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || (after_exponent && (c == '+' || c == '-')) {
                self.bump();
            } else {
                break;
            }
        }

        &self.src[start..self.pos]
    }

    fn string(&mut self, quote: char) -> Result<String> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();

        loop {
            match self.bump() {
                None | Some('\n') => return Err(LiteralError::UnterminatedString(start)),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => self.escape(&mut out, start)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn template(&mut self) -> Result<Token<'a>> {
        let start = self.pos;
        self.bump();
        let mut cooked = String::new();
        let mut substituted = false;

        loop {
            match self.bump() {
                None => return Err(LiteralError::UnterminatedString(start)),
                Some('`') => return Ok(Token::Template { cooked, substituted }),
                Some('\\') => self.escape(&mut cooked, start)?,
                Some('$') if self.peek_char() == Some('{') => {
                    substituted = true;
                    self.skip_substitution(start)?;
                }
                Some(c) => cooked.push(c),
            }
        }
    }

    /// Skips a `${ ... }` substitution, balancing braces
    fn skip_substitution(&mut self, start: usize) -> Result<()> {
        let mut depth = 0usize;
        loop {
            match self.bump() {
                None => return Err(LiteralError::UnterminatedString(start)),
                Some('{') => depth += 1,
                Some('}') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(_) => {}
            }
        }
    }

    fn escape(&mut self, out: &mut String, start: usize) -> Result<()> {
        let at = self.pos;
        let c = self.bump().ok_or(LiteralError::UnterminatedString(start))?;

        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !self.peek_char().is_some_and(|c| c.is_ascii_digit()) => out.push('\0'),
            'x' => {
                let code = self.hex_digits(2).ok_or(LiteralError::InvalidEscape(at))?;
                out.push(char::from_u32(code).ok_or(LiteralError::InvalidEscape(at))?);
            }
            'u' => {
                let code = self.unicode_escape().ok_or(LiteralError::InvalidEscape(at))?;
                out.push(code);
            }
            // Line continuations
            '\r' => {
                if self.peek_char() == Some('\n') {
                    self.bump();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            c if c.is_ascii_digit() => return Err(LiteralError::InvalidEscape(at)),
            c => out.push(c),
        }

        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> Option<u32> {
        let digits = self.rest().get(..count)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let code = u32::from_str_radix(digits, 16).ok()?;
        self.pos += count;
        Some(code)
    }

    /// `\uXXXX` (with surrogate pairs) or `\u{X...}`, the `\u` already consumed
    fn unicode_escape(&mut self) -> Option<char> {
        if self.peek_char() == Some('{') {
            let end = self.rest().find('}')?;
            let digits = &self.rest()[1..end];
            if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            let code = u32::from_str_radix(digits, 16).ok()?;
            self.pos += end + 1;
            return char::from_u32(code);
        }

        let high = self.hex_digits(4)?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high);
        }

        let rest = self.rest();
        let low = rest
            .strip_prefix("\\u")
            .and_then(|r| r.get(..4))
            .filter(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()))
            .and_then(|digits| u32::from_str_radix(digits, 16).ok())
            .filter(|low| (0xDC00..0xE000).contains(low))?;
        self.pos += 6;
        char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
    }
}

// ============================================================================
// Numbers
// ============================================================================

fn integer_value(magnitude: u64, negative: bool) -> Option<Value> {
    if !negative {
        return Some(Value::from(magnitude));
    }
    i64::try_from(magnitude).ok().map(|m| Value::from(-m))
}

fn parse_number(raw: &str, negative: bool) -> Result<Value> {
    let invalid = || LiteralError::InvalidNumber(raw.to_string());

    if raw.ends_with('_') || raw.contains("__") || raw.contains("_.") || raw.contains("._") {
        return Err(invalid());
    }
    let cleaned: String = raw.chars().filter(|c| *c != '_').collect();

    let radix = match cleaned.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let magnitude = u64::from_str_radix(&cleaned[2..], radix).map_err(|_| invalid())?;
        return integer_value(magnitude, negative).ok_or_else(invalid);
    }

    // Legacy octal (`017`) is a syntax error in modules
    let bytes = cleaned.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit() {
        return Err(invalid());
    }

    if !cleaned.contains(['.', 'e', 'E']) {
        if let Some(value) = cleaned
            .parse::<u64>()
            .ok()
            .and_then(|m| integer_value(m, negative))
        {
            return Ok(value);
        }
    }

    let float: f64 = cleaned.parse().map_err(|_| invalid())?;
    let float = if negative { -float } else { float };
    Number::from_f64(float).map(Value::Number).ok_or_else(invalid)
}

/// Property key text for a numeric key, the way JavaScript prints it
fn number_key(raw: &str) -> Result<String> {
    match parse_number(raw, false)? {
        Value::Number(n) => Ok(match (n.as_u64(), n.as_f64()) {
            (Some(int), _) => int.to_string(),
            (None, Some(float)) if float.fract() == 0.0 && float.abs() < 1e15 => {
                format!("{}", float as i64)
            }
            _ => n.to_string(),
        }),
        _ => Err(LiteralError::InvalidNumber(raw.to_string())),
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Spanned<'a>>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            lexer: Lexer::new(src),
            peeked: None,
        }
    }

    fn peek(&mut self) -> Result<Option<&Spanned<'a>>> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn next(&mut self) -> Result<Option<Spanned<'a>>> {
        match self.peeked.take() {
            Some(spanned) => Ok(Some(spanned)),
            None => self.lexer.next_token(),
        }
    }

    fn expect_next(&mut self) -> Result<Spanned<'a>> {
        self.next()?.ok_or(LiteralError::UnexpectedEnd)
    }

    fn eat_punct(&mut self, c: char) -> Result<bool> {
        let found = matches!(self.peek()?, Some(Spanned { token: Token::Punct(p), .. }) if *p == c);
        if found {
            self.peeked = None;
        }
        Ok(found)
    }

    fn expect_punct(&mut self, c: char) -> Result<()> {
        let spanned = self.expect_next()?;
        match spanned.token {
            Token::Punct(p) if p == c => Ok(()),
            _ => Err(unexpected(spanned)),
        }
    }

    /// Tolerates a TypeScript `as const` after a literal
    fn skip_as_const(&mut self) -> Result<()> {
        if matches!(self.peek()?, Some(Spanned { token: Token::Ident("as"), .. })) {
            self.peeked = None;
            let spanned = self.expect_next()?;
            if spanned.token != Token::Ident("const") {
                return Err(unexpected(spanned));
            }
        }
        Ok(())
    }

    fn value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(LiteralError::TooDeep);
        }

        let spanned = self.expect_next()?;
        match spanned.token {
            Token::Str(s) => Ok(Value::String(s)),
            Token::Template {
                cooked,
                substituted: false,
            } => Ok(Value::String(cooked)),
            Token::Template { .. } => Err(LiteralError::TemplateSubstitution(spanned.pos)),
            Token::Num(raw) => parse_number(raw, false),
            Token::Punct('-') => self.signed_number(true),
            Token::Punct('+') => self.signed_number(false),
            Token::Punct('[') => self.array(depth + 1),
            Token::Punct('{') => self.object(depth + 1),
            Token::Ident("true") => Ok(Value::Bool(true)),
            Token::Ident("false") => Ok(Value::Bool(false)),
            Token::Ident("null") => Ok(Value::Null),
            Token::Ident(other) => Err(LiteralError::NotLiteral(other.to_string())),
            Token::Punct(_) => Err(unexpected(spanned)),
        }
    }

    fn signed_number(&mut self, negative: bool) -> Result<Value> {
        let spanned = self.expect_next()?;
        match spanned.token {
            Token::Num(raw) => parse_number(raw, negative),
            Token::Ident(name) => Err(LiteralError::NotLiteral(name.to_string())),
            _ => Err(unexpected(spanned)),
        }
    }

    fn array(&mut self, depth: usize) -> Result<Value> {
        let mut items = Vec::new();

        loop {
            if self.eat_punct(']')? {
                return Ok(Value::Array(items));
            }
            items.push(self.value(depth)?);
            if !self.eat_punct(',')? {
                self.expect_punct(']')?;
                return Ok(Value::Array(items));
            }
        }
    }

    fn object(&mut self, depth: usize) -> Result<Value> {
        let mut map = Map::new();

        loop {
            if self.eat_punct('}')? {
                return Ok(Value::Object(map));
            }
            let key = self.key()?;
            self.expect_punct(':')?;
            let value = self.value(depth)?;
            map.insert(key, value);
            if !self.eat_punct(',')? {
                self.expect_punct('}')?;
                return Ok(Value::Object(map));
            }
        }
    }

    fn key(&mut self) -> Result<String> {
        let spanned = self.expect_next()?;
        match spanned.token {
            Token::Ident(name) => Ok(name.to_string()),
            Token::Str(s) => Ok(s),
            Token::Num(raw) => number_key(raw),
            _ => Err(unexpected(spanned)),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Evaluates a complete literal expression
///
/// # Examples
///
/// ```
/// use pagetree::meta::literal::parse_literal;
/// use serde_json::json;
///
/// let value = parse_literal("{ title: 'Home', tags: ['a', \"b\",], order: -1 }").unwrap();
/// assert_eq!(value, json!({ "title": "Home", "tags": ["a", "b"], "order": -1 }));
///
/// assert!(parse_literal("{ title: pageTitle }").is_err());
/// ```
pub fn parse_literal(src: &str) -> Result<Value> {
    let mut parser = Parser::new(src);
    let value = parser.value(0)?;
    parser.skip_as_const()?;
    match parser.next()? {
        None => Ok(value),
        Some(spanned) => Err(LiteralError::TrailingInput(spanned.pos)),
    }
}

/// Finds the first call of `callee` in script text and evaluates its argument
///
/// Member calls (`obj.callee(...)`) and function declarations are not calls of
/// `callee`. Returns `Ok(None)` when no call is present; an error when the first
/// call found has an argument that is not a literal.
pub fn try_find_call_argument(src: &str, callee: &str) -> Result<Option<Value>> {
    let mut parser = Parser::new(src);
    let mut prev: Option<Token<'_>> = None;

    while let Some(spanned) = parser.next()? {
        let is_callee = matches!(spanned.token, Token::Ident(name) if name == callee)
            && !matches!(prev, Some(Token::Punct('.')) | Some(Token::Ident("function")));

        if is_callee && parser.eat_punct('(')? {
            let value = parser.value(0)?;
            parser.skip_as_const()?;
            parser.eat_punct(',')?;
            parser.expect_punct(')')?;
            return Ok(Some(value));
        }

        prev = Some(spanned.token);
    }

    Ok(None)
}

/// Like [`try_find_call_argument`], but any failure is "not found"
///
/// ```
/// use pagetree::meta::literal::find_call_argument;
/// use serde_json::json;
///
/// let script = "import { defineRouteMeta } from 'pages'\ndefineRouteMeta({ auth: true })";
/// assert_eq!(find_call_argument(script, "defineRouteMeta"), Some(json!({ "auth": true })));
/// assert_eq!(find_call_argument("defineRouteMeta(meta)", "defineRouteMeta"), None);
/// ```
pub fn find_call_argument(src: &str, callee: &str) -> Option<Value> {
    try_find_call_argument(src, callee).ok().flatten()
}
