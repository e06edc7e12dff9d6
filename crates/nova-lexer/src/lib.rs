//! Nova lexer -- tokenizer for the Nova programming language.
//!
//! Converts source text into a stream of [`Token`]s terminated by exactly
//! one `Eof` token, or by a single `Error` token when the input contains an
//! unterminated string or an unrecognized byte. Whitespace and `#` line
//! comments are skipped; they never appear in the stream.

mod cursor;

use cursor::Cursor;
use nova_common::span::Span;
use nova_common::token::{keyword_from_str, Token, TokenKind};

/// The Nova lexer. Converts source text into a stream of tokens.
///
/// Wraps a [`Cursor`] for character-level iteration and implements
/// `Iterator<Item = Token>` so callers can consume tokens lazily or collect
/// them into a `Vec`. The stream is fused at the first `Eof` or `Error`
/// token.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    /// Whether we have already emitted a stream-terminating token.
    done: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            done: false,
        }
    }

    /// Convenience: tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector ends with the terminating `Eof` or `Error` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Produce the next token.
    fn produce_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.cursor.pos();
        let line = self.cursor.line();
        let column = self.cursor.column();

        let Some(c) = self.cursor.peek() else {
            return self.make(TokenKind::Eof, start, line, column);
        };

        match c {
            // ── Identifiers and keywords ────────────────────────────────
            c if is_ident_start(c) => self.lex_ident(start, line, column),

            // ── Number literals ─────────────────────────────────────────
            '0'..='9' => self.lex_number(start, line, column),

            // ── String literals ─────────────────────────────────────────
            '"' => self.lex_string(start, line, column),

            // ── Single-character punctuation ────────────────────────────
            '(' => self.single_char(TokenKind::LParen, start, line, column),
            ')' => self.single_char(TokenKind::RParen, start, line, column),
            '{' => self.single_char(TokenKind::LBrace, start, line, column),
            '}' => self.single_char(TokenKind::RBrace, start, line, column),
            '[' => self.single_char(TokenKind::LBracket, start, line, column),
            ']' => self.single_char(TokenKind::RBracket, start, line, column),
            ',' => self.single_char(TokenKind::Comma, start, line, column),
            '.' => self.single_char(TokenKind::Dot, start, line, column),
            ':' => self.single_char(TokenKind::Colon, start, line, column),
            ';' => self.single_char(TokenKind::Semicolon, start, line, column),
            '!' => self.single_char(TokenKind::Bang, start, line, column),

            // ── Two-character operators ─────────────────────────────────
            '=' => {
                self.cursor.advance();
                if self.cursor.peek() == Some('>') {
                    self.cursor.advance();
                    self.make(TokenKind::FatArrow, start, line, column)
                } else {
                    self.make(TokenKind::Equal, start, line, column)
                }
            }
            '|' => {
                self.cursor.advance();
                if self.cursor.peek() == Some('>') {
                    self.cursor.advance();
                    self.make(TokenKind::PipeOp, start, line, column)
                } else {
                    self.make(TokenKind::Bar, start, line, column)
                }
            }
            '-' => {
                self.cursor.advance();
                if self.cursor.peek() == Some('>') {
                    self.cursor.advance();
                    self.make(TokenKind::Arrow, start, line, column)
                } else {
                    // Nova has no minus operator; a stray `-` is invalid.
                    self.make(TokenKind::Error, start, line, column)
                }
            }

            // ── Unknown byte ────────────────────────────────────────────
            _ => {
                self.cursor.advance();
                self.make(TokenKind::Error, start, line, column)
            }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────────

    /// Skip whitespace (space, tab, carriage return, newline) and `#` line
    /// comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.cursor.advance();
                }
                Some('#') => {
                    self.cursor.eat_while(|c| c != '\n');
                }
                _ => break,
            }
        }
    }

    /// Build a token spanning from `start` to the current position.
    fn make(&self, kind: TokenKind, start: u32, line: u32, column: u32) -> Token {
        Token::new(kind, Span::new(start, self.cursor.pos()), line, column)
    }

    /// Consume one character and return a token of the given kind.
    fn single_char(&mut self, kind: TokenKind, start: u32, line: u32, column: u32) -> Token {
        self.cursor.advance();
        self.make(kind, start, line, column)
    }

    /// Lex an identifier or keyword.
    fn lex_ident(&mut self, start: u32, line: u32, column: u32) -> Token {
        self.cursor.advance(); // consume first char
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.pos());
        let kind = keyword_from_str(text).unwrap_or(TokenKind::Identifier);
        self.make(kind, start, line, column)
    }

    /// Lex a number literal: digits, optionally `.` and more digits.
    fn lex_number(&mut self, start: u32, line: u32, column: u32) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.') {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        self.make(TokenKind::Number, start, line, column)
    }

    /// Lex a string literal, single-quoted (`"..."`) or triple-quoted
    /// (`"""..."""`).
    ///
    /// A backslash consumes the following byte verbatim; escape decoding is
    /// not performed. Reaching end of input before the closing quote
    /// produces an `Error` token positioned at the opening quote.
    fn lex_string(&mut self, start: u32, line: u32, column: u32) -> Token {
        self.cursor.advance(); // consume opening '"'

        let triple = self.cursor.peek() == Some('"') && self.cursor.peek_next() == Some('"');
        if triple {
            self.cursor.advance();
            self.cursor.advance();
        }

        loop {
            match self.cursor.peek() {
                None => {
                    // Unterminated string.
                    return self.make(TokenKind::Error, start, line, column);
                }
                Some('"') if !triple => {
                    self.cursor.advance();
                    return self.make(TokenKind::Str, start, line, column);
                }
                Some('"') if triple => {
                    if self.cursor.peek_next() == Some('"') {
                        self.cursor.advance();
                        self.cursor.advance();
                        if self.cursor.peek() == Some('"') {
                            self.cursor.advance();
                            return self.make(TokenKind::Str, start, line, column);
                        }
                        // Only two quotes -- they are content, keep scanning.
                    } else {
                        self.cursor.advance();
                    }
                }
                Some('\\') => {
                    self.cursor.advance(); // consume '\'
                    self.cursor.advance(); // consume escaped byte
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.produce_token();
        if matches!(token.kind, TokenKind::Eof | TokenKind::Error) {
            self.done = true;
        }
        Some(token)
    }
}

/// Whether a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Whether a character can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
