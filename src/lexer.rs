use std::iter::Peekable;
use std::str::Chars;

use itertools::Itertools;
use unicode_xid::UnicodeXID;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    IntKeyword,
    VoidKeyword,
    IfKeyword,
    ElseKeyword,
    WhileKeyword,
    ReturnKeyword,
    BreakKeyword,
    ContinueKeyword,
    OpenParen,
    CloseParen,
    OpenSquare,
    CloseSquare,
    OpenBrace,
    CloseBrace,
    Comma,
    SemiColon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    EqualEqual,
    Equal,
    BangEqual,
    AmpAmp,
    PipePipe,
    IntLit(u32),
    Identifier(String),
}

#[derive(Debug, Clone)]
pub struct LexicalError {
    pub msg: String,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct Lexer<'input> {
    chars: Peekable<Chars<'input>>,
    line: u32,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn if_next(&mut self, c: char, true_tok: Token, false_tok: Token) -> Token {
        if self.chars.peek() == Some(&c) {
            self.chars.next();
            true_tok
        } else {
            false_tok
        }
    }

    /// Skips whitespace and `//` / `/* */` comments.
    fn skip_trivia(&mut self) -> Result<(), LexicalError> {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    match ahead.next() {
                        Some('/') => {
                            while let Some(&c) = self.chars.peek() {
                                if c == '\n' {
                                    break;
                                }
                                self.bump();
                            }
                        }
                        Some('*') => {
                            let open_line = self.line;
                            self.bump();
                            self.bump();
                            let mut closed = false;
                            while let Some(c) = self.bump() {
                                if c == '*' && self.chars.peek() == Some(&'/') {
                                    self.bump();
                                    closed = true;
                                    break;
                                }
                            }
                            if !closed {
                                return Err(LexicalError {
                                    msg: "Unterminated block comment.".to_string(),
                                    line: open_line,
                                });
                            }
                        }
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn lex_number(&mut self, first: char, line: u32) -> Result<(u32, Token), LexicalError> {
        if first == '0' && matches!(self.chars.peek(), Some('x') | Some('X')) {
            self.chars.next();
            let digits: String = self
                .chars
                .peeking_take_while(|c| c.is_ascii_hexdigit())
                .collect();
            if digits.is_empty() {
                return Err(LexicalError {
                    msg: "Missing digits after hexadecimal prefix.".to_string(),
                    line,
                });
            }
            return match u32::from_str_radix(&digits, 16) {
                Ok(val) => Ok((line, Token::IntLit(val))),
                Err(_) => Err(LexicalError {
                    msg: format!("Integer literal '0x{}' is out of range.", digits),
                    line,
                }),
            };
        }

        let mut lit = first.to_string();
        lit.extend(self.chars.peeking_take_while(|c| c.is_ascii_digit()));

        // A leading zero selects octal, as in C.
        let (digits, radix) = if first == '0' && lit.len() > 1 {
            (&lit[1..], 8)
        } else {
            (lit.as_str(), 10)
        };
        match u32::from_str_radix(digits, radix) {
            Ok(val) => Ok((line, Token::IntLit(val))),
            Err(_) => Err(LexicalError {
                msg: format!("Invalid integer literal '{}'.", lit),
                line,
            }),
        }
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Result<(u32, Token), LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(err) = self.skip_trivia() {
            return Some(Err(err));
        }

        let line = self.line;
        let c = self.bump()?;
        Some(match c {
            '{' => Ok((line, Token::OpenBrace)),
            '}' => Ok((line, Token::CloseBrace)),
            '(' => Ok((line, Token::OpenParen)),
            ')' => Ok((line, Token::CloseParen)),
            '[' => Ok((line, Token::OpenSquare)),
            ']' => Ok((line, Token::CloseSquare)),

            ',' => Ok((line, Token::Comma)),
            ';' => Ok((line, Token::SemiColon)),

            '+' => Ok((line, Token::Plus)),
            '-' => Ok((line, Token::Minus)),
            '*' => Ok((line, Token::Star)),
            '/' => Ok((line, Token::Slash)),
            '%' => Ok((line, Token::Percent)),

            '<' => Ok((line, self.if_next('=', Token::LessEqual, Token::Less))),
            '>' => Ok((line, self.if_next('=', Token::GreaterEqual, Token::Greater))),
            '=' => Ok((line, self.if_next('=', Token::EqualEqual, Token::Equal))),
            '!' => Ok((line, self.if_next('=', Token::BangEqual, Token::Bang))),

            '&' => {
                if self.chars.peek() == Some(&'&') {
                    self.chars.next();
                    Ok((line, Token::AmpAmp))
                } else {
                    Err(LexicalError {
                        msg: "Unexpected '&', expected '&&'.".to_string(),
                        line,
                    })
                }
            }
            '|' => {
                if self.chars.peek() == Some(&'|') {
                    self.chars.next();
                    Ok((line, Token::PipePipe))
                } else {
                    Err(LexicalError {
                        msg: "Unexpected '|', expected '||'.".to_string(),
                        line,
                    })
                }
            }

            c if c.is_ascii_digit() => self.lex_number(c, line),
            c if UnicodeXID::is_xid_start(c) => {
                let mut id = c.to_string();
                id.extend(
                    self.chars
                        .peeking_take_while(|&c| UnicodeXID::is_xid_continue(c)),
                );
                Ok((line, utils::identifier_or_keyword(id)))
            }
            c => Err(LexicalError {
                msg: format!("Unexpected '{}'.", c),
                line,
            }),
        })
    }
}

mod utils {
    use super::Token;

    pub fn identifier_or_keyword(s: String) -> Token {
        match s.as_str() {
            "int" => Token::IntKeyword,
            "void" => Token::VoidKeyword,
            "if" => Token::IfKeyword,
            "else" => Token::ElseKeyword,
            "while" => Token::WhileKeyword,
            "return" => Token::ReturnKeyword,
            "break" => Token::BreakKeyword,
            "continue" => Token::ContinueKeyword,
            _ => Token::Identifier(s),
        }
    }
}
