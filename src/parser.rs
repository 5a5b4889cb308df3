//! Recursive-descent parser for the MiniC grammar, producing the CST.
//!
//! One function per nonterminal over a token cursor. There is no error
//! recovery: the first syntax error aborts the parse.

use crate::cst::*;
use crate::lexer::{Lexer, LexicalError, Token};

#[derive(Debug, Clone)]
pub struct ParseError {
    pub msg: String,
    pub line: u32,
}

impl From<LexicalError> for ParseError {
    fn from(err: LexicalError) -> ParseError {
        ParseError {
            msg: err.msg,
            line: err.line,
        }
    }
}

pub fn parse(input: &str) -> Result<CompileUnit, ParseError> {
    let tokens = Lexer::new(input).collect::<Result<Vec<_>, _>>()?;
    Parser { tokens, pos: 0 }.compile_unit()
}

struct Parser {
    tokens: Vec<(u32, Token)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, tok)| tok)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(_, tok)| tok)
    }

    fn line(&self) -> u32 {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(line, _)| *line)
            .unwrap_or(1)
    }

    fn bump(&mut self) -> Option<(u32, Token)> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Token, what: &str) -> Result<u32, ParseError> {
        let line = self.line();
        match self.bump() {
            Some((line, found)) if found == tok => Ok(line),
            Some((line, found)) => Err(ParseError {
                msg: format!("Expected {}, found {:?}.", what, found),
                line,
            }),
            None => Err(ParseError {
                msg: format!("Expected {}, found end of input.", what),
                line,
            }),
        }
    }

    fn expect_identifier(&mut self) -> Result<(String, u32), ParseError> {
        let line = self.line();
        match self.bump() {
            Some((line, Token::Identifier(name))) => Ok((name, line)),
            Some((line, found)) => Err(ParseError {
                msg: format!("Expected an identifier, found {:?}.", found),
                line,
            }),
            None => Err(ParseError {
                msg: "Expected an identifier, found end of input.".to_string(),
                line,
            }),
        }
    }

    fn error(&self, msg: impl Into<String>) -> ParseError {
        ParseError {
            msg: msg.into(),
            line: self.line(),
        }
    }

    // compileUnit : (funcDef | varDecl)* EOF
    fn compile_unit(mut self) -> Result<CompileUnit, ParseError> {
        let mut items = Vec::new();
        while self.peek().is_some() {
            items.push(self.top_level()?);
        }
        Ok(CompileUnit { items })
    }

    fn top_level(&mut self) -> Result<TopLevel, ParseError> {
        match self.peek() {
            Some(Token::VoidKeyword) => Ok(TopLevel::Func(self.func_def()?)),
            Some(Token::IntKeyword) => {
                // 'int' ID '(' opens a function definition, anything else a
                // variable declaration.
                if matches!(self.peek_nth(1), Some(Token::Identifier(_)))
                    && self.peek_nth(2) == Some(&Token::OpenParen)
                {
                    Ok(TopLevel::Func(self.func_def()?))
                } else {
                    Ok(TopLevel::Var(self.var_decl()?))
                }
            }
            _ => Err(self.error("Expected 'int' or 'void' at top level.")),
        }
    }

    // funcDef : funcType ID '(' funcFParams? ')' block
    fn func_def(&mut self) -> Result<FuncDef, ParseError> {
        let (ret, ret_line) = match self.bump() {
            Some((line, Token::IntKeyword)) => (FuncType::Int, line),
            Some((line, Token::VoidKeyword)) => (FuncType::Void, line),
            _ => return Err(self.error("Expected a function return type.")),
        };
        let (name, line) = self.expect_identifier()?;
        self.expect(Token::OpenParen, "'('")?;
        let mut params = Vec::new();
        if self.peek() != Some(&Token::CloseParen) {
            loop {
                params.push(self.func_f_param()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::CloseParen, "')'")?;
        let body = self.block()?;
        Ok(FuncDef {
            ret,
            ret_line,
            name,
            line,
            params,
            body,
        })
    }

    // funcFParam : basicType ID ('[' expr? ']' ('[' expr ']')*)?
    fn func_f_param(&mut self) -> Result<FuncFParam, ParseError> {
        self.expect(Token::IntKeyword, "'int'")?;
        let (name, line) = self.expect_identifier()?;
        let array = if self.eat(&Token::OpenSquare) {
            let first = if self.peek() == Some(&Token::CloseSquare) {
                None
            } else {
                Some(self.expr()?)
            };
            self.expect(Token::CloseSquare, "']'")?;
            let mut rest = Vec::new();
            while self.eat(&Token::OpenSquare) {
                rest.push(self.expr()?);
                self.expect(Token::CloseSquare, "']'")?;
            }
            Some(ParamArray { first, rest })
        } else {
            None
        };
        Ok(FuncFParam { name, line, array })
    }

    // block : '{' blockItem* '}'
    fn block(&mut self) -> Result<Block, ParseError> {
        let line = self.expect(Token::OpenBrace, "'{'")?;
        let mut items = Vec::new();
        while self.peek() != Some(&Token::CloseBrace) {
            if self.peek().is_none() {
                return Err(self.error("Unclosed block, expected '}'."));
            }
            items.push(self.block_item()?);
        }
        self.expect(Token::CloseBrace, "'}'")?;
        Ok(Block { items, line })
    }

    // blockItem : stmt | varDecl
    fn block_item(&mut self) -> Result<BlockItem, ParseError> {
        if self.peek() == Some(&Token::IntKeyword) {
            Ok(BlockItem::Decl(self.var_decl()?))
        } else {
            Ok(BlockItem::Stmt(self.stmt()?))
        }
    }

    // varDecl : basicType varDef (',' varDef)* ';'
    fn var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let line = self.expect(Token::IntKeyword, "'int'")?;
        let mut defs = vec![self.var_def()?];
        while self.eat(&Token::Comma) {
            defs.push(self.var_def()?);
        }
        self.expect(Token::SemiColon, "';'")?;
        Ok(VarDecl { defs, line })
    }

    // varDef : ID ('[' expr ']')* ('=' initVal)?
    fn var_def(&mut self) -> Result<VarDef, ParseError> {
        let (name, line) = self.expect_identifier()?;
        let mut dims = Vec::new();
        while self.eat(&Token::OpenSquare) {
            dims.push(self.expr()?);
            self.expect(Token::CloseSquare, "']'")?;
        }
        let init = if self.eat(&Token::Equal) {
            Some(self.init_val()?)
        } else {
            None
        };
        Ok(VarDef {
            name,
            line,
            dims,
            init,
        })
    }

    // initVal : expr | '{' initVal (',' initVal)* '}'
    fn init_val(&mut self) -> Result<InitVal, ParseError> {
        if self.peek() == Some(&Token::OpenBrace) {
            let line = self.expect(Token::OpenBrace, "'{'")?;
            let mut vals = vec![self.init_val()?];
            while self.eat(&Token::Comma) {
                vals.push(self.init_val()?);
            }
            self.expect(Token::CloseBrace, "'}'")?;
            Ok(InitVal::List { vals, line })
        } else {
            Ok(InitVal::Expr(self.expr()?))
        }
    }

    fn stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek() {
            Some(Token::ReturnKeyword) => {
                let line = self.expect(Token::ReturnKeyword, "'return'")?;
                let value = if self.peek() == Some(&Token::SemiColon) {
                    None
                } else {
                    Some(self.expr()?)
                };
                self.expect(Token::SemiColon, "';'")?;
                Ok(Stmt::Return { value, line })
            }
            Some(Token::OpenBrace) => Ok(Stmt::Block(self.block()?)),
            Some(Token::IfKeyword) => {
                let line = self.expect(Token::IfKeyword, "'if'")?;
                self.expect(Token::OpenParen, "'('")?;
                let cond = self.expr()?;
                self.expect(Token::CloseParen, "')'")?;
                let then = Box::new(self.stmt()?);
                let els = if self.eat(&Token::ElseKeyword) {
                    Some(Box::new(self.stmt()?))
                } else {
                    None
                };
                Ok(Stmt::If {
                    cond,
                    then,
                    els,
                    line,
                })
            }
            Some(Token::WhileKeyword) => {
                let line = self.expect(Token::WhileKeyword, "'while'")?;
                self.expect(Token::OpenParen, "'('")?;
                let cond = self.expr()?;
                self.expect(Token::CloseParen, "')'")?;
                let body = Box::new(self.stmt()?);
                Ok(Stmt::While { cond, body, line })
            }
            Some(Token::BreakKeyword) => {
                let line = self.expect(Token::BreakKeyword, "'break'")?;
                self.expect(Token::SemiColon, "';'")?;
                Ok(Stmt::Break { line })
            }
            Some(Token::ContinueKeyword) => {
                let line = self.expect(Token::ContinueKeyword, "'continue'")?;
                self.expect(Token::SemiColon, "';'")?;
                Ok(Stmt::Continue { line })
            }
            Some(Token::SemiColon) => {
                let line = self.expect(Token::SemiColon, "';'")?;
                Ok(Stmt::Expr { value: None, line })
            }
            Some(_) => {
                // Either 'lVal = expr ;' or a bare expression statement.
                // Parse an expression first, then look for '='.
                let line = self.line();
                let expr = self.expr()?;
                if self.eat(&Token::Equal) {
                    let target = match utils::expr_to_lval(expr) {
                        Some(lval) => lval,
                        None => {
                            return Err(ParseError {
                                msg: "Assignment target is not an lvalue.".to_string(),
                                line,
                            })
                        }
                    };
                    let value = self.expr()?;
                    self.expect(Token::SemiColon, "';'")?;
                    Ok(Stmt::Assign {
                        target,
                        value,
                        line,
                    })
                } else {
                    self.expect(Token::SemiColon, "';'")?;
                    Ok(Stmt::Expr {
                        value: Some(expr),
                        line,
                    })
                }
            }
            None => Err(self.error("Expected a statement, found end of input.")),
        }
    }

    // expr : lOrExp
    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.l_or_exp()
    }

    // lOrExp : lAndExp ('||' lAndExp)*
    fn l_or_exp(&mut self) -> Result<LOrExp, ParseError> {
        let first = self.l_and_exp()?;
        let mut rest = Vec::new();
        while self.eat(&Token::PipePipe) {
            rest.push(self.l_and_exp()?);
        }
        Ok(LOrExp { first, rest })
    }

    // lAndExp : eqExp ('&&' eqExp)*
    fn l_and_exp(&mut self) -> Result<LAndExp, ParseError> {
        let first = self.eq_exp()?;
        let mut rest = Vec::new();
        while self.eat(&Token::AmpAmp) {
            rest.push(self.eq_exp()?);
        }
        Ok(LAndExp { first, rest })
    }

    // eqExp : relExp (('=='|'!=') relExp)*
    fn eq_exp(&mut self) -> Result<EqExp, ParseError> {
        let first = self.rel_exp()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::EqualEqual) => EqOp::Eq,
                Some(Token::BangEqual) => EqOp::Ne,
                _ => break,
            };
            self.pos += 1;
            rest.push((op, self.rel_exp()?));
        }
        Ok(EqExp { first, rest })
    }

    // relExp : addExp (('<'|'>'|'<='|'>=') addExp)*
    fn rel_exp(&mut self) -> Result<RelExp, ParseError> {
        let first = self.add_exp()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Less) => RelOp::Lt,
                Some(Token::Greater) => RelOp::Gt,
                Some(Token::LessEqual) => RelOp::Le,
                Some(Token::GreaterEqual) => RelOp::Ge,
                _ => break,
            };
            self.pos += 1;
            rest.push((op, self.add_exp()?));
        }
        Ok(RelExp { first, rest })
    }

    // addExp : mulExp (('+'|'-') mulExp)*
    fn add_exp(&mut self) -> Result<AddExp, ParseError> {
        let first = self.mul_exp()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => AddOp::Add,
                Some(Token::Minus) => AddOp::Sub,
                _ => break,
            };
            self.pos += 1;
            rest.push((op, self.mul_exp()?));
        }
        Ok(AddExp { first, rest })
    }

    // mulExp : unaryExp (('*'|'/'|'%') unaryExp)*
    fn mul_exp(&mut self) -> Result<MulExp, ParseError> {
        let first = self.unary_exp()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Star) => MulOp::Mul,
                Some(Token::Slash) => MulOp::Div,
                Some(Token::Percent) => MulOp::Mod,
                _ => break,
            };
            self.pos += 1;
            rest.push((op, self.unary_exp()?));
        }
        Ok(MulExp { first, rest })
    }

    // unaryExp : primaryExp | ID '(' realParamList? ')' | ('!'|'-') unaryExp
    fn unary_exp(&mut self) -> Result<UnaryExp, ParseError> {
        match self.peek() {
            Some(Token::Bang) | Some(Token::Minus) => {
                let (line, tok) = match self.bump() {
                    Some(pair) => pair,
                    None => return Err(self.error("Expected a unary operator.")),
                };
                let op = if tok == Token::Bang {
                    UnaryOp::Not
                } else {
                    UnaryOp::Neg
                };
                let operand = Box::new(self.unary_exp()?);
                Ok(UnaryExp::Unary { op, operand, line })
            }
            Some(Token::Identifier(_)) if self.peek_nth(1) == Some(&Token::OpenParen) => {
                let (name, line) = self.expect_identifier()?;
                self.expect(Token::OpenParen, "'('")?;
                let mut args = Vec::new();
                if self.peek() != Some(&Token::CloseParen) {
                    loop {
                        args.push(self.expr()?);
                        if !self.eat(&Token::Comma) {
                            break;
                        }
                    }
                }
                self.expect(Token::CloseParen, "')'")?;
                Ok(UnaryExp::Call { name, line, args })
            }
            _ => Ok(UnaryExp::Primary(self.primary_exp()?)),
        }
    }

    // primaryExp : '(' expr ')' | DIGIT | lVal
    fn primary_exp(&mut self) -> Result<PrimaryExp, ParseError> {
        match self.bump() {
            Some((_, Token::OpenParen)) => {
                let inner = self.expr()?;
                self.expect(Token::CloseParen, "')'")?;
                Ok(PrimaryExp::Paren(Box::new(inner)))
            }
            Some((line, Token::IntLit(value))) => Ok(PrimaryExp::Number { value, line }),
            Some((line, Token::Identifier(name))) => {
                let mut indices = Vec::new();
                while self.eat(&Token::OpenSquare) {
                    indices.push(self.expr()?);
                    self.expect(Token::CloseSquare, "']'")?;
                }
                Ok(PrimaryExp::LVal(LVal {
                    name,
                    line,
                    indices,
                }))
            }
            Some((line, found)) => Err(ParseError {
                msg: format!("Expected an expression, found {:?}.", found),
                line,
            }),
            None => Err(self.error("Expected an expression, found end of input.")),
        }
    }
}

mod utils {
    use crate::cst::*;

    /// Reduces a just-parsed expression back to the `lVal` it came from, if
    /// it is one. Used to commit the `lVal '=' expr ';'` production after
    /// the fact.
    pub fn expr_to_lval(expr: Expr) -> Option<LVal> {
        let LOrExp { first, rest } = expr;
        if !rest.is_empty() {
            return None;
        }
        let LAndExp { first, rest } = first;
        if !rest.is_empty() {
            return None;
        }
        let EqExp { first, rest } = first;
        if !rest.is_empty() {
            return None;
        }
        let RelExp { first, rest } = first;
        if !rest.is_empty() {
            return None;
        }
        let AddExp { first, rest } = first;
        if !rest.is_empty() {
            return None;
        }
        let MulExp { first, rest } = first;
        if !rest.is_empty() {
            return None;
        }
        match first {
            UnaryExp::Primary(PrimaryExp::LVal(lval)) => Some(lval),
            _ => None,
        }
    }
}
