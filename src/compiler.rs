// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Tobias Sarnowski <tobias@sarnowski.cloud>

//! Single-pass Pratt compiler: parses tokens pulled from the scanner and
//! emits bytecode directly, with no intermediate AST.

#[cfg(test)]
mod compiler_test;

use std::rc::Rc;

use crate::chunk::OpCode;
use crate::scanner::{Scanner, Token, TokenKind};
use crate::table::Table;
use crate::value::{ObjFunction, ObjString, Value, hash_bytes};

/// Compilation failed; individual diagnostics were already written to
/// stderr as they were discovered.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("compilation failed")]
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
enum Precedence {
    None,
    Assignment,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Call,
    Primary,
}

impl Precedence {
    const fn one_higher(self) -> Self {
        match self {
            Self::None => Self::Assignment,
            Self::Assignment => Self::Or,
            Self::Or => Self::And,
            Self::And => Self::Equality,
            Self::Equality => Self::Comparison,
            Self::Comparison => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor => Self::Unary,
            Self::Unary => Self::Call,
            Self::Call | Self::Primary => Self::Primary,
        }
    }
}

fn infix_precedence(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Or => Precedence::Or,
        TokenKind::And => Precedence::And,
        TokenKind::EqualEqual | TokenKind::BangEqual => Precedence::Equality,
        TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual => {
            Precedence::Comparison
        }
        TokenKind::Plus | TokenKind::Minus => Precedence::Term,
        TokenKind::Slash | TokenKind::Star => Precedence::Factor,
        _ => Precedence::None,
    }
}

struct Local {
    name: String,
    /// -1 while the initializer is still being compiled, to reject
    /// `var a = a;` referencing itself.
    depth: i32,
}

/// Maximum number of locals live at once within a single function.
const MAX_LOCALS: usize = 256;

struct Compiler<'src, 'tbl> {
    scanner: Scanner<'src>,
    previous: Token<'src>,
    current: Token<'src>,
    had_error: bool,
    panic_mode: bool,
    strings: &'tbl mut Table,
    function: ObjFunction,
    locals: Vec<Local>,
    scope_depth: i32,
}

impl<'src, 'tbl> Compiler<'src, 'tbl> {
    fn new(source: &'src str, strings: &'tbl mut Table) -> Self {
        let placeholder = Token {
            kind: TokenKind::Eof,
            lexeme: "",
            line: 0,
        };
        Self {
            scanner: Scanner::new(source),
            previous: placeholder,
            current: placeholder,
            had_error: false,
            panic_mode: false,
            strings,
            function: ObjFunction::new(None),
            locals: vec![Local {
                name: String::new(),
                depth: 0,
            }],
            scope_depth: 0,
        }
    }

    // --- token stream ---

    fn advance(&mut self) {
        self.previous = self.current;
        loop {
            self.current = self.scanner.scan_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            self.error_at_current(self.current.lexeme);
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.current.kind == kind {
            self.advance();
            return;
        }
        self.error_at_current(message);
    }

    // --- error reporting ---

    fn error_at_current(&mut self, message: &str) {
        let token = self.current;
        self.error_at(token, message);
    }

    fn error(&mut self, message: &str) {
        let token = self.previous;
        self.error_at(token, message);
    }

    fn error_at(&mut self, token: Token<'src>, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        eprint!("[line {}] ", token.line);
        if token.kind == TokenKind::Eof {
            eprintln!(" at end");
        } else {
            eprintln!("{message}");
        }
        self.had_error = true;
    }

    fn synchronize(&mut self) {
        self.panic_mode = false;
        while self.current.kind != TokenKind::Eof {
            if self.previous.kind == TokenKind::Semicolon {
                return;
            }
            match self.current.kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {}
            }
            self.advance();
        }
    }

    // --- bytecode emission ---

    fn emit_byte(&mut self, byte: u8) {
        let line = self.previous.line;
        self.function.chunk.write(byte, line);
    }

    fn emit_op(&mut self, op: OpCode) {
        self.emit_byte(op as u8);
    }

    fn emit_bytes(&mut self, op: u8, operand: u8) {
        self.emit_byte(op);
        self.emit_byte(operand);
    }

    fn emit_constant(&mut self, value: Value) {
        match self.function.chunk.add_constant(value) {
            Some(index) => self.emit_bytes(OpCode::Constant as u8, index),
            None => self.error("Too many constants in one chunk."),
        }
    }

    /// Emit a jump opcode with a placeholder operand; returns the offset of
    /// the operand's first byte for later patching.
    fn emit_jump(&mut self, op: OpCode) -> usize {
        self.emit_op(op);
        self.emit_byte(0xff);
        self.emit_byte(0xff);
        self.function.chunk.len() - 2
    }

    fn patch_jump(&mut self, offset: usize) {
        let jump = self.function.chunk.len() - offset - 2;
        if jump > usize::from(u16::MAX) {
            self.error("Too much code to jump over.");
            return;
        }
        self.function.chunk.patch_jump_operand(offset, jump as u16);
    }

    fn emit_loop(&mut self, loop_start: usize) {
        self.emit_op(OpCode::Loop);
        let offset = self.function.chunk.len() - loop_start + 2;
        if offset > usize::from(u16::MAX) {
            self.error("Loop body too large.");
            return;
        }
        let bytes = (offset as u16).to_be_bytes();
        self.emit_byte(bytes[0]);
        self.emit_byte(bytes[1]);
    }

    fn emit_return(&mut self) {
        self.emit_op(OpCode::Return);
    }

    // --- strings ---

    fn intern_string(&mut self, text: &str) -> Rc<ObjString> {
        let bytes = text.as_bytes();
        let hash = hash_bytes(bytes);
        if let Some(existing) = self.strings.find_interned(bytes, hash) {
            return existing;
        }
        let obj = Rc::new(ObjString::new(text.into(), hash));
        self.strings.set(&obj, Value::nil());
        obj
    }

    fn identifier_constant(&mut self, name: &str) -> u8 {
        let interned = self.intern_string(name);
        match self.function.chunk.add_constant(Value::string(interned)) {
            Some(index) => index,
            None => {
                self.error("Too many constants in one chunk.");
                0
            }
        }
    }

    // --- scopes and locals ---

    fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    fn end_scope(&mut self) {
        self.scope_depth -= 1;
        while let Some(local) = self.locals.last() {
            if local.depth <= self.scope_depth {
                break;
            }
            self.emit_op(OpCode::Pop);
            self.locals.pop();
        }
    }

    fn add_local(&mut self, name: &str) {
        if self.locals.len() >= MAX_LOCALS {
            self.error("Too many local variables in function.");
            return;
        }
        self.locals.push(Local {
            name: name.to_string(),
            depth: -1,
        });
    }

    fn declare_variable(&mut self) {
        if self.scope_depth == 0 {
            return;
        }
        let name = self.previous.lexeme;
        for local in self.locals.iter().rev() {
            if local.depth != -1 && local.depth < self.scope_depth {
                break;
            }
            if local.name == name {
                self.error("Already a variable with this name in this scope.");
            }
        }
        self.add_local(name);
    }

    fn parse_variable(&mut self, message: &str) -> u8 {
        self.consume(TokenKind::Identifier, message);
        self.declare_variable();
        if self.scope_depth > 0 {
            return 0;
        }
        self.identifier_constant(self.previous.lexeme)
    }

    fn mark_initialized(&mut self) {
        if self.scope_depth == 0 {
            return;
        }
        if let Some(local) = self.locals.last_mut() {
            local.depth = self.scope_depth;
        }
    }

    fn define_variable(&mut self, global: u8) {
        if self.scope_depth > 0 {
            self.mark_initialized();
            return;
        }
        self.emit_bytes(OpCode::DefineGlobal as u8, global);
    }

    fn resolve_local(&mut self, name: &str) -> Option<u8> {
        for (i, local) in self.locals.iter().enumerate().rev() {
            if local.name == name {
                if local.depth == -1 {
                    self.error("Can't read local variable in its own initializer.");
                }
                return Some(i as u8);
            }
        }
        None
    }

    // --- expressions ---

    fn parse_precedence(&mut self, precedence: Precedence) {
        self.advance();
        let can_assign = precedence <= Precedence::Assignment;
        if !self.prefix_rule(can_assign) {
            self.error("Expect expression.");
            return;
        }

        while precedence <= infix_precedence(self.current.kind) {
            self.advance();
            self.infix_rule();
        }

        if can_assign && self.match_token(TokenKind::Equal) {
            self.error("Invalid assignment target.");
        }
    }

    /// Dispatches on `self.previous`. Returns false if it has no prefix rule.
    fn prefix_rule(&mut self, can_assign: bool) -> bool {
        match self.previous.kind {
            TokenKind::LeftParen => self.grouping(),
            TokenKind::Minus | TokenKind::Bang => self.unary(),
            TokenKind::Number => self.number(),
            TokenKind::String => self.string(),
            TokenKind::True | TokenKind::False | TokenKind::Nil => self.literal(),
            TokenKind::Identifier => self.variable(can_assign),
            _ => return false,
        }
        true
    }

    /// Dispatches on `self.previous`, which the `parse_precedence` loop has
    /// just advanced onto an operator token.
    fn infix_rule(&mut self) {
        match self.previous.kind {
            TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Slash
            | TokenKind::Star
            | TokenKind::BangEqual
            | TokenKind::EqualEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual
            | TokenKind::Less
            | TokenKind::LessEqual => self.binary(),
            TokenKind::And => self.and(),
            TokenKind::Or => self.or(),
            _ => {}
        }
    }

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    fn grouping(&mut self) {
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after expression.");
    }

    fn unary(&mut self) {
        let op_kind = self.previous.kind;
        self.parse_precedence(Precedence::Unary);
        match op_kind {
            TokenKind::Minus => self.emit_op(OpCode::Negate),
            TokenKind::Bang => self.emit_op(OpCode::Not),
            _ => debug_assert!(false, "unary only called for - and !"),
        }
    }

    fn binary(&mut self) {
        let op_kind = self.previous.kind;
        let rule_precedence = infix_precedence(op_kind);
        self.parse_precedence(rule_precedence.one_higher());
        match op_kind {
            TokenKind::Plus => self.emit_op(OpCode::Add),
            TokenKind::Minus => self.emit_op(OpCode::Subtract),
            TokenKind::Star => self.emit_op(OpCode::Multiply),
            TokenKind::Slash => self.emit_op(OpCode::Divide),
            TokenKind::EqualEqual => self.emit_op(OpCode::Equal),
            TokenKind::BangEqual => {
                self.emit_op(OpCode::Equal);
                self.emit_op(OpCode::Not);
            }
            TokenKind::Greater => self.emit_op(OpCode::Greater),
            TokenKind::GreaterEqual => {
                self.emit_op(OpCode::Less);
                self.emit_op(OpCode::Not);
            }
            TokenKind::Less => self.emit_op(OpCode::Less),
            TokenKind::LessEqual => {
                self.emit_op(OpCode::Greater);
                self.emit_op(OpCode::Not);
            }
            _ => debug_assert!(false, "binary only called for binary operator tokens"),
        }
    }

    fn and(&mut self) {
        let end_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.emit_op(OpCode::Pop);
        self.parse_precedence(Precedence::And);
        self.patch_jump(end_jump);
    }

    fn or(&mut self) {
        let else_jump = self.emit_jump(OpCode::JumpIfFalse);
        let end_jump = self.emit_jump(OpCode::Jump);
        self.patch_jump(else_jump);
        self.emit_op(OpCode::Pop);
        self.parse_precedence(Precedence::Or);
        self.patch_jump(end_jump);
    }

    fn number(&mut self) {
        let value = self.previous.lexeme.parse::<f64>().unwrap_or(0.0);
        self.emit_constant(Value::number(value));
    }

    fn string(&mut self) {
        let lexeme = self.previous.lexeme;
        let text = &lexeme[1..lexeme.len() - 1];
        let interned = self.intern_string(text);
        self.emit_constant(Value::string(interned));
    }

    fn literal(&mut self) {
        match self.previous.kind {
            TokenKind::False => self.emit_op(OpCode::False),
            TokenKind::True => self.emit_op(OpCode::True),
            TokenKind::Nil => self.emit_op(OpCode::Nil),
            _ => debug_assert!(false, "literal only called for false/true/nil"),
        }
    }

    fn variable(&mut self, can_assign: bool) {
        let name = self.previous;
        self.named_variable(name, can_assign);
    }

    fn named_variable(&mut self, name: Token<'src>, can_assign: bool) {
        let (get_op, set_op, arg) = if let Some(slot) = self.resolve_local(name.lexeme) {
            (OpCode::GetLocal, OpCode::SetLocal, slot)
        } else {
            let constant = self.identifier_constant(name.lexeme);
            (OpCode::GetGlobal, OpCode::SetGlobal, constant)
        };

        if can_assign && self.match_token(TokenKind::Equal) {
            self.expression();
            self.emit_bytes(set_op as u8, arg);
        } else {
            self.emit_bytes(get_op as u8, arg);
        }
    }

    // --- statements ---

    fn declaration(&mut self) {
        if self.match_token(TokenKind::Var) {
            self.var_declaration();
        } else {
            self.statement();
        }
        if self.panic_mode {
            self.synchronize();
        }
    }

    fn var_declaration(&mut self) {
        let global = self.parse_variable("Expect variable name.");
        if self.match_token(TokenKind::Equal) {
            self.expression();
        } else {
            self.emit_op(OpCode::Nil);
        }
        self.consume(
            TokenKind::Semicolon,
            "Expect ';' after variable declaration.",
        );
        self.define_variable(global);
    }

    fn statement(&mut self) {
        if self.match_token(TokenKind::Print) {
            self.print_statement();
        } else if self.match_token(TokenKind::If) {
            self.if_statement();
        } else if self.match_token(TokenKind::While) {
            self.while_statement();
        } else if self.match_token(TokenKind::For) {
            self.for_statement();
        } else if self.match_token(TokenKind::LeftBrace) {
            self.begin_scope();
            self.block();
            self.end_scope();
        } else {
            self.expression_statement();
        }
    }

    fn block(&mut self) {
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            self.declaration();
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.");
    }

    fn print_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "Expect ';' after value.");
        self.emit_op(OpCode::Print);
    }

    fn expression_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.");
        self.emit_op(OpCode::Pop);
    }

    fn if_statement(&mut self) {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.");
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after condition.");

        let then_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.emit_op(OpCode::Pop);
        self.statement();

        let else_jump = self.emit_jump(OpCode::Jump);
        self.patch_jump(then_jump);
        self.emit_op(OpCode::Pop);

        if self.match_token(TokenKind::Else) {
            self.statement();
        }
        self.patch_jump(else_jump);
    }

    fn while_statement(&mut self) {
        let loop_start = self.function.chunk.len();
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.");
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after condition.");

        let exit_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.emit_op(OpCode::Pop);
        self.statement();
        self.emit_loop(loop_start);

        self.patch_jump(exit_jump);
        self.emit_op(OpCode::Pop);
    }

    fn for_statement(&mut self) {
        self.begin_scope();
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.");

        if self.match_token(TokenKind::Semicolon) {
            // no initializer
        } else if self.match_token(TokenKind::Var) {
            self.var_declaration();
        } else {
            self.expression_statement();
        }

        let mut loop_start = self.function.chunk.len();
        let mut exit_jump = None;
        if !self.match_token(TokenKind::Semicolon) {
            self.expression();
            self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.");
            exit_jump = Some(self.emit_jump(OpCode::JumpIfFalse));
            self.emit_op(OpCode::Pop);
        }

        if !self.match_token(TokenKind::RightParen) {
            let body_jump = self.emit_jump(OpCode::Jump);
            let increment_start = self.function.chunk.len();
            self.expression();
            self.emit_op(OpCode::Pop);
            self.consume(TokenKind::RightParen, "Expect ')' after for clauses.");

            self.emit_loop(loop_start);
            loop_start = increment_start;
            self.patch_jump(body_jump);
        }

        self.statement();
        self.emit_loop(loop_start);

        if let Some(exit_jump) = exit_jump {
            self.patch_jump(exit_jump);
            self.emit_op(OpCode::Pop);
        }
        self.end_scope();
    }
}

/// Compile `source` into a top-level function. On failure, diagnostics have
/// already been written to stderr and `Err(CompileError::Failed)` is
/// returned.
pub fn compile(source: &str, strings: &mut Table) -> Result<ObjFunction, CompileError> {
    let mut compiler = Compiler::new(source, strings);
    compiler.advance();

    while !compiler.match_token(TokenKind::Eof) {
        compiler.declaration();
    }
    compiler.emit_return();

    if compiler.had_error {
        Err(CompileError::Failed)
    } else {
        Ok(compiler.function)
    }
}
