// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Tobias Sarnowski <tobias@sarnowski.cloud>

//! The stack-based virtual machine: execution loop, operator dispatch, and
//! runtime error recovery.

#[cfg(test)]
mod vm_test;

use std::rc::Rc;

use crate::chunk::{Chunk, OpCode};
use crate::compiler::compile;
use crate::disassemble::disassemble_chunk;
use crate::error::TallowError;
use crate::table::Table;
use crate::value::{Obj, ObjString, Value, hash_bytes};

/// A runtime error. The human-readable message and `[line N] in script`
/// trailer have already been written to stderr by the time this is
/// returned; it exists to carry the failure through `?` to `main`.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("runtime error")]
    Reported,
}

/// Maximum depth of the value stack.
const STACK_MAX: usize = 256;

/// Pop the top of the stack. Every call site is reached only from a chunk
/// whose emitting opcode is statically known to leave at least one value
/// there; an empty stack here is a compiler bug, not a user-facing error, so
/// this falls back to `nil` rather than panicking.
fn pop_value(stack: &mut Vec<Value>) -> Value {
    stack.pop().unwrap_or(Value::Nil)
}

/// Read the top of the stack without removing it. Same trusted-invariant
/// reasoning as [`pop_value`].
fn top_value(stack: &[Value]) -> &Value {
    &stack[stack.len() - 1]
}

/// Owns the globals table and the string-interning table; both persist
/// across REPL lines sharing one `Vm`.
pub struct Vm {
    strings: Table,
    globals: Table,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    #[must_use]
    pub fn new() -> Self {
        Self {
            strings: Table::new(),
            globals: Table::new(),
        }
    }

    /// Compile and run one unit of source. Errors have already been printed
    /// to stderr; the returned `Err` only distinguishes compile failure from
    /// runtime failure for the caller's exit-code mapping.
    pub fn interpret(&mut self, source: &str, disassemble: bool) -> Result<(), TallowError> {
        let function = compile(source, &mut self.strings)?;
        if disassemble {
            eprint!(
                "{}",
                disassemble_chunk(&function.chunk, function.display_name())
            );
        }
        self.run(&function.chunk)?;
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn run(&mut self, chunk: &Chunk) -> Result<(), RuntimeError> {
        let code = chunk.code();
        let mut ip = 0usize;
        // Slot 0 is reserved by the compiler for the implicit script/function
        // callee (see `Compiler::new`); seed it here so locals' compile-time
        // slot numbers line up with real stack indices.
        let mut stack: Vec<Value> = vec![Value::nil()];

        macro_rules! push {
            ($value:expr) => {{
                if stack.len() >= STACK_MAX {
                    return Err(self.runtime_error(chunk, ip, "Stack overflow."));
                }
                stack.push($value);
            }};
        }

        loop {
            let byte = code[ip];
            ip += 1;
            // Trusted invariant: the compiler never emits a byte other than
            // one of these discriminants; an unrecognized byte can only
            // arise from a corrupt chunk, which this falls back to ending
            // the run on rather than indexing past the opcode table.
            let op = OpCode::from_u8(byte).unwrap_or(OpCode::Return);

            match op {
                OpCode::Constant => {
                    let index = code[ip];
                    ip += 1;
                    push!(chunk.constants[index as usize].clone());
                }
                OpCode::Nil => push!(Value::nil()),
                OpCode::True => push!(Value::bool(true)),
                OpCode::False => push!(Value::bool(false)),
                OpCode::Pop => {
                    stack.pop();
                }
                OpCode::GetLocal => {
                    let slot = code[ip] as usize;
                    ip += 1;
                    push!(stack[slot].clone());
                }
                OpCode::SetLocal => {
                    let slot = code[ip] as usize;
                    ip += 1;
                    stack[slot] = top_value(&stack).clone();
                }
                OpCode::GetGlobal => {
                    let name = self.global_name(chunk, &mut ip);
                    match self.globals.get(&name) {
                        Some(value) => push!(value.clone()),
                        None => {
                            let message = format!("undefined variable '{}'", name.as_str());
                            return Err(self.runtime_error(chunk, ip, &message));
                        }
                    }
                }
                OpCode::DefineGlobal => {
                    let name = self.global_name(chunk, &mut ip);
                    let value = pop_value(&mut stack);
                    self.globals.set(&name, value);
                }
                OpCode::SetGlobal => {
                    let name = self.global_name(chunk, &mut ip);
                    let value = top_value(&stack).clone();
                    if self.globals.set(&name, value) {
                        self.globals.delete(&name);
                        let message = format!("undefined variable '{}'", name.as_str());
                        return Err(self.runtime_error(chunk, ip, &message));
                    }
                }
                OpCode::Equal => {
                    let b = pop_value(&mut stack);
                    let a = pop_value(&mut stack);
                    push!(Value::bool(Value::values_equal(&a, &b)));
                }
                OpCode::Greater => {
                    let (a, b) = match Self::pop_numbers(&mut stack) {
                        Some(pair) => pair,
                        None => return Err(self.runtime_error(chunk, ip, "Operands must be numbers.")),
                    };
                    push!(Value::bool(a > b));
                }
                OpCode::Less => {
                    let (a, b) = match Self::pop_numbers(&mut stack) {
                        Some(pair) => pair,
                        None => return Err(self.runtime_error(chunk, ip, "Operands must be numbers.")),
                    };
                    push!(Value::bool(a < b));
                }
                OpCode::Add => {
                    let b = pop_value(&mut stack);
                    let a = pop_value(&mut stack);
                    match (&a, &b) {
                        (Value::Obj(Obj::String(sa)), Value::Obj(Obj::String(sb))) => {
                            let concatenated = self.concat_strings(sa, sb);
                            push!(Value::string(concatenated));
                        }
                        (Value::Number(na), Value::Number(nb)) => {
                            push!(Value::number(na + nb));
                        }
                        _ => {
                            return Err(self.runtime_error(
                                chunk,
                                ip,
                                "unexpected operands in with + operator",
                            ));
                        }
                    }
                }
                OpCode::Subtract => {
                    let (a, b) = match Self::pop_numbers(&mut stack) {
                        Some(pair) => pair,
                        None => return Err(self.runtime_error(chunk, ip, "Operands must be numbers.")),
                    };
                    push!(Value::number(a - b));
                }
                OpCode::Multiply => {
                    let (a, b) = match Self::pop_numbers(&mut stack) {
                        Some(pair) => pair,
                        None => return Err(self.runtime_error(chunk, ip, "Operands must be numbers.")),
                    };
                    push!(Value::number(a * b));
                }
                OpCode::Divide => {
                    let (a, b) = match Self::pop_numbers(&mut stack) {
                        Some(pair) => pair,
                        None => return Err(self.runtime_error(chunk, ip, "Operands must be numbers.")),
                    };
                    push!(Value::number(a / b));
                }
                OpCode::Not => {
                    let value = pop_value(&mut stack);
                    push!(Value::bool(!value.is_truthy()));
                }
                OpCode::Negate => {
                    let operand = pop_value(&mut stack);
                    match operand {
                        Value::Number(n) => push!(Value::number(-n)),
                        _ => return Err(self.runtime_error(chunk, ip, "Operand must be a number.")),
                    }
                }
                OpCode::Print => {
                    let value = pop_value(&mut stack);
                    println!("{value}");
                }
                OpCode::JumpIfFalse => {
                    let offset = chunk.read_u16(ip);
                    ip += 2;
                    if !top_value(&stack).is_truthy() {
                        ip += offset as usize;
                    }
                }
                OpCode::Jump => {
                    let offset = chunk.read_u16(ip);
                    ip += 2;
                    ip += offset as usize;
                }
                OpCode::Loop => {
                    let offset = chunk.read_u16(ip);
                    ip += 2;
                    ip -= offset as usize;
                }
                OpCode::Return => return Ok(()),
            }
        }
    }

    fn global_name(&self, chunk: &Chunk, ip: &mut usize) -> Rc<ObjString> {
        let index = chunk.code()[*ip];
        *ip += 1;
        // Trusted invariant: the compiler only ever stores string constants
        // at indices referenced by a GET/DEFINE/SET_GLOBAL operand.
        match &chunk.constants[index as usize] {
            Value::Obj(Obj::String(s)) => Rc::clone(s),
            _ => Rc::new(ObjString::new(String::new().into_boxed_str(), hash_bytes(b""))),
        }
    }

    fn pop_numbers(stack: &mut Vec<Value>) -> Option<(f64, f64)> {
        let b = pop_value(stack);
        let a = pop_value(stack);
        match (&a, &b) {
            (Value::Number(na), Value::Number(nb)) => Some((*na, *nb)),
            _ => None,
        }
    }

    fn concat_strings(&mut self, a: &Rc<ObjString>, b: &Rc<ObjString>) -> Rc<ObjString> {
        let mut combined = String::with_capacity(a.as_str().len() + b.as_str().len());
        combined.push_str(a.as_str());
        combined.push_str(b.as_str());
        let hash = hash_bytes(combined.as_bytes());
        if let Some(existing) = self.strings.find_interned(combined.as_bytes(), hash) {
            return existing;
        }
        let obj = Rc::new(ObjString::new(combined.into_boxed_str(), hash));
        self.strings.set(&obj, Value::nil());
        obj
    }

    fn runtime_error(&self, chunk: &Chunk, ip: usize, message: &str) -> RuntimeError {
        let line = chunk.line_at(ip.saturating_sub(1));
        eprintln!("{message}");
        eprintln!("[line {line}] in script");
        RuntimeError::Reported
    }
}
