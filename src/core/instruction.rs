// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Instruction decoding
//!
//! An [`Instruction`] is an opcode plus a list of [`Operand`]s. Text lines
//! come from two places with slightly different grammars: `Code.asm` has no
//! trailing annotation, while `trace.txt` may end in a parenthesized
//! [`Annotation`] that is stripped before the remaining tokens are parsed
//! as operands.

use std::fmt;

use super::error::{Result, SimError};
use super::opcode::Opcode;
use super::register::Register;

/// One instruction operand: a register reference or a signed immediate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// `SR<0-7>` / `VR<0-7>`
    Register(Register),
    /// A signed decimal immediate
    Immediate(i64),
}

impl Operand {
    /// The operand as a register, if it is one
    pub fn as_register(&self) -> Option<Register> {
        match self {
            Operand::Register(r) => Some(*r),
            Operand::Immediate(_) => None,
        }
    }

    /// The operand as an immediate, if it is one
    pub fn as_immediate(&self) -> Option<i64> {
        match self {
            Operand::Immediate(i) => Some(*i),
            Operand::Register(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(r) => write!(f, "{r}"),
            Operand::Immediate(i) => write!(f, "{i}"),
        }
    }
}

/// A decoded opcode plus its operand list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The instruction's opcode
    pub opcode: Opcode,
    /// Operands in source order
    pub ops: Vec<Operand>,
}

impl Instruction {
    /// Build the synthetic `HALT` instruction returned for undefined
    /// program-memory reads
    pub fn halt() -> Self {
        Self {
            opcode: Opcode::Halt,
            ops: Vec::new(),
        }
    }

    /// The `idx`-th operand
    pub fn op(&self, idx: usize) -> Operand {
        self.ops[idx]
    }

    /// `op(0)`, the destination operand
    pub fn dst(&self) -> Register {
        self.op(0)
            .as_register()
            .expect("dst() called on a non-register operand")
    }

    /// `op(idx + 1)`, the `idx`-th source operand
    pub fn src(&self, idx: usize) -> Register {
        self.op(idx + 1)
            .as_register()
            .expect("src() called on a non-register operand")
    }

    /// `op(2)`, the immediate operand
    pub fn imm(&self) -> i64 {
        self.op(2)
            .as_immediate()
            .expect("imm() called on a non-immediate operand")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for op in &self.ops {
            write!(f, " {op}")?;
        }
        Ok(())
    }
}

/// Runtime value recorded alongside a retired instruction in a dynamic trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Current VL for vector arithmetic, a computed address for scalar
    /// memory ops, or the next PC for a branch
    Scalar(i64),
    /// Memory addresses produced by a vector load/store, truncated to VL
    Vector(Vec<i64>),
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Scalar(v) => write!(f, "{v}"),
            Annotation::Vector(vs) => {
                let joined: Vec<String> = vs.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", joined.join(","))
            }
        }
    }
}

/// An instruction paired with the runtime annotation recorded when it retired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracedInstruction {
    /// The decoded instruction
    pub instruction: Instruction,
    /// Runtime annotation, if the functional core recorded one
    pub annotation: Option<Annotation>,
}

impl fmt::Display for TracedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instruction)?;
        if let Some(ann) = &self.annotation {
            write!(f, " ({ann})")?;
        }
        Ok(())
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_operand(tok: &str, line_no: usize, line: &str) -> Result<Operand> {
    if let Some(reg) = Register::parse(tok) {
        return Ok(Operand::Register(reg));
    }
    tok.parse::<i64>().map(Operand::Immediate).map_err(|_| SimError::Decode {
        line_no,
        line: line.to_string(),
        reason: format!("invalid operand `{tok}`"),
    })
}

/// Decode one `Code.asm`-style line (opcode plus plain operands, no
/// trailing annotation). `line_no` is used only for diagnostics.
pub fn parse_line(raw: &str, line_no: usize) -> Result<Option<Instruction>> {
    let line = strip_comment(raw).trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut tokens = line.split_whitespace();
    let opcode_tok = tokens.next().ok_or_else(|| SimError::Decode {
        line_no,
        line: line.to_string(),
        reason: "empty instruction".to_string(),
    })?;
    let opcode = opcode_tok.parse::<Opcode>().map_err(|_| SimError::Decode {
        line_no,
        line: line.to_string(),
        reason: format!("unknown opcode `{opcode_tok}`"),
    })?;
    let ops = tokens
        .map(|tok| parse_operand(tok, line_no, line))
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(Instruction { opcode, ops }))
}

fn parse_annotation(tok: &str) -> Option<Annotation> {
    let inner = tok.strip_prefix('(')?.strip_suffix(')')?;
    let values: Option<Vec<i64>> = inner.split(',').map(|v| v.trim().parse::<i64>().ok()).collect();
    let values = values?;
    if values.len() == 1 {
        Some(Annotation::Scalar(values[0]))
    } else {
        Some(Annotation::Vector(values))
    }
}

/// Decode one `trace.txt`-style line: an instruction optionally followed
/// by a parenthesized annotation, which is stripped before the remaining
/// tokens are parsed as operands.
pub fn parse_traced_line(raw: &str, line_no: usize) -> Result<Option<TracedInstruction>> {
    let line = strip_comment(raw).trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    let annotation = match tokens.last() {
        Some(last) if last.starts_with('(') && last.ends_with(')') => {
            let ann = parse_annotation(last).ok_or_else(|| SimError::Decode {
                line_no,
                line: line.to_string(),
                reason: format!("invalid annotation `{last}`"),
            })?;
            tokens.pop();
            Some(ann)
        }
        _ => None,
    };

    let opcode_tok = tokens.first().ok_or_else(|| SimError::Decode {
        line_no,
        line: line.to_string(),
        reason: "empty instruction".to_string(),
    })?;
    let opcode = opcode_tok.parse::<Opcode>().map_err(|_| SimError::Decode {
        line_no,
        line: line.to_string(),
        reason: format!("unknown opcode `{opcode_tok}`"),
    })?;
    let ops = tokens[1..]
        .iter()
        .map(|tok| parse_operand(tok, line_no, line))
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(TracedInstruction {
        instruction: Instruction { opcode, ops },
        annotation,
    }))
}
