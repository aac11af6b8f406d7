//! Assembly Loader.
//!
//! This module turns assembly source into instruction memory. It performs:
//! 1. **Parsing:** Line-based, whitespace-tokenized parsing with an optional
//!    leading `label:` per line.
//! 2. **Link Resolution:** Branch labels become PC-relative immediates,
//!    `(target_index - current_index - 1) << 2`.
//! 3. **Loading:** The file edge reports problems to stderr and exits, while
//!    `parse_program` itself is a pure function over the source text.

use std::collections::HashMap;
use std::fs;
use std::process;

use crate::common::constants::NUM_GP_REGISTERS;
use crate::common::error::AsmError;
use crate::isa::instruction::Instruction;
use crate::isa::Opcode;

/// A parsed program: the instruction sequence plus the label map built at
/// load time.
#[derive(Debug)]
pub struct Program {
    /// Decoded instructions, in source order.
    pub instructions: Vec<Instruction>,
    /// Label name to instruction index.
    pub labels: HashMap<String, usize>,
}

/// Reads and parses the assembly file at `path`.
///
/// On any failure the diagnostic goes to stderr and the process exits; a
/// program that does not assemble has nothing meaningful to simulate.
pub fn load_file(path: &str) -> Program {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: open file {} failed: {}", path, e);
        process::exit(1);
    });
    parse_program(&source).unwrap_or_else(|e| {
        eprintln!("error: {}: {}", path, e);
        process::exit(1);
    })
}

/// Parses assembly source into a [`Program`].
pub fn parse_program(source: &str) -> Result<Program, AsmError> {
    let mut instructions: Vec<Instruction> = Vec::new();
    let mut labels: HashMap<String, usize> = HashMap::new();

    for (nr, raw) in source.lines().enumerate() {
        let line = nr + 1;
        let mut tokens = raw.split_whitespace();
        let first = match tokens.next() {
            Some(token) => token,
            None => continue,
        };

        let opcode = match Opcode::from_mnemonic(first) {
            Some(op) => op,
            None => {
                // Not a mnemonic: must be a label, followed by the opcode.
                let label = first
                    .strip_suffix(':')
                    .ok_or_else(|| AsmError::UnknownOpcode {
                        line,
                        token: first.to_string(),
                    })?;
                labels.insert(label.to_string(), instructions.len());
                let mnemonic = tokens.next().ok_or(AsmError::MissingOperand { line })?;
                Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownOpcode {
                    line,
                    token: mnemonic.to_string(),
                })?
            }
        };

        let mut inst = Instruction {
            opcode,
            ..Instruction::default()
        };

        match opcode {
            Opcode::Add
            | Opcode::Sub
            | Opcode::Xor
            | Opcode::Adds
            | Opcode::Subs
            | Opcode::Mults
            | Opcode::Divs => {
                inst.dest = parse_register(next_token(&mut tokens, line)?, line)?;
                inst.src1 = parse_register(next_token(&mut tokens, line)?, line)?;
                inst.src2 = parse_register(next_token(&mut tokens, line)?, line)?;
            }
            Opcode::Addi | Opcode::Subi => {
                inst.dest = parse_register(next_token(&mut tokens, line)?, line)?;
                inst.src1 = parse_register(next_token(&mut tokens, line)?, line)?;
                inst.immediate = parse_immediate(next_token(&mut tokens, line)?, line)?;
            }
            Opcode::Lw | Opcode::Lws => {
                inst.dest = parse_register(next_token(&mut tokens, line)?, line)?;
                let (imm, base) = parse_mem_operand(next_token(&mut tokens, line)?, line)?;
                inst.immediate = imm;
                inst.src1 = base;
            }
            Opcode::Sw | Opcode::Sws => {
                inst.src1 = parse_register(next_token(&mut tokens, line)?, line)?;
                let (imm, base) = parse_mem_operand(next_token(&mut tokens, line)?, line)?;
                inst.immediate = imm;
                inst.src2 = base;
            }
            Opcode::Beqz
            | Opcode::Bnez
            | Opcode::Bltz
            | Opcode::Bgtz
            | Opcode::Blez
            | Opcode::Bgez => {
                inst.src1 = parse_register(next_token(&mut tokens, line)?, line)?;
                inst.label = next_token(&mut tokens, line)?.to_string();
            }
            Opcode::Jump => {
                inst.label = next_token(&mut tokens, line)?.to_string();
            }
            Opcode::Eop | Opcode::Nop => {}
        }

        instructions.push(inst);
    }

    // Resolve branch labels into word-shifted relative immediates.
    for i in 0..instructions.len() {
        if instructions[i].opcode.is_branch() {
            let target = *labels
                .get(&instructions[i].label)
                .ok_or_else(|| AsmError::UnknownLabel {
                    label: instructions[i].label.clone(),
                })?;
            instructions[i].immediate = ((target as i64 - i as i64 - 1) << 2) as u32;
        }
    }

    Ok(Program {
        instructions,
        labels,
    })
}

fn next_token<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<&'a str, AsmError> {
    tokens.next().ok_or(AsmError::MissingOperand { line })
}

fn parse_register(token: &str, line: usize) -> Result<usize, AsmError> {
    let malformed = || AsmError::MalformedOperand {
        line,
        token: token.to_string(),
    };
    let digits = token
        .strip_prefix('R')
        .or_else(|| token.strip_prefix('F'))
        .ok_or_else(malformed)?;
    let index: usize = digits.parse().map_err(|_| malformed())?;
    if index >= NUM_GP_REGISTERS {
        return Err(malformed());
    }
    Ok(index)
}

fn parse_immediate(token: &str, line: usize) -> Result<u32, AsmError> {
    let malformed = || AsmError::MalformedOperand {
        line,
        token: token.to_string(),
    };
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let value = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        body.parse::<u32>()
    }
    .map_err(|_| malformed())?;
    Ok(if negative { value.wrapping_neg() } else { value })
}

/// Parses a load/store operand of the form `imm(Rn)`.
fn parse_mem_operand(token: &str, line: usize) -> Result<(u32, usize), AsmError> {
    let malformed = || AsmError::MalformedOperand {
        line,
        token: token.to_string(),
    };
    let open = token.find('(').ok_or_else(malformed)?;
    let body = token.strip_suffix(')').ok_or_else(malformed)?;
    let imm = parse_immediate(&token[..open], line)?;
    let base = parse_register(&body[open + 1..], line)?;
    Ok((imm, base))
}
