//! Instruction set definitions.
//!
//! This module defines the simulated ISA as closed sum types:
//! 1. **Opcodes:** The DLX-style instruction set, including the FP extension.
//! 2. **Stages:** The five classical pipeline stages.
//! 3. **Special Registers:** The named fields of the stage-entrance latches.
//!
//! The discriminants of [`Opcode`] follow the conventional table order so the
//! raw `IR` value exposed through the observability interface is stable.

use std::fmt;

/// Decoded instruction representation.
pub mod instruction;

/// Instruction opcodes.
///
/// `Eop` marks end-of-program; `Nop` marks a bubble. The final six opcodes
/// form the single-precision floating-point extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Opcode {
    Lw = 0,
    Sw,
    Add,
    Addi,
    Sub,
    Subi,
    Xor,
    Beqz,
    Bnez,
    Bltz,
    Bgtz,
    Blez,
    Bgez,
    Jump,
    Eop,
    Nop,
    Lws,
    Sws,
    Adds,
    Subs,
    Mults,
    Divs,
}

impl Opcode {
    /// Every opcode, in discriminant order.
    pub const ALL: [Opcode; 22] = [
        Opcode::Lw,
        Opcode::Sw,
        Opcode::Add,
        Opcode::Addi,
        Opcode::Sub,
        Opcode::Subi,
        Opcode::Xor,
        Opcode::Beqz,
        Opcode::Bnez,
        Opcode::Bltz,
        Opcode::Bgtz,
        Opcode::Blez,
        Opcode::Bgez,
        Opcode::Jump,
        Opcode::Eop,
        Opcode::Nop,
        Opcode::Lws,
        Opcode::Sws,
        Opcode::Adds,
        Opcode::Subs,
        Opcode::Mults,
        Opcode::Divs,
    ];

    /// Assembly mnemonic for this opcode.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Lw => "LW",
            Opcode::Sw => "SW",
            Opcode::Add => "ADD",
            Opcode::Addi => "ADDI",
            Opcode::Sub => "SUB",
            Opcode::Subi => "SUBI",
            Opcode::Xor => "XOR",
            Opcode::Beqz => "BEQZ",
            Opcode::Bnez => "BNEZ",
            Opcode::Bltz => "BLTZ",
            Opcode::Bgtz => "BGTZ",
            Opcode::Blez => "BLEZ",
            Opcode::Bgez => "BGEZ",
            Opcode::Jump => "JUMP",
            Opcode::Eop => "EOP",
            Opcode::Nop => "NOP",
            Opcode::Lws => "LWS",
            Opcode::Sws => "SWS",
            Opcode::Adds => "ADDS",
            Opcode::Subs => "SUBS",
            Opcode::Mults => "MULTS",
            Opcode::Divs => "DIVS",
        }
    }

    /// Looks up an opcode by its assembly mnemonic.
    pub fn from_mnemonic(token: &str) -> Option<Opcode> {
        Opcode::ALL.iter().copied().find(|op| op.mnemonic() == token)
    }

    /// Raw value exposed as the `IR` special register.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// True for the conditional branches.
    pub fn is_cond_branch(self) -> bool {
        matches!(
            self,
            Opcode::Beqz
                | Opcode::Bnez
                | Opcode::Bltz
                | Opcode::Bgtz
                | Opcode::Blez
                | Opcode::Bgez
        )
    }

    /// True for every control-flow opcode (conditional branches and `JUMP`).
    pub fn is_branch(self) -> bool {
        self.is_cond_branch() || self == Opcode::Jump
    }

    /// True for opcodes that access data memory.
    pub fn is_mem_access(self) -> bool {
        matches!(self, Opcode::Lw | Opcode::Sw | Opcode::Lws | Opcode::Sws)
    }

    /// True for loads.
    pub fn is_load(self) -> bool {
        matches!(self, Opcode::Lw | Opcode::Lws)
    }

    /// True for stores.
    pub fn is_store(self) -> bool {
        matches!(self, Opcode::Sw | Opcode::Sws)
    }

    /// True for the single-precision arithmetic opcodes.
    pub fn is_fp_arith(self) -> bool {
        matches!(
            self,
            Opcode::Adds | Opcode::Subs | Opcode::Mults | Opcode::Divs
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Pipeline stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    If,
    Id,
    Ex,
    Mem,
    Wb,
}

impl Stage {
    /// Every stage, in pipeline order.
    pub const ALL: [Stage; 5] = [Stage::If, Stage::Id, Stage::Ex, Stage::Mem, Stage::Wb];

    /// Conventional stage name.
    pub fn name(self) -> &'static str {
        match self {
            Stage::If => "IF",
            Stage::Id => "ID",
            Stage::Ex => "EX",
            Stage::Mem => "MEM",
            Stage::Wb => "WB",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named special-purpose stage registers.
///
/// These mirror the latch-output labels of the classical pipeline diagram
/// and index the observability interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpRegister {
    Pc,
    Npc,
    Ir,
    A,
    B,
    Imm,
    Cond,
    AluOutput,
    Lmd,
}

impl SpRegister {
    /// Every special register, in diagram order.
    pub const ALL: [SpRegister; 9] = [
        SpRegister::Pc,
        SpRegister::Npc,
        SpRegister::Ir,
        SpRegister::A,
        SpRegister::B,
        SpRegister::Imm,
        SpRegister::Cond,
        SpRegister::AluOutput,
        SpRegister::Lmd,
    ];

    /// Conventional register name.
    pub fn name(self) -> &'static str {
        match self {
            SpRegister::Pc => "PC",
            SpRegister::Npc => "NPC",
            SpRegister::Ir => "IR",
            SpRegister::A => "A",
            SpRegister::B => "B",
            SpRegister::Imm => "IMM",
            SpRegister::Cond => "COND",
            SpRegister::AluOutput => "ALU_OUTPUT",
            SpRegister::Lmd => "LMD",
        }
    }
}

impl fmt::Display for SpRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
