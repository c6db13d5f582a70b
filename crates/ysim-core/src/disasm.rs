//! Instruction disassembly for the Y86 ISA.
//!
//! Renders decoded instructions in the usual AT&T-flavoured Y86 syntax, e.g.
//! `irmovq $0x10, %rax` or `mrmovq -8(%rbp), %rsi`.

#![allow(clippy::cast_possible_wrap)]

use std::fmt;

use crate::decoder::{DecodeError, Decoder, Instruction, MAX_INSTRUCTION_BYTES};
use crate::{Address, Condition, Register};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// Address of the first byte.
    pub addr: Address,
    /// Encoded length in bytes (1 for undecodable bytes).
    pub len_bytes: usize,
    /// Mnemonic, e.g. `"addq"`, or `".byte"` for undecodable bytes.
    pub mnemonic: String,
    /// Formatted operands.
    pub operands: String,
    /// Whether the bytes at `addr` failed to decode.
    pub is_illegal: bool,
}

struct RegName(u8);

impl fmt::Display for RegName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(reg) = Register::from_nybble(self.0) else {
            return write!(f, "%?{:x}", self.0);
        };
        f.write_str(reg.name())
    }
}

struct Displacement(u64);

impl fmt::Display for Displacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signed = self.0 as i64;
        if signed < 0 {
            write!(f, "-{:#x}", signed.unsigned_abs())
        } else {
            write!(f, "{signed:#x}")
        }
    }
}

impl Instruction {
    /// Assembly mnemonic.
    #[must_use]
    pub fn mnemonic(&self) -> String {
        match self {
            Self::Halt => "halt".to_owned(),
            Self::Nop => "nop".to_owned(),
            Self::Cmov {
                cond: Condition::Always,
                ..
            } => "rrmovq".to_owned(),
            Self::Cmov { cond, .. } => format!("cmov{}", cond.suffix()),
            Self::Irmov { .. } => "irmovq".to_owned(),
            Self::Rmmov { .. } => "rmmovq".to_owned(),
            Self::Mrmov { .. } => "mrmovq".to_owned(),
            Self::Op { function, .. } => function.mnemonic().to_owned(),
            Self::UnassignedOp { function } => format!("op{function:x}q"),
            Self::Jump {
                cond: Condition::Always,
                ..
            } => "jmp".to_owned(),
            Self::Jump { cond, .. } => format!("j{}", cond.suffix()),
            Self::Call { .. } => "call".to_owned(),
            Self::Ret => "ret".to_owned(),
            Self::Push { .. } => "pushq".to_owned(),
            Self::Pop { .. } => "popq".to_owned(),
        }
    }

    /// Formatted operand list; empty for operand-less instructions.
    #[must_use]
    pub fn operands(&self) -> String {
        match *self {
            Self::Halt | Self::Nop | Self::Ret | Self::UnassignedOp { .. } => String::new(),
            Self::Cmov { ra, rb, .. } | Self::Op { ra, rb, .. } => {
                format!("{}, {}", RegName(ra), RegName(rb))
            }
            Self::Irmov { rb, value } => format!("${value:#x}, {}", RegName(rb)),
            Self::Rmmov {
                ra,
                rb,
                displacement,
            } => format!(
                "{}, {}({})",
                RegName(ra),
                Displacement(displacement),
                RegName(rb)
            ),
            Self::Mrmov {
                ra,
                rb,
                displacement,
            } => format!(
                "{}({}), {}",
                Displacement(displacement),
                RegName(rb),
                RegName(ra)
            ),
            Self::Jump { dest, .. } | Self::Call { dest } => format!("{dest:#x}"),
            Self::Push { ra } | Self::Pop { ra } => RegName(ra).to_string(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = self.operands();
        if operands.is_empty() {
            f.write_str(&self.mnemonic())
        } else {
            write!(f, "{} {operands}", self.mnemonic())
        }
    }
}

/// Disassembles the instruction starting at `addr`.
///
/// Returns `None` when `addr` is outside `memory`. Bytes that do not decode,
/// including an instruction cut off by the end of memory, produce a one-byte
/// `.byte` row marked illegal.
#[must_use]
pub fn disassemble_one(addr: Address, memory: &[u8]) -> Option<DisassemblyRow> {
    let start = usize::try_from(addr).ok()?;
    let head = *memory.get(start)?;
    let end = memory.len().min(start.saturating_add(MAX_INSTRUCTION_BYTES));

    let row = Decoder::decode(&memory[start..end]).map_or_else(
        |err| illegal_row(addr, head, err),
        |instr| DisassemblyRow {
            addr,
            len_bytes: instr.length(),
            mnemonic: instr.mnemonic(),
            operands: instr.operands(),
            is_illegal: false,
        },
    );
    Some(row)
}

fn illegal_row(addr: Address, head: u8, err: DecodeError) -> DisassemblyRow {
    DisassemblyRow {
        addr,
        len_bytes: 1,
        mnemonic: ".byte".to_owned(),
        operands: format!("{head:#04x} ; {err}"),
        is_illegal: true,
    }
}

/// Linearly disassembles up to `count` instructions starting at `start`.
///
/// Stops early at the end of `memory`.
#[must_use]
pub fn disassemble_range(start: Address, count: usize, memory: &[u8]) -> Vec<DisassemblyRow> {
    let mut rows = Vec::with_capacity(count);
    let mut addr = start;
    for _ in 0..count {
        let Some(row) = disassemble_one(addr, memory) else {
            break;
        };
        addr = addr.wrapping_add(row.len_bytes as u64);
        rows.push(row);
    }
    rows
}
