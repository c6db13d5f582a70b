//! Instruction decoder for the Y86 ISA.
//!
//! Decoding is a pure function of the instruction bytes. The execution engine
//! fetches exactly [`BaseOpcode::length`] bytes from memory and hands them to
//! [`Decoder::decode`], which produces one [`Instruction`] variant carrying
//! only the operands that instruction uses.

use thiserror::Error;

use crate::encoding::{classify_opcode, split_nybbles, AluFunction, BaseOpcode, Condition};
use crate::{Address, FaultCode, Word, WORD_BYTES};

/// Longest encoded instruction (`irmovq`, `rmmovq`, `mrmovq`).
pub const MAX_INSTRUCTION_BYTES: usize = 2 + WORD_BYTES;

/// Decoded instruction.
///
/// Register operands are kept as raw nybbles; whether they name a register
/// is checked when the engine accesses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Instruction {
    Halt,
    Nop,
    /// `rrmovq` when `cond` is [`Condition::Always`].
    Cmov {
        cond: Condition,
        ra: u8,
        rb: u8,
    },
    Irmov {
        rb: u8,
        value: Word,
    },
    Rmmov {
        ra: u8,
        rb: u8,
        displacement: Word,
    },
    Mrmov {
        ra: u8,
        rb: u8,
        displacement: Word,
    },
    Op {
        function: AluFunction,
        ra: u8,
        rb: u8,
    },
    /// `OPq` whose function nybble names no ALU operation. Executes as a
    /// two-byte no-op.
    UnassignedOp {
        function: u8,
    },
    Jump {
        cond: Condition,
        dest: Address,
    },
    Call {
        dest: Address,
    },
    Ret,
    Push {
        ra: u8,
    },
    Pop {
        ra: u8,
    },
}

impl Instruction {
    /// Base opcode of this instruction.
    #[must_use]
    pub const fn opcode(&self) -> BaseOpcode {
        match self {
            Self::Halt => BaseOpcode::Halt,
            Self::Nop => BaseOpcode::Nop,
            Self::Cmov { .. } => BaseOpcode::Cmov,
            Self::Irmov { .. } => BaseOpcode::Irmov,
            Self::Rmmov { .. } => BaseOpcode::Rmmov,
            Self::Mrmov { .. } => BaseOpcode::Mrmov,
            Self::Op { .. } | Self::UnassignedOp { .. } => BaseOpcode::Op,
            Self::Jump { .. } => BaseOpcode::Jump,
            Self::Call { .. } => BaseOpcode::Call,
            Self::Ret => BaseOpcode::Ret,
            Self::Push { .. } => BaseOpcode::Push,
            Self::Pop { .. } => BaseOpcode::Pop,
        }
    }

    /// Encoded length in bytes.
    #[must_use]
    pub fn length(&self) -> usize {
        self.opcode().length()
    }
}

/// Reasons a byte sequence is not a valid instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DecodeError {
    /// High nybble of the first byte names no base opcode.
    #[error("invalid opcode {0:#x}")]
    InvalidOpcode(u8),
    /// Conditional move or jump with a selector outside `0..=6`.
    #[error("bad condition code {0}")]
    BadCondition(u8),
    /// Fewer bytes than the opcode's encoded length.
    #[error("truncated instruction: need {needed} bytes, have {available}")]
    Truncated {
        /// Encoded length of the instruction.
        needed: usize,
        /// Bytes supplied.
        available: usize,
    },
}

impl DecodeError {
    /// In-band fault raised for this decode failure. `BadCondition` has none:
    /// it is fatal to the simulation run.
    #[must_use]
    pub const fn fault_code(self) -> Option<FaultCode> {
        match self {
            Self::InvalidOpcode(_) => Some(FaultCode::InvalidInstruction),
            Self::Truncated { .. } => Some(FaultCode::InvalidAddress),
            Self::BadCondition(_) => None,
        }
    }
}

/// Instruction decoder for the Y86 ISA.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder;

impl Decoder {
    /// Decodes the instruction at the start of `bytes`.
    ///
    /// Trailing bytes past the instruction's length are ignored. Padding
    /// nybbles are not validated.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the opcode or condition selector is
    /// unassigned, or when `bytes` is shorter than the encoding.
    pub fn decode(bytes: &[u8]) -> Result<Instruction, DecodeError> {
        let Some(&head) = bytes.first() else {
            return Err(DecodeError::Truncated {
                needed: 1,
                available: 0,
            });
        };
        let (op, sub) = split_nybbles(head);
        let opcode = classify_opcode(op).ok_or(DecodeError::InvalidOpcode(op))?;

        let needed = opcode.length();
        if bytes.len() < needed {
            return Err(DecodeError::Truncated {
                needed,
                available: bytes.len(),
            });
        }

        let (ra, rb) = if opcode.has_register_byte() {
            split_nybbles(bytes[1])
        } else {
            (0, 0)
        };

        let instruction = match opcode {
            BaseOpcode::Halt => Instruction::Halt,
            BaseOpcode::Nop => Instruction::Nop,
            BaseOpcode::Cmov => Instruction::Cmov {
                cond: condition(sub)?,
                ra,
                rb,
            },
            BaseOpcode::Irmov => Instruction::Irmov {
                rb,
                value: word_at(bytes, 2),
            },
            BaseOpcode::Rmmov => Instruction::Rmmov {
                ra,
                rb,
                displacement: word_at(bytes, 2),
            },
            BaseOpcode::Mrmov => Instruction::Mrmov {
                ra,
                rb,
                displacement: word_at(bytes, 2),
            },
            BaseOpcode::Op => AluFunction::from_u4(sub).map_or(
                Instruction::UnassignedOp { function: sub },
                |function| Instruction::Op { function, ra, rb },
            ),
            BaseOpcode::Jump => Instruction::Jump {
                cond: condition(sub)?,
                dest: word_at(bytes, 1),
            },
            BaseOpcode::Call => Instruction::Call {
                dest: word_at(bytes, 1),
            },
            BaseOpcode::Ret => Instruction::Ret,
            BaseOpcode::Push => Instruction::Push { ra },
            BaseOpcode::Pop => Instruction::Pop { ra },
        };

        Ok(instruction)
    }
}

fn condition(selector: u8) -> Result<Condition, DecodeError> {
    Condition::from_selector(selector).ok_or(DecodeError::BadCondition(selector))
}

fn word_at(bytes: &[u8], offset: usize) -> Word {
    let mut word = [0u8; WORD_BYTES];
    word.copy_from_slice(&bytes[offset..offset + WORD_BYTES]);
    Word::from_le_bytes(word)
}
