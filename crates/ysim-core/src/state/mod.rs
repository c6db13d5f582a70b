//! Machine-state store: run status, the store contract, and a flat
//! in-memory implementation.

/// Register identifiers and the condition-code byte.
pub mod registers;
/// Reference in-memory store.
pub mod machine;

pub use machine::Machine;
pub use registers::{
    ConditionCodes, Register, CC_ACTIVE_MASK, CC_OF, CC_SF, CC_ZF, REGISTER_COUNT, REG_NONE,
    REG_PADDING,
};

use crate::{Address, FaultCode, Word};

/// Host-observable execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum RunStatus {
    /// Ready to execute the next instruction.
    #[default]
    Running = 0x01,
    /// A `halt` instruction retired.
    Halted = 0x02,
    /// An access fell outside memory or named no register.
    AddressFault = 0x03,
    /// The opcode or ALU function did not name an instruction.
    InstructionFault = 0x04,
}

impl RunStatus {
    /// Stable status value (`AOK`, `HLT`, `ADR`, `INS` = 1..=4).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable status value back into a run status.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::Running),
            0x02 => Some(Self::Halted),
            0x03 => Some(Self::AddressFault),
            0x04 => Some(Self::InstructionFault),
            _ => None,
        }
    }

    /// Returns `true` while the engine may still make progress.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns the latched fault, if this status is a fault status.
    #[must_use]
    pub const fn fault(self) -> Option<FaultCode> {
        match self {
            Self::AddressFault => Some(FaultCode::InvalidAddress),
            Self::InstructionFault => Some(FaultCode::InvalidInstruction),
            Self::Running | Self::Halted => None,
        }
    }
}

/// Typed access to registers, memory, `PC`, condition codes and run status.
///
/// Memory accessors fail with [`FaultCode::InvalidAddress`] instead of
/// latching a status themselves; the execution engine decides when a failed
/// access becomes an address fault.
pub trait MachineState {
    /// Reads the program counter.
    fn pc(&self) -> Address;

    /// Writes the program counter.
    fn set_pc(&mut self, pc: Address);

    /// Reads a general-purpose register.
    fn register(&self, reg: Register) -> Word;

    /// Writes a general-purpose register.
    fn set_register(&mut self, reg: Register, value: Word);

    /// Reads one byte of memory.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::InvalidAddress`] when `addr` is out of range.
    fn read_byte(&self, addr: Address) -> Result<u8, FaultCode>;

    /// Writes one byte of memory.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::InvalidAddress`] when `addr` is out of range.
    fn write_byte(&mut self, addr: Address, value: u8) -> Result<(), FaultCode>;

    /// Reads one little-endian word of memory.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::InvalidAddress`] when any byte is out of range.
    fn read_word(&self, addr: Address) -> Result<Word, FaultCode>;

    /// Writes one little-endian word of memory.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::InvalidAddress`] when any byte is out of range.
    fn write_word(&mut self, addr: Address, value: Word) -> Result<(), FaultCode>;

    /// Reads the condition-code byte.
    fn condition_codes(&self) -> ConditionCodes;

    /// Writes the condition-code byte.
    fn set_condition_codes(&mut self, cc: ConditionCodes);

    /// Reads the run status.
    fn status(&self) -> RunStatus;

    /// Writes the run status.
    fn set_status(&mut self, status: RunStatus);
}
