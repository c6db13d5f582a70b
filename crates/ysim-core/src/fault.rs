use thiserror::Error;

use crate::{Address, RunStatus};

/// In-band faults that the machine records in its run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// Memory, register or program-counter access outside the valid range.
    #[error("invalid address")]
    InvalidAddress = 0x03,
    /// Base opcode or function nybble does not name an instruction.
    #[error("invalid instruction")]
    InvalidInstruction = 0x04,
}

impl FaultCode {
    /// Converts a fault code to its stable status value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable status value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x03 => Some(Self::InvalidAddress),
            0x04 => Some(Self::InvalidInstruction),
            _ => None,
        }
    }

    /// Run status latched when this fault is raised.
    #[must_use]
    pub const fn status(self) -> RunStatus {
        match self {
            Self::InvalidAddress => RunStatus::AddressFault,
            Self::InvalidInstruction => RunStatus::InstructionFault,
        }
    }
}

/// Errors the status model cannot represent; they end the simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SimError {
    /// A conditional move or jump carried a condition selector outside `0..=6`.
    #[error("{pc:08x}: bad condition code {selector}")]
    BadCondition {
        /// Address of the offending instruction.
        pc: Address,
        /// Raw selector nybble.
        selector: u8,
    },
}
