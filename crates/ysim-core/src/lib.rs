//! Core simulator crate for the Y86 machine.
//!
//! Two independent step functions share one machine-state store:
//! [`step`] executes a single instruction architecturally, and
//! [`StallSim::clock`] predicts, one simulated cycle at a time, whether a
//! five-stage pipelined implementation could issue the instruction at `PC`.

/// Flat little-endian memory helpers.
pub mod memory;
pub use memory::{
    new_address_space, read_word_le, write_word_le, Address, Word, DEFAULT_MEMORY_BYTES,
    WORD_BYTES,
};

/// Public configuration and run-summary types.
pub mod api;
pub use api::{CoreConfig, PipelineOutcome, RunOutcome, StallConfig};

/// Machine-state store contract and reference implementation.
pub mod state;
pub use state::{
    ConditionCodes, Machine, MachineState, Register, RunStatus, CC_OF, CC_SF, CC_ZF,
    REGISTER_COUNT, REG_NONE, REG_PADDING,
};

/// Opcode, ALU-function and condition selector tables.
pub mod encoding;
pub use encoding::{
    classify_opcode, split_nybbles, AluFunction, BaseOpcode, Condition, OPCODE_TABLE,
};

/// Byte-level instruction decoder.
pub mod decoder;
pub use decoder::{DecodeError, Decoder, Instruction, MAX_INSTRUCTION_BYTES};

/// Fault taxonomy for in-band status faults and fatal simulator errors.
pub mod fault;
pub use fault::{FaultCode, SimError};

/// Assembly-syntax rendering of decoded instructions.
pub mod disasm;
pub use disasm::{disassemble_one, disassemble_range, DisassemblyRow};

/// Deterministic bubble-cost table for pipeline hazards.
pub mod timing;
pub use timing::{bubble_cost, BubbleKind, BUBBLE_COST_TABLE};

/// Instruction execution engine.
pub mod execute;
pub use execute::{alu_result, check_condition, step};

/// Pipeline hazard (stall) simulator.
pub mod pipeline;
pub use pipeline::{ClockOutcome, HazardWindow, RegisterPair, StallSim, WINDOW_DEPTH};

/// Drivers that loop the step functions until a boundary.
pub mod driver;
pub use driver::{run, run_pipelined};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
