//! Instruction execution engine for the Y86 ISA.
//!
//! [`step`] performs one fetch/decode/execute cycle against any
//! [`MachineState`]. Faults are not rolled back: side effects performed before
//! a failing access (for example the `%rsp` update of `call`) stay visible,
//! and the run status records the fault.

mod alu;
mod condition;
mod flags;

pub use alu::alu_result;
pub use condition::check_condition;
pub use flags::{add_flags, logic_flags, sub_flags};

use tracing::{debug, trace, warn};

use crate::decoder::{DecodeError, Decoder, Instruction, MAX_INSTRUCTION_BYTES};
use crate::encoding::{classify_opcode, split_nybbles, BaseOpcode};
use crate::{
    Address, FaultCode, MachineState, Register, RunStatus, SimError, Word, WORD_BYTES,
};

const WORD_STEP: Word = WORD_BYTES as Word;

/// Failure of one execution step: an in-band fault or a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExecError {
    Fault(FaultCode),
    Fatal(SimError),
}

impl From<FaultCode> for ExecError {
    fn from(code: FaultCode) -> Self {
        Self::Fault(code)
    }
}

impl From<SimError> for ExecError {
    fn from(err: SimError) -> Self {
        Self::Fatal(err)
    }
}

/// Executes the instruction at `PC`.
///
/// Does nothing unless the status is [`RunStatus::Running`]. Address and
/// instruction faults are latched into the run status and reported through the
/// returned status.
///
/// # Errors
///
/// Returns [`SimError::BadCondition`] when a conditional move or jump carries
/// an unassigned condition selector. The machine state is left as it was at
/// the point of failure and the run should not continue.
pub fn step<S: MachineState + ?Sized>(state: &mut S) -> Result<RunStatus, SimError> {
    let status = state.status();
    if !status.is_running() {
        return Ok(status);
    }

    let pc = state.pc();
    let result = match state.read_byte(pc) {
        Ok(head) if classify_opcode(split_nybbles(head).0) == Some(BaseOpcode::Cmov) => {
            conditional_move(state, pc, head)
        }
        _ => fetch(state, pc).and_then(|instr| {
            trace!("{pc:#010x}: {instr}");
            execute(state, pc, instr)
        }),
    };

    match result {
        Ok(()) => {}
        Err(ExecError::Fault(code)) => {
            warn!("{pc:#010x}: {code}");
            state.set_status(code.status());
        }
        Err(ExecError::Fatal(err)) => return Err(err),
    }

    Ok(state.status())
}

/// Reads the opcode byte, then the rest of the instruction, and decodes it.
fn fetch<S: MachineState + ?Sized>(state: &S, pc: Address) -> Result<Instruction, ExecError> {
    let head = state.read_byte(pc)?;
    let (op, _) = split_nybbles(head);
    let opcode = classify_opcode(op).ok_or(FaultCode::InvalidInstruction)?;

    let len = opcode.length();
    let mut bytes = [0u8; MAX_INSTRUCTION_BYTES];
    bytes[0] = head;
    for (offset, byte) in (1..).zip(bytes.iter_mut().take(len).skip(1)) {
        *byte = state.read_byte(pc.wrapping_add(offset))?;
    }

    Decoder::decode(&bytes[..len]).map_err(|err| match err {
        DecodeError::BadCondition(selector) => SimError::BadCondition { pc, selector }.into(),
        other => other
            .fault_code()
            .unwrap_or(FaultCode::InvalidInstruction)
            .into(),
    })
}

/// `cmovXX` advances PC before reading its register byte, which is only read
/// when the condition holds.
fn conditional_move<S: MachineState + ?Sized>(
    state: &mut S,
    pc: Address,
    head: u8,
) -> Result<(), ExecError> {
    let (_, selector) = split_nybbles(head);
    let taken = check_condition(state.condition_codes(), selector, pc)?;
    state.set_pc(pc.wrapping_add(BaseOpcode::Cmov.length() as Word));
    if !taken {
        trace!("{pc:#010x}: conditional move not taken");
        return Ok(());
    }

    let instr = Decoder::decode(&[head, state.read_byte(pc.wrapping_add(1))?])
        .map_err(|_| FaultCode::InvalidInstruction)?;
    trace!("{pc:#010x}: {instr}");
    execute(state, pc, instr)
}

fn execute<S: MachineState + ?Sized>(
    state: &mut S,
    pc: Address,
    instr: Instruction,
) -> Result<(), ExecError> {
    let next_pc = pc.wrapping_add(instr.length() as Word);

    match instr {
        Instruction::Halt => {
            debug!("{pc:#010x}: halted");
            state.set_status(RunStatus::Halted);
        }
        Instruction::Nop => state.set_pc(next_pc),
        Instruction::Cmov { cond, ra, rb } => {
            state.set_pc(next_pc);
            if cond.holds(state.condition_codes()) {
                let value = read_register(state, ra)?;
                write_register(state, rb, value)?;
            }
        }
        Instruction::Irmov { rb, value } => {
            write_register(state, rb, value)?;
            state.set_pc(next_pc);
        }
        Instruction::Rmmov {
            ra,
            rb,
            displacement,
        } => {
            let base = read_register(state, rb)?;
            let value = read_register(state, ra)?;
            state.write_word(base.wrapping_add(displacement), value)?;
            state.set_pc(next_pc);
        }
        Instruction::Mrmov {
            ra,
            rb,
            displacement,
        } => {
            let base = read_register(state, rb)?;
            let value = state.read_word(base.wrapping_add(displacement))?;
            write_register(state, ra, value)?;
            state.set_pc(next_pc);
        }
        Instruction::Op { function, ra, rb } => {
            alu::execute_op(state, function, ra, rb)?;
            state.set_pc(next_pc);
        }
        Instruction::UnassignedOp { .. } => state.set_pc(next_pc),
        Instruction::Jump { cond, dest } => {
            if cond.holds(state.condition_codes()) {
                state.set_pc(dest);
            } else {
                state.set_pc(next_pc);
            }
        }
        Instruction::Call { dest } => {
            let sp = state.register(Register::Rsp).wrapping_sub(WORD_STEP);
            state.set_register(Register::Rsp, sp);
            state.write_word(sp, next_pc)?;
            state.set_pc(dest);
        }
        Instruction::Ret => {
            let sp = state.register(Register::Rsp);
            let return_addr = state.read_word(sp)?;
            state.set_register(Register::Rsp, sp.wrapping_add(WORD_STEP));
            state.set_pc(return_addr);
        }
        Instruction::Push { ra } => {
            let value = read_register(state, ra)?;
            let sp = state.register(Register::Rsp).wrapping_sub(WORD_STEP);
            state.set_register(Register::Rsp, sp);
            state.write_word(sp, value)?;
            state.set_pc(next_pc);
        }
        Instruction::Pop { ra } => {
            let sp = state.register(Register::Rsp);
            let value = state.read_word(sp)?;
            state.set_register(Register::Rsp, sp.wrapping_add(WORD_STEP));
            write_register(state, ra, value)?;
            state.set_pc(next_pc);
        }
    }

    Ok(())
}

/// Maps a register nybble to a register; nybbles naming no register are an
/// out-of-range access.
fn register_operand(nybble: u8) -> Result<Register, FaultCode> {
    Register::from_nybble(nybble).ok_or(FaultCode::InvalidAddress)
}

fn read_register<S: MachineState + ?Sized>(state: &S, nybble: u8) -> Result<Word, FaultCode> {
    Ok(state.register(register_operand(nybble)?))
}

fn write_register<S: MachineState + ?Sized>(
    state: &mut S,
    nybble: u8,
    value: Word,
) -> Result<(), FaultCode> {
    state.set_register(register_operand(nybble)?, value);
    Ok(())
}
