//! Bounded drivers over [`step`] and [`StallSim::clock`].

use tracing::debug;

use crate::execute::step;
use crate::pipeline::{ClockOutcome, StallSim};
use crate::{MachineState, PipelineOutcome, RunOutcome, SimError};

/// Steps the engine until the status leaves [`RunStatus::Running`] or
/// `max_steps` instructions have executed.
///
/// [`RunStatus::Running`]: crate::RunStatus::Running
///
/// # Errors
///
/// Propagates [`SimError`] from [`step`].
pub fn run<S: MachineState + ?Sized>(
    state: &mut S,
    max_steps: u64,
) -> Result<RunOutcome, SimError> {
    let mut steps = 0;
    while steps < max_steps && state.status().is_running() {
        step(state)?;
        steps += 1;
    }

    let status = state.status();
    debug!("run stopped after {steps} steps: {status:?}");
    Ok(RunOutcome { steps, status })
}

/// Clocks `sim` and the engine in lock-step for up to `max_cycles` cycles.
///
/// Each cycle the stall simulator is clocked first; on
/// [`ClockOutcome::Proceed`] the engine executes one instruction. Stops early
/// once the status leaves running.
///
/// # Errors
///
/// Propagates [`SimError`] from [`step`].
pub fn run_pipelined<S: MachineState + ?Sized>(
    state: &mut S,
    sim: &mut StallSim,
    max_cycles: u64,
) -> Result<PipelineOutcome, SimError> {
    let mut cycles = 0;
    let mut instructions = 0;
    let mut stall_cycles = 0;

    while cycles < max_cycles && state.status().is_running() {
        cycles += 1;
        match sim.clock(state) {
            ClockOutcome::Stall => stall_cycles += 1,
            ClockOutcome::Proceed => {
                step(state)?;
                instructions += 1;
            }
        }
    }

    let status = state.status();
    debug!("pipeline stopped after {cycles} cycles ({stall_cycles} stalled): {status:?}");
    Ok(PipelineOutcome {
        cycles,
        instructions,
        stall_cycles,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::{run, run_pipelined};
    use crate::{CoreConfig, Machine, MachineState, Register, RunStatus, StallSim};

    fn machine_with(code: &[u8]) -> Machine {
        let mut machine = Machine::with_config(&CoreConfig { memory_bytes: 0x100 });
        machine.memory_mut()[..code.len()].copy_from_slice(code);
        machine
    }

    #[test]
    fn run_stops_at_halt_and_counts_it() {
        let mut machine = machine_with(&[0x10, 0x10, 0x00]);
        let outcome = run(&mut machine, 100).expect("run should not fail");
        assert_eq!(outcome.steps, 3);
        assert_eq!(outcome.status, RunStatus::Halted);
        assert_eq!(machine.pc(), 2);
    }

    #[test]
    fn run_respects_step_limit() {
        // jmp 0
        let mut machine = machine_with(&[0x70, 0, 0, 0, 0, 0, 0, 0, 0]);
        let outcome = run(&mut machine, 5).expect("run should not fail");
        assert_eq!(outcome.steps, 5);
        assert_eq!(outcome.status, RunStatus::Running);
    }

    #[test]
    fn pipelined_run_counts_startup_fill_and_data_hazard() {
        // irmovq $2, %rax ; addq %rax, %rbx ; halt
        let mut machine = machine_with(&[
            0x30, 0xF0, 2, 0, 0, 0, 0, 0, 0, 0, //
            0x60, 0x03, //
            0x00,
        ]);
        let mut sim = StallSim::default();
        let outcome = run_pipelined(&mut machine, &mut sim, 100).expect("run should not fail");

        assert_eq!(outcome.instructions, 3);
        assert_eq!(outcome.stall_cycles, 4 + 3);
        assert_eq!(outcome.cycles, 10);
        assert_eq!(outcome.status, RunStatus::Halted);
        assert_eq!(machine.register(Register::Rbx), 2);
    }
}
