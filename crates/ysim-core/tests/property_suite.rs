//! Property coverage for the decoder, execution engine and stall simulator.

#![allow(clippy::pedantic, clippy::nursery)]

use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;
use ysim_core::{
    alu_result, classify_opcode, disassemble_range, run, split_nybbles, step, AluFunction,
    ClockOutcome, CoreConfig, DecodeError, Decoder, Machine, MachineState, RunStatus, SimError,
    StallSim,
};

const MEMORY_BYTES: usize = 64;

fn load(code: &[u8]) -> Machine {
    let mut machine = Machine::with_config(&CoreConfig {
        memory_bytes: MEMORY_BYTES,
    });
    let len = code.len().min(MEMORY_BYTES);
    machine.memory_mut()[..len].copy_from_slice(&code[..len]);
    machine
}

fn alu_function() -> impl Strategy<Value = AluFunction> {
    prop_oneof![
        Just(AluFunction::Add),
        Just(AluFunction::Sub),
        Just(AluFunction::And),
        Just(AluFunction::Xor),
    ]
}

proptest! {
    #[test]
    fn property_decode_robustness_over_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..12)) {
        match Decoder::decode(&bytes) {
            Ok(instr) => {
                let (op, _) = split_nybbles(bytes[0]);
                prop_assert_eq!(classify_opcode(op), Some(instr.opcode()));
                prop_assert!(instr.length() <= bytes.len());
            }
            Err(DecodeError::Truncated { needed, available }) => {
                prop_assert!(available < needed);
                prop_assert_eq!(available, bytes.len());
            }
            Err(DecodeError::InvalidOpcode(op)) => prop_assert!(op >= 0xC),
            Err(DecodeError::BadCondition(selector)) => prop_assert!(selector >= 7),
        }
    }

    #[test]
    fn property_step_never_panics_and_status_is_consistent(code in prop::collection::vec(any::<u8>(), 0..MEMORY_BYTES)) {
        let mut machine = load(&code);
        match run(&mut machine, 64) {
            Ok(outcome) => {
                prop_assert_eq!(outcome.status, machine.status());
                prop_assert!(outcome.steps <= 64);
                if !outcome.status.is_running() {
                    let snapshot = machine.clone();
                    prop_assert_eq!(step(&mut machine), Ok(outcome.status));
                    prop_assert_eq!(machine, snapshot);
                }
            }
            Err(SimError::BadCondition { pc, selector }) => {
                prop_assert_eq!(machine.pc(), pc);
                prop_assert!(selector >= 7);
                prop_assert_eq!(machine.status(), RunStatus::Running);
            }
        }
    }

    #[test]
    fn property_stall_sim_always_drains(code in prop::collection::vec(any::<u8>(), 0..MEMORY_BYTES), pc in 0u64..80) {
        let mut machine = load(&code);
        machine.set_pc(pc);
        let mut sim = StallSim::default();

        // The startup fill can run straight into one ret or data-hazard stall.
        let mut consecutive = 0;
        for _ in 0..32 {
            match sim.clock(&machine) {
                ClockOutcome::Stall => {
                    consecutive += 1;
                    prop_assert!(consecutive <= 4 + 3);
                }
                ClockOutcome::Proceed => consecutive = 0,
            }
        }
    }

    #[test]
    fn property_add_and_sub_wrap_with_consistent_flags(a in any::<u64>(), b in any::<u64>()) {
        let (sum, cc) = alu_result(AluFunction::Add, a, b);
        prop_assert_eq!(sum, b.wrapping_add(a));
        prop_assert_eq!(cc.zero(), sum == 0);
        prop_assert_eq!(cc.overflow(), (a as i64).checked_add(b as i64).is_none());

        let (diff, cc) = alu_result(AluFunction::Sub, a, b);
        prop_assert_eq!(diff, b.wrapping_sub(a));
        prop_assert_eq!(cc.sign(), (diff as i64) < 0);
        prop_assert_eq!(cc.overflow(), (b as i64).checked_sub(a as i64).is_none());
    }

    #[test]
    fn property_logic_ops_clear_overflow(function in alu_function(), a in any::<u64>(), b in any::<u64>()) {
        let (result, cc) = alu_result(function, a, b);
        prop_assert_eq!(cc.zero(), result == 0);
        prop_assert_eq!(cc.sign(), (result as i64) < 0);
        if matches!(function, AluFunction::And | AluFunction::Xor) {
            prop_assert!(!cc.overflow());
        }
    }

    #[test]
    fn property_disassembly_rows_are_contiguous(code in prop::collection::vec(any::<u8>(), 1..MEMORY_BYTES)) {
        let rows = disassemble_range(0, code.len(), &code);
        let mut expected_addr = 0u64;
        for row in &rows {
            prop_assert_eq!(row.addr, expected_addr);
            prop_assert!(row.len_bytes >= 1);
            prop_assert_eq!(row.is_illegal, row.mnemonic == ".byte");
            expected_addr += row.len_bytes as u64;
        }
        prop_assert!(expected_addr as usize <= code.len());
    }
}
