#![no_main]

use libfuzzer_sys::fuzz_target;
use ysim_core::{
    disassemble_range, run_pipelined, CoreConfig, Decoder, Machine, MachineState, StallSim,
};

const MEMORY_BYTES: usize = 256;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let _ = Decoder::decode(data);
    let _ = disassemble_range(0, 16, data);

    let mut machine = Machine::with_config(&CoreConfig {
        memory_bytes: MEMORY_BYTES,
    });
    let len = data.len().min(MEMORY_BYTES);
    machine.memory_mut()[..len].copy_from_slice(&data[..len]);
    machine.set_pc(u64::from(data[0]));

    let mut sim = StallSim::default();
    let _ = run_pipelined(&mut machine, &mut sim, 512);
});
