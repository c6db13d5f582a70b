use super::{ConditionCodes, MachineState, Register, RunStatus, REGISTER_COUNT};
use crate::memory::{new_address_space, read_word_le, span, write_word_le};
use crate::{Address, CoreConfig, FaultCode, Word};

/// Flat in-memory machine: register file, `PC`, condition codes, status and
/// a byte-addressed backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Machine {
    registers: [Word; REGISTER_COUNT],
    pc: Address,
    cc: ConditionCodes,
    status: RunStatus,
    memory: Box<[u8]>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::with_config(&CoreConfig::default())
    }
}

impl Machine {
    /// Creates a zeroed machine sized by `config`.
    #[must_use]
    pub fn with_config(config: &CoreConfig) -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
            pc: 0,
            cc: ConditionCodes::default(),
            status: RunStatus::Running,
            memory: new_address_space(config.memory_bytes),
        }
    }

    /// Backing store, for inspection.
    #[must_use]
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Backing store, for placing machine code and data.
    pub fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    /// Clears registers, `PC`, condition codes and status. The memory image
    /// is preserved.
    pub fn reset(&mut self) {
        self.registers = [0; REGISTER_COUNT];
        self.pc = 0;
        self.cc = ConditionCodes::default();
        self.status = RunStatus::Running;
    }
}

impl MachineState for Machine {
    fn pc(&self) -> Address {
        self.pc
    }

    fn set_pc(&mut self, pc: Address) {
        self.pc = pc;
    }

    fn register(&self, reg: Register) -> Word {
        self.registers[reg.index()]
    }

    fn set_register(&mut self, reg: Register, value: Word) {
        self.registers[reg.index()] = value;
    }

    fn read_byte(&self, addr: Address) -> Result<u8, FaultCode> {
        let range = span(&self.memory, addr, 1)?;
        Ok(self.memory[range.start])
    }

    fn write_byte(&mut self, addr: Address, value: u8) -> Result<(), FaultCode> {
        let range = span(&self.memory, addr, 1)?;
        self.memory[range.start] = value;
        Ok(())
    }

    fn read_word(&self, addr: Address) -> Result<Word, FaultCode> {
        read_word_le(&self.memory, addr)
    }

    fn write_word(&mut self, addr: Address, value: Word) -> Result<(), FaultCode> {
        write_word_le(&mut self.memory, addr, value)
    }

    fn condition_codes(&self) -> ConditionCodes {
        self.cc
    }

    fn set_condition_codes(&mut self, cc: ConditionCodes) {
        self.cc = cc;
    }

    fn status(&self) -> RunStatus {
        self.status
    }

    fn set_status(&mut self, status: RunStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::Machine;
    use crate::{
        ConditionCodes, CoreConfig, FaultCode, MachineState, Register, RunStatus,
        DEFAULT_MEMORY_BYTES,
    };

    #[test]
    fn default_machine_allocates_configured_memory() {
        let machine = Machine::default();
        assert_eq!(machine.memory().len(), DEFAULT_MEMORY_BYTES);
        assert_eq!(machine.status(), RunStatus::Running);
        assert_eq!(machine.pc(), 0);

        let small = Machine::with_config(&CoreConfig { memory_bytes: 32 });
        assert_eq!(small.memory().len(), 32);
    }

    #[test]
    fn register_file_tracks_each_register_independently() {
        let mut machine = Machine::default();

        for (offset, reg) in (0_u64..).zip(Register::ALL) {
            machine.set_register(reg, 0x1000 + offset);
        }

        for (offset, reg) in (0_u64..).zip(Register::ALL) {
            assert_eq!(machine.register(reg), 0x1000 + offset);
        }
    }

    #[test]
    fn byte_and_word_accessors_share_the_backing_store() {
        let mut machine = Machine::with_config(&CoreConfig { memory_bytes: 16 });
        machine.write_byte(0, 0xAB).expect("in range");
        machine.write_byte(1, 0xCD).expect("in range");
        assert_eq!(machine.read_word(0), Ok(0xCDAB));

        machine.write_word(8, 0x1122_3344_5566_7788).expect("in range");
        assert_eq!(machine.read_byte(8), Ok(0x88));
        assert_eq!(machine.read_byte(15), Ok(0x11));
    }

    #[test]
    fn out_of_range_accesses_report_invalid_address() {
        let mut machine = Machine::with_config(&CoreConfig { memory_bytes: 16 });
        assert_eq!(machine.read_byte(16), Err(FaultCode::InvalidAddress));
        assert_eq!(machine.write_byte(16, 1), Err(FaultCode::InvalidAddress));
        assert_eq!(machine.read_word(9), Err(FaultCode::InvalidAddress));
        assert_eq!(machine.write_word(9, 1), Err(FaultCode::InvalidAddress));
        assert_eq!(machine.status(), RunStatus::Running);
    }

    #[test]
    fn reset_restores_defaults_and_preserves_memory_image() {
        let mut machine = Machine::default();
        machine.memory_mut()[0x10] = 0x60;
        machine.set_pc(0x40);
        machine.set_register(Register::Rsp, 0x200);
        machine.set_condition_codes(ConditionCodes::new(true, true, true));
        machine.set_status(RunStatus::AddressFault);

        machine.reset();

        assert_eq!(machine.pc(), 0);
        assert_eq!(machine.register(Register::Rsp), 0);
        assert_eq!(machine.condition_codes(), ConditionCodes::default());
        assert_eq!(machine.status(), RunStatus::Running);
        assert_eq!(machine.memory()[0x10], 0x60);
    }
}
