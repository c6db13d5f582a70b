//! Pipeline stall simulator.
//!
//! [`StallSim`] models when a five-stage pipelined Y86 implementation would
//! have to hold issue. It is clocked once per simulated cycle against the same
//! machine state the execution engine runs on; on [`ClockOutcome::Proceed`]
//! the driver lets the engine execute the instruction at `PC`.
//!
//! Stalls come from pipeline fill after reset, conditional jumps, `ret`, and
//! data hazards against the register records of the three most recently
//! issued instructions.

mod window;

pub use window::{HazardWindow, RegisterPair, WINDOW_DEPTH};

use tracing::debug;

use crate::encoding::{classify_opcode, split_nybbles, BaseOpcode};
use crate::timing::{bubble_cost, BubbleKind};
use crate::{Address, MachineState, StallConfig};

/// Result of one pipeline clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ClockOutcome {
    /// The instruction at `PC` may issue this cycle.
    Proceed,
    /// A bubble is inserted; `PC` must not advance.
    Stall,
}

impl ClockOutcome {
    /// Returns `true` for [`ClockOutcome::Proceed`].
    #[must_use]
    pub const fn is_proceed(self) -> bool {
        matches!(self, Self::Proceed)
    }
}

/// Hazard classification of the instruction about to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IssueProbe {
    /// Record shifted into the window.
    pair: RegisterPair,
    /// Fixed control-hazard bubbles.
    control_bubbles: u32,
    /// Whether the window is scanned, and with the high-nybble check.
    scan: Option<bool>,
}

impl IssueProbe {
    const UNTRACKED: Self = Self {
        pair: RegisterPair::NONE,
        control_bubbles: 0,
        scan: None,
    };
}

/// Cycle-by-cycle pipeline stall predictor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StallSim {
    config: StallConfig,
    bubbles: u32,
    stalling: bool,
    window: HazardWindow,
    pending: RegisterPair,
}

impl Default for StallSim {
    fn default() -> Self {
        Self::new(StallConfig::default())
    }
}

impl StallSim {
    /// Creates a simulator at pipeline reset: the startup bubbles are pending
    /// and the window holds no records.
    #[must_use]
    pub fn new(config: StallConfig) -> Self {
        Self {
            config,
            bubbles: config.startup_bubbles,
            stalling: false,
            window: HazardWindow::default(),
            pending: RegisterPair::NONE,
        }
    }

    /// Returns to the state of [`StallSim::new`] with the same configuration.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Bubble configuration.
    #[must_use]
    pub const fn config(&self) -> StallConfig {
        self.config
    }

    /// Bubbles still to be inserted.
    #[must_use]
    pub const fn pending_bubbles(&self) -> u32 {
        self.bubbles
    }

    /// Whether a stall raised by an issuing instruction is still draining.
    #[must_use]
    pub const fn is_stalling(&self) -> bool {
        self.stalling
    }

    /// Register records of recent issue slots, newest first.
    #[must_use]
    pub const fn window(&self) -> HazardWindow {
        self.window
    }

    /// Advances the pipeline by one clock cycle.
    ///
    /// When no stall is in progress, the instruction at `PC` is classified
    /// once: control and data hazards add bubbles and its register record is
    /// shifted into the window. While bubbles remain, one is consumed and the
    /// cycle stalls; the last bubble of a hazard stall shifts in the record of
    /// the instruction that raised it.
    pub fn clock<S: MachineState + ?Sized>(&mut self, state: &S) -> ClockOutcome {
        if !self.stalling && self.bubbles == 0 {
            self.detect(state);
        }

        if self.bubbles > 0 {
            self.bubbles -= 1;
            if self.bubbles == 0 {
                self.window.push(self.pending);
                self.pending = RegisterPair::NONE;
            } else {
                self.window.push(RegisterPair::NONE);
            }
            return ClockOutcome::Stall;
        }

        self.stalling = false;
        ClockOutcome::Proceed
    }

    fn detect<S: MachineState + ?Sized>(&mut self, state: &S) {
        let pc = state.pc();
        let probe = self.probe(state, pc);

        let data_bubbles = probe
            .scan
            .and_then(|check_high| self.window.first_conflict(probe.pair, check_high))
            .map_or(0, data_hazard_bubbles);
        let added = probe.control_bubbles.saturating_add(data_bubbles);

        if added > 0 {
            debug!(
                "{pc:#010x}: stall {added} cycles (control {}, data {data_bubbles})",
                probe.control_bubbles
            );
            self.bubbles = self.bubbles.saturating_add(added);
            self.pending = probe.pair;
            self.stalling = true;
        }
        self.window.push(probe.pair);
    }

    fn probe<S: MachineState + ?Sized>(&self, state: &S, pc: Address) -> IssueProbe {
        let Ok(head) = state.read_byte(pc) else {
            return IssueProbe::UNTRACKED;
        };
        let (op, function) = split_nybbles(head);
        let Some(opcode) = classify_opcode(op) else {
            return IssueProbe::UNTRACKED;
        };

        match opcode {
            BaseOpcode::Jump if function != 0 => IssueProbe {
                control_bubbles: self.config.jump_bubbles,
                ..IssueProbe::UNTRACKED
            },
            BaseOpcode::Ret => IssueProbe {
                control_bubbles: self.config.ret_bubbles,
                ..IssueProbe::UNTRACKED
            },
            BaseOpcode::Call => tracked(RegisterPair::with_stack_pointer(0xF0), false),
            BaseOpcode::Irmov
            | BaseOpcode::Cmov
            | BaseOpcode::Mrmov
            | BaseOpcode::Op
            | BaseOpcode::Push
            | BaseOpcode::Pop => {
                let Ok(regs) = state.read_byte(pc.wrapping_add(1)) else {
                    return IssueProbe::UNTRACKED;
                };
                match opcode {
                    BaseOpcode::Mrmov => tracked(RegisterPair::swapped(regs), true),
                    BaseOpcode::Op => tracked(RegisterPair::from_byte(regs), true),
                    BaseOpcode::Push | BaseOpcode::Pop => {
                        tracked(RegisterPair::with_stack_pointer(regs), false)
                    }
                    _ => tracked(RegisterPair::from_byte(regs), false),
                }
            }
            BaseOpcode::Halt | BaseOpcode::Nop | BaseOpcode::Rmmov | BaseOpcode::Jump => {
                IssueProbe::UNTRACKED
            }
        }
    }
}

const fn tracked(pair: RegisterPair, check_high: bool) -> IssueProbe {
    IssueProbe {
        pair,
        control_bubbles: 0,
        scan: Some(check_high),
    }
}

/// Bubbles for a conflict with the window record `distance` slots back.
fn data_hazard_bubbles(distance: usize) -> u32 {
    let newest = bubble_cost(BubbleKind::DataHazard).unwrap_or(0);
    newest.saturating_sub(u32::try_from(distance).unwrap_or(u32::MAX))
}
