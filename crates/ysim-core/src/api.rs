//! Host-facing configuration and run-summary types.

use crate::timing::{bubble_cost, BubbleKind};
use crate::{RunStatus, DEFAULT_MEMORY_BYTES};

/// Configuration for a reference [`Machine`](crate::Machine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Size of the flat address space in bytes.
    pub memory_bytes: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            memory_bytes: DEFAULT_MEMORY_BYTES,
        }
    }
}

/// Fixed bubble counts used by [`StallSim`](crate::StallSim).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StallConfig {
    /// Stall cycles before the first instruction may issue.
    pub startup_bubbles: u32,
    /// Bubbles inserted after a conditional jump.
    pub jump_bubbles: u32,
    /// Bubbles inserted after `ret`.
    pub ret_bubbles: u32,
}

impl Default for StallConfig {
    fn default() -> Self {
        Self {
            startup_bubbles: bubble_cost(BubbleKind::PipelineFill).unwrap_or(4),
            jump_bubbles: bubble_cost(BubbleKind::ConditionalJump).unwrap_or(2),
            ret_bubbles: bubble_cost(BubbleKind::Return).unwrap_or(3),
        }
    }
}

/// Summary of an engine-only [`run`](crate::run()).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RunOutcome {
    /// Instructions executed, including the one that halted or faulted.
    pub steps: u64,
    /// Run status when the driver stopped.
    pub status: RunStatus,
}

/// Summary of a lock-step [`run_pipelined`](crate::run_pipelined()).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PipelineOutcome {
    /// Simulated clock cycles.
    pub cycles: u64,
    /// Instructions issued to the engine.
    pub instructions: u64,
    /// Cycles on which the stall simulator held issue.
    pub stall_cycles: u64,
    /// Run status when the driver stopped.
    pub status: RunStatus,
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, StallConfig};
    use crate::DEFAULT_MEMORY_BYTES;

    #[test]
    fn default_config_uses_full_address_space() {
        assert_eq!(CoreConfig::default().memory_bytes, DEFAULT_MEMORY_BYTES);
    }

    #[test]
    fn default_stall_config_matches_bubble_table() {
        assert_eq!(
            StallConfig::default(),
            StallConfig {
                startup_bubbles: 4,
                jump_bubbles: 2,
                ret_bubbles: 3,
            }
        );
    }
}
