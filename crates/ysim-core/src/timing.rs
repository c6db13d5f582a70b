/// Pipeline events that insert a fixed number of bubbles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BubbleKind {
    /// Filling the five-stage pipeline after reset.
    PipelineFill,
    /// Conditional jump (`jXX` with a non-zero selector).
    ConditionalJump,
    /// `ret`, waiting for the return address to leave memory.
    Return,
    /// Read of a register written by the instruction issued one cycle before.
    DataHazard,
}

/// Single source-of-truth bubble-cost table.
///
/// `DataHazard` is the cost against the newest window entry; an entry `i`
/// slots older costs `i` fewer bubbles.
pub const BUBBLE_COST_TABLE: &[(BubbleKind, u32)] = &[
    (BubbleKind::PipelineFill, 4),
    (BubbleKind::ConditionalJump, 2),
    (BubbleKind::Return, 3),
    (BubbleKind::DataHazard, 3),
];

/// Looks up the bubble cost for a pipeline event.
#[must_use]
pub fn bubble_cost(kind: BubbleKind) -> Option<u32> {
    BUBBLE_COST_TABLE
        .iter()
        .find_map(|(entry_kind, bubbles)| (*entry_kind == kind).then_some(*bubbles))
}
