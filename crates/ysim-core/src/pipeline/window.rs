use std::fmt;

use crate::encoding::split_nybbles;
use crate::Register;

/// Number of recently issued instructions tracked for data hazards.
pub const WINDOW_DEPTH: usize = 3;

/// Register record of one instruction: two packed register nybbles.
///
/// The low nybble is the register the instruction writes (or the one tracked
/// as its destination); the high nybble is the other register it names.
/// `0xEE` ([`RegisterPair::NONE`]) tracks nothing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterPair(u8);

impl RegisterPair {
    /// Record that names no register.
    pub const NONE: Self = Self(0xEE);

    /// Uses a register-specifier byte as is.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    /// Register-specifier byte with its nybbles exchanged.
    #[must_use]
    pub const fn swapped(byte: u8) -> Self {
        Self(byte.rotate_left(4))
    }

    /// Keeps the high nybble of `byte` and tracks `%rsp` in the low nybble.
    #[must_use]
    pub const fn with_stack_pointer(byte: u8) -> Self {
        Self((byte & 0xF0) | Register::Rsp.nybble())
    }

    /// High nybble.
    #[must_use]
    pub const fn high(self) -> u8 {
        split_nybbles(self.0).0
    }

    /// Low nybble.
    #[must_use]
    pub const fn low(self) -> u8 {
        split_nybbles(self.0).1
    }

    /// Packed byte.
    #[must_use]
    pub const fn byte(self) -> u8 {
        self.0
    }

    /// Returns `true` when this record depends on `older`.
    ///
    /// Either nybble matching `older`'s low nybble conflicts; with
    /// `check_high`, our low nybble matching `older`'s high nybble does too.
    #[must_use]
    pub const fn conflicts_with(self, older: Self, check_high: bool) -> bool {
        self.high() == older.low()
            || self.low() == older.low()
            || (check_high && self.low() == older.high())
    }
}

impl Default for RegisterPair {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Debug for RegisterPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegisterPair({:02x})", self.0)
    }
}

/// Register records of the most recently issued instructions, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct HazardWindow {
    entries: [RegisterPair; WINDOW_DEPTH],
}

impl HazardWindow {
    /// Records, newest first.
    #[must_use]
    pub const fn entries(&self) -> [RegisterPair; WINDOW_DEPTH] {
        self.entries
    }

    /// Shifts `pair` in at index 0; the oldest record drops out.
    pub fn push(&mut self, pair: RegisterPair) {
        self.entries.rotate_right(1);
        self.entries[0] = pair;
    }

    /// Index of the newest record `pair` conflicts with.
    #[must_use]
    pub fn first_conflict(&self, pair: RegisterPair, check_high: bool) -> Option<usize> {
        self.entries
            .iter()
            .position(|older| pair.conflicts_with(*older, check_high))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{HazardWindow, RegisterPair};

    #[test]
    fn pair_constructors_place_nybbles() {
        assert_eq!(RegisterPair::from_byte(0x03).high(), 0x0);
        assert_eq!(RegisterPair::from_byte(0x03).low(), 0x3);
        assert_eq!(RegisterPair::swapped(0x15).byte(), 0x51);
        assert_eq!(RegisterPair::with_stack_pointer(0x7F).byte(), 0x74);
        assert_eq!(RegisterPair::with_stack_pointer(0xF0).byte(), 0xF4);
        assert_eq!(RegisterPair::default(), RegisterPair::NONE);
    }

    #[test]
    fn push_shifts_newest_first() {
        let mut window = HazardWindow::default();
        for byte in [0x01, 0x02, 0x03, 0x04] {
            window.push(RegisterPair::from_byte(byte));
        }
        assert_eq!(
            window.entries().map(RegisterPair::byte),
            [0x04, 0x03, 0x02]
        );
    }

    #[rstest]
    // our high nybble reads the older destination
    #[case(0x03, 0xF0, false, true)]
    // same destination
    #[case(0x13, 0xF3, false, true)]
    // our low nybble against the older high nybble, only when checked
    #[case(0x23, 0x3F, false, false)]
    #[case(0x23, 0x3F, true, true)]
    #[case(0x12, 0x34, true, false)]
    fn conflict_rules(
        #[case] newer: u8,
        #[case] older: u8,
        #[case] check_high: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(
            RegisterPair::from_byte(newer)
                .conflicts_with(RegisterPair::from_byte(older), check_high),
            expected
        );
    }

    #[test]
    fn first_conflict_prefers_newest_entry() {
        let mut window = HazardWindow::default();
        window.push(RegisterPair::from_byte(0xF0));
        window.push(RegisterPair::NONE);
        window.push(RegisterPair::from_byte(0xF0));
        assert_eq!(
            window.first_conflict(RegisterPair::from_byte(0x03), false),
            Some(0)
        );

        window.push(RegisterPair::NONE);
        assert_eq!(
            window.first_conflict(RegisterPair::from_byte(0x03), false),
            Some(1)
        );
        assert_eq!(
            window.first_conflict(RegisterPair::from_byte(0x12), true),
            None
        );
    }
}
