use crate::WORD_BYTES;

/// Base opcodes selected by the high nybble of an instruction's first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum BaseOpcode {
    Halt = 0x0,
    Nop = 0x1,
    Cmov = 0x2,
    Irmov = 0x3,
    Rmmov = 0x4,
    Mrmov = 0x5,
    Op = 0x6,
    Jump = 0x7,
    Call = 0x8,
    Ret = 0x9,
    Push = 0xA,
    Pop = 0xB,
}

/// Length of an instruction carrying only the opcode byte.
const BARE: usize = 1;
/// Opcode byte plus register-specifier byte.
const WITH_REGS: usize = 2;
/// Opcode byte plus one word.
const WITH_WORD: usize = 1 + WORD_BYTES;
/// Opcode byte, register-specifier byte and one word.
const WITH_REGS_AND_WORD: usize = 2 + WORD_BYTES;

/// Single source-of-truth opcode table: `(high nybble, opcode, length in bytes)`.
///
/// Any high nybble not present here is an invalid instruction.
pub const OPCODE_TABLE: &[(u8, BaseOpcode, usize)] = &[
    (0x0, BaseOpcode::Halt, BARE),
    (0x1, BaseOpcode::Nop, BARE),
    (0x2, BaseOpcode::Cmov, WITH_REGS),
    (0x3, BaseOpcode::Irmov, WITH_REGS_AND_WORD),
    (0x4, BaseOpcode::Rmmov, WITH_REGS_AND_WORD),
    (0x5, BaseOpcode::Mrmov, WITH_REGS_AND_WORD),
    (0x6, BaseOpcode::Op, WITH_REGS),
    (0x7, BaseOpcode::Jump, WITH_WORD),
    (0x8, BaseOpcode::Call, WITH_WORD),
    (0x9, BaseOpcode::Ret, BARE),
    (0xA, BaseOpcode::Push, WITH_REGS),
    (0xB, BaseOpcode::Pop, WITH_REGS),
];

impl BaseOpcode {
    /// Encoded length in bytes of instructions with this opcode.
    #[must_use]
    pub fn length(self) -> usize {
        OPCODE_TABLE
            .iter()
            .find_map(|(_, opcode, len)| (*opcode == self).then_some(*len))
            .unwrap_or(BARE)
    }

    /// Returns `true` when the second byte is a register specifier.
    #[must_use]
    pub const fn has_register_byte(self) -> bool {
        matches!(
            self,
            Self::Cmov | Self::Irmov | Self::Rmmov | Self::Mrmov | Self::Op | Self::Push | Self::Pop
        )
    }
}

/// Returns the base opcode for a high nybble; `None` is an invalid instruction.
#[must_use]
pub fn classify_opcode(nybble: u8) -> Option<BaseOpcode> {
    OPCODE_TABLE
        .iter()
        .find_map(|(code, opcode, _)| (*code == nybble).then_some(*opcode))
}

/// Splits a byte into its `(high, low)` nybbles.
#[must_use]
pub const fn split_nybbles(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0x0F)
}

/// Two-register ALU operations selected by the low nybble of `OPq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum AluFunction {
    Add = 0x0,
    Sub = 0x1,
    And = 0x2,
    Xor = 0x3,
}

impl AluFunction {
    /// Decodes the function selector nybble.
    #[must_use]
    pub const fn from_u4(value: u8) -> Option<Self> {
        match value {
            0x0 => Some(Self::Add),
            0x1 => Some(Self::Sub),
            0x2 => Some(Self::And),
            0x3 => Some(Self::Xor),
            _ => None,
        }
    }

    /// Assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "addq",
            Self::Sub => "subq",
            Self::And => "andq",
            Self::Xor => "xorq",
        }
    }
}

/// Branch and conditional-move conditions selected by a low nybble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Condition {
    Always = 0x0,
    Le = 0x1,
    Lt = 0x2,
    Eq = 0x3,
    Ne = 0x4,
    Ge = 0x5,
    Gt = 0x6,
}

impl Condition {
    /// Every defined condition in selector order.
    pub const ALL: [Self; 7] = [
        Self::Always,
        Self::Le,
        Self::Lt,
        Self::Eq,
        Self::Ne,
        Self::Ge,
        Self::Gt,
    ];

    /// Decodes a condition selector nybble.
    #[must_use]
    pub const fn from_selector(selector: u8) -> Option<Self> {
        match selector {
            0x0 => Some(Self::Always),
            0x1 => Some(Self::Le),
            0x2 => Some(Self::Lt),
            0x3 => Some(Self::Eq),
            0x4 => Some(Self::Ne),
            0x5 => Some(Self::Ge),
            0x6 => Some(Self::Gt),
            _ => None,
        }
    }

    /// Raw selector nybble.
    #[must_use]
    pub const fn selector(self) -> u8 {
        self as u8
    }

    /// Mnemonic suffix (`""` for the unconditional form).
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Always => "",
            Self::Le => "le",
            Self::Lt => "l",
            Self::Eq => "e",
            Self::Ne => "ne",
            Self::Ge => "ge",
            Self::Gt => "g",
        }
    }
}
