/// Number of architecturally visible general-purpose registers (`%rax..%r13`).
pub const REGISTER_COUNT: usize = 14;
/// Register nybble reserved as "no register"; `0xEE` marks an empty pair.
pub const REG_NONE: u8 = 0xE;
/// Register nybble used to pad unused operand slots in instruction encodings.
pub const REG_PADDING: u8 = 0xF;

/// Condition-code bit for a zero result.
pub const CC_ZF: u8 = 1 << 0;
/// Condition-code bit for a negative result.
pub const CC_SF: u8 = 1 << 1;
/// Condition-code bit for signed overflow.
pub const CC_OF: u8 = 1 << 2;
/// Mask of architecturally active condition-code bits.
pub const CC_ACTIVE_MASK: u8 = CC_ZF | CC_SF | CC_OF;

/// General-purpose register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    Rax = 0x0,
    Rcx = 0x1,
    Rdx = 0x2,
    Rbx = 0x3,
    Rsp = 0x4,
    Rbp = 0x5,
    Rsi = 0x6,
    Rdi = 0x7,
    R8 = 0x8,
    R9 = 0x9,
    R10 = 0xA,
    R11 = 0xB,
    R12 = 0xC,
    R13 = 0xD,
}

impl Register {
    /// Ordered list of all general-purpose registers.
    pub const ALL: [Self; REGISTER_COUNT] = [
        Self::Rax,
        Self::Rcx,
        Self::Rdx,
        Self::Rbx,
        Self::Rsp,
        Self::Rbp,
        Self::Rsi,
        Self::Rdi,
        Self::R8,
        Self::R9,
        Self::R10,
        Self::R11,
        Self::R12,
        Self::R13,
    ];

    /// Returns the register-file index for this register.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the 4-bit encoding of this register.
    #[must_use]
    pub const fn nybble(self) -> u8 {
        self as u8
    }

    /// Decodes a register nybble. `REG_NONE`, `REG_PADDING` and anything
    /// wider than four bits name no register.
    #[must_use]
    pub const fn from_nybble(nybble: u8) -> Option<Self> {
        match nybble {
            0x0 => Some(Self::Rax),
            0x1 => Some(Self::Rcx),
            0x2 => Some(Self::Rdx),
            0x3 => Some(Self::Rbx),
            0x4 => Some(Self::Rsp),
            0x5 => Some(Self::Rbp),
            0x6 => Some(Self::Rsi),
            0x7 => Some(Self::Rdi),
            0x8 => Some(Self::R8),
            0x9 => Some(Self::R9),
            0xA => Some(Self::R10),
            0xB => Some(Self::R11),
            0xC => Some(Self::R12),
            0xD => Some(Self::R13),
            _ => None,
        }
    }

    /// Assembly name of the register, including the `%` sigil.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rax => "%rax",
            Self::Rcx => "%rcx",
            Self::Rdx => "%rdx",
            Self::Rbx => "%rbx",
            Self::Rsp => "%rsp",
            Self::Rbp => "%rbp",
            Self::Rsi => "%rsi",
            Self::Rdi => "%rdi",
            Self::R8 => "%r8",
            Self::R9 => "%r9",
            Self::R10 => "%r10",
            Self::R11 => "%r11",
            Self::R12 => "%r12",
            Self::R13 => "%r13",
        }
    }
}

/// Packed zero/sign/overflow condition-code byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ConditionCodes(u8);

impl ConditionCodes {
    /// Builds the byte from individual flags.
    #[must_use]
    pub const fn new(zero: bool, sign: bool, overflow: bool) -> Self {
        let mut bits = 0;
        if zero {
            bits |= CC_ZF;
        }
        if sign {
            bits |= CC_SF;
        }
        if overflow {
            bits |= CC_OF;
        }
        Self(bits)
    }

    /// Wraps a raw status byte, dropping inactive bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & CC_ACTIVE_MASK)
    }

    /// Raw status byte.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Zero flag.
    #[must_use]
    pub const fn zero(self) -> bool {
        self.0 & CC_ZF != 0
    }

    /// Sign flag.
    #[must_use]
    pub const fn sign(self) -> bool {
        self.0 & CC_SF != 0
    }

    /// Overflow flag.
    #[must_use]
    pub const fn overflow(self) -> bool {
        self.0 & CC_OF != 0
    }
}
