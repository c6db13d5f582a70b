//! Condition-code computation for arithmetic and logical results.

use crate::{ConditionCodes, Word};

const SIGN_BIT: Word = 1 << (Word::BITS - 1);

const fn is_negative(word: Word) -> bool {
    word & SIGN_BIT != 0
}

/// Flags after `result = a + b`.
#[must_use]
pub const fn add_flags(a: Word, b: Word, result: Word) -> ConditionCodes {
    let overflow = is_negative(a) == is_negative(b) && is_negative(result) != is_negative(a);
    ConditionCodes::new(result == 0, is_negative(result), overflow)
}

/// Flags after `result = b - a`.
#[must_use]
pub const fn sub_flags(a: Word, b: Word, result: Word) -> ConditionCodes {
    let overflow = is_negative(a) != is_negative(b) && is_negative(result) != is_negative(b);
    ConditionCodes::new(result == 0, is_negative(result), overflow)
}

/// Flags after a bitwise operation; overflow is always cleared.
#[must_use]
pub const fn logic_flags(result: Word) -> ConditionCodes {
    ConditionCodes::new(result == 0, is_negative(result), false)
}
